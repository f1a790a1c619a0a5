//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

use crate::core::error::SimError;

/// Simulation round counter (discrete time unit)
pub type Round = u32;

/// Unique identifier for society members
///
/// Equal to the member's index in the population vector. Members are
/// created once at initialization and never destroyed, so ids are stable
/// for the whole run and reproducible under a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub u32);

impl MemberId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Member gender (immutable after creation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Class tier (mutable via mobility checks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassTier {
    Low,
    Middle,
    High,
}

impl ClassTier {
    pub const ALL: [ClassTier; 3] = [ClassTier::Low, ClassTier::Middle, ClassTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassTier::Low => "low",
            ClassTier::Middle => "middle",
            ClassTier::High => "high",
        }
    }
}

/// Ideology stance with numeric mapping P=1, F=-1, U=0
///
/// Subject to a 3-round change cooldown enforced by the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ideology {
    P,
    F,
    U,
}

impl Ideology {
    pub const ALL: [Ideology; 3] = [Ideology::P, Ideology::F, Ideology::U];

    /// Numeric mapping used by averages and deviation checks
    pub fn value(&self) -> f64 {
        match self {
            Ideology::P => 1.0,
            Ideology::F => -1.0,
            Ideology::U => 0.0,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Ideology::P => "P",
            Ideology::F => "F",
            Ideology::U => "U",
        }
    }

    /// Parse an ideology code. Unknown codes are a config/programming
    /// error and fail loudly rather than defaulting.
    pub fn from_code(code: &str) -> Result<Self, SimError> {
        match code {
            "P" => Ok(Ideology::P),
            "F" => Ok(Ideology::F),
            "U" => Ok(Ideology::U),
            other => Err(SimError::UnknownIdeology(other.to_string())),
        }
    }
}

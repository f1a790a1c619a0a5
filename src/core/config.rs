//! Simulation configuration and validation
//!
//! All run parameters are collected here. Values not overridden by the
//! caller default to the reference tuning, which produces a society that
//! neither collapses nor saturates within a few hundred rounds.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SimError};

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === POPULATION ===
    /// Total number of members. Fixed for the whole run.
    pub total_population: usize,
    /// Fraction of the population that is male
    pub male_ratio: f64,
    /// Class distribution; the three ratios must sum to 1.0 (+/- 0.01)
    pub low_class_ratio: f64,
    pub middle_class_ratio: f64,
    pub high_class_ratio: f64,

    // === SKILLS ===
    /// Per-gender skill means; sampling uses a shared standard deviation
    pub male_care_skill_mean: f64,
    pub male_competition_skill_mean: f64,
    pub female_care_skill_mean: f64,
    pub female_competition_skill_mean: f64,
    pub skill_std_dev: f64,

    // === POLICY LEVER INITIAL VALUES ===
    pub competition_reward: f64,
    pub care_reward: f64,
    pub tax_redistribution: f64,
    pub attribution_bias: f64,
    pub social_sanction: f64,

    // === MECHANISM RATES ===
    /// Per-round wealth growth before the skill bonus
    pub base_growth_rate: f64,
    /// Skill pull toward an imitation target
    pub learning_rate: f64,
    /// Ideology deviation above which a sanction is triggered
    pub sanction_trigger_threshold: f64,

    // === RUN CONTROL ===
    pub max_rounds: u32,
    pub random_seed: u64,
    /// Cadence of learning, conversion, elite rebuild and mobility
    pub periodic_interval: u32,
    /// Record per-member wealth/power/ideology history sequences.
    /// Disable on long runs over large populations to bound memory.
    pub track_member_history: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_population: 200,
            male_ratio: 0.5,
            low_class_ratio: 0.6,
            middle_class_ratio: 0.3,
            high_class_ratio: 0.1,

            male_care_skill_mean: 0.4,
            male_competition_skill_mean: 0.6,
            female_care_skill_mean: 0.6,
            female_competition_skill_mean: 0.4,
            skill_std_dev: 0.15,

            competition_reward: 1.5,
            care_reward: 1.0,
            tax_redistribution: 0.3,
            attribution_bias: 0.6,
            social_sanction: 0.4,

            base_growth_rate: 0.01,
            learning_rate: 0.1,
            sanction_trigger_threshold: 0.4,

            max_rounds: 200,
            random_seed: 42,
            periodic_interval: 10,
            track_member_history: true,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file. Missing keys fall back to
    /// defaults; the result is not validated here.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration, collecting every failure.
    ///
    /// A run must not start while this returns `Err`; the round loop
    /// assumes all of these invariants.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let class_sum = self.low_class_ratio + self.middle_class_ratio + self.high_class_ratio;
        if (class_sum - 1.0).abs() > 0.01 {
            errors.push(format!(
                "class ratios must sum to 1.0, got {:.2}",
                class_sum
            ));
        }

        if self.total_population < 50 {
            errors.push(format!(
                "total_population must be at least 50, got {}",
                self.total_population
            ));
        }

        if !(0.0..=1.0).contains(&self.male_ratio) {
            errors.push(format!(
                "male_ratio must be in [0, 1], got {}",
                self.male_ratio
            ));
        }

        if self.male_care_skill_mean + self.male_competition_skill_mean > 1.8 {
            errors.push("male skill means sum above 1.8, society would be unbalanced".to_string());
        }
        if self.female_care_skill_mean + self.female_competition_skill_mean > 1.8 {
            errors
                .push("female skill means sum above 1.8, society would be unbalanced".to_string());
        }

        if self.skill_std_dev <= 0.0 {
            errors.push(format!(
                "skill_std_dev must be positive, got {}",
                self.skill_std_dev
            ));
        }

        if self.max_rounds == 0 {
            errors.push("max_rounds must be at least 1".to_string());
        }
        if self.periodic_interval == 0 {
            errors.push("periodic_interval must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and convert failures into a `SimError`
    pub fn validated(self) -> Result<Self> {
        match self.validate() {
            Ok(()) => Ok(self),
            Err(errors) => Err(SimError::InvalidConfig(errors)),
        }
    }
}

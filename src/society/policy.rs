//! Policy levers - the five bounded scalars the elite circle votes on

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::SimError;

/// Names of the five policy levers
///
/// A fixed enum rather than string keys; `ALL` provides the iteration
/// view used by vote selection and bound lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyLever {
    CompetitionReward,
    CareReward,
    TaxRedistribution,
    AttributionBias,
    SocialSanction,
}

impl PolicyLever {
    pub const ALL: [PolicyLever; 5] = [
        PolicyLever::CompetitionReward,
        PolicyLever::CareReward,
        PolicyLever::TaxRedistribution,
        PolicyLever::AttributionBias,
        PolicyLever::SocialSanction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PolicyLever::CompetitionReward => "competition_reward",
            PolicyLever::CareReward => "care_reward",
            PolicyLever::TaxRedistribution => "tax_redistribution",
            PolicyLever::AttributionBias => "attribution_bias",
            PolicyLever::SocialSanction => "social_sanction",
        }
    }

    /// Parse a lever name. Unknown names are a programming/config error
    /// and fail loudly rather than defaulting.
    pub fn from_name(name: &str) -> Result<Self, SimError> {
        match name {
            "competition_reward" => Ok(PolicyLever::CompetitionReward),
            "care_reward" => Ok(PolicyLever::CareReward),
            "tax_redistribution" => Ok(PolicyLever::TaxRedistribution),
            "attribution_bias" => Ok(PolicyLever::AttributionBias),
            "social_sanction" => Ok(PolicyLever::SocialSanction),
            other => Err(SimError::UnknownPolicyLever(other.to_string())),
        }
    }

    /// Configured [min, max] band for this lever
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            PolicyLever::CompetitionReward => (0.5, 2.0),
            PolicyLever::CareReward => (0.5, 2.0),
            PolicyLever::TaxRedistribution => (0.0, 0.8),
            PolicyLever::AttributionBias => (0.0, 1.0),
            PolicyLever::SocialSanction => (0.0, 1.0),
        }
    }
}

/// Current values of the five policy levers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyLevers {
    pub competition_reward: f64,
    pub care_reward: f64,
    pub tax_redistribution: f64,
    pub attribution_bias: f64,
    pub social_sanction: f64,
}

impl PolicyLevers {
    /// Take the initial lever values from a run configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            competition_reward: config.competition_reward,
            care_reward: config.care_reward,
            tax_redistribution: config.tax_redistribution,
            attribution_bias: config.attribution_bias,
            social_sanction: config.social_sanction,
        }
    }

    pub fn get(&self, lever: PolicyLever) -> f64 {
        match lever {
            PolicyLever::CompetitionReward => self.competition_reward,
            PolicyLever::CareReward => self.care_reward,
            PolicyLever::TaxRedistribution => self.tax_redistribution,
            PolicyLever::AttributionBias => self.attribution_bias,
            PolicyLever::SocialSanction => self.social_sanction,
        }
    }

    pub fn set(&mut self, lever: PolicyLever, value: f64) {
        match lever {
            PolicyLever::CompetitionReward => self.competition_reward = value,
            PolicyLever::CareReward => self.care_reward = value,
            PolicyLever::TaxRedistribution => self.tax_redistribution = value,
            PolicyLever::AttributionBias => self.attribution_bias = value,
            PolicyLever::SocialSanction => self.social_sanction = value,
        }
    }

    /// Iterate (lever, value) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (PolicyLever, f64)> + '_ {
        PolicyLever::ALL.into_iter().map(move |l| (l, self.get(l)))
    }
}

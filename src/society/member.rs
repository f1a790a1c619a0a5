//! Member - one individual of the society and their per-member behaviors

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{ClassTier, Gender, Ideology, MemberId, Round};

/// Rounds that must pass between two ideology changes
pub const IDEOLOGY_COOLDOWN: Round = 3;

/// Rounds a sanction effect stays active
pub const SANCTION_DURATION: Round = 3;

/// Per-round multiplicative decay of sanction losses
pub const SANCTION_DECAY: f64 = 0.5;

const SANCTION_POWER_LOSS_RATE: f64 = 0.08;
const SANCTION_WEALTH_LOSS_RATE: f64 = 0.03;

/// Hard floor on member wealth
pub const WEALTH_FLOOR: f64 = 0.01;

/// A decaying power/wealth penalty on an ideologically deviant member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanctionEffect {
    pub intensity: f64,
    pub start_round: Round,
    pub duration: Round,
    pub power_loss: f64,
    pub wealth_loss: f64,
    /// Losses after decay, rescaled from the base each update pass
    pub current_power_loss: f64,
    pub current_wealth_loss: f64,
}

impl SanctionEffect {
    fn new(intensity: f64, start_round: Round) -> Self {
        let power_loss = intensity * SANCTION_POWER_LOSS_RATE;
        let wealth_loss = intensity * SANCTION_WEALTH_LOSS_RATE;
        Self {
            intensity,
            start_round,
            duration: SANCTION_DURATION,
            power_loss,
            wealth_loss,
            current_power_loss: power_loss,
            current_wealth_loss: wealth_loss,
        }
    }
}

/// Sum of currently-decayed sanction losses
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SanctionTotals {
    pub power_loss: f64,
    pub wealth_loss: f64,
}

/// Append-only per-member audit sequences
///
/// Gated by `SimulationConfig::track_member_history` so that long runs
/// over large populations can run with bounded memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberHistory {
    pub wealth: Vec<f64>,
    pub power: Vec<f64>,
    pub ideology: Vec<Ideology>,
}

/// Per-class average wealth, input to the mobility check
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassAverages {
    pub low: f64,
    pub middle: f64,
    pub high: f64,
}

/// One member of the society
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub gender: Gender,
    pub class_tier: ClassTier,
    pub wealth: f64,
    /// Always derived as 0.5*wealth + 0.25*competition + 0.25*care,
    /// then adjusted by event/bias/sanction steps within a round
    pub power: f64,
    pub care_skill: f64,
    pub competition_skill: f64,
    pub ideology: Ideology,
    pub ideology_value: f64,
    pub sanction_effects: Vec<SanctionEffect>,
    pub last_ideology_change: Round,
    pub history: Option<MemberHistory>,
}

impl Member {
    /// Create a member with randomized skills, wealth and ideology
    pub fn new(
        id: MemberId,
        gender: Gender,
        class_tier: ClassTier,
        config: &SimulationConfig,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let (care_mean, comp_mean) = match gender {
            Gender::Male => (
                config.male_care_skill_mean,
                config.male_competition_skill_mean,
            ),
            Gender::Female => (
                config.female_care_skill_mean,
                config.female_competition_skill_mean,
            ),
        };
        let std_dev = config.skill_std_dev;

        // The skill favored by a gender gets the wider upper bound
        let care_skill = match gender {
            Gender::Male => sample_normal(rng, care_mean, std_dev).clamp(0.1, 0.9),
            Gender::Female => sample_normal(rng, care_mean, std_dev).clamp(0.2, 1.0),
        };
        let competition_skill = match gender {
            Gender::Male => sample_normal(rng, comp_mean, std_dev).clamp(0.2, 1.0),
            Gender::Female => sample_normal(rng, comp_mean, std_dev).clamp(0.1, 0.9),
        };

        let (mean, std, min, max) = match class_tier {
            ClassTier::Low => (0.2, 0.1, 0.05, 0.35),
            ClassTier::Middle => (0.5, 0.15, 0.2, 0.8),
            ClassTier::High => (0.8, 0.1, 0.6, 1.0),
        };
        let wealth = sample_normal(rng, mean, std).clamp(min, max);

        let ideology = Ideology::ALL[rng.gen_range(0..Ideology::ALL.len())];

        let mut member = Self {
            id,
            gender,
            class_tier,
            wealth,
            power: 0.0,
            care_skill,
            competition_skill,
            ideology,
            ideology_value: ideology.value(),
            sanction_effects: Vec::new(),
            last_ideology_change: 0,
            history: config.track_member_history.then(MemberHistory::default),
        };
        member.power = member.derived_power();

        if let Some(history) = &mut member.history {
            history.wealth.push(member.wealth);
            history.power.push(member.power);
            history.ideology.push(member.ideology);
        }

        member
    }

    fn derived_power(&self) -> f64 {
        0.5 * self.wealth + 0.25 * self.competition_skill + 0.25 * self.care_skill
    }

    /// Set wealth, clamped to the floor, and append to history
    pub fn update_wealth(&mut self, new_wealth: f64) {
        self.wealth = new_wealth.max(WEALTH_FLOOR);
        if let Some(history) = &mut self.history {
            history.wealth.push(self.wealth);
        }
    }

    /// Recompute power from current wealth/skills and append to history
    pub fn update_power(&mut self) {
        self.power = self.derived_power();
        if let Some(history) = &mut self.history {
            history.power.push(self.power);
        }
    }

    /// Switch ideology, gated by the change cooldown.
    ///
    /// Returns false (and mutates nothing) when the cooldown has not
    /// elapsed.
    pub fn change_ideology(&mut self, new_ideology: Ideology, current_round: Round) -> bool {
        if current_round.saturating_sub(self.last_ideology_change) < IDEOLOGY_COOLDOWN {
            return false;
        }
        self.ideology = new_ideology;
        self.ideology_value = new_ideology.value();
        self.last_ideology_change = current_round;
        if let Some(history) = &mut self.history {
            history.ideology.push(new_ideology);
        }
        true
    }

    pub fn add_sanction_effect(&mut self, intensity: f64, current_round: Round) {
        self.sanction_effects
            .push(SanctionEffect::new(intensity, current_round));
    }

    /// Decay active sanction effects and drop expired ones.
    ///
    /// Effects are independent; losses halve for every round elapsed
    /// since the effect started.
    pub fn update_sanction_effects(&mut self, current_round: Round) {
        self.sanction_effects.retain_mut(|effect| {
            let rounds_passed = current_round.saturating_sub(effect.start_round);
            if rounds_passed < effect.duration {
                let decay = SANCTION_DECAY.powi(rounds_passed as i32);
                effect.current_power_loss = effect.power_loss * decay;
                effect.current_wealth_loss = effect.wealth_loss * decay;
                true
            } else {
                false
            }
        });
    }

    /// Sum the currently-decayed losses across active effects
    pub fn total_sanction_effects(&self) -> SanctionTotals {
        self.sanction_effects
            .iter()
            .fold(SanctionTotals::default(), |acc, effect| SanctionTotals {
                power_loss: acc.power_loss + effect.current_power_loss,
                wealth_loss: acc.wealth_loss + effect.current_wealth_loss,
            })
    }

    /// Pull both skills toward a target's values at the given rate
    pub fn learn_from_successful(&mut self, target_care: f64, target_competition: f64, rate: f64) {
        self.care_skill = (self.care_skill + rate * (target_care - self.care_skill)).clamp(0.0, 1.0);
        self.competition_skill = (self.competition_skill
            + rate * (target_competition - self.competition_skill))
            .clamp(0.0, 1.0);
    }

    /// Tier this member would move to, given per-class average wealth.
    ///
    /// Upward conditions are checked before downward for a tier; only one
    /// can apply for any given tier.
    pub fn check_class_mobility(&self, averages: &ClassAverages) -> ClassTier {
        match self.class_tier {
            ClassTier::Low if self.wealth > averages.middle * 1.5 => ClassTier::Middle,
            ClassTier::Middle if self.wealth > averages.high * 1.5 => ClassTier::High,
            ClassTier::High if self.wealth < averages.high * 0.6 => ClassTier::Middle,
            ClassTier::Middle if self.wealth < averages.middle * 0.6 => ClassTier::Low,
            current => current,
        }
    }
}

/// Draw from Normal(mean, std_dev) via the Box-Muller transform, so all
/// sampling goes through the one seeded generator.
fn sample_normal(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::EPSILON);
    let u2: f64 = rng.gen::<f64>();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z * std_dev
}

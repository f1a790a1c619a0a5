//! Society - the population aggregator
//!
//! Exclusive owner of the member collection. Members are created once at
//! initialization and never destroyed, only reclassified; every derived
//! view (statistics, elite circle) is recomputed from current member
//! state rather than patched incrementally.

use ordered_float::OrderedFloat;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Reverse;

use crate::core::config::SimulationConfig;
use crate::core::types::{Gender, Ideology, MemberId, Round};
use crate::society::events::{EventKind, EventLog};
use crate::society::member::{ClassAverages, Member};
use crate::society::policy::{PolicyLever, PolicyLevers};
use crate::society::stats::Statistics;

/// Fraction of the population forming the elite circle
const ELITE_FRACTION: f64 = 0.05;

/// Softening factor applied to a vote result that overshoots a lever bound
const BOUND_OVERSHOOT_SOFTENING: f64 = 0.1;

/// The aggregate society state
pub struct Society {
    /// All members; a member's id equals its index here
    pub members: Vec<Member>,
    /// Current simulation round
    pub round: Round,
    /// Policy levers the elite circle votes on
    pub policy: PolicyLevers,
    /// Elite circle: ids of the top members by power. A derived,
    /// non-owning view, rebuilt on cadence rather than kept in sync.
    pub elite: Vec<MemberId>,
    /// Append-only event log
    pub events: EventLog,
    /// Aggregates recomputed once per round
    pub stats: Statistics,
}

impl Society {
    pub fn new(members: Vec<Member>, config: &SimulationConfig) -> Self {
        let mut society = Self {
            members,
            round: 0,
            policy: PolicyLevers::from_config(config),
            elite: Vec::new(),
            events: EventLog::new(),
            stats: Statistics::default(),
        };
        society.update_core_decision_circle();
        society.update_statistics();
        society
    }

    pub fn population(&self) -> usize {
        self.members.len()
    }

    pub fn member(&self, id: MemberId) -> &Member {
        &self.members[id.index()]
    }

    pub fn member_mut(&mut self, id: MemberId) -> &mut Member {
        &mut self.members[id.index()]
    }

    /// Recompute all derived statistics. Must run once per round, after
    /// every per-member mutation for that round is complete.
    pub fn update_statistics(&mut self) {
        self.stats = Statistics::compute(&self.members);
    }

    /// Rebuild the elite circle: top max(1, ceil(n * 0.05)) by power.
    ///
    /// The sort is stable, so equal-power members keep id order.
    pub fn update_core_decision_circle(&mut self) {
        if self.members.is_empty() {
            self.elite.clear();
            return;
        }
        let size = ((self.members.len() as f64 * ELITE_FRACTION).ceil() as usize).max(1);
        let mut indices: Vec<usize> = (0..self.members.len()).collect();
        indices.sort_by_key(|&i| Reverse(OrderedFloat(self.members[i].power)));
        self.elite = indices
            .into_iter()
            .take(size)
            .map(|i| self.members[i].id)
            .collect();
    }

    pub fn elite_members(&self) -> impl Iterator<Item = &Member> {
        self.elite.iter().map(|id| self.member(*id))
    }

    /// Per-class average wealth view for mobility checks
    pub fn class_wealth_averages(&self) -> ClassAverages {
        self.stats.by_class.averages()
    }

    /// Stamp an event with the current round and append it to the log
    pub fn add_event(&mut self, kind: EventKind) {
        self.events.push(self.round, kind);
    }

    /// Elite vote on one policy lever; returns the proposed new value
    /// without committing it.
    ///
    /// Direction needs a strict plurality among {increase, decrease,
    /// maintain}; anything else leaves the lever where it is. A move
    /// scales the lever by a uniform [0.05, 0.2] adjustment; overshoot
    /// past the lever's band is softened toward the bound and re-clamped.
    pub fn vote_on_policy(&self, lever: PolicyLever, rng: &mut ChaCha8Rng) -> f64 {
        let current = self.policy.get(lever);
        if self.elite.is_empty() {
            return current;
        }

        let mut increase = 0usize;
        let mut decrease = 0usize;
        let mut maintain = 0usize;
        for member in self.elite_members() {
            match self.policy_preference(member, lever) {
                v if v > 0 => increase += 1,
                v if v < 0 => decrease += 1,
                _ => maintain += 1,
            }
        }

        let new_value = if increase > decrease && increase > maintain {
            let adjustment = rng.gen_range(0.05..0.2f64).min(0.2);
            current * (1.0 + adjustment)
        } else if decrease > increase && decrease > maintain {
            let adjustment = rng.gen_range(0.05..0.2f64).min(0.2);
            current * (1.0 - adjustment)
        } else {
            current
        };

        let (min, max) = lever.bounds();
        let softened = if new_value > max {
            max + (new_value - max) * BOUND_OVERSHOOT_SOFTENING
        } else if new_value < min {
            min + (min - new_value) * BOUND_OVERSHOOT_SOFTENING
        } else {
            new_value
        };
        softened.clamp(min, max)
    }

    /// One elite member's preference for a lever: +1 increase,
    /// -1 decrease, 0 maintain. Keyed on ideology and the member's
    /// skill/wealth/power relative to the population averages.
    fn policy_preference(&self, member: &Member, lever: PolicyLever) -> i32 {
        match lever {
            PolicyLever::CompetitionReward => {
                if member.ideology == Ideology::P || member.competition_skill > 0.6 {
                    1
                } else if member.ideology == Ideology::F || member.care_skill > 0.6 {
                    -1
                } else {
                    0
                }
            }
            PolicyLever::CareReward => {
                if member.ideology == Ideology::F || member.care_skill > 0.6 {
                    1
                } else if member.ideology == Ideology::P || member.competition_skill > 0.6 {
                    -1
                } else {
                    0
                }
            }
            PolicyLever::TaxRedistribution => {
                if member.ideology == Ideology::F || member.wealth < self.stats.average_wealth {
                    1
                } else if member.ideology == Ideology::P
                    || member.wealth > self.stats.average_wealth * 1.5
                {
                    -1
                } else {
                    0
                }
            }
            PolicyLever::AttributionBias => {
                if member.ideology == Ideology::P
                    || (member.gender == Gender::Male && member.power > self.stats.average_power)
                {
                    1
                } else if member.ideology == Ideology::F || member.gender == Gender::Female {
                    -1
                } else {
                    0
                }
            }
            PolicyLever::SocialSanction => {
                if (member.ideology_value - self.stats.average_ideology).abs() < 0.2 {
                    1
                } else {
                    -1
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::society::systems::generation::build_members;
    use rand::SeedableRng;

    fn test_society(population: usize, seed: u64) -> Society {
        let config = SimulationConfig {
            total_population: population,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let members = build_members(&config, &mut rng);
        Society::new(members, &config)
    }

    #[test]
    fn test_elite_size_is_ceil_five_percent() {
        assert_eq!(test_society(100, 1).elite.len(), 5);
        assert_eq!(test_society(200, 1).elite.len(), 10);
        // 5% of 61 is 3.05, rounded up
        assert_eq!(test_society(61, 1).elite.len(), 4);
        assert_eq!(test_society(50, 1).elite.len(), 3);
    }

    #[test]
    fn test_elite_minimum_one() {
        let config = SimulationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let one = build_members(
            &SimulationConfig {
                total_population: 1,
                low_class_ratio: 1.0,
                middle_class_ratio: 0.0,
                high_class_ratio: 0.0,
                ..Default::default()
            },
            &mut rng,
        );
        let society = Society::new(one, &config);
        assert_eq!(society.elite.len(), 1);
    }

    #[test]
    fn test_elite_are_highest_power() {
        let society = test_society(100, 2);
        let min_elite_power = society
            .elite_members()
            .map(|m| m.power)
            .fold(f64::INFINITY, f64::min);
        let non_elite_max = society
            .members
            .iter()
            .filter(|m| !society.elite.contains(&m.id))
            .map(|m| m.power)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(min_elite_power >= non_elite_max);
    }

    #[test]
    fn test_vote_respects_lever_bounds() {
        let mut society = test_society(100, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        // force every elite member toward "increase" on competition_reward
        for id in society.elite.clone() {
            let member = society.member_mut(id);
            member.ideology = Ideology::P;
            member.ideology_value = Ideology::P.value();
        }
        // start at the upper bound; repeated votes must not escape it
        society.policy.competition_reward = 2.0;
        for _ in 0..20 {
            let value = society.vote_on_policy(PolicyLever::CompetitionReward, &mut rng);
            let (min, max) = PolicyLever::CompetitionReward.bounds();
            assert!(value >= min && value <= max);
            society.policy.competition_reward = value;
        }
        assert_eq!(society.policy.competition_reward, 2.0);
    }

    #[test]
    fn test_vote_without_plurality_keeps_value() {
        let mut society = test_society(100, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        // split the elite evenly between P and F on competition_reward,
        // padding the odd member with a neutral profile
        let elite = society.elite.clone();
        for (i, id) in elite.iter().enumerate() {
            let member = society.member_mut(*id);
            member.care_skill = 0.5;
            member.competition_skill = 0.5;
            if i % 2 == 0 {
                member.ideology = Ideology::P;
            } else {
                member.ideology = Ideology::F;
            }
            member.ideology_value = member.ideology.value();
        }
        if elite.len() % 2 == 1 {
            let member = society.member_mut(elite[elite.len() - 1]);
            member.ideology = Ideology::U;
            member.ideology_value = Ideology::U.value();
        }
        let before = society.policy.competition_reward;
        let value = society.vote_on_policy(PolicyLever::CompetitionReward, &mut rng);
        assert_eq!(value, before);
    }

    #[test]
    fn test_statistics_counts_cover_population() {
        let society = test_society(120, 8);
        let stats = &society.stats;
        assert_eq!(stats.by_gender.male.count + stats.by_gender.female.count, 120);
        assert_eq!(
            stats.by_ideology.p.count + stats.by_ideology.f.count + stats.by_ideology.u.count,
            120
        );
        assert_eq!(
            stats.by_class.low.count + stats.by_class.middle.count + stats.by_class.high.count,
            120
        );
        assert!((0.0..=1.0).contains(&stats.equality));
    }
}

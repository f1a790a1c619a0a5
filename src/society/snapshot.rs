//! Per-round snapshots and run output
//!
//! The snapshot sequence is the sole contract with presentation and
//! reporting layers; everything here is serde-serializable and carries no
//! references into the live society.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{ClassTier, Gender, Ideology, MemberId, Round};
use crate::society::events::SimEvent;
use crate::society::member::Member;
use crate::society::policy::PolicyLevers;
use crate::society::population::Society;
use crate::society::stats::{ClassStats, GenderStats, IdeologyStats};

/// Flat, serializable record of one member's attributes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MemberId,
    pub gender: Gender,
    pub class_tier: ClassTier,
    pub wealth: f64,
    pub power: f64,
    pub care_skill: f64,
    pub competition_skill: f64,
    pub ideology: Ideology,
    pub ideology_value: f64,
    pub sanction_effects_count: usize,
    pub last_ideology_change: Round,
}

impl From<&Member> for MemberRecord {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            gender: member.gender,
            class_tier: member.class_tier,
            wealth: member.wealth,
            power: member.power,
            care_skill: member.care_skill,
            competition_skill: member.competition_skill,
            ideology: member.ideology,
            ideology_value: member.ideology_value,
            sanction_effects_count: member.sanction_effects.len(),
            last_ideology_change: member.last_ideology_change,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupShare {
    pub count: usize,
    pub percentage: f64,
}

/// Gender/ideology/class makeup of the elite circle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EliteComposition {
    pub male: GroupShare,
    pub female: GroupShare,
    pub p: GroupShare,
    pub f: GroupShare,
    pub u: GroupShare,
    pub low: GroupShare,
    pub middle: GroupShare,
    pub high: GroupShare,
}

impl EliteComposition {
    pub fn compute(society: &Society) -> Self {
        let total = society.elite.len();
        if total == 0 {
            return Self::default();
        }
        let share = |count: usize| GroupShare {
            count,
            percentage: count as f64 / total as f64,
        };
        let count_by = |pred: &dyn Fn(&Member) -> bool| {
            society.elite_members().filter(|m| pred(m)).count()
        };

        Self {
            male: share(count_by(&|m: &Member| m.gender == Gender::Male)),
            female: share(count_by(&|m: &Member| m.gender == Gender::Female)),
            p: share(count_by(&|m: &Member| m.ideology == Ideology::P)),
            f: share(count_by(&|m: &Member| m.ideology == Ideology::F)),
            u: share(count_by(&|m: &Member| m.ideology == Ideology::U)),
            low: share(count_by(&|m: &Member| m.class_tier == ClassTier::Low)),
            middle: share(count_by(&|m: &Member| m.class_tier == ClassTier::Middle)),
            high: share(count_by(&|m: &Member| m.class_tier == ClassTier::High)),
        }
    }
}

/// Full state of the society at the end of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round: Round,
    pub equality: f64,
    pub average_wealth: f64,
    pub average_power: f64,
    pub average_ideology: f64,
    pub policy: PolicyLevers,
    pub gender_stats: GenderStats,
    pub ideology_stats: IdeologyStats,
    pub class_stats: ClassStats,
    pub elite: Vec<MemberId>,
    pub elite_composition: EliteComposition,
    pub elite_members: Vec<MemberRecord>,
    /// The event-log entries stamped with this round
    pub events: Vec<SimEvent>,
    pub members: Vec<MemberRecord>,
}

impl RoundSnapshot {
    /// Capture the society as of its current round
    pub fn capture(society: &Society) -> Self {
        Self {
            round: society.round,
            equality: society.stats.equality,
            average_wealth: society.stats.average_wealth,
            average_power: society.stats.average_power,
            average_ideology: society.stats.average_ideology,
            policy: society.policy.clone(),
            gender_stats: society.stats.by_gender.clone(),
            ideology_stats: society.stats.by_ideology.clone(),
            class_stats: society.stats.by_class.clone(),
            elite: society.elite.clone(),
            elite_composition: EliteComposition::compute(society),
            elite_members: society.elite_members().map(MemberRecord::from).collect(),
            events: society
                .events
                .events_for_round(society.round)
                .cloned()
                .collect(),
            members: society.members.iter().map(MemberRecord::from).collect(),
        }
    }
}

/// Complete output of a run: the config plus one snapshot per round
/// (including the round-0 snapshot of the initialized society)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub config: SimulationConfig,
    pub rounds: Vec<RoundSnapshot>,
}

impl SimulationOutput {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Headline comparison of the run's first and last snapshots
    pub fn summary(&self) -> SimulationSummary {
        let initial = self.rounds.first();
        let last = self.rounds.last();
        match (initial, last) {
            (Some(initial), Some(last)) => SimulationSummary {
                total_rounds: self.rounds.len().saturating_sub(1) as u32,
                initial_equality: initial.equality,
                final_equality: last.equality,
                equality_change: last.equality - initial.equality,
                initial_gender_power_gap: initial.gender_stats.power_gap,
                final_gender_power_gap: last.gender_stats.power_gap,
                initial_gender_wealth_gap: initial.gender_stats.wealth_gap,
                final_gender_wealth_gap: last.gender_stats.wealth_gap,
                total_events: self.rounds.iter().map(|r| r.events.len()).sum(),
                final_ideology_stats: last.ideology_stats.clone(),
            },
            _ => SimulationSummary::default(),
        }
    }

    pub fn summary_text(&self) -> String {
        let summary = self.summary();
        format!(
            "Simulated {} rounds, {} events\nequality {:.3} -> {:.3}, gender power gap {:+.3} -> {:+.3}",
            summary.total_rounds,
            summary.total_events,
            summary.initial_equality,
            summary.final_equality,
            summary.initial_gender_power_gap,
            summary.final_gender_power_gap,
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_rounds: u32,
    pub initial_equality: f64,
    pub final_equality: f64,
    pub equality_change: f64,
    pub initial_gender_power_gap: f64,
    pub final_gender_power_gap: f64,
    pub initial_gender_wealth_gap: f64,
    pub final_gender_wealth_gap: f64,
    pub total_events: usize,
    pub final_ideology_stats: IdeologyStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::society::systems::generation::build_members;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_snapshot_captures_population_and_elite() {
        let config = SimulationConfig {
            total_population: 80,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let society = Society::new(build_members(&config, &mut rng), &config);
        let snapshot = RoundSnapshot::capture(&society);

        assert_eq!(snapshot.round, 0);
        assert_eq!(snapshot.members.len(), 80);
        assert_eq!(snapshot.elite.len(), snapshot.elite_members.len());
        assert_eq!(snapshot.elite.len(), 4);
        let elite_total = snapshot.elite_composition.male.count + snapshot.elite_composition.female.count;
        assert_eq!(elite_total, snapshot.elite.len());
    }

    #[test]
    fn test_output_serializes_to_json() {
        let config = SimulationConfig {
            total_population: 60,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let society = Society::new(build_members(&config, &mut rng), &config);
        let output = SimulationOutput {
            config,
            rounds: vec![RoundSnapshot::capture(&society)],
        };
        let json = output.to_json();
        assert!(json.contains("\"equality\""));
        assert!(json.contains("\"policy\""));

        let parsed: SimulationOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rounds.len(), 1);
        assert_eq!(parsed.rounds[0].members.len(), 60);
    }
}

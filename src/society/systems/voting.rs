//! Elite policy voting step

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::society::events::EventKind;
use crate::society::policy::PolicyLever;
use crate::society::population::Society;

/// A vote only moves a lever when the result differs by more than this
const SIGNIFICANT_CHANGE: f64 = 0.01;

/// Put one or two randomly chosen levers to an elite vote and commit
/// significant outcomes, logging a `PolicyChange` event for each.
pub fn run_policy_votes(society: &mut Society, rng: &mut ChaCha8Rng) {
    let issue_count = rng.gen_range(1..=2usize);
    let selected: Vec<PolicyLever> = PolicyLever::ALL
        .choose_multiple(rng, issue_count)
        .copied()
        .collect();

    for lever in selected {
        let old_value = society.policy.get(lever);
        let new_value = society.vote_on_policy(lever, rng);

        if (new_value - old_value).abs() > SIGNIFICANT_CHANGE {
            society.policy.set(lever, new_value);
            tracing::debug!(
                lever = lever.name(),
                old_value,
                new_value,
                "policy lever moved"
            );
            society.add_event(EventKind::PolicyChange {
                lever,
                old_value,
                new_value,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::society::systems::generation::build_members;
    use rand::SeedableRng;

    #[test]
    fn test_at_most_two_levers_move_per_round() {
        let config = SimulationConfig {
            total_population: 100,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let members = build_members(&config, &mut rng);
        let mut society = crate::society::population::Society::new(members, &config);

        for round in 1..=20 {
            society.round = round;
            let before = society.events.len();
            run_policy_votes(&mut society, &mut rng);
            let changes = society.events.len() - before;
            assert!(changes <= 2, "round {} moved {} levers", round, changes);
        }
    }

    #[test]
    fn test_committed_values_stay_in_bounds() {
        let config = SimulationConfig {
            total_population: 100,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        let members = build_members(&config, &mut rng);
        let mut society = crate::society::population::Society::new(members, &config);

        for round in 1..=50 {
            society.round = round;
            run_policy_votes(&mut society, &mut rng);
            for (lever, value) in society.policy.iter() {
                let (min, max) = lever.bounds();
                assert!(
                    value >= min && value <= max,
                    "{} escaped bounds: {}",
                    lever.name(),
                    value
                );
            }
        }
    }
}

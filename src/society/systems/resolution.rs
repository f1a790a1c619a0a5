//! Round event trigger and resolution
//!
//! Exactly one event fires per round: a cooperative "social" event with
//! probability 0.4 + 0.2 * equality (start-of-round equality), otherwise
//! a competitive "economic" event. Rewards here adjust wealth/power
//! fields directly; the wealth floor and history commit happen later in
//! the wealth/power update step.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::society::events::EventKind;
use crate::society::population::Society;

/// Care skill above which a member shares in a social event's reward
const CARE_REWARD_THRESHOLD: f64 = 0.6;

const SOCIAL_POWER_BONUS: f64 = 0.05;
const SOCIAL_WEALTH_BONUS: f64 = 0.03;
const ECONOMIC_POWER_BONUS: f64 = 0.04;
const ECONOMIC_WEALTH_BONUS: f64 = 0.06;

/// Per-member success probability factor in economic events
const ECONOMIC_SUCCESS_FACTOR: f64 = 0.8;

/// Trigger and resolve this round's event
pub fn run_round_event(society: &mut Society, rng: &mut ChaCha8Rng) {
    let equality = society.stats.equality;
    let social_probability = 0.4 + 0.2 * equality;

    if rng.gen::<f64>() < social_probability {
        resolve_social_event(society, equality);
    } else {
        resolve_economic_event(society, rng);
    }
}

/// Cooperative event: succeeds when total care skill clears a threshold
/// scaled by population and equality; reward goes to high-care members.
fn resolve_social_event(society: &mut Society, equality: f64) {
    let total_care_skill: f64 = society.members.iter().map(|m| m.care_skill).sum();
    let threshold = society.population() as f64 * 0.5 * (1.0 + equality);
    let success = total_care_skill >= threshold;

    if success {
        let care_reward = society.policy.care_reward;
        for member in &mut society.members {
            if member.care_skill > CARE_REWARD_THRESHOLD {
                member.power += SOCIAL_POWER_BONUS * care_reward * member.care_skill;
                member.wealth += SOCIAL_WEALTH_BONUS * care_reward * member.care_skill;
            }
        }
    }

    tracing::debug!(success, total_care_skill, threshold, "social event");
    society.add_event(EventKind::SocialEvent {
        success,
        total_care_skill,
        threshold,
    });
}

/// Competitive event: each member succeeds independently with
/// probability competition_skill * 0.8. Members are tried in id order so
/// draw order is stable.
fn resolve_economic_event(society: &mut Society, rng: &mut ChaCha8Rng) {
    let competition_reward = society.policy.competition_reward;
    let mut winner_count = 0usize;

    for member in &mut society.members {
        let success_probability = member.competition_skill * ECONOMIC_SUCCESS_FACTOR;
        if rng.gen::<f64>() < success_probability {
            member.power += ECONOMIC_POWER_BONUS * competition_reward * member.competition_skill;
            member.wealth += ECONOMIC_WEALTH_BONUS * competition_reward * member.competition_skill;
            winner_count += 1;
        }
    }

    let participant_count = society.population();
    tracing::debug!(winner_count, participant_count, "economic event");
    society.add_event(EventKind::EconomicEvent {
        winner_count,
        participant_count,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::society::systems::generation::build_members;
    use rand::SeedableRng;

    fn test_society(seed: u64) -> Society {
        let config = SimulationConfig {
            total_population: 100,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Society::new(build_members(&config, &mut rng), &config)
    }

    #[test]
    fn test_exactly_one_event_per_round() {
        let mut society = test_society(41);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for round in 1..=10 {
            society.round = round;
            run_round_event(&mut society, &mut rng);
            assert_eq!(society.events.events_for_round(round).count(), 1);
        }
    }

    #[test]
    fn test_social_event_rewards_high_care_members() {
        let mut society = test_society(43);
        // guarantee success and a known reward set
        for member in &mut society.members {
            member.care_skill = 0.9;
        }
        society.stats.equality = 0.0;
        let before: Vec<f64> = society.members.iter().map(|m| m.power).collect();

        resolve_social_event(&mut society, 0.0);

        let care_reward = society.policy.care_reward;
        for (member, old_power) in society.members.iter().zip(&before) {
            let expected = old_power + SOCIAL_POWER_BONUS * care_reward * member.care_skill;
            assert!((member.power - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_failed_social_event_changes_nothing() {
        let mut society = test_society(44);
        for member in &mut society.members {
            member.care_skill = 0.1;
        }
        let before: Vec<f64> = society.members.iter().map(|m| m.wealth).collect();

        resolve_social_event(&mut society, 1.0);

        for (member, old_wealth) in society.members.iter().zip(&before) {
            assert_eq!(member.wealth, *old_wealth);
        }
        assert!(matches!(
            society.events.events.last().unwrap().kind,
            EventKind::SocialEvent { success: false, .. }
        ));
    }

    #[test]
    fn test_economic_event_counts_winners() {
        let mut society = test_society(45);
        let mut rng = ChaCha8Rng::seed_from_u64(46);
        resolve_economic_event(&mut society, &mut rng);
        match &society.events.events.last().unwrap().kind {
            EventKind::EconomicEvent {
                winner_count,
                participant_count,
            } => {
                assert_eq!(*participant_count, 100);
                assert!(*winner_count > 0 && *winner_count < 100);
            }
            other => panic!("expected economic event, got {:?}", other),
        }
    }
}

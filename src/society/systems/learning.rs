//! Slow-cadence mechanisms: imitation learning, ideology conversion and
//! class mobility

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Reverse;
use std::collections::HashSet;

use crate::core::types::{ClassTier, Gender, Ideology};
use crate::society::events::{ClassTransition, EventKind};
use crate::society::member::IDEOLOGY_COOLDOWN;
use crate::society::population::Society;

/// Fraction of the population counted as the success cohort
const SUCCESS_FRACTION: f64 = 0.2;

const FRUSTRATION_PROBABILITY: f64 = 0.3;
const RATIONAL_CHOICE_PROBABILITY: f64 = 0.2;
const DISSONANCE_PROBABILITY: f64 = 0.1;

/// Benefit below which a P/F member may abandon their stance for U
const FRUSTRATION_BENEFIT: f64 = -0.2;
/// Benefit below which a P/F member may flip to the opposite stance
const DISSONANCE_BENEFIT: f64 = -0.1;

/// Non-cohort members pull their skills toward a cohort member chosen by
/// similarity: same gender and class, then same gender, then same class,
/// then anyone in the cohort.
pub fn run_imitation(society: &mut Society, rng: &mut ChaCha8Rng, learning_rate: f64) {
    let n = society.population();
    let cohort_size = (n as f64 * SUCCESS_FRACTION) as usize;
    if cohort_size == 0 {
        return;
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by_key(|&i| Reverse(OrderedFloat(society.members[i].power)));
    let cohort: Vec<usize> = indices[..cohort_size].to_vec();
    let in_cohort: HashSet<usize> = cohort.iter().copied().collect();

    // cohort skills never change during the pass, so targets can be
    // resolved first and applied after
    let mut updates: Vec<(usize, f64, f64)> = Vec::with_capacity(n - cohort_size);
    for learner in 0..n {
        if in_cohort.contains(&learner) {
            continue;
        }
        let target = find_learning_target(society, &cohort, learner, rng);
        let target = &society.members[target];
        updates.push((learner, target.care_skill, target.competition_skill));
    }

    for (learner, care, competition) in updates {
        society.members[learner].learn_from_successful(care, competition, learning_rate);
    }
}

fn find_learning_target(
    society: &Society,
    cohort: &[usize],
    learner: usize,
    rng: &mut ChaCha8Rng,
) -> usize {
    let gender = society.members[learner].gender;
    let tier = society.members[learner].class_tier;

    let pick = |candidates: Vec<usize>, rng: &mut ChaCha8Rng| -> Option<usize> {
        candidates.choose(rng).copied()
    };

    let same_both: Vec<usize> = cohort
        .iter()
        .copied()
        .filter(|&c| society.members[c].gender == gender && society.members[c].class_tier == tier)
        .collect();
    if let Some(target) = pick(same_both, rng) {
        return target;
    }

    let same_gender: Vec<usize> = cohort
        .iter()
        .copied()
        .filter(|&c| society.members[c].gender == gender)
        .collect();
    if let Some(target) = pick(same_gender, rng) {
        return target;
    }

    let same_class: Vec<usize> = cohort
        .iter()
        .copied()
        .filter(|&c| society.members[c].class_tier == tier)
        .collect();
    if let Some(target) = pick(same_class, rng) {
        return target;
    }

    *cohort.choose(rng).expect("cohort is non-empty")
}

/// Ideology conversion pass. Members are visited in id order; each check
/// draws only when its precondition holds, and the first successful
/// switch ends the member's pass. All switches respect the change
/// cooldown.
pub fn run_ideology_conversion(society: &mut Society, rng: &mut ChaCha8Rng) {
    let round = society.round;

    for member in &mut society.members {
        if round.saturating_sub(member.last_ideology_change) < IDEOLOGY_COOLDOWN {
            continue;
        }

        let personal_benefit = (member.wealth - 0.5) + (member.power - 0.5);

        // frustration: committed stances erode into indifference
        if matches!(member.ideology, Ideology::P | Ideology::F)
            && personal_benefit < FRUSTRATION_BENEFIT
            && rng.gen::<f64>() < FRUSTRATION_PROBABILITY
        {
            member.change_ideology(Ideology::U, round);
            continue;
        }

        // rational choice: the indifferent adopt the stance that suits
        // their position
        if member.ideology == Ideology::U {
            let target = match (member.gender, member.class_tier) {
                (Gender::Male, ClassTier::Middle | ClassTier::High) => Some(Ideology::P),
                (Gender::Female, _) => Some(Ideology::F),
                _ => None,
            };
            let Some(target) = target else {
                continue;
            };
            if rng.gen::<f64>() < RATIONAL_CHOICE_PROBABILITY {
                member.change_ideology(target, round);
            }
            continue;
        }

        // cognitive dissonance: a struggling partisan flips sides
        if matches!(member.ideology, Ideology::P | Ideology::F)
            && personal_benefit < DISSONANCE_BENEFIT
            && rng.gen::<f64>() < DISSONANCE_PROBABILITY
        {
            let flipped = match member.ideology {
                Ideology::P => Ideology::F,
                _ => Ideology::P,
            };
            member.change_ideology(flipped, round);
        }
    }
}

/// Reassign tiers from the current per-class wealth averages and log one
/// aggregate event listing every transition.
pub fn run_class_mobility(society: &mut Society) {
    let averages = society.class_wealth_averages();

    let mut transitions = Vec::new();
    for member in &mut society.members {
        let new_tier = member.check_class_mobility(&averages);
        if new_tier != member.class_tier {
            transitions.push(ClassTransition {
                member: member.id,
                from: member.class_tier,
                to: new_tier,
                wealth: member.wealth,
            });
            member.class_tier = new_tier;
        }
    }

    if !transitions.is_empty() {
        tracing::debug!(count = transitions.len(), "class mobility transitions");
        society.add_event(EventKind::ClassMobility { transitions });
    }
}

//! Initial population generation

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::{ClassTier, Gender, MemberId};
use crate::society::member::Member;

/// Build the initial member population from the configured gender and
/// class distribution ratios.
///
/// Class counts come from truncating the low/middle ratios, with the high
/// tier absorbing the remainder; the same scheme splits genders within a
/// class. The (gender, tier) assignments are shuffled before members are
/// created so that ids carry no class/gender ordering.
pub fn build_members(config: &SimulationConfig, rng: &mut ChaCha8Rng) -> Vec<Member> {
    let total = config.total_population;

    let low_count = (total as f64 * config.low_class_ratio) as usize;
    let middle_count = (total as f64 * config.middle_class_ratio) as usize;
    let high_count = total - low_count - middle_count;

    let mut assignments: Vec<(Gender, ClassTier)> = Vec::with_capacity(total);
    for (tier, count) in [
        (ClassTier::Low, low_count),
        (ClassTier::Middle, middle_count),
        (ClassTier::High, high_count),
    ] {
        let males = (count as f64 * config.male_ratio) as usize;
        let females = count - males;
        assignments.extend(std::iter::repeat((Gender::Male, tier)).take(males));
        assignments.extend(std::iter::repeat((Gender::Female, tier)).take(females));
    }

    assignments.shuffle(rng);

    assignments
        .into_iter()
        .enumerate()
        .map(|(i, (gender, tier))| Member::new(MemberId::new(i as u32), gender, tier, config, rng))
        .collect()
}

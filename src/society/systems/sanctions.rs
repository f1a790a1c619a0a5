//! Ideology-deviation sanction triggers

use crate::society::population::Society;

/// Sanction every member whose ideology deviates from the population
/// average by more than the configured threshold. Intensity grows with
/// the square of the deviation, scaled by the social_sanction lever.
pub fn apply_ideology_sanctions(society: &mut Society, threshold: f64) {
    let lever = society.policy.social_sanction;
    let average_ideology = society.stats.average_ideology;
    let round = society.round;

    for member in &mut society.members {
        let deviation = (member.ideology_value - average_ideology).abs();
        if deviation > threshold {
            let intensity = lever * deviation * deviation;
            member.add_sanction_effect(intensity, round);
        }
    }
}

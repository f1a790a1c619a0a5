//! Derived statistics over the member population
//!
//! Everything here is recomputed from scratch each round; nothing is
//! incrementally patched. Group membership is derived from member state
//! at computation time, keyed by stable member ids, so tier changes are
//! picked up by the next pass automatically.

use serde::{Deserialize, Serialize};

use crate::core::types::{ClassTier, Gender, Ideology};
use crate::society::member::{ClassAverages, Member};

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Gini coefficient over wealth: sum of all pairwise absolute
/// differences divided by 2*n^2*mean, capped at 1.0.
///
/// Returns 0 for fewer than two values or a zero mean, so the round loop
/// never aborts on degenerate data.
pub fn gini_coefficient(wealths: &[f64]) -> f64 {
    if wealths.len() < 2 {
        return 0.0;
    }
    let mean_wealth = mean(wealths);
    if mean_wealth == 0.0 {
        return 0.0;
    }

    let n = wealths.len();
    let mut total_diff = 0.0;
    for i in 0..n {
        for j in 0..n {
            total_diff += (wealths[i] - wealths[j]).abs();
        }
    }

    let gini = total_diff / (2.0 * (n as f64) * (n as f64) * mean_wealth);
    gini.min(1.0)
}

/// Equality index: clamp(1 - Gini, 0, 1); 0 for an empty population
pub fn equality_index(wealths: &[f64]) -> f64 {
    if wealths.is_empty() {
        return 0.0;
    }
    (1.0 - gini_coefficient(wealths)).clamp(0.0, 1.0)
}

/// Per-gender aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderGroupStats {
    pub count: usize,
    pub avg_wealth: f64,
    pub avg_power: f64,
    pub avg_care_skill: f64,
    pub avg_competition_skill: f64,
    pub wealth_std: f64,
    pub power_std: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenderStats {
    pub male: GenderGroupStats,
    pub female: GenderGroupStats,
    /// male avg power minus female avg power
    pub power_gap: f64,
    /// male avg wealth minus female avg wealth
    pub wealth_gap: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeologyGroupStats {
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeologyStats {
    pub p: IdeologyGroupStats,
    pub f: IdeologyGroupStats,
    pub u: IdeologyGroupStats,
}

impl IdeologyStats {
    pub fn get(&self, ideology: Ideology) -> &IdeologyGroupStats {
        match ideology {
            Ideology::P => &self.p,
            Ideology::F => &self.f,
            Ideology::U => &self.u,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassGroupStats {
    pub count: usize,
    pub avg_wealth: f64,
    pub avg_power: f64,
    pub male_count: usize,
    pub female_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    pub low: ClassGroupStats,
    pub middle: ClassGroupStats,
    pub high: ClassGroupStats,
}

impl ClassStats {
    pub fn get(&self, tier: ClassTier) -> &ClassGroupStats {
        match tier {
            ClassTier::Low => &self.low,
            ClassTier::Middle => &self.middle,
            ClassTier::High => &self.high,
        }
    }

    /// Per-class average wealth view used by the mobility check
    pub fn averages(&self) -> ClassAverages {
        ClassAverages {
            low: self.low.avg_wealth,
            middle: self.middle.avg_wealth,
            high: self.high.avg_wealth,
        }
    }
}

/// All derived aggregates for one round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub average_wealth: f64,
    pub average_power: f64,
    pub average_ideology: f64,
    pub equality: f64,
    pub by_gender: GenderStats,
    pub by_ideology: IdeologyStats,
    pub by_class: ClassStats,
}

impl Statistics {
    /// Recompute everything from the member population.
    ///
    /// Order: basic averages, gender groups, ideology groups, class
    /// groups, equality index.
    pub fn compute(members: &[Member]) -> Self {
        let mut stats = Statistics::default();
        if members.is_empty() {
            return stats;
        }

        let wealths: Vec<f64> = members.iter().map(|m| m.wealth).collect();
        let powers: Vec<f64> = members.iter().map(|m| m.power).collect();
        let ideologies: Vec<f64> = members.iter().map(|m| m.ideology_value).collect();

        stats.average_wealth = mean(&wealths);
        stats.average_power = mean(&powers);
        stats.average_ideology = mean(&ideologies);

        stats.by_gender = compute_gender_stats(members);
        stats.by_ideology = compute_ideology_stats(members);
        stats.by_class = compute_class_stats(members);

        stats.equality = equality_index(&wealths);
        stats
    }
}

fn gender_group(members: &[Member], gender: Gender) -> GenderGroupStats {
    let group: Vec<&Member> = members.iter().filter(|m| m.gender == gender).collect();
    if group.is_empty() {
        return GenderGroupStats::default();
    }
    let wealths: Vec<f64> = group.iter().map(|m| m.wealth).collect();
    let powers: Vec<f64> = group.iter().map(|m| m.power).collect();
    GenderGroupStats {
        count: group.len(),
        avg_wealth: mean(&wealths),
        avg_power: mean(&powers),
        avg_care_skill: mean(&group.iter().map(|m| m.care_skill).collect::<Vec<_>>()),
        avg_competition_skill: mean(
            &group
                .iter()
                .map(|m| m.competition_skill)
                .collect::<Vec<_>>(),
        ),
        wealth_std: std_dev(&wealths),
        power_std: std_dev(&powers),
    }
}

fn compute_gender_stats(members: &[Member]) -> GenderStats {
    let male = gender_group(members, Gender::Male);
    let female = gender_group(members, Gender::Female);
    let power_gap = male.avg_power - female.avg_power;
    let wealth_gap = male.avg_wealth - female.avg_wealth;
    GenderStats {
        male,
        female,
        power_gap,
        wealth_gap,
    }
}

fn compute_ideology_stats(members: &[Member]) -> IdeologyStats {
    let total = members.len();
    let group = |ideology: Ideology| {
        let count = members.iter().filter(|m| m.ideology == ideology).count();
        IdeologyGroupStats {
            count,
            percentage: if total > 0 {
                count as f64 / total as f64
            } else {
                0.0
            },
        }
    };
    IdeologyStats {
        p: group(Ideology::P),
        f: group(Ideology::F),
        u: group(Ideology::U),
    }
}

fn compute_class_stats(members: &[Member]) -> ClassStats {
    let group = |tier: ClassTier| {
        let group: Vec<&Member> = members.iter().filter(|m| m.class_tier == tier).collect();
        if group.is_empty() {
            return ClassGroupStats::default();
        }
        ClassGroupStats {
            count: group.len(),
            avg_wealth: mean(&group.iter().map(|m| m.wealth).collect::<Vec<_>>()),
            avg_power: mean(&group.iter().map(|m| m.power).collect::<Vec<_>>()),
            male_count: group.iter().filter(|m| m.gender == Gender::Male).count(),
            female_count: group.iter().filter(|m| m.gender == Gender::Female).count(),
        }
    };
    ClassStats {
        low: group(ClassTier::Low),
        middle: group(ClassTier::Middle),
        high: group(ClassTier::High),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_and_std_of_empty_are_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_gini_identical_wealths_is_zero() {
        let wealths = vec![0.5; 10];
        assert_eq!(gini_coefficient(&wealths), 0.0);
        assert_eq!(equality_index(&wealths), 1.0);
    }

    #[test]
    fn test_gini_degenerate_cases() {
        assert_eq!(gini_coefficient(&[]), 0.0);
        assert_eq!(gini_coefficient(&[0.7]), 0.0);
        assert_eq!(gini_coefficient(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(equality_index(&[]), 0.0);
    }

    #[test]
    fn test_gini_known_value() {
        // two members, one holds everything: Gini = 0.5
        let g = gini_coefficient(&[1.0, 0.0]);
        assert!((g - 0.5).abs() < 1e-12);
        assert!((equality_index(&[1.0, 0.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unequal_wealths_lower_equality() {
        let equal = equality_index(&[0.5, 0.5, 0.5, 0.5]);
        let skewed = equality_index(&[0.1, 0.1, 0.1, 1.7]);
        assert!(skewed < equal);
    }

    proptest! {
        #[test]
        fn prop_equality_always_in_unit_interval(
            wealths in proptest::collection::vec(0.0f64..10.0, 0..40)
        ) {
            let e = equality_index(&wealths);
            prop_assert!((0.0..=1.0).contains(&e));
        }

        #[test]
        fn prop_gini_always_in_unit_interval(
            wealths in proptest::collection::vec(0.0f64..10.0, 0..40)
        ) {
            let g = gini_coefficient(&wealths);
            prop_assert!((0.0..=1.0).contains(&g));
        }
    }
}

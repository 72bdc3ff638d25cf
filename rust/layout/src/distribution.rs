// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Largest-remainder (Hamilton) unit-count distribution
//!
//! Turns percentage targets into integer counts that sum exactly to the
//! available slot count, then splits each type's count between the two
//! corridor sides.

use crate::flexibility::UnitTypeBehavior;
use crate::types::UnitTypeSpec;

/// Integer apportionment of `total` proportional to `weights`.
///
/// Floors every ideal share, then hands the remaining slots to the largest
/// fractional remainders. Ties go to the earlier entry. Non-positive or
/// non-finite weights get nothing. If no weight is positive every count is
/// zero.
pub fn apportion(weights: &[f64], total: usize) -> Vec<usize> {
    let clean: Vec<f64> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();
    let sum: f64 = clean.iter().sum();

    if sum <= 0.0 || total == 0 {
        return vec![0; weights.len()];
    }

    let ideal: Vec<f64> = clean.iter().map(|w| w / sum * total as f64).collect();
    let mut counts: Vec<usize> = ideal.iter().map(|x| x.floor() as usize).collect();
    let assigned: usize = counts.iter().sum();

    // Floating error can push the floors one past the total
    if assigned > total {
        return trim_excess(counts, &ideal, assigned - total);
    }

    let mut order: Vec<usize> = (0..clean.len()).filter(|&i| clean[i] > 0.0).collect();
    // Stable sort keeps input order on equal remainders
    order.sort_by(|&a, &b| {
        let ra = ideal[a] - ideal[a].floor();
        let rb = ideal[b] - ideal[b].floor();
        rb.total_cmp(&ra)
    });

    let mut remaining = total - assigned;
    for &i in order.iter().cycle().take(remaining.max(1) * order.len().max(1)) {
        if remaining == 0 {
            break;
        }
        counts[i] += 1;
        remaining -= 1;
    }

    counts
}

fn trim_excess(mut counts: Vec<usize>, ideal: &[f64], mut excess: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = ideal[a] - ideal[a].floor();
        let rb = ideal[b] - ideal[b].floor();
        ra.total_cmp(&rb)
    });
    for &i in &order {
        if excess == 0 {
            break;
        }
        if counts[i] > 0 {
            counts[i] -= 1;
            excess -= 1;
        }
    }
    counts
}

/// Percentage-weighted average minimum width.
pub fn average_unit_width(specs: &[UnitTypeSpec], behaviors: &[UnitTypeBehavior]) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (spec, behavior) in specs.iter().zip(behaviors) {
        if spec.percentage > 0.0 {
            weighted += spec.percentage * behavior.min_width;
            total += spec.percentage;
        }
    }
    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

/// Number of unit slots that fit `usable_length` at the given packing factor.
pub fn estimate_slots(
    usable_length: f64,
    specs: &[UnitTypeSpec],
    behaviors: &[UnitTypeBehavior],
    safety_factor: f64,
) -> usize {
    let avg = average_unit_width(specs, behaviors);
    if avg <= 0.0 || usable_length <= 0.0 {
        return 0;
    }
    // Nudge before flooring so exact multiples are not lost to rounding
    ((usable_length * safety_factor / avg) + 1e-9).floor() as usize
}

/// Per-type target counts for the whole building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCounts {
    pub per_type: Vec<usize>,
    pub total: usize,
}

/// Step 2: global per-type counts for the usable corridor length.
pub fn distribute_unit_counts(
    usable_length: f64,
    specs: &[UnitTypeSpec],
    behaviors: &[UnitTypeBehavior],
    safety_factor: f64,
) -> UnitCounts {
    let total = estimate_slots(usable_length, specs, behaviors, safety_factor);
    let weights: Vec<f64> = specs.iter().map(|s| s.percentage).collect();
    let per_type = apportion(&weights, total);
    UnitCounts {
        total: per_type.iter().sum(),
        per_type,
    }
}

/// Per-type counts on each side of the corridor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideSplit {
    pub core_side: Vec<usize>,
    pub far_side: Vec<usize>,
}

impl SideSplit {
    pub fn core_total(&self) -> usize {
        self.core_side.iter().sum()
    }

    pub fn far_total(&self) -> usize {
        self.far_side.iter().sum()
    }
}

/// Split every type's count by `bias` (core-side fraction).
///
/// The core-side total is apportioned first so both sides stay integral,
/// then each type gets the floor of its biased share plus one for the
/// largest remainders until that total is met.
pub fn split_by_side(counts: &[usize], bias: f64) -> SideSplit {
    let bias = if bias.is_finite() { bias.clamp(0.0, 1.0) } else { 0.5 };
    let total: usize = counts.iter().sum();
    let core_total = apportion(&[bias, 1.0 - bias], total)[0];

    let ideal: Vec<f64> = counts.iter().map(|&c| c as f64 * bias).collect();
    let mut core_side: Vec<usize> = ideal
        .iter()
        .zip(counts)
        .map(|(x, &c)| (x.floor() as usize).min(c))
        .collect();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = ideal[a] - ideal[a].floor();
        let rb = ideal[b] - ideal[b].floor();
        rb.total_cmp(&ra)
    });

    let mut assigned: usize = core_side.iter().sum();
    for &i in order.iter().rev() {
        if assigned <= core_total {
            break;
        }
        if core_side[i] > 0 {
            core_side[i] -= 1;
            assigned -= 1;
        }
    }

    // First pass by remainder, then any type with room left
    for pass in 0..2 {
        for &i in &order {
            if assigned >= core_total {
                break;
            }
            let has_room = core_side[i] < counts[i];
            let has_remainder = ideal[i] - ideal[i].floor() > 1e-12;
            if has_room && (pass == 1 || has_remainder) {
                core_side[i] += 1;
                assigned += 1;
            }
        }
    }

    let far_side = counts.iter().zip(&core_side).map(|(c, s)| c - s).collect();
    SideSplit {
        core_side,
        far_side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;
    use crate::flexibility::derive_behaviors;
    use proptest::prelude::*;

    #[test]
    fn test_apportion_basic() {
        assert_eq!(apportion(&[20.0, 40.0, 30.0, 10.0], 10), vec![2, 4, 3, 1]);
        assert_eq!(apportion(&[20.0, 40.0, 30.0, 10.0], 7), vec![1, 3, 2, 1]);
    }

    #[test]
    fn test_apportion_ties_follow_input_order() {
        assert_eq!(apportion(&[1.0, 1.0, 1.0], 2), vec![1, 1, 0]);
        assert_eq!(apportion(&[1.0, 1.0, 1.0], 1), vec![1, 0, 0]);
    }

    #[test]
    fn test_apportion_zero_weights() {
        assert_eq!(apportion(&[0.0, 0.0], 5), vec![0, 0]);
        assert_eq!(apportion(&[100.0, 0.0, -3.0], 5), vec![5, 0, 0]);
    }

    #[test]
    fn test_slots_for_sixty_meter_bar() {
        let specs = default_unit_config();
        let behaviors = derive_behaviors(&specs, (20.0 - 1.83) / 2.0);
        let usable = 60.0 - 2.0 * 3.66 + 60.0;
        let counts = distribute_unit_counts(usable, &specs, &behaviors, 1.0);
        assert_eq!(counts.per_type.iter().sum::<usize>(), counts.total);
        assert!(counts.total > 10);
    }

    #[test]
    fn test_split_even_bias() {
        let split = split_by_side(&[1, 1, 1], 0.5);
        assert_eq!(split.core_total(), 2);
        assert_eq!(split.far_total(), 1);
        assert_eq!(split.core_side, vec![1, 1, 0]);
    }

    #[test]
    fn test_split_extreme_bias() {
        let split = split_by_side(&[3, 4], 1.0);
        assert_eq!(split.core_side, vec![3, 4]);
        assert_eq!(split.far_total(), 0);
    }

    proptest! {
        #[test]
        fn prop_apportion_sums_to_total(
            raw in prop::collection::vec(0.0f64..100.0, 1..8),
            total in 0usize..=1000,
        ) {
            let sum: f64 = raw.iter().sum();
            prop_assume!(sum > 1e-6);
            let percentages: Vec<f64> = raw.iter().map(|p| p / sum * 100.0).collect();

            let counts = apportion(&percentages, total);
            prop_assert_eq!(counts.iter().sum::<usize>(), total);

            // Each count is its floor or floor + 1
            for (c, p) in counts.iter().zip(&percentages) {
                let ideal = p / 100.0 * total as f64;
                prop_assert!((*c as f64) >= ideal.floor() - 1.0);
                prop_assert!((*c as f64) <= ideal.ceil() + 1.0);
            }
        }

        #[test]
        fn prop_fixed_mix_sums_to_total(total in 0usize..=1000) {
            let counts = apportion(&[20.0, 40.0, 30.0, 10.0], total);
            prop_assert_eq!(counts.iter().sum::<usize>(), total);
        }

        #[test]
        fn prop_side_split_conserves_counts(
            counts in prop::collection::vec(0usize..50, 1..6),
            bias in 0.0f64..=1.0,
        ) {
            let split = split_by_side(&counts, bias);
            let total: usize = counts.iter().sum();
            prop_assert_eq!(split.core_total() + split.far_total(), total);
            for (i, c) in counts.iter().enumerate() {
                prop_assert_eq!(split.core_side[i] + split.far_side[i], *c);
            }
            prop_assert_eq!(split.core_total(), apportion(&[bias, 1.0 - bias], total)[0]);
        }
    }
}

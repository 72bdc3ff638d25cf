// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit-type flexibility model
//!
//! Every type gets a hard minimum width (`target_area / rentable_depth`) and a
//! maximum width bounded by the next-larger type, so expansion never reorders
//! types by size. The smallest type is rigid: it never grows and is never
//! L-shaped.

use crate::config::{EPS, LARGEST_TYPE_EXPANSION};
use crate::types::UnitTypeSpec;
use serde::{Deserialize, Serialize};

/// Derived sizing rules of one unit type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitTypeBehavior {
    pub min_width: f64,
    pub max_width: f64,
    /// Relative share of leftover width this type absorbs.
    pub expansion_weight: f64,
    /// Always zero: units never shrink.
    pub compression_weight: f64,
    pub l_shape_eligible: bool,
    pub corner_eligible: bool,
    pub rigid: bool,
}

/// Width bounds of a type within one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthBounds {
    pub min: f64,
    pub max: f64,
    pub weight: f64,
}

impl UnitTypeBehavior {
    /// Bounds for a unit placed in a segment of `segment_width`.
    ///
    /// The minimum is never relaxed, even when it exceeds the segment.
    pub fn bounds(&self, segment_width: f64) -> WidthBounds {
        WidthBounds {
            min: self.min_width,
            max: self.max_width.min(segment_width).max(self.min_width),
            weight: self.expansion_weight,
        }
    }

    #[inline]
    pub fn can_expand(&self) -> bool {
        self.expansion_weight > 0.0 && self.max_width > self.min_width + EPS
    }
}

/// Derive behaviors for every configured type, in input order.
pub fn derive_behaviors(specs: &[UnitTypeSpec], rentable_depth: f64) -> Vec<UnitTypeBehavior> {
    if specs.is_empty() {
        return Vec::new();
    }

    let mut by_area: Vec<usize> = (0..specs.len()).collect();
    by_area.sort_by(|&a, &b| specs[a].target_area.total_cmp(&specs[b].target_area));

    let smallest = specs[by_area[0]].target_area;
    let largest = specs[by_area[by_area.len() - 1]].target_area;
    let median = median_area(specs, &by_area);

    specs
        .iter()
        .map(|spec| {
            let min_width = spec.target_area / rentable_depth;
            let rigid = spec.target_area <= smallest + EPS;

            let next_larger = by_area
                .iter()
                .map(|&i| &specs[i])
                .find(|other| other.target_area > spec.target_area + EPS);

            let max_width = if rigid {
                min_width
            } else {
                match next_larger {
                    Some(next) => (next.target_area / rentable_depth).max(min_width),
                    None => min_width * LARGEST_TYPE_EXPANSION,
                }
            };

            let expansion_weight = if rigid || largest <= 0.0 {
                0.0
            } else {
                spec.target_area / largest
            };

            let corner_eligible = spec
                .corner_eligible
                .unwrap_or(!rigid && spec.target_area >= median - EPS);

            UnitTypeBehavior {
                min_width,
                max_width,
                expansion_weight,
                compression_weight: 0.0,
                l_shape_eligible: !rigid,
                corner_eligible,
                rigid,
            }
        })
        .collect()
}

fn median_area(specs: &[UnitTypeSpec], by_area: &[usize]) -> f64 {
    let n = by_area.len();
    if n % 2 == 1 {
        specs[by_area[n / 2]].target_area
    } else {
        (specs[by_area[n / 2 - 1]].target_area + specs[by_area[n / 2]].target_area) / 2.0
    }
}

/// Distribute `leftover` width over units starting at `mins`.
///
/// Water-filling by expansion weight: each round hands out the remaining
/// width proportionally to the weights of units still below their cap.
/// Returns the final widths and the width nobody could absorb.
pub fn distribute_leftover(bounds: &[WidthBounds], leftover: f64) -> (Vec<f64>, f64) {
    let mut widths: Vec<f64> = bounds.iter().map(|b| b.min).collect();
    let mut remaining = leftover.max(0.0);

    // Each round caps at least one unit or exhausts the leftover
    for _ in 0..=bounds.len() {
        if remaining <= EPS {
            break;
        }

        let open: Vec<usize> = (0..bounds.len())
            .filter(|&i| bounds[i].weight > 0.0 && widths[i] < bounds[i].max - EPS)
            .collect();
        let total_weight: f64 = open.iter().map(|&i| bounds[i].weight).sum();
        if open.is_empty() || total_weight <= 0.0 {
            break;
        }

        let pool = remaining;
        for &i in &open {
            let share = pool * bounds[i].weight / total_weight;
            let room = bounds[i].max - widths[i];
            let take = share.min(room);
            widths[i] += take;
            remaining -= take;
        }
    }

    (widths, remaining.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;
    use approx::assert_relative_eq;

    const RD: f64 = (20.0 - 1.83) / 2.0;

    #[test]
    fn test_min_width_from_area() {
        let behaviors = derive_behaviors(&default_unit_config(), RD);
        assert_relative_eq!(behaviors[1].min_width, 65.03 / RD);
        assert_relative_eq!(behaviors[1].max_width, 92.90 / RD);
    }

    #[test]
    fn test_studio_is_rigid() {
        let behaviors = derive_behaviors(&default_unit_config(), RD);
        let studio = behaviors[0];
        assert!(studio.rigid);
        assert!(!studio.l_shape_eligible);
        assert_eq!(studio.expansion_weight, 0.0);
        assert_relative_eq!(studio.max_width, studio.min_width);
    }

    #[test]
    fn test_largest_type_expands_quarter() {
        let behaviors = derive_behaviors(&default_unit_config(), RD);
        assert_relative_eq!(behaviors[3].max_width, behaviors[3].min_width * 1.25);
        assert_relative_eq!(behaviors[3].expansion_weight, 1.0);
    }

    #[test]
    fn test_corner_eligibility_defaults_to_median() {
        let mut specs = default_unit_config();
        for spec in &mut specs {
            spec.corner_eligible = None;
        }
        let flags: Vec<bool> = derive_behaviors(&specs, RD)
            .iter()
            .map(|b| b.corner_eligible)
            .collect();
        assert_eq!(flags, vec![false, false, true, true]);
    }

    #[test]
    fn test_bounds_never_relax_minimum() {
        let behaviors = derive_behaviors(&default_unit_config(), RD);
        let b = behaviors[3].bounds(5.0);
        assert_relative_eq!(b.min, behaviors[3].min_width);
        assert_relative_eq!(b.max, behaviors[3].min_width);
    }

    #[test]
    fn test_distribute_leftover_proportional() {
        let bounds = [
            WidthBounds { min: 5.0, max: 10.0, weight: 1.0 },
            WidthBounds { min: 5.0, max: 10.0, weight: 3.0 },
        ];
        let (widths, rest) = distribute_leftover(&bounds, 4.0);
        assert_relative_eq!(widths[0], 6.0);
        assert_relative_eq!(widths[1], 8.0);
        assert_relative_eq!(rest, 0.0);
    }

    #[test]
    fn test_distribute_leftover_caps_and_reports_excess() {
        let bounds = [
            WidthBounds { min: 5.0, max: 5.5, weight: 1.0 },
            WidthBounds { min: 4.0, max: 4.0, weight: 0.0 },
            WidthBounds { min: 6.0, max: 7.0, weight: 1.0 },
        ];
        let (widths, rest) = distribute_leftover(&bounds, 3.0);
        assert_relative_eq!(widths[0], 5.5);
        assert_relative_eq!(widths[1], 4.0);
        assert_relative_eq!(widths[2], 7.0, epsilon = 1e-9);
        assert_relative_eq!(rest, 1.5, epsilon = 1e-9);
    }
}

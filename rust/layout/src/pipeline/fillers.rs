// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sliver absorption and filler detection (step 11b)

use super::{DraftFiller, DraftUnit, LayoutContext};
use crate::config::{EPS, MIN_FILLER_WIDTH};
use crate::types::{FillerKind, Side};
use barplan_geometry::{interval_gaps, Rect};

/// Uncovered x-intervals of one side.
fn side_gaps(ctx: &LayoutContext, core_xs: &[f64], units: &[DraftUnit], side: Side) -> Vec<(f64, f64)> {
    let mut covered: Vec<(f64, f64)> = units
        .iter()
        .filter(|u| u.side == side)
        .map(|u| (u.x, u.max_x()))
        .collect();
    if ctx.core_side.includes(side) {
        covered.extend(core_xs.iter().map(|&x| (x, x + ctx.core_width)));
    }
    interval_gaps((0.0, ctx.width), &covered, EPS)
}

/// Widen a touching unit over every gap narrower than the filler threshold.
///
/// The west neighbour takes the gap when it stays within its maximum width,
/// otherwise the east neighbour. A gap neither can take is left for
/// [`detect_fillers`].
pub(crate) fn absorb_slivers(ctx: &LayoutContext, core_xs: &[f64], units: &mut [DraftUnit]) {
    for side in Side::ALL {
        for (start, end) in side_gaps(ctx, core_xs, units, side) {
            let gap = end - start;
            if gap >= MIN_FILLER_WIDTH {
                continue;
            }

            let has_room =
                |u: &DraftUnit| u.width + gap <= ctx.behaviors[u.type_index].max_width + EPS;
            let west = units
                .iter()
                .position(|u| u.side == side && (u.max_x() - start).abs() < EPS && has_room(u));
            let east = units
                .iter()
                .position(|u| u.side == side && (u.x - end).abs() < EPS && has_room(u));

            if let Some(i) = west {
                units[i].width += gap;
            } else if let Some(i) = east {
                units[i].x = start;
                units[i].width += gap;
            }
        }
    }
}

/// Emit a filler for every remaining uncovered stretch of either side.
pub(crate) fn detect_fillers(ctx: &LayoutContext, core_xs: &[f64], units: &[DraftUnit]) -> Vec<DraftFiller> {
    let mut fillers = Vec::new();
    for side in Side::ALL {
        let (y, depth) = ctx.band(side);
        for (start, end) in side_gaps(ctx, core_xs, units, side) {
            fillers.push(DraftFiller {
                rect: Rect::new(start, y, end - start, depth),
                side,
                kind: FillerKind::Gap,
            });
        }
    }
    fillers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;
    use crate::types::{BuildingFootprint, EgressConfig, LayoutInput, LayoutParams, Strategy};
    use approx::assert_relative_eq;
    use smallvec::SmallVec;

    fn input() -> LayoutInput {
        LayoutInput::new(
            BuildingFootprint::new(30.0, 20.0),
            default_unit_config(),
            EgressConfig::sprinklered(),
            LayoutParams::default(),
        )
    }

    fn unit(type_index: usize, side: Side, x: f64, width: f64) -> DraftUnit {
        DraftUnit {
            type_index,
            side,
            x,
            width,
            extensions: SmallVec::new(),
        }
    }

    #[test]
    fn test_sliver_goes_to_west_neighbour() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let mut units = vec![unit(1, Side::South, 0.0, 8.8), unit(1, Side::South, 9.0, 8.0)];

        absorb_slivers(&ctx, &[], &mut units);

        assert_relative_eq!(units[0].width, 9.0, epsilon = 1e-9);
        assert_relative_eq!(units[1].x, 9.0);
        assert!(detect_fillers(&ctx, &[], &units)
            .iter()
            .filter(|f| f.side == Side::South)
            .all(|f| f.rect.x > 16.0));
    }

    #[test]
    fn test_sliver_skips_rigid_neighbour() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let studio = ctx.min_width(0);
        let mut units = vec![
            unit(0, Side::South, 0.0, studio),
            unit(2, Side::South, studio + 0.3, 11.0),
        ];

        absorb_slivers(&ctx, &[], &mut units);

        assert_relative_eq!(units[0].width, studio);
        assert_relative_eq!(units[1].x, studio, epsilon = 1e-9);
        assert_relative_eq!(units[1].width, 11.3, epsilon = 1e-9);
        assert!(units[1].width <= ctx.behaviors[2].max_width);
    }

    #[test]
    fn test_sliver_between_capped_units_becomes_filler() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let studio = ctx.min_width(0);
        let mut units = vec![
            unit(0, Side::South, 0.0, studio),
            unit(0, Side::South, studio + 0.3, studio),
        ];
        let before = units.clone();

        absorb_slivers(&ctx, &[], &mut units);
        assert_eq!(units, before);

        let fillers: Vec<DraftFiller> = detect_fillers(&ctx, &[], &units)
            .into_iter()
            .filter(|f| f.side == Side::South)
            .collect();
        assert_relative_eq!(fillers[0].rect.x, studio);
        assert_relative_eq!(fillers[0].rect.width, 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_wide_gap_becomes_filler() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let mut units = vec![unit(1, Side::South, 0.0, 10.0), unit(1, Side::South, 12.0, 18.0)];

        absorb_slivers(&ctx, &[], &mut units);
        let fillers: Vec<DraftFiller> = detect_fillers(&ctx, &[], &units)
            .into_iter()
            .filter(|f| f.side == Side::South)
            .collect();

        assert_eq!(fillers.len(), 1);
        assert_relative_eq!(fillers[0].rect.x, 10.0);
        assert_relative_eq!(fillers[0].rect.width, 2.0);
        assert_relative_eq!(fillers[0].rect.depth, ctx.rentable_depth);
    }

    #[test]
    fn test_cores_count_as_covered() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let units = vec![unit(1, Side::North, 0.0, 10.0), unit(1, Side::North, 13.66, 16.34)];

        let fillers = detect_fillers(&ctx, &[10.0], &units);

        assert!(fillers.iter().all(|f| f.side == Side::South));
    }
}

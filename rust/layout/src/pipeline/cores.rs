// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core count, x-positions and core records (steps 1, 4, 5)

use super::LayoutContext;
use crate::types::{Core, CoreKind};

/// Step 1: two end cores when every corridor point stays within the travel
/// limit of one of them, otherwise three.
pub(crate) fn initial_core_count(ctx: &LayoutContext) -> usize {
    if ctx.width / 2.0 + ctx.core_width <= ctx.egress.max_travel_distance {
        2
    } else {
        3
    }
}

/// Step 4: left edges of `n` cores, end cores `corner_length` in from each
/// building end and mid cores evenly spaced between them.
pub(crate) fn core_positions(ctx: &LayoutContext, n: usize, corner_length: f64) -> Vec<f64> {
    let cw = ctx.core_width;
    // Keep every core inside the building and clear of its neighbours
    let max_corner = ((ctx.width - n as f64 * cw) / 2.0).max(0.0);
    let corner = corner_length.clamp(0.0, max_corner);

    let first = corner;
    let last = (ctx.width - corner - cw).max(first);

    match n {
        0 => Vec::new(),
        1 => vec![(ctx.width - cw) / 2.0],
        _ => (0..n)
            .map(|i| first + (last - first) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Step 5: one record per position and core side.
pub(crate) fn core_records(ctx: &LayoutContext, core_xs: &[f64]) -> Vec<Core> {
    let mut cores = Vec::with_capacity(core_xs.len() * ctx.core_side.sides().len());
    for (i, &x) in core_xs.iter().enumerate() {
        let kind = if i == 0 || i + 1 == core_xs.len() {
            CoreKind::End
        } else {
            CoreKind::Mid
        };
        for &side in ctx.core_side.sides() {
            cores.push(Core {
                id: format!("C-{}{}", i + 1, side.as_str()),
                x,
                y: ctx.core_y(side),
                width: ctx.core_width,
                depth: ctx.core_depth,
                kind,
                side,
            });
        }
    }
    cores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;
    use crate::types::{
        BuildingFootprint, CoreSide, EgressConfig, LayoutInput, LayoutParams, Side, Strategy,
    };
    use approx::assert_relative_eq;

    fn input(width: f64, core_side: CoreSide) -> LayoutInput {
        LayoutInput::new(
            BuildingFootprint::new(width, 20.0),
            default_unit_config(),
            EgressConfig::sprinklered(),
            LayoutParams {
                core_side,
                ..LayoutParams::default()
            },
        )
    }

    #[test]
    fn test_initial_count() {
        let short = input(60.0, CoreSide::North);
        assert_eq!(initial_core_count(&LayoutContext::new(&short, Strategy::Balanced)), 2);

        let long = input(200.0, CoreSide::North);
        assert_eq!(initial_core_count(&LayoutContext::new(&long, Strategy::Balanced)), 3);
    }

    #[test]
    fn test_positions_evenly_spaced() {
        let input = input(200.0, CoreSide::North);
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let xs = core_positions(&ctx, 3, 20.0);
        assert_eq!(xs.len(), 3);
        assert_relative_eq!(xs[0], 20.0);
        assert_relative_eq!(xs[2], 200.0 - 20.0 - 3.66);
        assert_relative_eq!(xs[1] - xs[0], xs[2] - xs[1]);
    }

    #[test]
    fn test_positions_clamped() {
        let input = input(10.0, CoreSide::North);
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let xs = core_positions(&ctx, 2, 50.0);
        assert!(xs[0] + 3.66 <= xs[1] + 1e-9);
        assert!(xs[1] + 3.66 <= 10.0 + 1e-9);
    }

    #[test]
    fn test_records_mirror_for_both_sides() {
        let input = input(60.0, CoreSide::Both);
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let records = core_records(&ctx, &[14.0, 42.0]);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|c| c.kind == CoreKind::End));
        let south = records.iter().find(|c| c.side == Side::South).unwrap();
        assert_relative_eq!(south.y + south.depth, ctx.rentable_depth);
    }
}

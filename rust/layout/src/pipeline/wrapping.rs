// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! L-shaped units: core wrapping and corridor-end voids (steps 10, 11)

use super::{DraftFiller, DraftUnit, End, LayoutContext};
use crate::config::{EPS, MIN_CORRIDOR_FRONTAGE, MIN_VOID_LENGTH};
use crate::types::{FillerKind, Side};
use barplan_geometry::{rects_outline, Rect};
use tracing::debug;

/// Attach `strip` to a unit if the union stays one simple outline.
fn try_absorb(ctx: &LayoutContext, unit: &mut DraftUnit, strip: Rect) -> bool {
    let mut rects = unit.rects(ctx);
    rects.push(strip);
    match rects_outline(&rects) {
        Ok(_) => {
            unit.extensions.push(strip);
            true
        }
        Err(err) => {
            debug!(error = %err, "Strip cannot join unit outline");
            false
        }
    }
}

/// Step 10: wrap the facade strip beyond each core.
///
/// The strip goes to an L-shape-eligible unit touching the core, the larger
/// type first and the west neighbour on ties. Strips nobody takes are
/// returned as fillers.
pub(crate) fn wrap_cores(ctx: &LayoutContext, core_xs: &[f64], units: &mut [DraftUnit]) -> Vec<DraftFiller> {
    let mut fillers = Vec::new();

    for &side in ctx.core_side.sides() {
        let (strip_y, strip_depth) = ctx.strip(side);
        if strip_depth < EPS {
            continue;
        }

        for &cx in core_xs {
            let strip = Rect::new(cx, strip_y, ctx.core_width, strip_depth);
            let core_end = cx + ctx.core_width;

            let west = units.iter().position(|u| u.side == side && (u.max_x() - cx).abs() < EPS);
            let east = units.iter().position(|u| u.side == side && (u.x - core_end).abs() < EPS);

            let mut best: Option<usize> = None;
            for i in [west, east].into_iter().flatten() {
                let t = units[i].type_index;
                if !ctx.behaviors[t].l_shape_eligible {
                    continue;
                }
                if best.map_or(true, |b| ctx.area_of(t) > ctx.area_of(units[b].type_index)) {
                    best = Some(i);
                }
            }

            let wrapped = best.map_or(false, |i| try_absorb(ctx, &mut units[i], strip));
            if !wrapped {
                fillers.push(DraftFiller {
                    rect: strip,
                    side,
                    kind: FillerKind::CoreStrip,
                });
            }
        }
    }

    fillers
}

/// Step 11: let an end unit absorb the corridor stub at each building end.
///
/// The corridor only needs to reach the end units' doors, so it stops
/// `MIN_CORRIDOR_FRONTAGE` short of the narrower end unit. The wider
/// L-shape-eligible end unit takes the freed rectangle. Returns the
/// shortened corridor extent along x.
pub(crate) fn absorb_corridor_voids(ctx: &LayoutContext, units: &mut [DraftUnit]) -> (f64, f64) {
    let mut corridor = (0.0, ctx.width);

    for end in [End::West, End::East] {
        let at_end = |u: &DraftUnit| match end {
            End::West => u.x.abs() < EPS,
            End::East => (u.max_x() - ctx.width).abs() < EPS,
        };

        let ends: Vec<usize> = Side::ALL
            .iter()
            .filter_map(|&side| units.iter().position(|u| u.side == side && at_end(u)))
            .collect();
        if ends.len() < Side::ALL.len() {
            continue;
        }

        let narrowest = ends.iter().map(|&i| units[i].width).fold(f64::MAX, f64::min);
        let void = narrowest - MIN_CORRIDOR_FRONTAGE;
        if void < MIN_VOID_LENGTH {
            continue;
        }

        let mut absorber: Option<usize> = None;
        for &i in &ends {
            if !ctx.behaviors[units[i].type_index].l_shape_eligible {
                continue;
            }
            if absorber.map_or(true, |a| units[i].width > units[a].width + EPS) {
                absorber = Some(i);
            }
        }
        let Some(i) = absorber else {
            continue;
        };

        let x = match end {
            End::West => 0.0,
            End::East => ctx.width - void,
        };
        let rect = Rect::new(x, ctx.corridor_y(), void, ctx.corridor_width);

        if try_absorb(ctx, &mut units[i], rect) {
            match end {
                End::West => corridor.0 = void,
                End::East => corridor.1 = ctx.width - void,
            }
            debug!(?end, void, "Absorbed corridor-end void");
        }
    }

    corridor
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output transform and plan assembly (step 14)

use super::{cores, Draft, LayoutContext};
use crate::config::SERVICE_USE;
use crate::types::{
    EgressReport, Filler, FloorPlan, LayoutInput, LayoutStats, Point2D, Strategy, Unit,
    WorldTransform,
};
use barplan_geometry::{rects_outline, Rect};
use smallvec::SmallVec;
use tracing::warn;

fn color_of(input: &LayoutInput, type_index: usize) -> Option<String> {
    let spec = &input.unit_types[type_index];
    input
        .params
        .color_overrides
        .get(&spec.id)
        .cloned()
        .or_else(|| spec.color.clone())
}

/// Shift everything so the building center is the origin and package the
/// world placement separately. Rotation is never applied to coordinates.
pub(crate) fn assemble(
    ctx: &LayoutContext,
    input: &LayoutInput,
    strategy: Strategy,
    draft: Draft,
    stats: LayoutStats,
    egress: EgressReport,
) -> FloorPlan {
    let dx = -ctx.width / 2.0;
    let dy = -ctx.depth / 2.0;
    let shift = |r: &Rect| r.translated(dx, dy);

    let mut draft_units = draft.units;
    draft_units.sort_by(|a, b| a.side.cmp(&b.side).then(a.x.total_cmp(&b.x)));

    let units: Vec<Unit> = draft_units
        .iter()
        .enumerate()
        .map(|(i, u)| {
            let rect = shift(&u.rect(ctx));
            let extensions: SmallVec<[Rect; 2]> = u.extensions.iter().map(shift).collect();
            let area = rect.area() + extensions.iter().map(Rect::area).sum::<f64>();

            let polygon = if extensions.is_empty() {
                None
            } else {
                let mut rects = vec![rect];
                rects.extend(extensions.iter().copied());
                match rects_outline(&rects) {
                    Ok(points) => Some(points.iter().map(|p| Point2D::new(p.x, p.y)).collect()),
                    Err(err) => {
                        warn!(error = %err, "Unit outline failed, keeping rectangles only");
                        None
                    }
                }
            };

            Unit {
                id: format!("U-{:03}", i + 1),
                type_id: input.unit_types[u.type_index].id.clone(),
                side: u.side,
                x: rect.x,
                y: rect.y,
                width: rect.width,
                depth: rect.depth,
                area,
                color: color_of(input, u.type_index),
                extensions,
                polygon,
            }
        })
        .collect();

    let core_records = cores::core_records(ctx, &draft.core_xs)
        .into_iter()
        .map(|mut core| {
            core.x += dx;
            core.y += dy;
            core
        })
        .collect();

    let mut draft_fillers = draft.fillers;
    draft_fillers.sort_by(|a, b| {
        a.side
            .cmp(&b.side)
            .then(a.rect.x.total_cmp(&b.rect.x))
            .then(a.rect.y.total_cmp(&b.rect.y))
    });
    let fillers = draft_fillers
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let rect = shift(&f.rect);
            Filler {
                id: format!("F-{:02}", i + 1),
                x: rect.x,
                y: rect.y,
                width: rect.width,
                depth: rect.depth,
                side: f.side,
                kind: f.kind,
                usage: SERVICE_USE.to_string(),
            }
        })
        .collect();

    let corridor = shift(&Rect::new(
        draft.corridor.0,
        ctx.corridor_y(),
        (draft.corridor.1 - draft.corridor.0).max(0.0),
        ctx.corridor_width,
    ));

    let mut alignment = draft.alignment;
    for pair in &mut alignment.pairs {
        pair.south_before += dx;
        pair.north_before += dx;
        pair.south_after += dx;
        pair.north_after += dx;
    }

    let fp = &input.footprint;
    FloorPlan {
        strategy,
        width: ctx.width,
        depth: ctx.depth,
        height: fp.height,
        rentable_depth: ctx.rentable_depth,
        corner_length: draft.corner_length,
        units,
        cores: core_records,
        fillers,
        corridor,
        stats,
        egress,
        alignment,
        transform: WorldTransform {
            center: fp.center,
            elevation: fp.floor_elevation,
            rotation: fp.rotation,
        },
    }
}

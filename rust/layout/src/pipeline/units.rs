// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit generation within segments (step 8)

use super::{DraftUnit, End, LayoutContext, Segment};
use crate::config::EPS;
use crate::flexibility::{distribute_leftover, WidthBounds};
use smallvec::SmallVec;

/// Lay out the assigned units of every segment.
///
/// Units start at their minimum width and absorb the segment's leftover by
/// expansion weight. Half of a segment's units are packed from its start and
/// the rest from its end, so units touch the cores and building ends on both
/// sides and leftover length collects in the middle. Corner segments put
/// their premium unit at the building end.
pub(crate) fn generate_units(
    ctx: &LayoutContext,
    segments: &[Segment],
    assignment: &[Vec<usize>],
    unplaced: &mut [usize],
) -> Vec<DraftUnit> {
    let mut units = Vec::new();

    for (segment, types) in segments.iter().zip(assignment) {
        if types.is_empty() {
            continue;
        }
        let order = unit_order(ctx, segment, types, unplaced);
        units.extend(place_segment(ctx, segment, &order));
    }

    units
}

/// Types in building-end-first order, trimmed to fit and split when a lone
/// unit would span the whole segment.
fn unit_order(ctx: &LayoutContext, segment: &Segment, types: &[usize], unplaced: &mut [usize]) -> Vec<usize> {
    let mut order = types.to_vec();
    let corner = segment.is_corner();
    order.sort_by(|&a, &b| {
        let ea = corner && ctx.behaviors[a].corner_eligible;
        let eb = corner && ctx.behaviors[b].corner_eligible;
        eb.cmp(&ea).then(ctx.area_of(b).total_cmp(&ctx.area_of(a)))
    });

    let length = segment.length();
    while !order.is_empty() && order.iter().map(|&t| ctx.min_width(t)).sum::<f64>() > length + EPS {
        if let Some(t) = order.pop() {
            unplaced[t] += 1;
        }
    }

    // Hard span: a lone unit over twice its minimum becomes two
    if let [t] = order[..] {
        if length >= 2.0 * ctx.min_width(t) - EPS && length > ctx.behaviors[t].max_width + EPS {
            order.push(t);
        }
    }

    order
}

fn place_segment(ctx: &LayoutContext, segment: &Segment, order: &[usize]) -> Vec<DraftUnit> {
    let length = segment.length();
    let bounds: Vec<WidthBounds> = order
        .iter()
        .map(|&t| ctx.behaviors[t].bounds(length))
        .collect();
    let used: f64 = bounds.iter().map(|b| b.min).sum();
    let (widths, _) = distribute_leftover(&bounds, length - used);

    // Sequence along +x
    let mut seq: Vec<(usize, f64)> = order.iter().copied().zip(widths).collect();
    let head = if segment.corner == Some(End::East) {
        seq.reverse();
        seq.len() / 2
    } else {
        (seq.len() + 1) / 2
    };

    let mut units = Vec::with_capacity(seq.len());
    let mut cursor = segment.start;
    for &(t, w) in &seq[..head] {
        units.push(draft(segment, t, cursor, w));
        cursor += w;
    }

    let mut tail = Vec::with_capacity(seq.len() - head);
    let mut cursor = segment.end;
    for &(t, w) in seq[head..].iter().rev() {
        cursor -= w;
        tail.push(draft(segment, t, cursor, w));
    }
    tail.reverse();
    units.extend(tail);

    units
}

fn draft(segment: &Segment, type_index: usize, x: f64, width: f64) -> DraftUnit {
    DraftUnit {
        type_index,
        side: segment.side,
        x,
        width,
        extensions: SmallVec::new(),
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall alignment across the corridor (step 9)

use super::{DraftUnit, LayoutContext};
use crate::config::EPS;
use crate::types::{AlignmentReport, Side, WallPair};
use tracing::debug;

/// A party wall between two touching units of one side.
#[derive(Debug, Clone, Copy)]
struct Wall {
    left: usize,
    right: usize,
    position: f64,
}

fn walls(units: &[DraftUnit], side: Side) -> Vec<Wall> {
    let mut on_side: Vec<usize> = (0..units.len()).filter(|&i| units[i].side == side).collect();
    on_side.sort_by(|&a, &b| units[a].x.total_cmp(&units[b].x));

    on_side
        .windows(2)
        .filter(|w| (units[w[0]].max_x() - units[w[1]].x).abs() < EPS)
        .map(|w| Wall {
            left: w[0],
            right: w[1],
            position: units[w[1]].x,
        })
        .collect()
}

/// Positions `wall` can take with both units inside their width bounds.
fn wall_range(ctx: &LayoutContext, units: &[DraftUnit], wall: &Wall) -> (f64, f64) {
    let left = &units[wall.left];
    let right = &units[wall.right];
    let (l, r) = (&ctx.behaviors[left.type_index], &ctx.behaviors[right.type_index]);
    let end = right.max_x();
    (
        (left.x + l.min_width).max(end - r.max_width),
        (left.x + l.max_width).min(end - r.min_width),
    )
}

/// Where two opposing walls can meet, closest to their midpoint.
fn meeting_point(
    ctx: &LayoutContext,
    units: &[DraftUnit],
    south: &Wall,
    north: &Wall,
) -> Option<f64> {
    let (s_lo, s_hi) = wall_range(ctx, units, south);
    let (n_lo, n_hi) = wall_range(ctx, units, north);
    let (lo, hi) = (s_lo.max(n_lo), s_hi.min(n_hi));
    if lo > hi + EPS {
        return None;
    }
    if lo > hi {
        return Some((lo + hi) / 2.0);
    }
    let mid = (units[south.right].x + units[north.right].x) / 2.0;
    Some(mid.clamp(lo, hi))
}

fn move_wall(units: &mut [DraftUnit], wall: &Wall, target: f64) {
    let right_end = units[wall.right].max_x();
    units[wall.left].width = target - units[wall.left].x;
    units[wall.right].x = target;
    units[wall.right].width = right_end - target;
}

/// Step 9: snap opposing walls together.
///
/// Every south wall is matched with at most one north wall whose offset is
/// within `tolerance x average unit width`, closest pairs first. A pair meets
/// at its midpoint clamped to the positions both walls can reach without
/// taking a unit outside its min/max width. Blocked pairs leave their walls
/// free for other partners and are retried after later moves; pairs that
/// still cannot meet are reported unaligned.
pub(crate) fn align_walls(ctx: &LayoutContext, units: &mut [DraftUnit]) -> AlignmentReport {
    let tolerance = ctx.alignment_tolerance;
    let average = if units.is_empty() {
        0.0
    } else {
        units.iter().map(|u| u.width).sum::<f64>() / units.len() as f64
    };
    let threshold = tolerance * average;

    let mut report = AlignmentReport {
        tolerance,
        threshold,
        pairs: Vec::new(),
    };
    if tolerance <= 0.0 || units.is_empty() {
        return report;
    }

    let south = walls(units, Side::South);
    let north = walls(units, Side::North);

    let mut candidates: Vec<(usize, usize, f64)> = Vec::new();
    for (i, s) in south.iter().enumerate() {
        for (j, n) in north.iter().enumerate() {
            let offset = (s.position - n.position).abs();
            if offset <= threshold {
                candidates.push((i, j, offset));
            }
        }
    }
    candidates.sort_by(|a, b| {
        a.2.total_cmp(&b.2)
            .then(south[a.0].position.total_cmp(&south[b.0].position))
            .then(north[a.1].position.total_cmp(&north[b.1].position))
    });

    let mut south_used = vec![false; south.len()];
    let mut north_used = vec![false; north.len()];

    // Moving a wall changes its neighbours' ranges, so repeat until stable
    loop {
        let mut moved = false;
        for &(i, j, _) in &candidates {
            if south_used[i] || north_used[j] {
                continue;
            }
            let (s, n) = (south[i], north[j]);
            let Some(target) = meeting_point(ctx, units, &s, &n) else {
                continue;
            };

            move_wall(units, &s, target);
            move_wall(units, &n, target);
            south_used[i] = true;
            north_used[j] = true;
            moved = true;
            report.pairs.push(WallPair {
                south_before: s.position,
                north_before: n.position,
                south_after: target,
                north_after: target,
                aligned: true,
            });
        }
        if !moved {
            break;
        }
    }

    for &(i, j, _) in &candidates {
        if south_used[i] || north_used[j] {
            continue;
        }
        south_used[i] = true;
        north_used[j] = true;
        let (s, n) = (south[i], north[j]);
        report.pairs.push(WallPair {
            south_before: s.position,
            north_before: n.position,
            south_after: s.position,
            north_after: n.position,
            aligned: false,
        });
    }

    debug!(
        pairs = report.pairs.len(),
        aligned = report.aligned_count(),
        threshold,
        "Aligned walls"
    );

    report
}

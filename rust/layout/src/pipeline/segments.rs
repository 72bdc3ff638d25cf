// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment definition and unit distribution to segments (steps 6, 7, 7b)

use super::{End, LayoutContext, Segment};
use crate::config::EPS;
use crate::distribution::{apportion, SideSplit};
use crate::types::Side;
use tracing::debug;

/// Unit type indices per segment plus what could not be placed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assignment {
    pub per_segment: Vec<Vec<usize>>,
    /// Type reserved in pass A, for corner segments only.
    pub premium: Vec<Option<usize>>,
    /// Per type.
    pub unplaced: Vec<usize>,
}

/// Step 6: split both sides into segments.
///
/// The core side is bounded by the core footprints. The far side has no
/// cores and is split at the core centerlines so its segments face the
/// core-side segments across the corridor.
pub(crate) fn define_segments(ctx: &LayoutContext, core_xs: &[f64]) -> Vec<Segment> {
    let mut segments = Vec::new();

    for side in Side::ALL {
        let mut bounds: Vec<(f64, f64)> = Vec::with_capacity(core_xs.len() + 1);
        let mut cursor = 0.0;

        if ctx.core_side.includes(side) {
            for &x in core_xs {
                bounds.push((cursor, x));
                cursor = x + ctx.core_width;
            }
        } else {
            for &x in core_xs {
                let center = x + ctx.core_width / 2.0;
                bounds.push((cursor, center));
                cursor = center;
            }
        }
        bounds.push((cursor, ctx.width));

        let last = bounds.len() - 1;
        for (i, &(start, end)) in bounds.iter().enumerate() {
            if end - start <= EPS {
                continue;
            }
            let corner = if i == 0 {
                Some(End::West)
            } else if i == last {
                Some(End::East)
            } else {
                None
            };
            segments.push(Segment {
                side,
                start,
                end,
                corner,
            });
        }
    }

    segments
}

/// Sum of minimum widths of the assigned types.
fn load(ctx: &LayoutContext, types: &[usize]) -> f64 {
    types.iter().map(|&t| ctx.min_width(t)).sum()
}

/// Step 7: four-pass distribution of each side's pool.
///
/// - A: every corner segment takes the largest fitting corner-eligible type.
/// - B: the rest is apportioned by remaining segment capacity, largest
///   units first, each to the roomiest segment with quota left.
/// - C: overflow goes to any segment it still fits, otherwise it is counted
///   as unplaced.
/// - D: an empty segment takes the smallest fitting unit of an adjacent
///   segment holding at least two.
pub(crate) fn assign_units(ctx: &LayoutContext, segments: &[Segment], split: &SideSplit) -> Assignment {
    let type_count = ctx.specs.len();
    let mut per_segment: Vec<Vec<usize>> = vec![Vec::new(); segments.len()];
    let mut premium: Vec<Option<usize>> = vec![None; segments.len()];
    let mut unplaced = vec![0usize; type_count];
    let mut caps: Vec<f64> = segments.iter().map(Segment::length).collect();

    for side in Side::ALL {
        let mut pool = ctx.side_pool(split, side).to_vec();
        let on_side: Vec<usize> = (0..segments.len())
            .filter(|&j| segments[j].side == side)
            .collect();

        // Pass A
        for &j in on_side.iter().filter(|&&j| segments[j].is_corner()) {
            let mut best: Option<usize> = None;
            for t in 0..type_count {
                let fits = ctx.min_width(t) <= caps[j] + EPS;
                if pool[t] == 0 || !ctx.behaviors[t].corner_eligible || !fits {
                    continue;
                }
                if best.map_or(true, |b| ctx.area_of(t) > ctx.area_of(b)) {
                    best = Some(t);
                }
            }
            if let Some(t) = best {
                pool[t] -= 1;
                caps[j] -= ctx.min_width(t);
                per_segment[j].push(t);
                premium[j] = Some(t);
            }
        }

        // Pass B
        let mut remaining: Vec<usize> = (0..type_count)
            .flat_map(|t| std::iter::repeat(t).take(pool[t]))
            .collect();
        remaining.sort_by(|&a, &b| ctx.area_of(b).total_cmp(&ctx.area_of(a)));

        let side_caps: Vec<f64> = on_side.iter().map(|&j| caps[j].max(0.0)).collect();
        let mut quotas = apportion(&side_caps, remaining.len());
        let mut overflow = Vec::new();

        for &t in &remaining {
            let w = ctx.min_width(t);
            let mut target: Option<usize> = None;
            for (k, &j) in on_side.iter().enumerate() {
                if quotas[k] == 0 || w > caps[j] + EPS {
                    continue;
                }
                if target.map_or(true, |best| caps[j] > caps[on_side[best]] + EPS) {
                    target = Some(k);
                }
            }
            match target {
                Some(k) => {
                    let j = on_side[k];
                    quotas[k] -= 1;
                    caps[j] -= w;
                    per_segment[j].push(t);
                }
                None => overflow.push(t),
            }
        }

        // Pass C
        for t in overflow {
            let w = ctx.min_width(t);
            let mut target: Option<usize> = None;
            for &j in &on_side {
                if w > caps[j] + EPS {
                    continue;
                }
                if target.map_or(true, |best| caps[j] > caps[best] + EPS) {
                    target = Some(j);
                }
            }
            match target {
                Some(j) => {
                    caps[j] -= w;
                    per_segment[j].push(t);
                }
                None => unplaced[t] += 1,
            }
        }

        // Pass D
        for (k, &j) in on_side.iter().enumerate() {
            if !per_segment[j].is_empty() {
                continue;
            }

            let mut neighbours: Vec<usize> = Vec::with_capacity(2);
            if k > 0 {
                neighbours.push(on_side[k - 1]);
            }
            if k + 1 < on_side.len() {
                neighbours.push(on_side[k + 1]);
            }
            neighbours.retain(|&n| per_segment[n].len() >= 2);
            // Largest neighbour first, left wins ties
            neighbours.sort_by(|&a, &b| per_segment[b].len().cmp(&per_segment[a].len()));

            for n in neighbours {
                let mut pick: Option<usize> = None;
                for (pos, &t) in per_segment[n].iter().enumerate() {
                    if ctx.min_width(t) > caps[j] + EPS || Some(t) == premium[n] {
                        continue;
                    }
                    if pick.map_or(true, |p| ctx.area_of(t) < ctx.area_of(per_segment[n][p])) {
                        pick = Some(pos);
                    }
                }
                if let Some(pos) = pick {
                    let t = per_segment[n].remove(pos);
                    caps[n] += ctx.min_width(t);
                    caps[j] -= ctx.min_width(t);
                    per_segment[j].push(t);
                    break;
                }
            }
        }
    }

    debug!(
        segments = segments.len(),
        unplaced = unplaced.iter().sum::<usize>(),
        "Assigned units to segments"
    );

    Assignment {
        per_segment,
        premium,
        unplaced,
    }
}

/// Step 7b: give facing corner segments the same premium type.
///
/// When one side's corner got a premium type the other side's corner lacks,
/// a unit of that type is swapped in from another segment of the other
/// side, as long as both segments keep fitting.
pub(crate) fn mirror_corner_premium(ctx: &LayoutContext, segments: &[Segment], assignment: &mut Assignment) {
    let corner_of = |side: Side, end: End| {
        (0..segments.len()).find(|&j| segments[j].side == side && segments[j].corner == Some(end))
    };

    for end in [End::West, End::East] {
        for (from, to) in [(Side::South, Side::North), (Side::North, Side::South)] {
            let (Some(ja), Some(jb)) = (corner_of(from, end), corner_of(to, end)) else {
                continue;
            };
            let Some(t) = assignment.premium[ja] else {
                continue;
            };
            if assignment.per_segment[jb].contains(&t) {
                continue;
            }
            if swap_into_corner(ctx, segments, assignment, jb, t) {
                assignment.premium[jb] = Some(t);
            }
        }
    }
}

fn swap_into_corner(
    ctx: &LayoutContext,
    segments: &[Segment],
    assignment: &mut Assignment,
    corner: usize,
    t: usize,
) -> bool {
    let side = segments[corner].side;
    let corner_len = segments[corner].length();
    let wt = ctx.min_width(t);

    for donor in (0..segments.len()).filter(|&k| k != corner && segments[k].side == side) {
        let Some(donor_pos) = assignment.per_segment[donor].iter().position(|&x| x == t) else {
            continue;
        };
        let donor_load = load(ctx, &assignment.per_segment[donor]);
        let corner_load = load(ctx, &assignment.per_segment[corner]);

        if assignment.per_segment[corner].is_empty() {
            if assignment.per_segment[donor].len() >= 2 && wt <= corner_len + EPS {
                assignment.per_segment[donor].remove(donor_pos);
                assignment.per_segment[corner].push(t);
                return true;
            }
            continue;
        }

        // Smallest victims first
        let mut victims: Vec<usize> = (0..assignment.per_segment[corner].len()).collect();
        victims.sort_by(|&a, &b| {
            let ta = assignment.per_segment[corner][a];
            let tb = assignment.per_segment[corner][b];
            ctx.area_of(ta).total_cmp(&ctx.area_of(tb))
        });

        for pos in victims {
            let v = assignment.per_segment[corner][pos];
            let wv = ctx.min_width(v);
            let corner_ok = corner_load - wv + wt <= corner_len + EPS;
            let donor_ok = donor_load - wt + wv <= segments[donor].length() + EPS;
            if corner_ok && donor_ok {
                assignment.per_segment[corner][pos] = t;
                assignment.per_segment[donor][donor_pos] = v;
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_unit_config;
    use crate::distribution::{distribute_unit_counts, split_by_side};
    use crate::types::{BuildingFootprint, EgressConfig, LayoutInput, LayoutParams, Strategy};
    use approx::assert_relative_eq;

    fn input() -> LayoutInput {
        LayoutInput::new(
            BuildingFootprint::new(60.0, 20.0),
            default_unit_config(),
            EgressConfig::sprinklered(),
            LayoutParams::default(),
        )
    }

    #[test]
    fn test_segments_cover_each_side() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let xs = [14.0, 42.34];
        let segments = define_segments(&ctx, &xs);

        let north: f64 = segments
            .iter()
            .filter(|s| s.side == Side::North)
            .map(Segment::length)
            .sum();
        let south: f64 = segments
            .iter()
            .filter(|s| s.side == Side::South)
            .map(Segment::length)
            .sum();

        assert_relative_eq!(north, 60.0 - 2.0 * 3.66, epsilon = 1e-9);
        assert_relative_eq!(south, 60.0, epsilon = 1e-9);
        assert_eq!(segments.iter().filter(|s| s.is_corner()).count(), 4);
    }

    #[test]
    fn test_far_side_split_at_centerlines() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let segments = define_segments(&ctx, &[14.0, 42.34]);
        let first_south = segments.iter().find(|s| s.side == Side::South).unwrap();
        assert_relative_eq!(first_south.end, 14.0 + 1.83);
    }

    #[test]
    fn test_assignment_fits_and_conserves() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let segments = define_segments(&ctx, &[14.0, 42.34]);
        let counts = distribute_unit_counts(ctx.usable_length(2), ctx.specs, &ctx.behaviors, 0.985);
        let split = split_by_side(&counts.per_type, ctx.resolved_bias(2));

        let mut assignment = assign_units(&ctx, &segments, &split);
        mirror_corner_premium(&ctx, &segments, &mut assignment);

        for (segment, types) in segments.iter().zip(&assignment.per_segment) {
            assert!(load(&ctx, types) <= segment.length() + 1e-6);
        }

        let placed: usize = assignment.per_segment.iter().map(Vec::len).sum();
        let unplaced: usize = assignment.unplaced.iter().sum();
        assert_eq!(placed + unplaced, counts.total);
    }

    #[test]
    fn test_corners_get_premium_types() {
        let input = input();
        let ctx = LayoutContext::new(&input, Strategy::Balanced);
        let segments = define_segments(&ctx, &[14.0, 42.34]);
        let counts = distribute_unit_counts(ctx.usable_length(2), ctx.specs, &ctx.behaviors, 0.985);
        let split = split_by_side(&counts.per_type, ctx.resolved_bias(2));
        let assignment = assign_units(&ctx, &segments, &split);

        for (j, segment) in segments.iter().enumerate() {
            if segment.is_corner() {
                let t = assignment.premium[j].unwrap();
                assert!(ctx.behaviors[t].corner_eligible);
            }
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint extraction from building geometry
//!
//! Reduces a Z-up point cloud to an oriented rectangle: ground-level points,
//! their convex hull, and the hull's longest edge as the corridor axis.
//! Concave footprints are filled in by the hull.

use crate::config::DEFAULT_FLOOR_HEIGHT;
use crate::error::{Error, Result};
use crate::types::{BuildingFootprint, Point2D};
use barplan_geometry::hull::oriented_extent;
use barplan_geometry::transform::normalize_axis_angle;
use barplan_geometry::{convex_hull, longest_edge, Point2, Vector2};
use tracing::debug;

/// Tuning for [`extract_footprint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionOptions {
    /// Points within this height above the lowest point count as ground.
    pub ground_tolerance: f64,
    /// Height used when the geometry is flat.
    pub default_height: f64,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            ground_tolerance: 0.05,
            default_height: DEFAULT_FLOOR_HEIGHT,
        }
    }
}

/// Extract a footprint from a flat `[x, y, z, x, y, z, ...]` buffer.
pub fn extract_footprint(points: &[f64], options: &ExtractionOptions) -> Result<BuildingFootprint> {
    if points.len() % 3 != 0 {
        return Err(Error::parameter(
            "points",
            format!("buffer length {} is not a multiple of 3", points.len()),
        ));
    }

    let coords: Vec<[f64; 3]> = points
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .filter(|c| c.iter().all(|v| v.is_finite()))
        .collect();
    if coords.is_empty() {
        return Err(barplan_geometry::Error::EmptyPointCloud.into());
    }

    let (min_z, max_z) = coords
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), c| (lo.min(c[2]), hi.max(c[2])));

    let ground: Vec<Point2<f64>> = coords
        .iter()
        .filter(|c| c[2] <= min_z + options.ground_tolerance)
        .map(|c| Point2::new(c[0], c[1]))
        .collect();

    let hull = convex_hull(&ground);
    let (a, b) = match longest_edge(&hull) {
        Some(edge) if hull.len() >= 3 => edge,
        _ => {
            return Err(barplan_geometry::Error::InvalidPolygon(
                "ground points do not span an area".to_string(),
            )
            .into())
        }
    };

    let axis: Vector2<f64> = (b - a).normalize();
    let (min_u, max_u, min_v, max_v) = oriented_extent(&hull, &axis);
    let perp = Vector2::new(-axis.y, axis.x);

    let center_u = (min_u + max_u) / 2.0;
    let center_v = (min_v + max_v) / 2.0;
    let center = axis * center_u + perp * center_v;

    let mut width = max_u - min_u;
    let mut depth = max_v - min_v;
    let mut angle = axis.y.atan2(axis.x);
    if depth > width {
        std::mem::swap(&mut width, &mut depth);
        angle += std::f64::consts::FRAC_PI_2;
    }

    let height = if max_z - min_z > 1e-6 {
        max_z - min_z
    } else {
        options.default_height
    };

    let footprint = BuildingFootprint {
        width,
        depth,
        height,
        center: Point2D::new(center.x, center.y),
        floor_elevation: min_z,
        rotation: normalize_axis_angle(angle),
    };

    debug!(
        width = footprint.width,
        depth = footprint.depth,
        rotation = footprint.rotation,
        ground_points = ground.len(),
        "Extracted footprint"
    );

    Ok(footprint)
}

/// Extract a footprint from an indexed triangle buffer.
///
/// Only vertices referenced by `indices` are considered.
pub fn extract_footprint_from_mesh(
    positions: &[f64],
    indices: &[u32],
    options: &ExtractionOptions,
) -> Result<BuildingFootprint> {
    let vertex_count = positions.len() / 3;
    let mut used = vec![false; vertex_count];
    for &i in indices {
        let i = i as usize;
        if i >= vertex_count {
            return Err(Error::parameter(
                "indices",
                format!("index {} out of range for {} vertices", i, vertex_count),
            ));
        }
        used[i] = true;
    }

    let points: Vec<f64> = used
        .iter()
        .enumerate()
        .filter(|(_, &u)| u)
        .flat_map(|(i, _)| positions[i * 3..i * 3 + 3].iter().copied())
        .collect();

    extract_footprint(&points, options)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Convex hull and oriented extents for footprint reduction

use nalgebra::{Point2, Vector2};

/// Compute the convex hull of 2D points (Andrew's monotone chain).
///
/// Returns the hull in counter-clockwise order without collinear points.
/// Inputs with fewer than three distinct points are returned deduplicated.
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut sorted: Vec<Point2<f64>> = points
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .cloned()
        .collect();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|a, b| (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12);

    if sorted.len() < 3 {
        return sorted;
    }

    let cross = |o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>| {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    };

    let mut lower: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }

    // Last point of each chain is the first of the other
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Longest edge of a closed polygon as (start, end)
pub fn longest_edge(polygon: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    if polygon.len() < 2 {
        return None;
    }

    let n = polygon.len();
    let mut best: Option<(Point2<f64>, Point2<f64>, f64)> = None;

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let len = (b - a).norm();
        if best.map_or(true, |(_, _, l)| len > l) {
            best = Some((a, b, len));
        }
    }

    best.map(|(a, b, _)| (a, b))
}

/// Extent of points along a unit axis and its perpendicular.
///
/// Returns `(min_u, max_u, min_v, max_v)` where `u` is the projection on
/// `axis` and `v` the projection on the axis rotated +90°.
pub fn oriented_extent(points: &[Point2<f64>], axis: &Vector2<f64>) -> (f64, f64, f64, f64) {
    let perp = Vector2::new(-axis.y, axis.x);

    points.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_u, max_u, min_v, max_v), p| {
            let u = p.coords.dot(axis);
            let v = p.coords.dot(&perp);
            (min_u.min(u), max_u.max(u), min_v.min(v), max_v.max(v))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::signed_area;
    use approx::assert_relative_eq;

    #[test]
    fn test_convex_hull_drops_interior() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 0.5), // Interior point
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 0.0), // Collinear on an edge
        ];

        let hull = convex_hull(&points);

        assert_eq!(hull.len(), 4);
        assert!(signed_area(&hull) > 0.0);
    }

    #[test]
    fn test_convex_hull_degenerate() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(0.0, 0.0)];
        assert_eq!(convex_hull(&points).len(), 1);
    }

    #[test]
    fn test_longest_edge() {
        let rect = vec![
            Point2::new(0.0, 0.0),
            Point2::new(60.0, 0.0),
            Point2::new(60.0, 20.0),
            Point2::new(0.0, 20.0),
        ];
        let (a, b) = longest_edge(&rect).unwrap();
        assert_relative_eq!((b - a).norm(), 60.0);
    }

    #[test]
    fn test_oriented_extent() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), Point2::new(4.0, 2.0)];
        let (min_u, max_u, min_v, max_v) = oriented_extent(&points, &Vector2::new(1.0, 0.0));
        assert_relative_eq!(max_u - min_u, 4.0);
        assert_relative_eq!(max_v - min_v, 2.0);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon queries and rectangle-union outlines
//!
//! Unit footprints are unions of axis-aligned rectangles (a base rectangle
//! plus absorbed strips). The outline of such a union is computed with the
//! i_overlay crate and cleaned up into a simple counter-clockwise contour.

use crate::error::{Error, Result};
use crate::rect::Rect;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Collinearity tolerance used when cleaning union outlines
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Unsigned polygon area (shoelace)
#[inline]
pub fn polygon_area(contour: &[Point2<f64>]) -> f64 {
    signed_area(contour).abs()
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    contour.len() >= 3 && polygon_area(contour) > MIN_AREA_THRESHOLD
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Check if a polygon is convex (all cross products have same sign)
pub fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current_sign;
            } else if sign != current_sign {
                return false;
            }
        }
    }

    true
}

/// Simplify a contour by removing collinear and duplicate points
pub fn simplify_contour(contour: &[Point2<f64>], epsilon: f64) -> Vec<Point2<f64>> {
    if contour.len() <= 3 {
        return contour.to_vec();
    }

    let mut deduped: Vec<Point2<f64>> = Vec::with_capacity(contour.len());
    for p in contour {
        if deduped
            .last()
            .map_or(true, |q| (p.x - q.x).abs() > epsilon || (p.y - q.y).abs() > epsilon)
        {
            deduped.push(*p);
        }
    }
    if deduped.len() > 1 {
        let first = deduped[0];
        let last = deduped[deduped.len() - 1];
        if (first.x - last.x).abs() <= epsilon && (first.y - last.y).abs() <= epsilon {
            deduped.pop();
        }
    }

    let n = deduped.len();
    let mut result = Vec::with_capacity(n);

    for i in 0..n {
        let prev = &deduped[(i + n - 1) % n];
        let curr = &deduped[i];
        let next = &deduped[(i + 1) % n];

        let cross = (curr.x - prev.x) * (next.y - prev.y) - (curr.y - prev.y) * (next.x - prev.x);

        if cross.abs() > epsilon {
            result.push(*curr);
        }
    }

    if result.len() < 3 {
        return contour.to_vec();
    }

    result
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_polygon(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Distance from a point to a line segment
pub fn point_segment_distance(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-20 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    (p - closest).norm()
}

/// Outline of a union of edge-connected rectangles.
///
/// Returns a single counter-clockwise contour with collinear vertices
/// removed. Fails if the rectangles do not form one connected shape.
pub fn rects_outline(rects: &[Rect]) -> Result<Vec<Point2<f64>>> {
    let valid: Vec<&Rect> = rects.iter().filter(|r| r.area() > MIN_AREA_THRESHOLD).collect();

    let first = valid
        .first()
        .ok_or_else(|| Error::InvalidPolygon("no rectangles to outline".to_string()))?;

    if valid.len() == 1 {
        return Ok(first.corners().to_vec());
    }

    let subject: Vec<Vec<[f64; 2]>> = vec![rect_to_path(first)];
    let clip: Vec<Vec<[f64; 2]>> = valid.iter().skip(1).map(|r| rect_to_path(r)).collect();

    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

    if result.len() != 1 {
        return Err(Error::InvalidPolygon(format!(
            "rectangle union produced {} disjoint shapes",
            result.len()
        )));
    }

    let outer = result[0]
        .first()
        .ok_or_else(|| Error::InvalidPolygon("union produced an empty shape".to_string()))?;

    let points: Vec<Point2<f64>> = outer.iter().map(|p| Point2::new(p[0], p[1])).collect();
    let cleaned = simplify_contour(&points, COLLINEAR_EPSILON);

    if !is_valid_contour(&cleaned) {
        return Err(Error::InvalidPolygon("degenerate union outline".to_string()));
    }

    Ok(ensure_ccw(&cleaned))
}

/// Convert a rectangle to i_overlay path format (counter-clockwise)
fn rect_to_path(rect: &Rect) -> Vec<[f64; 2]> {
    rect.corners().iter().map(|p| [p.x, p.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn l_shape() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 3.0),
        ]
    }

    #[test]
    fn test_signed_area_winding() {
        let ccw = l_shape();
        assert_relative_eq!(signed_area(&ccw), 6.0);

        let cw: Vec<_> = ccw.iter().rev().cloned().collect();
        assert_relative_eq!(signed_area(&cw), -6.0);
        assert_relative_eq!(signed_area(&ensure_ccw(&cw)), 6.0);
    }

    #[test]
    fn test_l_shape_is_concave() {
        assert!(!is_convex(&l_shape()));
        assert!(is_convex(&Rect::new(0.0, 0.0, 2.0, 1.0).corners()));
    }

    #[test]
    fn test_point_in_polygon() {
        let shape = l_shape();
        assert!(point_in_polygon(&Point2::new(0.5, 2.0), &shape));
        assert!(!point_in_polygon(&Point2::new(2.0, 2.0), &shape));
    }

    #[test]
    fn test_simplify_removes_collinear() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert_eq!(simplify_contour(&points, 1e-9).len(), 4);
    }

    #[test]
    fn test_point_segment_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_relative_eq!(point_segment_distance(&Point2::new(5.0, 3.0), &a, &b), 3.0);
        assert_relative_eq!(point_segment_distance(&Point2::new(-4.0, 3.0), &a, &b), 5.0);
    }

    #[test]
    fn test_rects_outline_single() {
        let outline = rects_outline(&[Rect::new(1.0, 1.0, 2.0, 3.0)]).unwrap();
        assert_eq!(outline.len(), 4);
        assert_relative_eq!(polygon_area(&outline), 6.0);
    }

    #[test]
    fn test_rects_outline_l_shape() {
        let base = Rect::new(0.0, 0.0, 6.0, 9.0);
        let strip = Rect::new(6.0, 8.5, 3.0, 0.5);

        let outline = rects_outline(&[base, strip]).unwrap();

        assert_eq!(outline.len(), 6);
        assert!(signed_area(&outline) > 0.0);
        assert_relative_eq!(polygon_area(&outline), 55.5, epsilon = 1e-4);
    }

    #[test]
    fn test_rects_outline_disjoint_fails() {
        let result = rects_outline(&[Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, 5.0, 1.0, 1.0)]);
        assert!(result.is_err());
    }
}

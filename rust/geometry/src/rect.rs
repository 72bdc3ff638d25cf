// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned rectangles and 1-D interval coverage

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle.
///
/// `x`/`width` run along the building length (corridor axis), `y`/`depth`
/// run across it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub depth: f64,
}

impl Rect {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, depth: f64) -> Self {
        Self { x, y, width, depth }
    }

    /// Build from min/max corners. Inverted bounds give a zero-sized rect.
    pub fn from_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x).max(0.0),
            depth: (max_y - min_y).max(0.0),
        }
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.depth
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.depth
    }

    #[inline]
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.x + self.width / 2.0, self.y + self.depth / 2.0)
    }

    /// Intersection rectangle, `None` when the rectangles only touch or are apart
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.x.max(other.x);
        let min_y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());

        if max_x > min_x && max_y > min_y {
            Some(Rect::from_bounds(min_x, min_y, max_x, max_y))
        } else {
            None
        }
    }

    #[inline]
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        self.intersection(other).map(|r| r.area()).unwrap_or(0.0)
    }

    /// Overlap test that ignores slivers of area below `eps`
    #[inline]
    pub fn overlaps(&self, other: &Rect, eps: f64) -> bool {
        self.intersection_area(other) > eps
    }

    /// Check containment with tolerance `eps` on every edge
    pub fn contains_rect(&self, other: &Rect, eps: f64) -> bool {
        other.x >= self.x - eps
            && other.y >= self.y - eps
            && other.max_x() <= self.max_x() + eps
            && other.max_y() <= self.max_y() + eps
    }

    /// Corners in counter-clockwise order starting at (min_x, min_y)
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            Point2::new(self.x, self.y),
            Point2::new(self.max_x(), self.y),
            Point2::new(self.max_x(), self.max_y()),
            Point2::new(self.x, self.max_y()),
        ]
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.depth)
    }

    /// True if the rectangles share an edge segment of positive length
    pub fn shares_edge(&self, other: &Rect, eps: f64) -> bool {
        let x_overlap = self.max_x().min(other.max_x()) - self.x.max(other.x);
        let y_overlap = self.max_y().min(other.max_y()) - self.y.max(other.y);

        let vertical_contact = ((self.max_x() - other.x).abs() < eps
            || (other.max_x() - self.x).abs() < eps)
            && y_overlap > eps;
        let horizontal_contact = ((self.max_y() - other.y).abs() < eps
            || (other.max_y() - self.y).abs() < eps)
            && x_overlap > eps;

        vertical_contact || horizontal_contact
    }
}

/// Uncovered sub-intervals of `span` after removing every `covered` interval.
///
/// Intervals are `(start, end)` pairs; gaps shorter than `eps` are dropped.
/// The result is sorted by start.
pub fn interval_gaps(span: (f64, f64), covered: &[(f64, f64)], eps: f64) -> Vec<(f64, f64)> {
    let mut sorted: Vec<(f64, f64)> = covered
        .iter()
        .filter(|(s, e)| e > s)
        .map(|&(s, e)| (s.max(span.0), e.min(span.1)))
        .filter(|(s, e)| e > s)
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut gaps = Vec::new();
    let mut cursor = span.0;

    for (start, end) in sorted {
        if start - cursor > eps {
            gaps.push((cursor, start));
        }
        cursor = cursor.max(end);
    }

    if span.1 - cursor > eps {
        gaps.push((cursor, span.1));
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_intersection_area() {
        let a = Rect::new(0.0, 0.0, 4.0, 2.0);
        let b = Rect::new(3.0, 1.0, 4.0, 4.0);

        assert_relative_eq!(a.intersection_area(&b), 1.0);
        assert!(a.overlaps(&b, 1e-9));
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 4.0, 2.0);
        let b = Rect::new(4.0, 0.0, 1.0, 2.0);

        assert!(a.intersection(&b).is_none());
        assert!(a.shares_edge(&b, 1e-9));
    }

    #[test]
    fn test_corner_contact_is_not_shared_edge() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 1.0, 1.0, 1.0);

        assert!(!a.shares_edge(&b, 1e-9));
    }

    #[test]
    fn test_interval_gaps() {
        let gaps = interval_gaps((0.0, 10.0), &[(2.0, 4.0), (3.0, 5.0), (8.0, 12.0)], 1e-9);

        assert_eq!(gaps.len(), 2);
        assert_relative_eq!(gaps[0].0, 0.0);
        assert_relative_eq!(gaps[0].1, 2.0);
        assert_relative_eq!(gaps[1].0, 5.0);
        assert_relative_eq!(gaps[1].1, 8.0);
    }

    #[test]
    fn test_interval_gaps_fully_covered() {
        let gaps = interval_gaps((0.0, 10.0), &[(0.0, 6.0), (6.0, 10.0)], 1e-9);
        assert!(gaps.is_empty());
    }
}

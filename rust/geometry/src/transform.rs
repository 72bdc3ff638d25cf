// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rigid planar transforms (rotation about the origin, then translation)

use nalgebra::{Point2, Rotation2, Vector2};

/// Rotation followed by translation in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarTransform {
    /// Translation applied after rotation
    pub translation: Vector2<f64>,
    /// Counter-clockwise rotation in radians
    pub rotation: f64,
}

impl Default for PlanarTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl PlanarTransform {
    pub fn new(translation: Vector2<f64>, rotation: f64) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self {
            translation: Vector2::zeros(),
            rotation: 0.0,
        }
    }

    #[inline]
    pub fn apply(&self, p: &Point2<f64>) -> Point2<f64> {
        Rotation2::new(self.rotation) * p + self.translation
    }

    /// Inverse mapping (world to local)
    #[inline]
    pub fn apply_inverse(&self, p: &Point2<f64>) -> Point2<f64> {
        Rotation2::new(-self.rotation) * (p - self.translation)
    }

    pub fn apply_all(&self, points: &[Point2<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.apply(p)).collect()
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == 0.0 && self.translation == Vector2::zeros()
    }
}

/// Rotate a point about the origin
#[inline]
pub fn rotate_point(p: &Point2<f64>, angle: f64) -> Point2<f64> {
    Rotation2::new(angle) * p
}

/// Normalize an axis angle to (-π/2, π/2]; a line direction and its
/// opposite describe the same axis.
pub fn normalize_axis_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    let mut a = angle % PI;
    if a <= -PI / 2.0 {
        a += PI;
    } else if a > PI / 2.0 {
        a -= PI;
    }
    a
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint sources
//!
//! Hosts hand over building geometry as flat Z-up buffers. A source only has
//! to produce the buffer; extraction is shared.

use crate::error::{Error, Result};
use barplan_layout::{extract_footprint, extract_footprint_from_mesh, BuildingFootprint, ExtractionOptions};

/// Anything that can provide building geometry as `[x, y, z, ...]`.
pub trait FootprintSource {
    /// Vertex positions.
    fn points(&self) -> Result<Vec<f64>>;

    /// Triangle indices into [`points`](Self::points), when the source is a mesh.
    fn indices(&self) -> Option<&[u32]> {
        None
    }

    /// Reduce the geometry to an oriented rectangular footprint.
    fn footprint(&self, options: &ExtractionOptions) -> Result<BuildingFootprint> {
        let points = self.points()?;
        let footprint = match self.indices() {
            Some(indices) => extract_footprint_from_mesh(&points, indices, options)?,
            None => extract_footprint(&points, options)?,
        };
        Ok(footprint)
    }
}

/// A plain point cloud.
#[derive(Debug, Clone, Default)]
pub struct FlatPointBuffer {
    pub points: Vec<f64>,
}

impl FlatPointBuffer {
    pub fn new(points: Vec<f64>) -> Self {
        Self { points }
    }
}

impl FootprintSource for FlatPointBuffer {
    fn points(&self) -> Result<Vec<f64>> {
        if self.points.len() % 3 != 0 {
            return Err(Error::FootprintSource(format!(
                "point buffer length {} is not a multiple of 3",
                self.points.len()
            )));
        }
        Ok(self.points.clone())
    }
}

/// An indexed triangle mesh, e.g. the building element picked in a viewer.
#[derive(Debug, Clone, Default)]
pub struct TriangleBuffer {
    pub positions: Vec<f64>,
    pub indices: Vec<u32>,
}

impl TriangleBuffer {
    pub fn new(positions: Vec<f64>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Widen single-precision viewer buffers.
    pub fn from_f32(positions: &[f32], indices: Vec<u32>) -> Self {
        Self {
            positions: positions.iter().map(|&v| v as f64).collect(),
            indices,
        }
    }
}

impl FootprintSource for TriangleBuffer {
    fn points(&self) -> Result<Vec<f64>> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::FootprintSource(format!(
                "index buffer length {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        Ok(self.positions.clone())
    }

    fn indices(&self) -> Option<&[u32]> {
        Some(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn slab(width: f64, depth: f64) -> Vec<f64> {
        let mut points = Vec::new();
        for z in [0.0, 3.0] {
            for (x, y) in [(0.0, 0.0), (width, 0.0), (width, depth), (0.0, depth)] {
                points.extend([x, y, z]);
            }
        }
        points
    }

    #[test]
    fn test_point_buffer_footprint() {
        let source = FlatPointBuffer::new(slab(48.0, 18.0));
        let fp = source.footprint(&ExtractionOptions::default()).unwrap();
        assert_relative_eq!(fp.width, 48.0, epsilon = 1e-9);
        assert_relative_eq!(fp.depth, 18.0, epsilon = 1e-9);
        assert_relative_eq!(fp.center.x, 24.0, epsilon = 1e-9);
        assert_relative_eq!(fp.height, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangle_buffer_uses_indices() {
        let positions: Vec<f32> = slab(48.0, 18.0).iter().map(|&v| v as f32).collect();
        let source = TriangleBuffer::from_f32(&positions, vec![0, 1, 2, 0, 2, 3]);
        let fp = source.footprint(&ExtractionOptions::default()).unwrap();
        assert_relative_eq!(fp.width, 48.0, epsilon = 1e-6);
        // Only the ground face is referenced
        assert_relative_eq!(fp.height, ExtractionOptions::default().default_height);
    }

    #[test]
    fn test_malformed_buffers() {
        let options = ExtractionOptions::default();
        assert!(matches!(
            FlatPointBuffer::new(vec![1.0, 2.0]).footprint(&options),
            Err(Error::FootprintSource(_))
        ));
        assert!(TriangleBuffer::new(slab(10.0, 5.0), vec![0, 1]).footprint(&options).is_err());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting 2D outlines to floor plates and prisms

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::polygon::ensure_ccw;
use crate::triangulation::triangulate_polygon;
use nalgebra::{Point2, Point3, Vector3};

/// Triangulate an outline as a flat upward-facing plate at elevation `z`.
///
/// The outline is normalized to counter-clockwise winding first, so every
/// emitted triangle winds counter-clockwise seen from above.
pub fn flat_polygon(outline: &[Point2<f64>], z: f64) -> Result<Mesh> {
    let outer = ensure_ccw(outline);
    let indices = triangulate_polygon(&outer)?;

    let mut mesh = Mesh::with_capacity(outer.len(), indices.len());
    create_cap_mesh(&outer, &indices, z, Vector3::new(0.0, 0.0, 1.0), false, &mut mesh);
    Ok(mesh)
}

/// Extrude an outline along +Z from `base_z` by `height`
pub fn extrude_polygon(outline: &[Point2<f64>], base_z: f64, height: f64) -> Result<Mesh> {
    if height <= 0.0 || !height.is_finite() {
        return Err(Error::InvalidExtrusion(
            "Height must be positive".to_string(),
        ));
    }

    let outer = ensure_ccw(outline);
    let indices = triangulate_polygon(&outer)?;

    let mut mesh = Mesh::with_capacity(outer.len() * 6, indices.len() * 2 + outer.len() * 6);

    // Bottom cap faces down, so its winding is flipped
    create_cap_mesh(&outer, &indices, base_z, Vector3::new(0.0, 0.0, -1.0), true, &mut mesh);
    create_cap_mesh(&outer, &indices, base_z + height, Vector3::new(0.0, 0.0, 1.0), false, &mut mesh);
    create_side_walls(&outer, base_z, height, &mut mesh);

    Ok(mesh)
}

/// Create a cap from a triangulated outline
#[inline]
fn create_cap_mesh(
    points: &[Point2<f64>],
    indices: &[usize],
    z: f64,
    normal: Vector3<f64>,
    reverse: bool,
    mesh: &mut Mesh,
) {
    let base_index = mesh.vertex_count() as u32;

    for p in points {
        mesh.add_vertex(Point3::new(p.x, p.y, z), normal);
    }

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as u32, tri[1] as u32, tri[2] as u32);
        if reverse {
            mesh.add_triangle(base_index + i0, base_index + i2, base_index + i1);
        } else {
            mesh.add_triangle(base_index + i0, base_index + i1, base_index + i2);
        }
    }
}

/// Create side walls for a counter-clockwise outline
#[inline]
fn create_side_walls(outline: &[Point2<f64>], base_z: f64, height: f64, mesh: &mut Mesh) {
    let n = outline.len();

    for i in 0..n {
        let p0 = &outline[i];
        let p1 = &outline[(i + 1) % n];

        let edge = Vector3::new(p1.x - p0.x, p1.y - p0.y, 0.0);
        let len = edge.norm();
        if len < 1e-12 {
            continue;
        }
        // Outward normal of a CCW outline is the edge rotated -90°
        let normal = Vector3::new(edge.y / len, -edge.x / len, 0.0);

        let base_index = mesh.vertex_count() as u32;
        mesh.add_vertex(Point3::new(p0.x, p0.y, base_z), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, base_z), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, base_z + height), normal);
        mesh.add_vertex(Point3::new(p0.x, p0.y, base_z + height), normal);

        mesh.add_triangle(base_index, base_index + 1, base_index + 2);
        mesh.add_triangle(base_index, base_index + 2, base_index + 3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_cw() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 0.0),
        ]
    }

    #[test]
    fn test_flat_polygon_is_ccw() {
        let mesh = flat_polygon(&square_cw(), 3.0).unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert_relative_eq!(mesh.projected_signed_area(), 4.0, epsilon = 1e-6);
        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, 3.0);
        assert_relative_eq!(max.z, 3.0);
    }

    #[test]
    fn test_extrude_counts() {
        let mesh = extrude_polygon(&square_cw(), 0.0, 3.0).unwrap();

        // 2 caps × 2 triangles + 4 sides × 2 triangles
        assert_eq!(mesh.triangle_count(), 12);
        let (min, max) = mesh.bounds();
        assert_relative_eq!(max.z - min.z, 3.0);
    }

    #[test]
    fn test_extrude_invalid_height() {
        assert!(extrude_polygon(&square_cw(), 0.0, 0.0).is_err());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Barplan Geometry
//!
//! Planar primitives for floor layouts: axis-aligned rectangles, polygon
//! queries, rectangle-union outlines (i_overlay), convex hulls, earcutr
//! triangulation and simple mesh generation.

pub mod error;
pub mod extrusion;
pub mod hull;
pub mod mesh;
pub mod polygon;
pub mod rect;
pub mod transform;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use extrusion::{extrude_polygon, flat_polygon};
pub use hull::{convex_hull, longest_edge};
pub use mesh::Mesh;
pub use polygon::{ensure_ccw, is_convex, point_in_polygon, polygon_area, rects_outline, signed_area};
pub use rect::{interval_gaps, Rect};
pub use transform::PlanarTransform;
pub use triangulation::triangulate_polygon;

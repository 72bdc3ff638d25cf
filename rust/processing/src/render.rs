// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presentation meshing of floor plans
//!
//! Every plan element becomes one triangle mesh: a flat plate at floor level
//! or a prism of the floor height. Outlines are wound counter-clockwise
//! before triangulation; L-shaped units go through ear clipping. World
//! placement is optional so viewers that apply their own transform get
//! building-centered coordinates.

use crate::error::Result;
use barplan_geometry::{extrude_polygon, flat_polygon, Mesh, PlanarTransform, Point2, Rect, Vector2};
use barplan_layout::{FloorPlan, WorldTransform};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const CORE_COLOR: [f32; 4] = [0.45, 0.45, 0.5, 1.0];
const CORRIDOR_COLOR: [f32; 4] = [0.85, 0.85, 0.85, 1.0];
const FILLER_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 0.6];
const UNIT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Unit,
    Core,
    Corridor,
    Filler,
}

/// How to turn a plan into meshes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Extrude to the floor height instead of flat plates.
    pub extrude: bool,
    /// Apply the plan's world center, rotation and elevation.
    pub world: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            extrude: true,
            world: true,
        }
    }
}

/// One renderable plan element.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderElement {
    pub kind: ElementKind,
    pub id: String,
    /// Unit type id, for units only.
    pub type_id: Option<String>,
    /// RGBA in 0-1.
    pub color: [f32; 4],
    pub mesh: Mesh,
}

/// Parse `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };

    let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}

fn rect_outline(rect: &Rect) -> Vec<Point2<f64>> {
    rect.corners().to_vec()
}

/// Element outline before meshing.
struct Outline {
    kind: ElementKind,
    id: String,
    type_id: Option<String>,
    color: [f32; 4],
    points: Vec<Point2<f64>>,
}

fn outlines(plan: &FloorPlan) -> Vec<Outline> {
    let mut out = Vec::with_capacity(plan.units.len() + plan.cores.len() + plan.fillers.len() + 1);

    for unit in &plan.units {
        let points = match &unit.polygon {
            Some(polygon) => polygon.iter().map(|p| Point2::new(p.x, p.y)).collect(),
            None => rect_outline(&unit.rect()),
        };
        out.push(Outline {
            kind: ElementKind::Unit,
            id: unit.id.clone(),
            type_id: Some(unit.type_id.clone()),
            color: unit
                .color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or(UNIT_COLOR),
            points,
        });
    }

    for core in &plan.cores {
        out.push(Outline {
            kind: ElementKind::Core,
            id: core.id.clone(),
            type_id: None,
            color: CORE_COLOR,
            points: rect_outline(&core.rect()),
        });
    }

    if plan.corridor.area() > 0.0 {
        out.push(Outline {
            kind: ElementKind::Corridor,
            id: "corridor".to_string(),
            type_id: None,
            color: CORRIDOR_COLOR,
            points: rect_outline(&plan.corridor),
        });
    }

    for filler in &plan.fillers {
        out.push(Outline {
            kind: ElementKind::Filler,
            id: filler.id.clone(),
            type_id: None,
            color: FILLER_COLOR,
            points: rect_outline(&filler.rect()),
        });
    }

    out
}

fn world_transform(transform: &WorldTransform) -> PlanarTransform {
    PlanarTransform::new(
        Vector2::new(transform.center.x, transform.center.y),
        transform.rotation,
    )
}

/// Mesh every element of a plan.
///
/// Elements come out in plan order: units, cores, corridor, fillers.
pub fn render_plan(plan: &FloorPlan, options: &RenderOptions) -> Result<Vec<RenderElement>> {
    let placement = if options.world {
        world_transform(&plan.transform)
    } else {
        PlanarTransform::identity()
    };
    let base_z = if options.world { plan.transform.elevation } else { 0.0 };

    let elements = outlines(plan)
        .into_par_iter()
        .map(|outline| -> Result<RenderElement> {
            let points = if placement.is_identity() {
                outline.points
            } else {
                placement.apply_all(&outline.points)
            };

            let mesh = if options.extrude {
                extrude_polygon(&points, base_z, plan.height)?
            } else {
                flat_polygon(&points, base_z)?
            };

            Ok(RenderElement {
                kind: outline.kind,
                id: outline.id,
                type_id: outline.type_id,
                color: outline.color,
                mesh,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        elements = elements.len(),
        triangles = elements.iter().map(|e| e.mesh.triangle_count()).sum::<usize>(),
        extrude = options.extrude,
        "Rendered floor plan"
    );

    Ok(elements)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure geometric checks over a finished floor plan.

use crate::types::{FloorPlan, UnitTypeSpec};
use barplan_geometry::{polygon_area, Point2, Rect};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Overlaps and coverage slack below this area are ignored.
const AREA_EPS: f64 = 1e-6;

/// A layout validation finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Every rectangle of the plan tagged with the element it belongs to.
fn labeled_rects(plan: &FloorPlan) -> Vec<(String, Rect)> {
    let mut rects = Vec::new();
    for unit in &plan.units {
        rects.extend(unit.rects().map(|r| (unit.id.clone(), r)));
    }
    rects.extend(plan.cores.iter().map(|c| (c.id.clone(), c.rect())));
    rects.extend(plan.fillers.iter().map(|f| (f.id.clone(), f.rect())));
    rects.push(("corridor".to_string(), plan.corridor));
    rects
}

/// Units must keep their type's target area and minimum width.
pub fn check_no_shrink(plan: &FloorPlan, unit_types: &[UnitTypeSpec]) -> Vec<ValidationIssue> {
    let targets: FxHashMap<&str, f64> = unit_types
        .iter()
        .map(|t| (t.id.as_str(), t.target_area))
        .collect();

    let mut issues = Vec::new();
    for unit in &plan.units {
        let Some(&target) = targets.get(unit.type_id.as_str()) else {
            issues.push(ValidationIssue {
                category: "unit_type",
                severity: Severity::Error,
                message: format!("Unit {} has unknown type '{}'", unit.id, unit.type_id),
            });
            continue;
        };

        if unit.area < target - AREA_EPS {
            issues.push(ValidationIssue {
                category: "no_shrink",
                severity: Severity::Error,
                message: format!(
                    "Unit {} ({}) has {:.3} m² below its target {:.3} m²",
                    unit.id, unit.type_id, unit.area, target
                ),
            });
        }

        let min_width = target / plan.rentable_depth;
        if unit.width < min_width - 1e-6 {
            issues.push(ValidationIssue {
                category: "no_shrink",
                severity: Severity::Error,
                message: format!(
                    "Unit {} is {:.3} m wide, below its minimum {:.3} m",
                    unit.id, unit.width, min_width
                ),
            });
        }
    }
    issues
}

/// No two elements may share area.
pub fn check_overlaps(plan: &FloorPlan) -> Vec<ValidationIssue> {
    let rects = labeled_rects(plan);
    let mut issues = Vec::new();

    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            let (a_id, a) = &rects[i];
            let (b_id, b) = &rects[j];
            if a_id == b_id {
                continue;
            }
            let overlap = a.intersection_area(b);
            if overlap > AREA_EPS {
                issues.push(ValidationIssue {
                    category: "overlap",
                    severity: Severity::Error,
                    message: format!("{} and {} overlap by {:.6} m²", a_id, b_id, overlap),
                });
            }
        }
    }
    issues
}

/// Every element stays inside the building outline.
pub fn check_within_bounds(plan: &FloorPlan) -> Vec<ValidationIssue> {
    let bounds = plan.bounds();
    labeled_rects(plan)
        .into_iter()
        .filter(|(_, r)| !bounds.contains_rect(r, 1e-6))
        .map(|(id, r)| ValidationIssue {
            category: "bounds",
            severity: Severity::Error,
            message: format!(
                "{} at ({:.3}, {:.3}) size {:.3}×{:.3} leaves the building",
                id, r.x, r.y, r.width, r.depth
            ),
        })
        .collect()
}

/// Element areas must add up to the gross area.
///
/// Together with [`check_overlaps`] this proves the plan tiles the floor.
pub fn check_coverage(plan: &FloorPlan) -> Vec<ValidationIssue> {
    let gross = plan.width * plan.depth;
    let covered: f64 = labeled_rects(plan).iter().map(|(_, r)| r.area()).sum();
    let slack = (gross - covered).abs();

    if slack > AREA_EPS.max(gross * 1e-9) {
        vec![ValidationIssue {
            category: "coverage",
            severity: Severity::Error,
            message: format!(
                "Elements cover {:.4} m² of {:.4} m² gross",
                covered, gross
            ),
        }]
    } else {
        Vec::new()
    }
}

/// L-shaped outlines must match the unit's rectangles.
pub fn check_unit_outlines(plan: &FloorPlan) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for unit in &plan.units {
        let Some(polygon) = &unit.polygon else {
            if unit.is_l_shaped() {
                issues.push(ValidationIssue {
                    category: "outline",
                    severity: Severity::Warning,
                    message: format!("L-shaped unit {} has no outline", unit.id),
                });
            }
            continue;
        };
        let points: Vec<Point2<f64>> = polygon.iter().map(|p| Point2::new(p.x, p.y)).collect();
        let area = polygon_area(&points);
        if (area - unit.area).abs() > 1e-3 {
            issues.push(ValidationIssue {
                category: "outline",
                severity: Severity::Error,
                message: format!(
                    "Unit {} outline encloses {:.4} m² but the unit has {:.4} m²",
                    unit.id, area, unit.area
                ),
            });
        }
    }
    issues
}

/// Egress failures are reported, not rejected.
pub fn check_egress(plan: &FloorPlan) -> Vec<ValidationIssue> {
    let e = &plan.egress;
    let mut issues = Vec::new();
    let mut fail = |name: &str, value: f64| {
        issues.push(ValidationIssue {
            category: "egress",
            severity: Severity::Warning,
            message: format!("{} of {:.2} m exceeds its limit", name, value),
        });
    };
    if !e.dead_end_status.is_pass() {
        fail("Dead end", e.max_dead_end);
    }
    if !e.travel_distance_status.is_pass() {
        fail("Travel distance", e.max_travel_distance);
    }
    if !e.common_path_status.is_pass() {
        fail("Common path", e.common_path);
    }
    issues
}

/// Run every check.
pub fn validate_plan(plan: &FloorPlan, unit_types: &[UnitTypeSpec]) -> Vec<ValidationIssue> {
    let mut all = Vec::new();
    all.extend(check_no_shrink(plan, unit_types));
    all.extend(check_overlaps(plan));
    all.extend(check_within_bounds(plan));
    all.extend(check_coverage(plan));
    all.extend(check_unit_outlines(plan));
    all.extend(check_egress(plan));
    all
}

//! # Aggregation / Rollup Engine
//!
//! Turns the flat component list into per-subsystem, per-category, and
//! whole-project weight summaries, measured against the effective limit
//! (regulatory cap ÷ safety factor).
//!
//! The engine is a pure recompute-from-snapshot function: callers re-run
//! [`WeightReport::compute`] after any mutation rather than patching
//! aggregates incrementally. At tens to low hundreds of components a full
//! recompute is well under a microsecond of arithmetic.
//!
//! ## Active set
//!
//! A component contributes to totals when its subsystem is active and its
//! own status is not `removed`. Per-component total is
//! `weight_per_unit_kg × quantity` with quantity 0 treated as 1 and an
//! uncalculated weight treated as 0.
//!
//! ## Example
//!
//! ```rust
//! use track_core::project::{Project, Subsystem, Component};
//! use track_core::rollup::WeightReport;
//!
//! let mut project = Project::new("Robot", "1234", 2025);
//! let dt = project.add_subsystem(Subsystem::new("Drivetrain", "#34d399"));
//! let mut wheels = Component::new(dt, "Wheels");
//! wheels.quantity = 4;
//! wheels.weight_per_unit_kg = Some(0.35);
//! project.add_component(wheels);
//!
//! let report = WeightReport::compute(&project);
//! assert_eq!(report.project.total_weight_kg, 1.4);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::project::{Component, Project};

/// Whole-project weight summary against the effective limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWeightSummary {
    pub name: String,
    pub weight_limit_kg: f64,
    pub safety_factor: f64,

    /// `weight_limit_kg / safety_factor` — the practical design target
    pub effective_limit_kg: f64,

    pub subsystem_count: usize,
    pub component_count: usize,

    pub total_weight_kg: f64,

    /// Percent of the effective limit used. Intentionally uncapped; values
    /// over 100 are valid over-budget data, not errors.
    pub weight_used_percent: f64,

    /// May be negative when over budget — displayable, never rejected.
    pub remaining_weight_kg: f64,
}

impl ProjectWeightSummary {
    /// Fraction of the effective limit used, clamped to [0, 1] for
    /// progress-bar display. The underlying percent stays uncapped.
    pub fn clamped_fraction(&self) -> f64 {
        (self.weight_used_percent / 100.0).clamp(0.0, 1.0)
    }
}

/// Per-subsystem weight summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemWeightSummary {
    pub subsystem_id: Uuid,
    pub name: String,
    pub color: String,

    /// Soft per-subsystem target, if one was set
    pub weight_budget_kg: Option<f64>,

    pub component_count: usize,
    pub total_weight_kg: f64,

    /// Percent of the subsystem budget used; `None` when no budget is set
    /// (rendered "—", not 0%)
    pub budget_used_percent: Option<f64>,
}

/// Per-category weight summary (orthogonal to subsystem grouping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeightSummary {
    pub category_id: Uuid,
    pub category_name: String,
    pub category_slug: String,
    pub color: String,

    pub component_count: usize,

    /// Sum of effective quantities across the category's components
    pub total_units: u32,

    pub total_weight_kg: f64,
}

/// The full set of derived summaries for one project snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightReport {
    pub project: ProjectWeightSummary,
    pub subsystems: Vec<SubsystemWeightSummary>,
    pub categories: Vec<CategoryWeightSummary>,
}

impl WeightReport {
    /// Recompute every summary from the current project state.
    pub fn compute(project: &Project) -> WeightReport {
        let active_subsystems = project.active_subsystems();

        // Active components grouped once; both rollups consume the same set
        let active_components: Vec<&Component> = active_subsystems
            .iter()
            .flat_map(|s| project.components_of(s.id))
            .collect();

        let subsystems: Vec<SubsystemWeightSummary> = active_subsystems
            .iter()
            .map(|subsystem| {
                let members: Vec<&&Component> = active_components
                    .iter()
                    .filter(|c| c.subsystem_id == subsystem.id)
                    .collect();
                let total_weight_kg: f64 = members.iter().map(|c| c.total_weight_kg()).sum();

                let budget_used_percent = subsystem
                    .weight_budget_kg
                    .filter(|b| *b > 0.0)
                    .map(|budget| total_weight_kg / budget * 100.0);

                SubsystemWeightSummary {
                    subsystem_id: subsystem.id,
                    name: subsystem.name.clone(),
                    color: subsystem.color.clone(),
                    weight_budget_kg: subsystem.weight_budget_kg,
                    component_count: members.len(),
                    total_weight_kg,
                    budget_used_percent,
                }
            })
            .collect();

        let categories: Vec<CategoryWeightSummary> = project
            .categories
            .iter()
            .filter_map(|category| {
                let members: Vec<&&Component> = active_components
                    .iter()
                    .filter(|c| c.category_id == Some(category.id))
                    .collect();
                if members.is_empty() {
                    return None;
                }
                Some(CategoryWeightSummary {
                    category_id: category.id,
                    category_name: category.name.clone(),
                    category_slug: category.slug.clone(),
                    color: category.color.clone(),
                    component_count: members.len(),
                    total_units: members.iter().map(|c| c.effective_quantity()).sum(),
                    total_weight_kg: members.iter().map(|c| c.total_weight_kg()).sum(),
                })
            })
            .collect();

        let total_weight_kg: f64 = subsystems.iter().map(|s| s.total_weight_kg).sum();
        let effective_limit_kg = project.effective_limit_kg();

        let project_summary = ProjectWeightSummary {
            name: project.meta.name.clone(),
            weight_limit_kg: project.settings.weight_limit_kg,
            safety_factor: project.settings.safety_factor,
            effective_limit_kg,
            subsystem_count: subsystems.len(),
            component_count: active_components.len(),
            total_weight_kg,
            weight_used_percent: total_weight_kg / effective_limit_kg * 100.0,
            remaining_weight_kg: effective_limit_kg - total_weight_kg,
        };

        WeightReport {
            project: project_summary,
            subsystems,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{ComponentStatus, Subsystem};
    use uuid::Uuid;

    fn component(subsystem_id: Uuid, weight: f64, qty: u32) -> Component {
        let mut c = Component::new(subsystem_id, "part");
        c.weight_per_unit_kg = Some(weight);
        c.quantity = qty;
        c
    }

    #[test]
    fn test_subsystem_total_and_budget_percent() {
        let mut project = Project::new("Robot", "1234", 2025);
        let id = project.add_subsystem(Subsystem::new("Arm", "#a78bfa").with_budget(5.0));
        project.add_component(component(id, 0.5, 3));
        project.add_component(component(id, 1.2, 1));

        let report = WeightReport::compute(&project);
        let arm = &report.subsystems[0];
        assert!((arm.total_weight_kg - 2.7).abs() < 1e-12);
        assert!((arm.budget_used_percent.unwrap() - 54.0).abs() < 1e-9);
        assert_eq!(arm.component_count, 2);
    }

    #[test]
    fn test_no_budget_is_none_not_zero() {
        let mut project = Project::new("Robot", "1234", 2025);
        let id = project.add_subsystem(Subsystem::new("Intake", "#f87171"));
        project.add_component(component(id, 1.0, 1));

        let report = WeightReport::compute(&project);
        assert_eq!(report.subsystems[0].budget_used_percent, None);
    }

    #[test]
    fn test_effective_limit_and_remaining() {
        let mut project = Project::new("Robot", "1234", 2025);
        project.settings.weight_limit_kg = 56.699;
        project.settings.safety_factor = 1.10;
        let id = project.add_subsystem(Subsystem::new("Chassis", "#34d399"));
        project.add_component(component(id, 40.0, 1));

        let report = WeightReport::compute(&project);
        assert!((report.project.effective_limit_kg - 51.5445454545).abs() < 1e-6);
        assert!((report.project.remaining_weight_kg - 11.5445454545).abs() < 1e-6);
        assert!(report.project.weight_used_percent < 100.0);
    }

    #[test]
    fn test_over_budget_is_valid_data() {
        let mut project = Project::new("Robot", "1234", 2025);
        project.settings.weight_limit_kg = 56.699;
        project.settings.safety_factor = 1.10;
        let id = project.add_subsystem(Subsystem::new("Chassis", "#34d399"));
        project.add_component(component(id, 60.0, 1));

        let report = WeightReport::compute(&project);
        assert!(report.project.remaining_weight_kg < 0.0);
        assert!(report.project.weight_used_percent > 100.0);
        // Progress-bar fraction clamps even though the percent does not
        assert_eq!(report.project.clamped_fraction(), 1.0);
    }

    #[test]
    fn test_removed_components_excluded() {
        let mut project = Project::new("Robot", "1234", 2025);
        let id = project.add_subsystem(Subsystem::new("Arm", "#a78bfa"));
        project.add_component(component(id, 1.0, 1));
        let mut dropped = component(id, 99.0, 1);
        dropped.status = ComponentStatus::Removed;
        project.add_component(dropped);

        let report = WeightReport::compute(&project);
        assert_eq!(report.project.component_count, 1);
        assert!((report.project.total_weight_kg - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inactive_subsystem_excluded() {
        let mut project = Project::new("Robot", "1234", 2025);
        let keep = project.add_subsystem(Subsystem::new("Keep", "#34d399"));
        let scrapped = project.add_subsystem(Subsystem::new("Scrapped", "#f87171"));
        project.add_component(component(keep, 2.0, 1));
        project.add_component(component(scrapped, 50.0, 1));
        project.deactivate_subsystem(scrapped).unwrap();

        let report = WeightReport::compute(&project);
        assert_eq!(report.project.subsystem_count, 1);
        assert!((report.project.total_weight_kg - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_quantity_zero_counts_as_one() {
        let mut project = Project::new("Robot", "1234", 2025);
        let id = project.add_subsystem(Subsystem::new("Arm", "#a78bfa"));
        project.add_component(component(id, 2.5, 0));

        let report = WeightReport::compute(&project);
        assert!((report.project.total_weight_kg - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_category_rollup_orthogonal_to_subsystems() {
        let mut project = Project::new("Robot", "1234", 2025);
        let a = project.add_subsystem(Subsystem::new("A", "#34d399"));
        let b = project.add_subsystem(Subsystem::new("B", "#60a5fa"));
        let structure = project.category_by_slug("structure").unwrap().id;
        let electronics = project.category_by_slug("electronics").unwrap().id;

        let mut c1 = component(a, 1.0, 2);
        c1.category_id = Some(structure);
        let mut c2 = component(b, 0.5, 4);
        c2.category_id = Some(structure);
        let mut c3 = component(a, 0.3, 1);
        c3.category_id = Some(electronics);
        // No category: in subsystem totals, absent from category rollup
        let c4 = component(b, 0.2, 1);
        project.add_component(c1);
        project.add_component(c2);
        project.add_component(c3);
        project.add_component(c4);

        let report = WeightReport::compute(&project);

        let structure_row = report
            .categories
            .iter()
            .find(|c| c.category_slug == "structure")
            .unwrap();
        assert_eq!(structure_row.component_count, 2);
        assert_eq!(structure_row.total_units, 6);
        assert!((structure_row.total_weight_kg - 4.0).abs() < 1e-12);

        let total_categorized: f64 = report.categories.iter().map(|c| c.total_weight_kg).sum();
        // Project total still includes the uncategorized component
        assert!((report.project.total_weight_kg - (total_categorized + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_report_serialization() {
        let mut project = Project::new("Robot", "1234", 2025);
        let id = project.add_subsystem(Subsystem::new("Arm", "#a78bfa"));
        project.add_component(component(id, 1.0, 2));

        let report = WeightReport::compute(&project);
        let json = serde_json::to_string(&report).unwrap();
        let roundtrip: WeightReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, roundtrip);
    }
}

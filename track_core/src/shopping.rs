//! # Shopping & Inventory Reconciliation
//!
//! Cross-references fastener usage against the catalog and on-hand stock to
//! answer "what do we still need to buy", and projects per-component
//! inventory lines for the ordering view.
//!
//! Like the rollup engine, both views are pure recomputations over the
//! current project snapshot.
//!
//! ## Example
//!
//! ```rust
//! use track_core::project::{Project, Subsystem, Component};
//! use track_core::shopping::shopping_list;
//!
//! let mut project = Project::new("Robot", "1234", 2025);
//! let dt = project.add_subsystem(Subsystem::new("Drivetrain", "#34d399"));
//! let fastener_id = project.fasteners[0].id;
//!
//! let mut bolts = Component::new(dt, "Frame bolts");
//! bolts.fastener_id = Some(fastener_id);
//! bolts.quantity = 10;
//! project.add_component(bolts);
//! project.set_fastener_stock(fastener_id, 4);
//!
//! let list = shopping_list(&project);
//! assert_eq!(list[0].to_purchase, 6);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::project::Project;

/// One fastener line on the project-wide shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastenerShoppingItem {
    pub fastener_id: Uuid,
    pub fastener_name: String,
    pub thread_size: String,
    pub length_mm: f64,
    pub head_type: Option<String>,
    pub material: Option<String>,
    pub supplier: Option<String>,
    pub part_number: Option<String>,

    /// Unit cost in dollars; `None` means unknown, not free
    pub unit_cost: Option<f64>,
    pub purchase_url: Option<String>,

    /// Supplier pack size, surfaced for purchasing UIs; `to_purchase` is the
    /// raw shortfall and is NOT rounded up to this multiple
    pub min_purchase_qty: u32,

    /// Sum of component quantities referencing this fastener
    pub total_needed: u32,

    /// On-hand count for this catalog entry
    pub total_in_stock: u32,

    /// `max(total_needed - total_in_stock, 0)` — never negative
    pub to_purchase: u32,

    /// `to_purchase × unit_cost`; `None` when the cost is unknown
    pub estimated_cost: Option<f64>,
}

/// One component line in the per-subsystem inventory view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub subsystem_id: Uuid,
    pub subsystem_name: String,
    pub component_id: Uuid,
    pub component_name: String,
    pub category_name: Option<String>,

    pub quantity_needed: u32,
    pub stock_quantity: u32,
    pub in_stock: bool,
    pub status: String,

    pub part_number: Option<String>,
    pub supplier: Option<String>,

    /// Unit cost in dollars; `None` means unknown, not free
    pub unit_cost: Option<f64>,

    /// `quantity_needed × unit_cost`; `None` when the cost is unknown
    pub total_cost: Option<f64>,
}

/// Build the project-wide fastener shopping list.
///
/// One line per distinct fastener catalog entry referenced by at least one
/// active component in an active subsystem, in catalog order.
pub fn shopping_list(project: &Project) -> Vec<FastenerShoppingItem> {
    let mut items = Vec::new();

    for fastener in &project.fasteners {
        let total_needed: u32 = project
            .active_subsystems()
            .iter()
            .flat_map(|s| project.components_of(s.id))
            .filter(|c| c.fastener_id == Some(fastener.id))
            .map(|c| c.effective_quantity())
            .sum();

        if total_needed == 0 {
            continue;
        }

        let total_in_stock = project.fastener_stock(fastener.id);
        let to_purchase = total_needed.saturating_sub(total_in_stock);
        let estimated_cost = fastener.unit_cost.map(|cost| f64::from(to_purchase) * cost);

        items.push(FastenerShoppingItem {
            fastener_id: fastener.id,
            fastener_name: fastener.name.clone(),
            thread_size: fastener.thread_size.clone(),
            length_mm: fastener.length_mm,
            head_type: fastener.head_type.clone(),
            material: fastener.material.clone(),
            supplier: fastener.supplier.clone(),
            part_number: fastener.part_number.clone(),
            unit_cost: fastener.unit_cost,
            purchase_url: fastener.purchase_url.clone(),
            min_purchase_qty: fastener.min_purchase_qty,
            total_needed,
            total_in_stock,
            to_purchase,
            estimated_cost,
        });
    }

    items
}

/// Project the per-subsystem inventory view.
///
/// A straight per-component projection (no aggregation across subsystems):
/// one line per active component in each active subsystem, in display order.
pub fn inventory(project: &Project) -> Vec<InventoryItem> {
    let mut items = Vec::new();

    for subsystem in project.active_subsystems() {
        for component in project.components_of(subsystem.id) {
            let category_name = component
                .category_id
                .and_then(|id| project.category(id))
                .map(|c| c.name.clone());
            let quantity_needed = component.effective_quantity();
            let total_cost = component
                .unit_cost
                .map(|cost| f64::from(quantity_needed) * cost);

            items.push(InventoryItem {
                subsystem_id: subsystem.id,
                subsystem_name: subsystem.name.clone(),
                component_id: component.id,
                component_name: component.name.clone(),
                category_name,
                quantity_needed,
                stock_quantity: component.stock_quantity,
                in_stock: component.in_stock,
                status: component.status.display_name().to_string(),
                part_number: component.part_number.clone(),
                supplier: component.supplier.clone(),
                unit_cost: component.unit_cost,
                total_cost,
            });
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Component, ComponentStatus, Subsystem};

    fn fastener_usage(project: &mut Project, subsystem: Uuid, fastener: Uuid, qty: u32) -> Uuid {
        let mut c = Component::new(subsystem, "bolts");
        c.fastener_id = Some(fastener);
        c.quantity = qty;
        c.weight_per_unit_kg = Some(0.002);
        project.add_component(c)
    }

    #[test]
    fn test_needed_summed_across_subsystems() {
        let mut project = Project::new("Robot", "1234", 2025);
        let a = project.add_subsystem(Subsystem::new("A", "#34d399"));
        let b = project.add_subsystem(Subsystem::new("B", "#60a5fa"));
        let fastener = project.fasteners[0].id;

        fastener_usage(&mut project, a, fastener, 10);
        fastener_usage(&mut project, b, fastener, 7);
        project.set_fastener_stock(fastener, 12);

        let list = shopping_list(&project);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].total_needed, 17);
        assert_eq!(list[0].total_in_stock, 12);
        assert_eq!(list[0].to_purchase, 5);
    }

    #[test]
    fn test_to_purchase_never_negative() {
        let mut project = Project::new("Robot", "1234", 2025);
        let a = project.add_subsystem(Subsystem::new("A", "#34d399"));
        let fastener = project.fasteners[0].id;

        fastener_usage(&mut project, a, fastener, 5);
        project.set_fastener_stock(fastener, 20);

        let list = shopping_list(&project);
        assert_eq!(list[0].to_purchase, 0);
        // Cost of buying nothing is a known zero, not unknown
        assert_eq!(list[0].estimated_cost, Some(0.0));
    }

    #[test]
    fn test_unknown_cost_stays_unknown() {
        let mut project = Project::new("Robot", "1234", 2025);
        let a = project.add_subsystem(Subsystem::new("A", "#34d399"));
        let fastener_id = project.fasteners[0].id;
        // Strip the price from the catalog entry
        if let Some(f) = project.fasteners.iter_mut().find(|f| f.id == fastener_id) {
            f.unit_cost = None;
        }

        fastener_usage(&mut project, a, fastener_id, 8);
        let list = shopping_list(&project);
        assert_eq!(list[0].to_purchase, 8);
        assert_eq!(list[0].estimated_cost, None);
    }

    #[test]
    fn test_unreferenced_fasteners_not_listed() {
        let mut project = Project::new("Robot", "1234", 2025);
        project.add_subsystem(Subsystem::new("A", "#34d399"));
        assert!(shopping_list(&project).is_empty());
    }

    #[test]
    fn test_removed_and_inactive_usage_excluded() {
        let mut project = Project::new("Robot", "1234", 2025);
        let a = project.add_subsystem(Subsystem::new("A", "#34d399"));
        let gone = project.add_subsystem(Subsystem::new("Gone", "#f87171"));
        let fastener = project.fasteners[0].id;

        fastener_usage(&mut project, a, fastener, 4);
        let removed_id = fastener_usage(&mut project, a, fastener, 100);
        project.get_component_mut(&removed_id).unwrap().status = ComponentStatus::Removed;
        fastener_usage(&mut project, gone, fastener, 100);
        project.deactivate_subsystem(gone).unwrap();

        let list = shopping_list(&project);
        assert_eq!(list[0].total_needed, 4);
    }

    #[test]
    fn test_inventory_projection() {
        let mut project = Project::new("Robot", "1234", 2025);
        let a = project.add_subsystem(Subsystem::new("Arm", "#a78bfa"));
        let electronics = project.category_by_slug("electronics").unwrap().id;

        let mut motor = Component::new(a, "Motor");
        motor.category_id = Some(electronics);
        motor.quantity = 2;
        motor.unit_cost = Some(42.5);
        motor.stock_quantity = 1;
        motor.in_stock = true;
        motor.status = ComponentStatus::Ordered;
        project.add_component(motor);

        let mut bracket = Component::new(a, "Bracket");
        bracket.quantity = 1;
        project.add_component(bracket);

        let items = inventory(&project);
        assert_eq!(items.len(), 2);

        let motor_line = items.iter().find(|i| i.component_name == "Motor").unwrap();
        assert_eq!(motor_line.quantity_needed, 2);
        assert_eq!(motor_line.total_cost, Some(85.0));
        assert_eq!(motor_line.category_name.as_deref(), Some("Electronics"));
        assert_eq!(motor_line.status, "Ordered");

        let bracket_line = items.iter().find(|i| i.component_name == "Bracket").unwrap();
        assert_eq!(bracket_line.total_cost, None);
        assert_eq!(bracket_line.category_name, None);
    }
}

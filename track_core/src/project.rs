//! # Project Data Structures
//!
//! The `Project` struct is the root container for a season's weight budget:
//! settings, subsystems, the parts catalog in use, and every component.
//! Projects serialize to `.bst` (Ballast) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, name, team, season, timestamps)
//! ├── settings: ProjectSettings (weight limit, safety factor, display units)
//! ├── subsystems: Vec<Subsystem>
//! ├── categories: Vec<ComponentCategory>
//! ├── materials / profiles / fasteners (catalog in use, globals + custom)
//! ├── components: HashMap<Uuid, Component>
//! └── fastener_stock: HashMap<Uuid, u32> (on-hand counts per catalog entry)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use track_core::project::{Project, Subsystem, Component};
//!
//! let mut project = Project::new("2025 Robot", "1234", 2025);
//! let drivetrain = project.add_subsystem(Subsystem::new("Drivetrain", "#34d399"));
//!
//! let mut motor = Component::new(drivetrain, "Drive Motor");
//! motor.quantity = 4;
//! motor.weight_per_unit_kg = Some(0.43);
//! project.add_component(motor);
//!
//! assert_eq!(project.component_count(), 1);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{
    builtin_fasteners, builtin_materials, builtin_profiles, CatalogEntry, Fastener, Material,
    ProfileType,
};
use crate::errors::{TrackError, TrackResult};
use crate::units::UnitSystem;
use crate::weight::{component_weight, Properties};

/// Current schema version for .bst files
pub const SCHEMA_VERSION: &str = "0.1.0";

// ============================================================================
// Metadata & Settings
// ============================================================================

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project name (e.g., "2025 Robot")
    pub name: String,

    /// Competition team number
    pub team_number: Option<String>,

    /// Season year this budget belongs to
    pub season_year: i32,

    /// Projects are never hard-deleted; old seasons get archived
    pub is_archived: bool,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Weight budget and display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Regulatory weight cap in kg
    pub weight_limit_kg: f64,

    /// Design margin divisor, >= 1. The practical target is
    /// `weight_limit_kg / safety_factor`.
    pub safety_factor: f64,

    /// Preferred display units (storage stays metric regardless)
    pub unit_system: UnitSystem,

    /// Append the alternate unit system to formatted weights
    pub show_dual_units: bool,
}

impl ProjectSettings {
    /// The practical design target: regulatory limit divided by the
    /// safety factor.
    pub fn effective_limit_kg(&self) -> f64 {
        self.weight_limit_kg / self.safety_factor
    }

    /// Validate settings invariants.
    pub fn validate(&self) -> TrackResult<()> {
        if !(self.weight_limit_kg > 0.0) {
            return Err(TrackError::invalid_input(
                "weight_limit_kg",
                self.weight_limit_kg.to_string(),
                "Weight limit must be positive",
            ));
        }
        if !(self.safety_factor >= 1.0) {
            return Err(TrackError::invalid_input(
                "safety_factor",
                self.safety_factor.to_string(),
                "Safety factor must be >= 1",
            ));
        }
        Ok(())
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        // 125 lb robot limit with a 10% design margin
        ProjectSettings {
            weight_limit_kg: 56.699,
            safety_factor: 1.10,
            unit_system: UnitSystem::Metric,
            show_dual_units: false,
        }
    }
}

// ============================================================================
// Subsystems & Categories
// ============================================================================

/// A named grouping of components (drivetrain, arm, intake, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subsystem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// UI accent color (hex), not semantically load-bearing
    pub color: String,
    pub icon: Option<String>,

    /// Ordered display position
    pub display_order: u32,

    /// Soft per-subsystem target, independent of the project-wide hard limit
    pub weight_budget_kg: Option<f64>,

    /// Soft-delete flag; inactive subsystems drop out of every rollup
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subsystem {
    /// Create a new active subsystem.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Subsystem {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            color: color.into(),
            icon: None,
            display_order: 0,
            weight_budget_kg: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the soft weight budget.
    pub fn with_budget(mut self, budget_kg: f64) -> Self {
        self.weight_budget_kg = Some(budget_kg);
        self
    }
}

/// An orthogonal component grouping (structure, electronics, hardware, ...).
///
/// A component belongs to one subsystem and, independently, one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Stable machine-friendly identifier ("structure", "electronics", ...)
    pub slug: String,

    pub icon: Option<String>,
    pub color: String,
    pub display_order: u32,

    /// Seeded system category (as opposed to user-created)
    pub is_system: bool,

    /// Whether components in this category may carry a manually entered weight
    pub allows_custom_weight: bool,

    pub created_at: DateTime<Utc>,
}

impl ComponentCategory {
    fn system(id: u128, name: &str, slug: &str, color: &str, display_order: u32) -> Self {
        ComponentCategory {
            id: Uuid::from_u128(id),
            name: name.to_string(),
            description: None,
            slug: slug.to_string(),
            icon: None,
            color: color.to_string(),
            display_order,
            is_system: true,
            allows_custom_weight: slug != "structure",
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// The seeded system categories every new project starts with.
pub fn default_categories() -> Vec<ComponentCategory> {
    vec![
        ComponentCategory::system(0xca70_0001, "Structure", "structure", "#34d399", 1),
        ComponentCategory::system(0xca70_0002, "Electronics", "electronics", "#60a5fa", 2),
        ComponentCategory::system(0xca70_0003, "Fasteners", "fasteners", "#fbbf24", 3),
        ComponentCategory::system(0xca70_0004, "Pneumatics", "pneumatics", "#a78bfa", 4),
        ComponentCategory::system(0xca70_0005, "COTS", "cots", "#f87171", 5),
        ComponentCategory::system(0xca70_0006, "Custom", "custom", "#fb923c", 6),
    ]
}

// ============================================================================
// Components
// ============================================================================

/// Procurement/build status of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    #[default]
    Planned,
    Ordered,
    Received,
    Installed,
    Removed,
}

impl ComponentStatus {
    /// All statuses for UI selection
    pub const ALL: [ComponentStatus; 5] = [
        ComponentStatus::Planned,
        ComponentStatus::Ordered,
        ComponentStatus::Received,
        ComponentStatus::Installed,
        ComponentStatus::Removed,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentStatus::Planned => "Planned",
            ComponentStatus::Ordered => "Ordered",
            ComponentStatus::Received => "Received",
            ComponentStatus::Installed => "Installed",
            ComponentStatus::Removed => "Removed",
        }
    }
}

/// A single tracked part belonging to exactly one subsystem.
///
/// References at most one of {profile + material, fastener}, or neither for
/// COTS/custom parts with a manually entered weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub subsystem_id: Uuid,
    pub category_id: Option<Uuid>,

    /// Shape recipe for calculated weights
    pub profile_type_id: Option<Uuid>,
    /// Density source for calculated weights
    pub material_id: Option<Uuid>,
    /// Catalog fastener reference (fixed per-unit weight)
    pub fastener_id: Option<Uuid>,

    pub name: String,
    pub description: Option<String>,

    /// Positive count; 0 is treated as 1 in every rollup
    pub quantity: u32,

    /// Canonical per-unit mass in kg; `None` while not yet calculable
    pub weight_per_unit_kg: Option<f64>,

    /// Provenance: true if the weight came from the calculator, false if it
    /// was entered by hand (manual weight is authoritative)
    pub is_weight_calculated: bool,

    /// Named numeric inputs consumed by the weight calculator
    pub properties: Properties,

    pub part_number: Option<String>,
    pub supplier: Option<String>,

    /// Unit cost in dollars; `None` means unknown, not free
    pub unit_cost: Option<f64>,
    pub purchase_url: Option<String>,

    pub in_stock: bool,
    pub stock_quantity: u32,

    pub notes: Option<String>,
    pub status: ComponentStatus,
    pub display_order: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Component {
    /// Create a new planned component with quantity 1.
    pub fn new(subsystem_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Component {
            id: Uuid::new_v4(),
            subsystem_id,
            category_id: None,
            profile_type_id: None,
            material_id: None,
            fastener_id: None,
            name: name.into(),
            description: None,
            quantity: 1,
            weight_per_unit_kg: None,
            is_weight_calculated: false,
            properties: Properties::new(),
            part_number: None,
            supplier: None,
            unit_cost: None,
            purchase_url: None,
            in_stock: false,
            stock_quantity: 0,
            notes: None,
            status: ComponentStatus::Planned,
            display_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate reference invariants: a component calculates from a
    /// profile/material pair or points at a catalog fastener, never both.
    pub fn validate(&self) -> TrackResult<()> {
        if let (Some(_), Some(fastener)) = (self.profile_type_id, self.fastener_id) {
            return Err(TrackError::invalid_input(
                "fastener_id",
                fastener.to_string(),
                "A component references either a profile or a fastener, not both",
            ));
        }
        Ok(())
    }

    /// Counted in rollups unless marked removed.
    pub fn is_active(&self) -> bool {
        self.status != ComponentStatus::Removed
    }

    /// Quantity used in totals: 0 counts as 1, never skipped.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }

    /// Total mass contribution in kg (uncalculated weight counts as 0).
    pub fn total_weight_kg(&self) -> f64 {
        self.weight_per_unit_kg.unwrap_or(0.0) * f64::from(self.effective_quantity())
    }

    /// Re-derive the calculated weight from a profile/material pair.
    ///
    /// Callers invoke this whenever the profile, material, or any property
    /// changes. A `None` result is kept as-is ("cannot calculate yet").
    pub fn recalculate_weight(&mut self, profile: &ProfileType, material: Option<&Material>) {
        self.weight_per_unit_kg = component_weight(profile, material, &self.properties);
        self.is_weight_calculated = true;
        self.updated_at = Utc::now();
    }

    /// Record a manually measured weight, overriding any calculated value.
    pub fn set_manual_weight(&mut self, kg: f64) {
        self.weight_per_unit_kg = Some(kg);
        self.is_weight_calculated = false;
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// Project Root
// ============================================================================

/// Root project container.
///
/// This is the top-level struct that gets serialized to `.bst` files.
/// Components are stored in a flat UUID-keyed map for O(1) lookups; the
/// catalog collections hold both the built-in globals and any project
/// customizations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, name, team, season)
    pub meta: ProjectMetadata,

    /// Weight budget and display settings
    pub settings: ProjectSettings,

    /// Named component groupings, in display order
    pub subsystems: Vec<Subsystem>,

    /// Orthogonal category groupings
    pub categories: Vec<ComponentCategory>,

    /// Materials catalog in use (globals + project customs)
    pub materials: Vec<Material>,

    /// Profile type catalog in use
    pub profiles: Vec<ProfileType>,

    /// Fastener catalog in use
    pub fasteners: Vec<Fastener>,

    /// All components, keyed by UUID
    pub components: HashMap<Uuid, Component>,

    /// On-hand stock per fastener catalog entry (for shopping reconciliation)
    pub fastener_stock: HashMap<Uuid, u32>,
}

impl Project {
    /// Create a new project seeded with the built-in catalogs and the
    /// default system categories.
    pub fn new(name: impl Into<String>, team_number: impl Into<String>, season_year: i32) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                team_number: Some(team_number.into()),
                season_year,
                is_archived: false,
                created: now,
                modified: now,
            },
            settings: ProjectSettings::default(),
            subsystems: Vec::new(),
            categories: default_categories(),
            materials: builtin_materials().to_vec(),
            profiles: builtin_profiles().to_vec(),
            fasteners: builtin_fasteners().to_vec(),
            components: HashMap::new(),
            fastener_stock: HashMap::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// The practical design target in kg.
    pub fn effective_limit_kg(&self) -> f64 {
        self.settings.effective_limit_kg()
    }

    /// Validate settings and catalog invariants.
    pub fn validate(&self) -> TrackResult<()> {
        self.settings.validate()?;
        for material in &self.materials {
            material.validate()?;
        }
        for fastener in &self.fasteners {
            fastener.validate()?;
        }
        for component in self.components.values() {
            component.validate()?;
        }
        Ok(())
    }

    /// Mark the project archived (end of season). Never deleted.
    pub fn archive(&mut self) {
        self.meta.is_archived = true;
        self.touch();
    }

    // ------------------------------------------------------------------
    // Subsystems
    // ------------------------------------------------------------------

    /// Add a subsystem, assigning it the next display position.
    ///
    /// Returns the subsystem's id.
    pub fn add_subsystem(&mut self, mut subsystem: Subsystem) -> Uuid {
        subsystem.display_order = self.subsystems.len() as u32 + 1;
        let id = subsystem.id;
        self.subsystems.push(subsystem);
        self.touch();
        id
    }

    /// Soft-delete a subsystem. Its components stay on file but drop out of
    /// every rollup, shopping, and inventory view.
    pub fn deactivate_subsystem(&mut self, id: Uuid) -> TrackResult<()> {
        let subsystem = self
            .subsystems
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| TrackError::catalog_entry_not_found("Subsystem", id.to_string()))?;
        subsystem.is_active = false;
        subsystem.updated_at = Utc::now();
        self.touch();
        Ok(())
    }

    /// Get a subsystem by id.
    pub fn subsystem(&self, id: Uuid) -> Option<&Subsystem> {
        self.subsystems.iter().find(|s| s.id == id)
    }

    /// Active subsystems in display order.
    pub fn active_subsystems(&self) -> Vec<&Subsystem> {
        let mut active: Vec<&Subsystem> = self.subsystems.iter().filter(|s| s.is_active).collect();
        active.sort_by_key(|s| s.display_order);
        active
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    /// Add a component to the project.
    ///
    /// Returns the UUID assigned to the component.
    pub fn add_component(&mut self, component: Component) -> Uuid {
        let id = component.id;
        self.components.insert(id, component);
        self.touch();
        id
    }

    /// Remove a component by UUID. Returns the removed component if it existed.
    pub fn remove_component(&mut self, id: &Uuid) -> Option<Component> {
        let component = self.components.remove(id);
        if component.is_some() {
            self.touch();
        }
        component
    }

    /// Get a component by UUID.
    pub fn get_component(&self, id: &Uuid) -> Option<&Component> {
        self.components.get(id)
    }

    /// Get a mutable reference to a component by UUID.
    ///
    /// Note: marks the project modified when the component exists. After
    /// mutating a component, re-derive dependent aggregates via
    /// [`crate::rollup::WeightReport::compute`].
    pub fn get_component_mut(&mut self, id: &Uuid) -> Option<&mut Component> {
        if self.components.contains_key(id) {
            self.meta.modified = Utc::now();
            self.components.get_mut(id)
        } else {
            None
        }
    }

    /// Number of components on file (including removed ones).
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Active components of one subsystem, in display order.
    pub fn components_of(&self, subsystem_id: Uuid) -> Vec<&Component> {
        let mut list: Vec<&Component> = self
            .components
            .values()
            .filter(|c| c.subsystem_id == subsystem_id && c.is_active())
            .collect();
        list.sort_by_key(|c| c.display_order);
        list
    }

    /// Re-derive a component's calculated weight from its current profile,
    /// material, and properties. Components without a profile reference are
    /// left untouched (their weight is manual or fastener-derived).
    pub fn recalculate_component(&mut self, id: &Uuid) -> TrackResult<()> {
        let component = self
            .components
            .get(id)
            .ok_or_else(|| TrackError::catalog_entry_not_found("Component", id.to_string()))?;

        let profile_id = match component.profile_type_id {
            Some(pid) => pid,
            None => return Ok(()),
        };
        let profile = self
            .profiles
            .iter()
            .find(|p| p.id == profile_id)
            .cloned()
            .ok_or_else(|| {
                TrackError::catalog_entry_not_found("ProfileType", profile_id.to_string())
            })?;
        let material = component
            .material_id
            .and_then(|mid| self.materials.iter().find(|m| m.id == mid))
            .cloned();

        let component = self.components.get_mut(id).expect("checked above");
        component.recalculate_weight(&profile, material.as_ref());
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Get a material by id.
    pub fn material(&self, id: Uuid) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    /// Get a profile type by id.
    pub fn profile(&self, id: Uuid) -> Option<&ProfileType> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Get a fastener by id.
    pub fn fastener(&self, id: Uuid) -> Option<&Fastener> {
        self.fasteners.iter().find(|f| f.id == id)
    }

    /// Get a category by id.
    pub fn category(&self, id: Uuid) -> Option<&ComponentCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Find a category by slug (e.g., "fasteners").
    pub fn category_by_slug(&self, slug: &str) -> Option<&ComponentCategory> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Edit a material, forking global entries.
    ///
    /// Custom entries are edited in place. Global entries are never mutated:
    /// a project-scoped copy is created, the edit is applied to the copy, and
    /// the copy's (new) id is returned. Callers should re-point component
    /// references at the returned id.
    pub fn edit_material(
        &mut self,
        id: Uuid,
        edit: impl FnOnce(&mut Material),
    ) -> TrackResult<Uuid> {
        let index = self
            .materials
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| TrackError::catalog_entry_not_found("Material", id.to_string()))?;

        if self.materials[index].is_global {
            let project_id = Uuid::nil(); // single-project container
            let mut copy = self.materials[index].customize(project_id);
            edit(&mut copy);
            copy.validate()?;
            let new_id = copy.id;
            self.materials.push(copy);
            self.touch();
            Ok(new_id)
        } else {
            edit(&mut self.materials[index]);
            self.materials[index].updated_at = Utc::now();
            self.materials[index].validate()?;
            self.touch();
            Ok(id)
        }
    }

    // ------------------------------------------------------------------
    // Fastener stock
    // ------------------------------------------------------------------

    /// Record the on-hand count for a fastener catalog entry.
    pub fn set_fastener_stock(&mut self, fastener_id: Uuid, quantity: u32) {
        self.fastener_stock.insert(fastener_id, quantity);
        self.touch();
    }

    /// On-hand count for a fastener catalog entry (0 if untracked).
    pub fn fastener_stock(&self, fastener_id: Uuid) -> u32 {
        self.fastener_stock.get(&fastener_id).copied().unwrap_or(0)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", 0)
    }
}

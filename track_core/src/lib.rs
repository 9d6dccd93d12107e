//! # track_core - Robot Weight Budget Engine
//!
//! `track_core` is the computational heart of Ballast, a weight budget tracker
//! for competitive robotics. It models a season's robot as subsystems and
//! components, calculates component weights from material and profile data,
//! and rolls everything up against the competition weight limit. All types are
//! JSON-serializable, so the same engine backs file storage, CLIs, and UIs.
//!
//! ## Design Philosophy
//!
//! - **Derived, never stored**: Rollups, shopping lists, and inventory views
//!   are recomputed from the project snapshot on demand
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Canonical metric**: Weights in kg, lengths in mm, densities in kg/m³;
//!   imperial is a display conversion only
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use track_core::project::{Project, Subsystem, Component};
//! use track_core::rollup::WeightReport;
//!
//! let mut project = Project::new("2025 Robot", "1234", 2025);
//! let dt = project.add_subsystem(Subsystem::new("Drivetrain", "#34d399"));
//!
//! let mut gearbox = Component::new(dt, "Gearbox");
//! gearbox.weight_per_unit_kg = Some(1.2);
//! gearbox.quantity = 2;
//! project.add_component(gearbox);
//!
//! let report = WeightReport::compute(&project);
//! assert_eq!(report.project.total_weight_kg, 2.4);
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, subsystems, components, settings
//! - [`catalog`] - Materials, profile types, and fasteners (global + custom)
//! - [`weight`] - The per-unit weight calculator
//! - [`rollup`] - Project/subsystem/category weight summaries
//! - [`shopping`] - Fastener shopping list and inventory reconciliation
//! - [`units`] - Type-safe unit wrappers and display formatting
//! - [`errors`] - Structured error types
//! - [`file_io`] - `.bst` persistence: atomic saves, locked editing sessions

pub mod catalog;
pub mod errors;
pub mod file_io;
pub mod project;
pub mod rollup;
pub mod shopping;
pub mod units;
pub mod weight;

// Re-export commonly used types at crate root for convenience
pub use errors::{TrackError, TrackResult};
pub use file_io::{load_project, save_project, ProjectStore};
pub use project::{Component, Project, ProjectMetadata, ProjectSettings, Subsystem};
pub use rollup::WeightReport;
pub use shopping::{inventory, shopping_list};
pub use weight::calculate_weight;

//! # Parts Catalog
//!
//! Shared catalog entries used when building components: materials (density
//! sources), profile types (shape calculation recipes), and fasteners
//! (fixed-weight hardware).
//!
//! ## Global vs. Custom Entries
//!
//! Every catalog type carries an `is_global` flag. Global entries are the
//! shared built-in catalog and are never mutated in place: editing one forks
//! a project-scoped copy via [`CatalogEntry::customize`], leaving the global
//! original untouched. Project-scoped entries (`project_id` set) are freely
//! editable.
//!
//! ## Example
//!
//! ```rust
//! use track_core::catalog::{CatalogEntry, builtin_materials};
//! use uuid::Uuid;
//!
//! let aluminum = &builtin_materials()[0];
//! assert!(aluminum.is_global);
//! assert!(aluminum.ensure_editable().is_err());
//!
//! // Editing a global entry goes through a fork
//! let project_id = Uuid::new_v4();
//! let mut mine = aluminum.customize(project_id);
//! assert!(mine.ensure_editable().is_ok());
//! mine.density_kg_m3 = 2810.0; // 7075 instead of 6061
//! ```

pub mod fastener;
pub mod material;
pub mod profile;

pub use fastener::{Fastener, ThreadStandard};
pub use material::{Material, MaterialCategory};
pub use profile::{CalculationMethod, InputSchema, ProfileInput, ProfileType, UnitHint};

use crate::errors::{TrackError, TrackResult};
use uuid::Uuid;

/// Common behavior for catalog entries (materials, profiles, fasteners).
///
/// The key contract is `customize`: global entries are immutable templates,
/// and any edit must go through a project-scoped fork.
pub trait CatalogEntry: Sized {
    /// Catalog kind for error messages ("Material", "ProfileType", "Fastener")
    const KIND: &'static str;

    /// The entry's display name
    fn entry_name(&self) -> &str;

    /// Whether this is a shared global (read-only) entry
    fn is_global_entry(&self) -> bool;

    /// Create a project-scoped editable copy of this entry.
    ///
    /// The copy gets a fresh id, `is_global = false`, and `project_id` set.
    fn customize(&self, project_id: Uuid) -> Self;

    /// Guard for in-place edits: errors on global entries.
    fn ensure_editable(&self) -> TrackResult<()> {
        if self.is_global_entry() {
            Err(TrackError::global_entry_immutable(
                Self::KIND,
                self.entry_name(),
            ))
        } else {
            Ok(())
        }
    }
}

/// The built-in global material catalog
pub fn builtin_materials() -> &'static [Material] {
    &material::BUILTIN_MATERIALS
}

/// The built-in global profile type catalog
pub fn builtin_profiles() -> &'static [ProfileType] {
    &profile::BUILTIN_PROFILES
}

/// The built-in global fastener catalog
pub fn builtin_fasteners() -> &'static [Fastener] {
    &fastener::BUILTIN_FASTENERS
}

//! Materials Catalog
//!
//! A material contributes exactly one number to the weight math: its density
//! in kg/m³. Everything else (name, color, category) is for organizing and
//! display. Built-in globals cover the stock a competition team actually
//! builds with; teams add custom alloys as project-scoped entries.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CatalogEntry;
use crate::errors::{TrackError, TrackResult};

/// Broad material grouping for filtering and display accents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaterialCategory {
    #[default]
    Metal,
    Plastic,
    Composite,
    Other,
}

impl MaterialCategory {
    /// All categories for UI selection
    pub const ALL: [MaterialCategory; 4] = [
        MaterialCategory::Metal,
        MaterialCategory::Plastic,
        MaterialCategory::Composite,
        MaterialCategory::Other,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialCategory::Metal => "Metal",
            MaterialCategory::Plastic => "Plastic",
            MaterialCategory::Composite => "Composite",
            MaterialCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A density source for calculated component weights.
///
/// Canonical density unit is kg/m³; imperial display goes through
/// [`crate::units::format_density`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Stable identifier (fixed constants for built-in globals)
    pub id: Uuid,

    /// Owning project for custom entries; `None` for globals
    pub project_id: Option<Uuid>,

    pub name: String,
    pub description: Option<String>,

    /// Density in kg/m³ (must be > 0 to be usable in weight math)
    pub density_kg_m3: f64,

    /// UI accent color (hex), not semantically load-bearing
    pub color: String,

    pub category: MaterialCategory,

    /// Shared catalog entry, immutable by normal edits
    pub is_global: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Material {
    /// Create a new project-scoped custom material.
    pub fn new(
        project_id: Uuid,
        name: impl Into<String>,
        density_kg_m3: f64,
        category: MaterialCategory,
    ) -> Self {
        let now = Utc::now();
        Material {
            id: Uuid::new_v4(),
            project_id: Some(project_id),
            name: name.into(),
            description: None,
            density_kg_m3,
            color: "#94a3b8".to_string(),
            category,
            is_global: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the material's fields.
    pub fn validate(&self) -> TrackResult<()> {
        if !(self.density_kg_m3 > 0.0) {
            return Err(TrackError::invalid_input(
                "density_kg_m3",
                self.density_kg_m3.to_string(),
                "Density must be positive",
            ));
        }
        Ok(())
    }

    // Built-in constructor; ids are fixed so saved files keep referring to
    // the same global entry across runs.
    fn global(
        id: u128,
        name: &str,
        density_kg_m3: f64,
        category: MaterialCategory,
        color: &str,
    ) -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        Material {
            id: Uuid::from_u128(id),
            project_id: None,
            name: name.to_string(),
            description: None,
            density_kg_m3,
            color: color.to_string(),
            category,
            is_global: true,
            created_at: epoch,
            updated_at: epoch,
        }
    }
}

impl CatalogEntry for Material {
    const KIND: &'static str = "Material";

    fn entry_name(&self) -> &str {
        &self.name
    }

    fn is_global_entry(&self) -> bool {
        self.is_global
    }

    fn customize(&self, project_id: Uuid) -> Self {
        let now = Utc::now();
        Material {
            id: Uuid::new_v4(),
            project_id: Some(project_id),
            is_global: false,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// Built-in global materials with handbook densities (kg/m³).
pub static BUILTIN_MATERIALS: Lazy<Vec<Material>> = Lazy::new(|| {
    vec![
        Material::global(
            0xb1a5_0001,
            "Aluminum 6061-T6",
            2700.0,
            MaterialCategory::Metal,
            "#9ca3af",
        ),
        Material::global(
            0xb1a5_0002,
            "Aluminum 7075-T6",
            2810.0,
            MaterialCategory::Metal,
            "#a8b0ba",
        ),
        Material::global(
            0xb1a5_0003,
            "Steel 4130",
            7850.0,
            MaterialCategory::Metal,
            "#6b7280",
        ),
        Material::global(
            0xb1a5_0004,
            "Polycarbonate",
            1200.0,
            MaterialCategory::Plastic,
            "#60a5fa",
        ),
        Material::global(
            0xb1a5_0005,
            "HDPE",
            950.0,
            MaterialCategory::Plastic,
            "#fbbf24",
        ),
        Material::global(
            0xb1a5_0006,
            "Delrin (Acetal)",
            1410.0,
            MaterialCategory::Plastic,
            "#f9fafb",
        ),
        Material::global(
            0xb1a5_0007,
            "Carbon Fiber Laminate",
            1600.0,
            MaterialCategory::Composite,
            "#1f2937",
        ),
        Material::global(
            0xb1a5_0008,
            "Baltic Birch Plywood",
            680.0,
            MaterialCategory::Other,
            "#d6a662",
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_nonpositive_density() {
        let project = Uuid::new_v4();
        let mut mat = Material::new(project, "Foamcore", 48.0, MaterialCategory::Other);
        assert!(mat.validate().is_ok());

        mat.density_kg_m3 = 0.0;
        assert!(mat.validate().is_err());
        mat.density_kg_m3 = -1.0;
        assert!(mat.validate().is_err());
        mat.density_kg_m3 = f64::NAN;
        assert!(mat.validate().is_err());
    }

    #[test]
    fn test_builtin_ids_are_stable() {
        let a = &BUILTIN_MATERIALS[0];
        assert_eq!(a.id, Uuid::from_u128(0xb1a5_0001));
        assert_eq!(a.density_kg_m3, 2700.0);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&MaterialCategory::Composite).unwrap();
        assert_eq!(json, "\"composite\"");
        let roundtrip: MaterialCategory = serde_json::from_str("\"metal\"").unwrap();
        assert_eq!(roundtrip, MaterialCategory::Metal);
    }

    #[test]
    fn test_material_roundtrip() {
        let mat = Material::new(Uuid::new_v4(), "G10 Garolite", 1800.0, MaterialCategory::Composite);
        let json = serde_json::to_string(&mat).unwrap();
        let roundtrip: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(mat, roundtrip);
    }
}

//! Fastener Catalog
//!
//! Fasteners are fixed-weight hardware: no geometry math, just a known
//! per-unit mass plus thread descriptors and purchasing metadata. The
//! shopping reconciliation in [`crate::shopping`] cross-references these
//! against component usage and on-hand stock.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CatalogEntry;
use crate::errors::{TrackError, TrackResult};

/// Thread standard family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStandard {
    #[default]
    Imperial,
    Metric,
}

impl ThreadStandard {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ThreadStandard::Imperial => "Imperial",
            ThreadStandard::Metric => "Metric",
        }
    }
}

/// A catalog fastener with a known per-unit weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fastener {
    /// Stable identifier (fixed constants for built-in globals)
    pub id: Uuid,

    /// Owning project for custom entries; `None` for globals
    pub project_id: Option<Uuid>,

    pub name: String,

    pub thread_standard: ThreadStandard,

    /// Thread size designation (e.g., "#10-32", "M5x0.8")
    pub thread_size: String,

    /// Nominal length in mm
    pub length_mm: f64,

    pub head_type: Option<String>,
    pub drive_type: Option<String>,

    /// Fastener material description (e.g., "Steel, black oxide")
    pub material: Option<String>,
    pub finish: Option<String>,

    /// Authoritative per-unit mass in kg
    pub weight_per_unit_kg: f64,

    pub supplier: Option<String>,
    pub part_number: Option<String>,

    /// Unit cost in dollars; `None` means unknown, not free
    pub unit_cost: Option<f64>,
    pub purchase_url: Option<String>,

    /// Smallest quantity the supplier sells. Carried for purchasing UIs;
    /// the shopping reconciliation reports the raw shortfall without
    /// rounding up to this multiple.
    pub min_purchase_qty: u32,

    pub is_global: bool,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fastener {
    /// Create a new project-scoped custom fastener.
    pub fn new(
        project_id: Uuid,
        name: impl Into<String>,
        thread_standard: ThreadStandard,
        thread_size: impl Into<String>,
        length_mm: f64,
        weight_per_unit_kg: f64,
    ) -> Self {
        let now = Utc::now();
        Fastener {
            id: Uuid::new_v4(),
            project_id: Some(project_id),
            name: name.into(),
            thread_standard,
            thread_size: thread_size.into(),
            length_mm,
            head_type: None,
            drive_type: None,
            material: None,
            finish: None,
            weight_per_unit_kg,
            supplier: None,
            part_number: None,
            unit_cost: None,
            purchase_url: None,
            min_purchase_qty: 1,
            is_global: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the fastener's fields.
    pub fn validate(&self) -> TrackResult<()> {
        if !(self.weight_per_unit_kg > 0.0) {
            return Err(TrackError::invalid_input(
                "weight_per_unit_kg",
                self.weight_per_unit_kg.to_string(),
                "Per-unit weight must be positive",
            ));
        }
        if self.min_purchase_qty == 0 {
            return Err(TrackError::invalid_input(
                "min_purchase_qty",
                "0",
                "Minimum purchase quantity must be at least 1",
            ));
        }
        Ok(())
    }

    // Built-in constructor; ids are fixed so saved files keep referring to
    // the same global entry across runs.
    #[allow(clippy::too_many_arguments)]
    fn global(
        id: u128,
        name: &str,
        thread_standard: ThreadStandard,
        thread_size: &str,
        length_mm: f64,
        head_type: &str,
        weight_per_unit_kg: f64,
        unit_cost: Option<f64>,
        min_purchase_qty: u32,
    ) -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        Fastener {
            id: Uuid::from_u128(id),
            project_id: None,
            name: name.to_string(),
            thread_standard,
            thread_size: thread_size.to_string(),
            length_mm,
            head_type: Some(head_type.to_string()),
            drive_type: Some("Hex socket".to_string()),
            material: Some("Steel".to_string()),
            finish: Some("Black oxide".to_string()),
            weight_per_unit_kg,
            supplier: None,
            part_number: None,
            unit_cost,
            purchase_url: None,
            min_purchase_qty,
            is_global: true,
            is_active: true,
            created_at: epoch,
            updated_at: epoch,
        }
    }
}

impl CatalogEntry for Fastener {
    const KIND: &'static str = "Fastener";

    fn entry_name(&self) -> &str {
        &self.name
    }

    fn is_global_entry(&self) -> bool {
        self.is_global
    }

    fn customize(&self, project_id: Uuid) -> Self {
        let now = Utc::now();
        Fastener {
            id: Uuid::new_v4(),
            project_id: Some(project_id),
            is_global: false,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// Built-in global fasteners (weights from supplier data sheets).
pub static BUILTIN_FASTENERS: Lazy<Vec<Fastener>> = Lazy::new(|| {
    vec![
        Fastener::global(
            0xfa57_0001,
            "#10-32 x 1/2\" BHCS",
            ThreadStandard::Imperial,
            "#10-32",
            12.7,
            "Button",
            0.0021,
            Some(0.08),
            25,
        ),
        Fastener::global(
            0xfa57_0002,
            "#10-32 x 3/4\" BHCS",
            ThreadStandard::Imperial,
            "#10-32",
            19.05,
            "Button",
            0.0027,
            Some(0.09),
            25,
        ),
        Fastener::global(
            0xfa57_0003,
            "1/4-20 x 3/4\" SHCS",
            ThreadStandard::Imperial,
            "1/4-20",
            19.05,
            "Socket",
            0.0062,
            Some(0.14),
            25,
        ),
        Fastener::global(
            0xfa57_0004,
            "M5 x 10mm SHCS",
            ThreadStandard::Metric,
            "M5x0.8",
            10.0,
            "Socket",
            0.0040,
            Some(0.11),
            50,
        ),
        Fastener::global(
            0xfa57_0005,
            "#10-32 Nylock Nut",
            ThreadStandard::Imperial,
            "#10-32",
            0.0,
            "Nut",
            0.0012,
            Some(0.05),
            100,
        ),
    ]
});

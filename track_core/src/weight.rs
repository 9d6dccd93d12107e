//! # Component Weight Calculator
//!
//! The central algorithm: given a calculation method, geometry, a density,
//! and the user's property bag, produce a per-unit mass in kilograms.
//!
//! ## Contract
//!
//! The calculator is a total, pure function. It never errors: any missing or
//! non-positive required input yields `None`, meaning "cannot calculate yet".
//! That is the normal steady state while a user is mid-edit, and UIs render
//! it as a neutral placeholder, not a validation failure.
//!
//! All inputs and the result are canonical metric (mm, mm², kg/m³, kg).
//!
//! ## Example
//!
//! ```rust
//! use track_core::weight::{calculate_weight, Properties};
//! use track_core::catalog::CalculationMethod;
//!
//! // 1 m of 100 mm² extrusion in 6061 aluminum
//! let mut props = Properties::new();
//! props.insert("length_mm".to_string(), 1000.0);
//!
//! let kg = calculate_weight(
//!     CalculationMethod::Linear,
//!     Some(100.0),
//!     Some(2700.0),
//!     &props,
//! );
//! assert!((kg.unwrap() - 0.27).abs() < 1e-12);
//! ```

use std::collections::BTreeMap;

use crate::catalog::{CalculationMethod, Material, ProfileType};

/// Component property bag: named numeric inputs keyed per the profile's
/// input schema (`length_mm`, `thickness_mm`, `weight_kg`, ...).
///
/// BTreeMap keeps serialized property order stable across saves.
pub type Properties = BTreeMap<String, f64>;

/// Read a property only if it is present, finite, and strictly positive.
fn positive(properties: &Properties, key: &str) -> Option<f64> {
    properties
        .get(key)
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Like [`positive`] but for values carried outside the property bag
/// (profile cross-section area, material density).
fn positive_opt(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Calculate a per-unit weight in kilograms.
///
/// Rules by method:
///
/// - `fixed`: reads `properties["weight_kg"]` directly.
/// - `linear`: `(area_mm² / 1e6) × (length_mm / 1000) × density`. The
///   cross-section area comes from the profile, not the property bag.
/// - `area`: `(length × width × thickness, all mm → m) × density`. The
///   thickness must be an explicit property; a profile's advisory
///   `default_thickness_mm` is never substituted.
/// - `volume`: `(length × width × height, all mm → m) × density`.
/// - `formula`: reserved, always `None`.
///
/// Any missing or non-positive required input yields `None`.
pub fn calculate_weight(
    method: CalculationMethod,
    cross_section_area_mm2: Option<f64>,
    density_kg_m3: Option<f64>,
    properties: &Properties,
) -> Option<f64> {
    match method {
        CalculationMethod::Fixed => positive(properties, "weight_kg"),

        CalculationMethod::Linear => {
            let area_m2 = positive_opt(cross_section_area_mm2)? / 1_000_000.0;
            let density = positive_opt(density_kg_m3)?;
            let length_m = positive(properties, "length_mm")? / 1000.0;
            Some(area_m2 * length_m * density)
        }

        CalculationMethod::Area => {
            let density = positive_opt(density_kg_m3)?;
            let length_m = positive(properties, "length_mm")? / 1000.0;
            let width_m = positive(properties, "width_mm")? / 1000.0;
            let thickness_m = positive(properties, "thickness_mm")? / 1000.0;
            Some(length_m * width_m * thickness_m * density)
        }

        CalculationMethod::Volume => {
            let density = positive_opt(density_kg_m3)?;
            let length_m = positive(properties, "length_mm")? / 1000.0;
            let width_m = positive(properties, "width_mm")? / 1000.0;
            let height_m = positive(properties, "height_mm")? / 1000.0;
            Some(length_m * width_m * height_m * density)
        }

        CalculationMethod::Formula => None,
    }
}

/// Convenience wrapper resolving the method, area, and density from a
/// profile/material pair before delegating to [`calculate_weight`].
///
/// `material` may be `None` for the `fixed` method, which needs no density.
pub fn component_weight(
    profile: &ProfileType,
    material: Option<&Material>,
    properties: &Properties,
) -> Option<f64> {
    calculate_weight(
        profile.calculation_method,
        profile.cross_section_area_mm2,
        material.map(|m| m.density_kg_m3),
        properties,
    )
}

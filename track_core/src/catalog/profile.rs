//! Profile Types (Shape Calculation Recipes)
//!
//! A profile type tells the weight calculator how to turn geometry and a
//! material density into a mass: which formula to use
//! ([`CalculationMethod`]) and which numeric inputs the user must supply
//! ([`ProfileInput`] schema).
//!
//! ## Input Schema
//!
//! `required_inputs` may arrive pre-parsed or as a serialized JSON string
//! (legacy exports store it stringified). [`ProfileType::inputs`] resolves
//! either form and never fails: malformed schema text yields an empty list.
//!
//! Input keys follow a naming convention that drives unit-aware display:
//! keys containing `_mm` are length-valued, keys containing `_kg` are
//! mass-valued. The resolver only enumerates and labels; it never converts.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CatalogEntry;
use crate::units::UnitSystem;

/// Which weight formula a profile uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMethod {
    /// Weight read directly from `properties["weight_kg"]`
    #[default]
    Fixed,
    /// Cross-section area × length × density (extrusions, tube stock)
    Linear,
    /// Length × width × thickness × density (sheet stock)
    Area,
    /// Length × width × height × density (solid blocks)
    Volume,
    /// Reserved for a future expression evaluator; always yields no weight
    Formula,
}

impl CalculationMethod {
    /// All methods for UI selection
    pub const ALL: [CalculationMethod; 5] = [
        CalculationMethod::Fixed,
        CalculationMethod::Linear,
        CalculationMethod::Area,
        CalculationMethod::Volume,
        CalculationMethod::Formula,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CalculationMethod::Fixed => "Fixed weight",
            CalculationMethod::Linear => "Linear (per length)",
            CalculationMethod::Area => "Area (sheet)",
            CalculationMethod::Volume => "Volume (solid)",
            CalculationMethod::Formula => "Formula (reserved)",
        }
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Unit family inferred from an input key's naming convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitHint {
    /// Key contains `_mm`: mm canonical, inches under imperial display
    Length,
    /// Key contains `_kg`: kg canonical, pounds under imperial display
    Mass,
    /// Plain number, no conversion on display
    Unitless,
}

impl UnitHint {
    /// Infer the unit family from an input key.
    pub fn for_key(key: &str) -> UnitHint {
        if key.contains("_mm") {
            UnitHint::Length
        } else if key.contains("_kg") {
            UnitHint::Mass
        } else {
            UnitHint::Unitless
        }
    }

    /// The unit label shown next to the input field, if any.
    pub fn display_unit(&self, system: UnitSystem) -> Option<&'static str> {
        match (self, system) {
            (UnitHint::Length, UnitSystem::Metric) => Some("mm"),
            (UnitHint::Length, UnitSystem::Imperial) => Some("in"),
            (UnitHint::Mass, UnitSystem::Metric) => Some("kg"),
            (UnitHint::Mass, UnitSystem::Imperial) => Some("lb"),
            (UnitHint::Unitless, _) => None,
        }
    }
}

/// One named numeric input a profile requires from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    /// Property-bag key; `_mm`/`_kg` suffix conventions drive display units
    pub key: String,

    /// Human-readable field label
    pub label: String,

    /// Input widget type (always "number" for built-ins)
    #[serde(rename = "type")]
    pub input_type: String,

    pub required: bool,

    /// Spinner step size hint for the UI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Pre-filled display value. Advisory only: defaults are never
    /// substituted into the weight math for missing inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
}

impl ProfileInput {
    /// Create a required numeric input.
    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        ProfileInput {
            key: key.into(),
            label: label.into(),
            input_type: "number".to_string(),
            required: true,
            step: None,
            default: None,
        }
    }

    /// Set the spinner step hint.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// The unit family this input belongs to, from its key.
    pub fn unit_hint(&self) -> UnitHint {
        UnitHint::for_key(&self.key)
    }
}

/// Input schema storage: pre-parsed, or a serialized JSON string from
/// legacy exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputSchema {
    Parsed(Vec<ProfileInput>),
    Serialized(String),
}

impl Default for InputSchema {
    fn default() -> Self {
        InputSchema::Parsed(Vec::new())
    }
}

/// A named structural-shape calculation recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileType {
    /// Stable identifier (fixed constants for built-in globals)
    pub id: Uuid,

    /// Owning project for custom entries; `None` for globals
    pub project_id: Option<Uuid>,

    /// Component category this profile files under, if any
    pub category_id: Option<Uuid>,

    pub name: String,
    pub description: Option<String>,

    pub calculation_method: CalculationMethod,

    /// Cross-section area in mm², consumed only by the `linear` method
    pub cross_section_area_mm2: Option<f64>,

    /// Advisory thickness shown as a UI pre-fill for sheet profiles.
    /// Never substituted for a missing `thickness_mm` input.
    pub default_thickness_mm: Option<f64>,

    /// Reserved alongside the `formula` method; not evaluated
    pub formula_expression: Option<String>,

    /// Ordered input schema (see [`ProfileType::inputs`])
    pub required_inputs: InputSchema,

    pub is_global: bool,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileType {
    /// Create a new project-scoped custom profile.
    pub fn new(
        project_id: Uuid,
        name: impl Into<String>,
        calculation_method: CalculationMethod,
    ) -> Self {
        let now = Utc::now();
        ProfileType {
            id: Uuid::new_v4(),
            project_id: Some(project_id),
            category_id: None,
            name: name.into(),
            description: None,
            calculation_method,
            cross_section_area_mm2: None,
            default_thickness_mm: None,
            formula_expression: None,
            required_inputs: InputSchema::Parsed(default_inputs_for(calculation_method)),
            is_global: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Resolve the ordered list of inputs this profile requires.
    ///
    /// Handles both pre-parsed and serialized schema storage. Malformed
    /// serialized schemas resolve to an empty list rather than an error;
    /// a profile with a broken schema simply asks for nothing.
    pub fn inputs(&self) -> Vec<ProfileInput> {
        match &self.required_inputs {
            InputSchema::Parsed(list) => list.clone(),
            InputSchema::Serialized(text) => serde_json::from_str(text).unwrap_or_default(),
        }
    }

    // Built-in constructor; ids are fixed so saved files keep referring to
    // the same global entry across runs.
    fn global(
        id: u128,
        name: &str,
        method: CalculationMethod,
        cross_section_area_mm2: Option<f64>,
        default_thickness_mm: Option<f64>,
    ) -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        ProfileType {
            id: Uuid::from_u128(id),
            project_id: None,
            category_id: None,
            name: name.to_string(),
            description: None,
            calculation_method: method,
            cross_section_area_mm2,
            default_thickness_mm,
            formula_expression: None,
            required_inputs: InputSchema::Parsed(default_inputs_for(method)),
            is_global: true,
            is_active: true,
            created_at: epoch,
            updated_at: epoch,
        }
    }
}

impl CatalogEntry for ProfileType {
    const KIND: &'static str = "ProfileType";

    fn entry_name(&self) -> &str {
        &self.name
    }

    fn is_global_entry(&self) -> bool {
        self.is_global
    }

    fn customize(&self, project_id: Uuid) -> Self {
        let now = Utc::now();
        ProfileType {
            id: Uuid::new_v4(),
            project_id: Some(project_id),
            is_global: false,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// The standard input schema for each calculation method.
pub fn default_inputs_for(method: CalculationMethod) -> Vec<ProfileInput> {
    match method {
        CalculationMethod::Fixed => vec![
            ProfileInput::number("weight_kg", "Weight").with_step(0.001),
        ],
        CalculationMethod::Linear => vec![
            ProfileInput::number("length_mm", "Length").with_step(1.0),
        ],
        CalculationMethod::Area => vec![
            ProfileInput::number("length_mm", "Length").with_step(1.0),
            ProfileInput::number("width_mm", "Width").with_step(1.0),
            ProfileInput::number("thickness_mm", "Thickness").with_step(0.1),
        ],
        CalculationMethod::Volume => vec![
            ProfileInput::number("length_mm", "Length").with_step(1.0),
            ProfileInput::number("width_mm", "Width").with_step(1.0),
            ProfileInput::number("height_mm", "Height").with_step(1.0),
        ],
        CalculationMethod::Formula => Vec::new(),
    }
}

/// Built-in global profile types.
///
/// Cross-section areas are for the common competition stock sizes
/// (1x1x1/8" box tube = 282.2 mm² etc.).
pub static BUILTIN_PROFILES: Lazy<Vec<ProfileType>> = Lazy::new(|| {
    vec![
        ProfileType::global(
            0x920f_0001,
            "Box Tube 1x1x1/8\"",
            CalculationMethod::Linear,
            Some(282.2),
            None,
        ),
        ProfileType::global(
            0x920f_0002,
            "Box Tube 2x1x1/8\"",
            CalculationMethod::Linear,
            Some(443.5),
            None,
        ),
        ProfileType::global(
            0x920f_0003,
            "Angle 1x1x1/8\"",
            CalculationMethod::Linear,
            Some(151.2),
            None,
        ),
        ProfileType::global(
            0x920f_0004,
            "Round Tube 1\" OD x 1/16\"",
            CalculationMethod::Linear,
            Some(118.8),
            None,
        ),
        ProfileType::global(
            0x920f_0005,
            "Sheet / Plate",
            CalculationMethod::Area,
            None,
            Some(3.175),
        ),
        ProfileType::global(
            0x920f_0006,
            "Solid Block",
            CalculationMethod::Volume,
            None,
            None,
        ),
        ProfileType::global(
            0x920f_0007,
            "Known Weight (COTS)",
            CalculationMethod::Fixed,
            None,
            None,
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_from_parsed_schema() {
        let profile = &BUILTIN_PROFILES[4]; // sheet/plate
        let inputs = profile.inputs();
        let keys: Vec<&str> = inputs.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["length_mm", "width_mm", "thickness_mm"]);
        assert!(inputs.iter().all(|i| i.required));
    }

    #[test]
    fn test_inputs_from_serialized_schema() {
        let mut profile = ProfileType::new(Uuid::new_v4(), "Churro", CalculationMethod::Linear);
        profile.required_inputs = InputSchema::Serialized(
            r#"[{"key":"length_mm","label":"Length","type":"number","required":true,"step":1.0}]"#
                .to_string(),
        );
        let inputs = profile.inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].key, "length_mm");
        assert_eq!(inputs[0].step, Some(1.0));
    }

    #[test]
    fn test_malformed_schema_resolves_empty() {
        let mut profile = ProfileType::new(Uuid::new_v4(), "Broken", CalculationMethod::Linear);
        profile.required_inputs = InputSchema::Serialized("{not json at all".to_string());
        assert!(profile.inputs().is_empty());

        profile.required_inputs = InputSchema::Serialized(r#"{"key":"oops"}"#.to_string());
        assert!(profile.inputs().is_empty());
    }

    #[test]
    fn test_unit_hint_inference() {
        assert_eq!(UnitHint::for_key("length_mm"), UnitHint::Length);
        assert_eq!(UnitHint::for_key("wall_mm_nominal"), UnitHint::Length);
        assert_eq!(UnitHint::for_key("weight_kg"), UnitHint::Mass);
        assert_eq!(UnitHint::for_key("tooth_count"), UnitHint::Unitless);
    }

    #[test]
    fn test_unit_hint_display() {
        assert_eq!(
            UnitHint::Length.display_unit(UnitSystem::Imperial),
            Some("in")
        );
        assert_eq!(UnitHint::Mass.display_unit(UnitSystem::Metric), Some("kg"));
        assert_eq!(UnitHint::Unitless.display_unit(UnitSystem::Metric), None);
    }

    #[test]
    fn test_method_serialization() {
        let json = serde_json::to_string(&CalculationMethod::Linear).unwrap();
        assert_eq!(json, "\"linear\"");
        let roundtrip: CalculationMethod = serde_json::from_str("\"volume\"").unwrap();
        assert_eq!(roundtrip, CalculationMethod::Volume);
    }

    #[test]
    fn test_schema_untagged_roundtrip() {
        // Parsed form serializes as an array and comes back as Parsed
        let schema = InputSchema::Parsed(default_inputs_for(CalculationMethod::Area));
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.starts_with('['));
        let roundtrip: InputSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, roundtrip);

        // String form stays a string
        let serialized = InputSchema::Serialized("[]".to_string());
        let json = serde_json::to_string(&serialized).unwrap();
        let roundtrip: InputSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, InputSchema::Serialized("[]".to_string()));
    }

    #[test]
    fn test_profile_roundtrip() {
        let profile = &BUILTIN_PROFILES[0];
        let json = serde_json::to_string(profile).unwrap();
        let roundtrip: ProfileType = serde_json::from_str(&json).unwrap();
        assert_eq!(*profile, roundtrip);
    }
}

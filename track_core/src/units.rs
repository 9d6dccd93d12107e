//! # Unit Types
//!
//! Type-safe wrappers for the tracker's units. These provide compile-time
//! safety against unit confusion while remaining lightweight (just f64 wrappers).
//!
//! ## Design Philosophy
//!
//! We use simple newtype wrappers rather than a full units library because:
//! - The tracker uses a small, fixed set of units
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Canonical Metric Units (Primary)
//!
//! All stored and computed values are metric; imperial exists only for display:
//! - Mass: kilograms (kg)
//! - Length: millimeters (mm)
//! - Area: square millimeters (mm²)
//! - Density: kilograms per cubic meter (kg/m³)
//!
//! Each imperial conversion pair shares a single constant: the forward
//! direction multiplies, the reverse divides by the same value. The area
//! factor is the length factor squared, never a separately rounded constant.
//! This keeps metric→imperial→metric round-trips exact to floating-point
//! tolerance.
//!
//! ## Example
//!
//! ```rust
//! use track_core::units::{Kilograms, Pounds, Millimeters, Inches};
//!
//! let mass = Kilograms(2.0);
//! let lb: Pounds = mass.into();
//! assert!((lb.0 - 4.40924).abs() < 1e-9);
//!
//! let back: Kilograms = lb.into();
//! assert!((back.0 - 2.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Pounds per kilogram (forward constant; reverse direction divides)
pub const LB_PER_KG: f64 = 2.20462;

/// Inches per millimeter (forward constant; reverse direction divides)
pub const IN_PER_MM: f64 = 0.0393701;

/// lb/in³ per kg/m³ (forward constant; reverse direction divides)
pub const LB_IN3_PER_KG_M3: f64 = 0.0000361273;

/// Display preference for formatted output. Storage is always metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms (canonical)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in grams
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grams(pub f64);

/// Mass in pounds (display only)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

impl From<Kilograms> for Pounds {
    fn from(kg: Kilograms) -> Self {
        Pounds(kg.0 * LB_PER_KG)
    }
}

impl From<Pounds> for Kilograms {
    fn from(lb: Pounds) -> Self {
        Kilograms(lb.0 / LB_PER_KG)
    }
}

impl From<Kilograms> for Grams {
    fn from(kg: Kilograms) -> Self {
        Grams(kg.0 * 1000.0)
    }
}

impl From<Grams> for Kilograms {
    fn from(g: Grams) -> Self {
        Kilograms(g.0 / 1000.0)
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimeters (canonical)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in inches (display only)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 * IN_PER_MM)
    }
}

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 / IN_PER_MM)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square millimeters (canonical)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMillimeters(pub f64);

/// Area in square inches (display only)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareInches(pub f64);

impl From<SquareMillimeters> for SquareInches {
    fn from(mm2: SquareMillimeters) -> Self {
        SquareInches(mm2.0 * (IN_PER_MM * IN_PER_MM))
    }
}

impl From<SquareInches> for SquareMillimeters {
    fn from(in2: SquareInches) -> Self {
        SquareMillimeters(in2.0 / (IN_PER_MM * IN_PER_MM))
    }
}

// ============================================================================
// Density Units
// ============================================================================

/// Density in kilograms per cubic meter (canonical)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerM3(pub f64);

/// Density in pounds per cubic inch (display only)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LbPerIn3(pub f64);

impl From<KgPerM3> for LbPerIn3 {
    fn from(d: KgPerM3) -> Self {
        LbPerIn3(d.0 * LB_IN3_PER_KG_M3)
    }
}

impl From<LbPerIn3> for KgPerM3 {
    fn from(d: LbPerIn3) -> Self {
        KgPerM3(d.0 / LB_IN3_PER_KG_M3)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Kilograms);
impl_arithmetic!(Grams);
impl_arithmetic!(Pounds);
impl_arithmetic!(Millimeters);
impl_arithmetic!(Inches);
impl_arithmetic!(SquareMillimeters);
impl_arithmetic!(SquareInches);
impl_arithmetic!(KgPerM3);
impl_arithmetic!(LbPerIn3);

// ============================================================================
// Display Formatting
// ============================================================================
//
// Formatting is presentation-only. None of these functions ever feed back
// into stored values; callers keep the canonical metric number and format
// on the way out. A `None` input renders as an em placeholder ("—") so an
// uncalculated weight is visually distinct from zero.

/// Neutral placeholder for values that are absent or not yet calculable
pub const PLACEHOLDER: &str = "—";

/// Format a mass for display in the preferred unit system.
///
/// With `show_dual` set, the alternate system is appended in parentheses,
/// e.g. `"2.2680 kg (5.000 lb)"`.
pub fn format_weight(kg: Option<f64>, system: UnitSystem, show_dual: bool) -> String {
    let kg = match kg {
        Some(v) => v,
        None => return PLACEHOLDER.to_string(),
    };
    let metric = format!("{:.4} kg", kg);
    let imperial = format!("{:.3} lb", Pounds::from(Kilograms(kg)).0);
    match (system, show_dual) {
        (UnitSystem::Metric, false) => metric,
        (UnitSystem::Imperial, false) => imperial,
        (UnitSystem::Metric, true) => format!("{} ({})", metric, imperial),
        (UnitSystem::Imperial, true) => format!("{} ({})", imperial, metric),
    }
}

/// Format a mass in grams, for small parts like fasteners.
pub fn format_weight_grams(kg: Option<f64>) -> String {
    match kg {
        Some(v) => format!("{:.1} g", Grams::from(Kilograms(v)).0),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format a length for display in the preferred unit system.
pub fn format_length(mm: Option<f64>, system: UnitSystem) -> String {
    let mm = match mm {
        Some(v) => v,
        None => return PLACEHOLDER.to_string(),
    };
    match system {
        UnitSystem::Metric => format!("{:.1} mm", mm),
        UnitSystem::Imperial => format!("{:.3} in", Inches::from(Millimeters(mm)).0),
    }
}

/// Format a density for display in the preferred unit system.
pub fn format_density(kg_m3: f64, system: UnitSystem) -> String {
    match system {
        UnitSystem::Metric => format!("{:.0} kg/m³", kg_m3),
        UnitSystem::Imperial => {
            format!("{:.6} lb/in³", LbPerIn3::from(KgPerM3(kg_m3)).0)
        }
    }
}

/// Format a percentage with one decimal place; `None` renders as "—".
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format a cost in dollars; `None` (unknown cost) renders as "—" so it is
/// distinguishable from a known-free $0.00.
pub fn format_cost(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${:.2}", v),
        None => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REL_TOL: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        let scale = b.abs().max(1.0);
        assert!(
            (a - b).abs() <= REL_TOL * scale,
            "expected {} ≈ {}",
            a,
            b
        );
    }

    #[test]
    fn test_kg_lb_roundtrip() {
        for kg in [0.0, 0.001, 1.0, 2.5, 56.699, 1000.0] {
            let lb: Pounds = Kilograms(kg).into();
            let back: Kilograms = lb.into();
            assert_close(back.0, kg);
        }
    }

    #[test]
    fn test_mm_in_roundtrip() {
        for mm in [0.0, 0.5, 25.4, 1000.0, 12345.678] {
            let inches: Inches = Millimeters(mm).into();
            let back: Millimeters = inches.into();
            assert_close(back.0, mm);
        }
    }

    #[test]
    fn test_area_roundtrip() {
        for mm2 in [0.0, 100.0, 161.29, 1e6] {
            let in2: SquareInches = SquareMillimeters(mm2).into();
            let back: SquareMillimeters = in2.into();
            assert_close(back.0, mm2);
        }
    }

    #[test]
    fn test_area_factor_is_length_factor_squared() {
        let in2: SquareInches = SquareMillimeters(1.0).into();
        assert_close(in2.0, IN_PER_MM * IN_PER_MM);
    }

    #[test]
    fn test_density_roundtrip() {
        for d in [950.0, 1200.0, 2700.0, 7850.0] {
            let imperial: LbPerIn3 = KgPerM3(d).into();
            let back: KgPerM3 = imperial.into();
            assert_close(back.0, d);
        }
    }

    #[test]
    fn test_known_conversions() {
        let lb: Pounds = Kilograms(1.0).into();
        assert_close(lb.0, 2.20462);

        let inches: Inches = Millimeters(1000.0).into();
        assert_close(inches.0, 39.3701);

        // 6061 aluminum: 2700 kg/m³ ≈ 0.0975 lb/in³
        let al: LbPerIn3 = KgPerM3(2700.0).into();
        assert!((al.0 - 0.0975).abs() < 1e-3);
    }

    #[test]
    fn test_grams() {
        let g: Grams = Kilograms(0.0042).into();
        assert_close(g.0, 4.2);
        let back: Kilograms = g.into();
        assert_close(back.0, 0.0042);
    }

    #[test]
    fn test_arithmetic() {
        let a = Kilograms(10.0);
        let b = Kilograms(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let kg = Kilograms(56.699);
        let json = serde_json::to_string(&kg).unwrap();
        assert_eq!(json, "56.699");

        let roundtrip: Kilograms = serde_json::from_str(&json).unwrap();
        assert_eq!(kg, roundtrip);
    }

    #[test]
    fn test_unit_system_serialization() {
        let json = serde_json::to_string(&UnitSystem::Imperial).unwrap();
        assert_eq!(json, "\"imperial\"");
        let roundtrip: UnitSystem = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(roundtrip, UnitSystem::Metric);
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(None, UnitSystem::Metric, false), "—");
        assert_eq!(
            format_weight(Some(2.5), UnitSystem::Metric, false),
            "2.5000 kg"
        );
        assert_eq!(
            format_weight(Some(1.0), UnitSystem::Imperial, false),
            "2.205 lb"
        );
        assert_eq!(
            format_weight(Some(1.0), UnitSystem::Metric, true),
            "1.0000 kg (2.205 lb)"
        );
    }

    #[test]
    fn test_format_percent_and_cost() {
        assert_eq!(format_percent(Some(54.0)), "54.0%");
        assert_eq!(format_percent(None), "—");
        assert_eq!(format_cost(Some(0.0)), "$0.00");
        assert_eq!(format_cost(None), "—");
    }

    #[test]
    fn test_format_length_and_density() {
        assert_eq!(format_length(Some(25.4), UnitSystem::Imperial), "1.000 in");
        assert_eq!(format_length(None, UnitSystem::Metric), "—");
        assert_eq!(format_density(2700.0, UnitSystem::Metric), "2700 kg/m³");
    }
}

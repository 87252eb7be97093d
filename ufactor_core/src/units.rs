//! # Unit Types
//!
//! Type-safe wrappers for the SI quantities used in envelope calculations.
//! Plain f64 newtypes that serialize as bare numbers.
//!
//! ## Units
//!
//! - Length: millimeters (layer input), meters (calculation)
//! - Thermal conductivity: W/(m·K)
//! - Thermal resistance (R-value): m²·K/W
//! - Heat-transfer coefficient (U-factor): W/(m²·K)
//!
//! ## Example
//!
//! ```rust
//! use ufactor_core::units::{Meters, Millimeters};
//!
//! let thickness = Millimeters(100.0);
//! let meters: Meters = thickness.into();
//! assert_eq!(meters.0, 0.1);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Thermal Units
// ============================================================================

/// Thermal conductivity in W/(m·K)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conductivity(pub f64);

/// Thermal resistance in m²·K/W
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RValue(pub f64);

/// Heat-transfer coefficient in W/(m²·K)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UValue(pub f64);

impl Div<Conductivity> for Meters {
    type Output = RValue;
    fn div(self, rhs: Conductivity) -> RValue {
        RValue(self.0 / rhs.0)
    }
}

impl RValue {
    /// Reciprocal, or `None` when there is no resistance to invert
    pub fn reciprocal(self) -> Option<UValue> {
        if self.0 > 0.0 {
            Some(UValue(1.0 / self.0))
        } else {
            None
        }
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

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::default(), |acc, x| acc + x)
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

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Conductivity);
impl_arithmetic!(RValue);
impl_arithmetic!(UValue);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millimeters_to_meters() {
        let mm = Millimeters(250.0);
        let m: Meters = mm.into();
        assert_eq!(m.0, 0.25);
    }

    #[test]
    fn test_meters_over_conductivity() {
        let r = Meters(0.1) / Conductivity(0.04);
        assert!((r.0 - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_reciprocal() {
        let u = RValue(2.5).reciprocal().unwrap();
        assert!((u.0 - 0.4).abs() < 1e-12);
        assert!(RValue(0.0).reciprocal().is_none());
        assert!(RValue(-1.0).reciprocal().is_none());
    }

    #[test]
    fn test_sum() {
        let total: RValue = [RValue(1.0), RValue(0.5), RValue(0.25)].into_iter().sum();
        assert_eq!(total.0, 1.75);
    }

    #[test]
    fn test_serialization() {
        let mm = Millimeters(12.5);
        let json = serde_json::to_string(&mm).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: Millimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(mm, roundtrip);
    }
}

//! # Thermal Calculations
//!
//! Pure functions that turn material + thickness data into R-values and
//! U-factors. Nothing here mutates state; the assembly model caches what
//! these return.
//!
//! - [`layer`] - single-layer resistance `R = (mm / 1000) / k`
//! - [`assembly`] - summation over an ordered layer list, `U = 1 / ΣR`
//!
//! ## Example
//!
//! ```rust
//! use ufactor_core::calculations::{calculate, LayerInput, UFactor};
//! use ufactor_core::materials::Material;
//! use ufactor_core::units::Millimeters;
//!
//! let wool = Material::new("Mineral Wool", "Insulation", 0.04, 30.0, 840.0, 1.0);
//! let layers = [LayerInput::new(Some(wool.id), Millimeters(100.0))];
//! let materials = vec![wool];
//!
//! let result = calculate(&layers, &materials);
//! assert!((result.total_r_value.0 - 2.5).abs() < 1e-9);
//! assert!(matches!(result.u_factor, UFactor::Finite(u) if (u.0 - 0.4).abs() < 1e-9));
//! ```

pub mod assembly;
pub mod layer;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::{RValue, UValue};

pub use assembly::{calculate, LayerInput, ThermalLayer, ThermalResult};
pub use layer::{layer_r_value, resolve_layer_r_value};

/// Overall heat-transfer coefficient of an assembly.
///
/// `NoResistance` is the sentinel for a total R-value of exactly zero
/// (no layers, or no layer contributing). It is never NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UFactor {
    Finite(UValue),
    NoResistance,
}

impl UFactor {
    /// `1 / R` for positive R, otherwise `NoResistance`
    pub fn from_r_value(r: RValue) -> Self {
        match r.reciprocal() {
            Some(u) => UFactor::Finite(u),
            None => UFactor::NoResistance,
        }
    }

    /// The numeric value in W/(m²·K), if finite
    pub fn value(&self) -> Option<f64> {
        match self {
            UFactor::Finite(u) => Some(u.0),
            UFactor::NoResistance => None,
        }
    }

    pub fn is_no_resistance(&self) -> bool {
        matches!(self, UFactor::NoResistance)
    }
}

impl Default for UFactor {
    fn default() -> Self {
        UFactor::NoResistance
    }
}

impl fmt::Display for UFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UFactor::Finite(u) => match f.precision() {
                Some(p) => write!(f, "{:.*} W/(m²·K)", p, u.0),
                None => write!(f, "{:.3} W/(m²·K)", u.0),
            },
            UFactor::NoResistance => write!(f, "∞ (no resistance)"),
        }
    }
}

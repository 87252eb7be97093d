//! # Materials
//!
//! Building material records and the editable catalog that stores them.
//!
//! - [`Material`] - one catalog entry (conductivity, density, specific heat...)
//! - [`MaterialId`] - opaque UUID identifier, stable for a record's lifetime
//! - [`MaterialCatalog`] - the JSON-backed store (see [`catalog`])
//! - [`MaterialLookup`] - read-only resolution seam used by assemblies
//!
//! ## Example
//!
//! ```rust
//! use ufactor_core::materials::Material;
//!
//! let wool = Material::new("Mineral Wool", "Insulation", 0.04, 30.0, 840.0, 1.0);
//! assert!(wool.validate().is_ok());
//! assert_eq!(wool.resistance_per_meter(), 25.0);
//! ```

pub mod catalog;
pub mod defaults;

pub use catalog::{MaterialCatalog, CATALOG_FILE_NAME};
pub use defaults::default_materials;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult, FieldViolation};
use crate::units::Conductivity;

/// Catalog identifier for a material.
///
/// The nil UUID means "no material" wherever a reference is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub Uuid);

impl MaterialId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        MaterialId(Uuid::new_v4())
    }

    /// The nil identifier
    pub fn nil() -> Self {
        MaterialId(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        MaterialId::nil()
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MaterialId {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        Uuid::parse_str(s.trim())
            .map(MaterialId)
            .map_err(|e| CalcError::invalid_input("materialId", s, e.to_string()))
    }
}

/// A building material as stored in the catalog file.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "0b0f2c9e-8d8c-4c55-9d8e-0f5a4b7c1a11",
///   "name": "Brick",
///   "category": "Masonry",
///   "thermalConductivity": 0.72,
///   "density": 1800.0,
///   "specificHeat": 840.0,
///   "vaporResistance": 10.0,
///   "description": "Standard clay brick"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: MaterialId,

    /// Display name (not required to be unique)
    pub name: String,

    /// Free-text grouping label
    pub category: String,

    /// Thermal conductivity k, W/(m·K)
    pub thermal_conductivity: Conductivity,

    /// Density, kg/m³
    pub density: f64,

    /// Specific heat capacity, J/(kg·K)
    pub specific_heat: f64,

    /// Vapor resistance factor μ (dimensionless)
    pub vapor_resistance: f64,

    #[serde(default)]
    pub description: String,
}

impl Material {
    /// Create a material with a fresh identifier and an empty description.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        thermal_conductivity: f64,
        density: f64,
        specific_heat: f64,
        vapor_resistance: f64,
    ) -> Self {
        Material {
            id: MaterialId::new(),
            name: name.into(),
            category: category.into(),
            thermal_conductivity: Conductivity(thermal_conductivity),
            density,
            specific_heat,
            vapor_resistance,
            description: String::new(),
        }
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Thermal resistance of one meter of this material (1/k), 0 if k ≤ 0
    pub fn resistance_per_meter(&self) -> f64 {
        let k = self.thermal_conductivity.0;
        if k > 0.0 {
            1.0 / k
        } else {
            0.0
        }
    }

    /// Thermal resistance of one millimeter of this material
    pub fn resistance_per_mm(&self) -> f64 {
        self.resistance_per_meter() * 0.001
    }

    /// Check every field and report all violations at once.
    ///
    /// Non-finite numbers count as violations.
    pub fn validate(&self) -> CalcResult<()> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(FieldViolation::new("name", "Material name is required."));
        }
        if self.category.trim().is_empty() {
            violations.push(FieldViolation::new("category", "Category is required."));
        }
        if !is_positive(self.thermal_conductivity.0) {
            violations.push(FieldViolation::new(
                "thermalConductivity",
                "Thermal conductivity must be a positive number.",
            ));
        }
        if !is_positive(self.density) {
            violations.push(FieldViolation::new("density", "Density must be a positive number."));
        }
        if !is_positive(self.specific_heat) {
            violations.push(FieldViolation::new(
                "specificHeat",
                "Specific heat must be a positive number.",
            ));
        }
        if !(self.vapor_resistance.is_finite() && self.vapor_resistance >= 0.0) {
            violations.push(FieldViolation::new(
                "vaporResistance",
                "Vapor resistance must be a non-negative number.",
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(CalcError::ValidationFailed { violations })
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "Unnamed Material")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Read-only material resolution.
///
/// Assemblies take this instead of owning a catalog, so a layer only ever
/// holds an identifier.
pub trait MaterialLookup {
    fn lookup(&self, id: &MaterialId) -> Option<&Material>;
}

impl MaterialLookup for [Material] {
    fn lookup(&self, id: &MaterialId) -> Option<&Material> {
        self.iter().find(|m| &m.id == id)
    }
}

impl MaterialLookup for Vec<Material> {
    fn lookup(&self, id: &MaterialId) -> Option<&Material> {
        self.as_slice().lookup(id)
    }
}

//! # Assembly Model
//!
//! A named wall/roof/floor construction made of ordered [`Layer`]s, with
//! cached thermal aggregates.
//!
//! Every mutating method takes the material lookup it needs, renumbers the
//! layers and recomputes before returning, so the cached totals are never
//! stale after a call completes. Subscribers registered with
//! [`Assembly::subscribe`] receive the fresh totals after each recompute.
//!
//! Layer numbers are 1-based and always exactly `1..=N` in list order.
//!
//! ## Example
//!
//! ```rust
//! use ufactor_core::assembly::{Assembly, AssemblyType, Layer};
//! use ufactor_core::materials::default_materials;
//! use ufactor_core::units::Millimeters;
//!
//! let materials = default_materials();
//! let wool = materials.iter().find(|m| m.name == "Mineral Wool").unwrap();
//!
//! let mut wall = Assembly::new("External wall", AssemblyType::Wall);
//! wall.add_layer(Layer::new(Some(wool.id), Millimeters(100.0)), &materials)?;
//!
//! assert!((wall.total_r_value().0 - 2.5).abs() < 1e-9);
//! assert_eq!(wall.u_factor().value().map(|u| (u * 10.0).round() / 10.0), Some(0.4));
//! # Ok::<(), ufactor_core::errors::CalcError>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calculations::{calculate, ThermalLayer, ThermalResult, UFactor};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{MaterialId, MaterialLookup};
use crate::units::{Millimeters, RValue};

/// Display name used when a layer points at a material the catalog no longer has
pub const UNKNOWN_MATERIAL_NAME: &str = "Unknown Material";

/// Kind of construction. Unrecognised names are kept, trimmed, in `Other`.
///
/// Build values with [`AssemblyType::parse`] or [`AssemblyType::other`];
/// both normalise, so every value survives a save and reload unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssemblyType {
    #[default]
    Wall,
    Roof,
    Floor,
    Other(CustomType),
}

/// Label of a user-defined assembly type.
///
/// Only constructed by [`AssemblyType::parse`]: never blank, never padded,
/// never a built-in name in any casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomType(String);

impl CustomType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AssemblyType {
    /// The built-in types, for selection lists
    pub const BUILT_IN: [AssemblyType; 3] = [AssemblyType::Wall, AssemblyType::Roof, AssemblyType::Floor];

    pub fn as_str(&self) -> &str {
        match self {
            AssemblyType::Wall => "Wall",
            AssemblyType::Roof => "Roof",
            AssemblyType::Floor => "Floor",
            AssemblyType::Other(custom) => custom.as_str(),
        }
    }

    /// A user-defined type; built-in names map to their variants.
    pub fn other(name: &str) -> Self {
        AssemblyType::parse(name)
    }

    /// Case-insensitive parse. Blank input is a wall.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "wall" => AssemblyType::Wall,
            "roof" => AssemblyType::Roof,
            "floor" => AssemblyType::Floor,
            _ => AssemblyType::Other(CustomType(trimmed.to_string())),
        }
    }
}

impl From<String> for AssemblyType {
    fn from(s: String) -> Self {
        AssemblyType::parse(&s)
    }
}

impl From<AssemblyType> for String {
    fn from(t: AssemblyType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for AssemblyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One material slab within an assembly.
///
/// Fields are read-only from outside; change them through the owning
/// [`Assembly`] so its totals stay current.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    layer_number: usize,
    material_id: Option<MaterialId>,
    thickness: Millimeters,
    description: String,
    material_name: String,
    r_value: RValue,
}

impl Layer {
    /// New layer; numbering and R-value are filled in when it joins an assembly.
    pub fn new(material_id: Option<MaterialId>, thickness: Millimeters) -> Self {
        Layer {
            layer_number: 0,
            material_id: material_id.filter(|id| !id.is_nil()),
            thickness,
            description: String::new(),
            material_name: String::new(),
            r_value: RValue(0.0),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Seed the denormalized material name (used when reading project files).
    pub(crate) fn with_material_name(mut self, name: impl Into<String>) -> Self {
        self.material_name = name.into();
        self
    }

    /// 1-based position in the owning assembly
    pub fn layer_number(&self) -> usize {
        self.layer_number
    }

    pub fn material_id(&self) -> Option<&MaterialId> {
        self.material_id.as_ref()
    }

    pub fn thickness(&self) -> Millimeters {
        self.thickness
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Last known material name; informational only
    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    /// R-value from the last recompute (m²·K/W)
    pub fn r_value(&self) -> RValue {
        self.r_value
    }
}

impl ThermalLayer for Layer {
    fn material_id(&self) -> Option<&MaterialId> {
        self.material_id.as_ref()
    }

    fn thickness(&self) -> Millimeters {
        self.thickness
    }
}

/// Callback invoked with the new totals after every recompute.
pub type AssemblyListener = Box<dyn FnMut(&ThermalResult)>;

/// Ordered layers plus cached thermal totals.
pub struct Assembly {
    name: String,
    assembly_type: AssemblyType,
    layers: Vec<Layer>,
    totals: ThermalResult,
    listeners: Vec<AssemblyListener>,
}

impl Assembly {
    pub fn new(name: impl Into<String>, assembly_type: AssemblyType) -> Self {
        Assembly {
            name: name.into(),
            assembly_type,
            layers: Vec::new(),
            totals: ThermalResult::default(),
            listeners: Vec::new(),
        }
    }

    /// Build an assembly from an existing layer list in one recompute.
    ///
    /// Incoming layer numbers are discarded and reassigned.
    pub fn from_layers(
        name: impl Into<String>,
        assembly_type: AssemblyType,
        layers: Vec<Layer>,
        lookup: &dyn MaterialLookup,
    ) -> CalcResult<Self> {
        for layer in &layers {
            check_thickness(layer.thickness)?;
        }
        let mut assembly = Assembly::new(name, assembly_type);
        assembly.layers = layers;
        assembly.recompute(lookup);
        Ok(assembly)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn assembly_type(&self) -> &AssemblyType {
        &self.assembly_type
    }

    pub fn set_assembly_type(&mut self, assembly_type: AssemblyType) {
        self.assembly_type = assembly_type;
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Append a layer. Returns its 0-based index.
    pub fn add_layer(&mut self, layer: Layer, lookup: &dyn MaterialLookup) -> CalcResult<usize> {
        check_thickness(layer.thickness)?;
        self.layers.push(layer);
        self.recompute(lookup);
        Ok(self.layers.len() - 1)
    }

    /// Remove the layer at `index`; `None` if out of range.
    pub fn remove_layer(&mut self, index: usize, lookup: &dyn MaterialLookup) -> Option<Layer> {
        if index >= self.layers.len() {
            return None;
        }
        let removed = self.layers.remove(index);
        self.recompute(lookup);
        Some(removed)
    }

    /// Move the layer at `from` so it ends up at `to`.
    ///
    /// Returns `false` (and changes nothing) when the indices are equal or
    /// either is out of range.
    pub fn move_layer(&mut self, from: usize, to: usize, lookup: &dyn MaterialLookup) -> bool {
        let len = self.layers.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.recompute(lookup);
        true
    }

    /// Change a layer's thickness in millimeters.
    ///
    /// Zero and negative values are stored and contribute no resistance;
    /// NaN and infinities are rejected.
    pub fn set_layer_thickness(
        &mut self,
        index: usize,
        thickness: Millimeters,
        lookup: &dyn MaterialLookup,
    ) -> CalcResult<()> {
        check_thickness(thickness)?;
        self.layer_mut(index)?.thickness = thickness;
        self.recompute(lookup);
        Ok(())
    }

    /// Point a layer at a different material (or none).
    pub fn set_layer_material(
        &mut self,
        index: usize,
        material_id: Option<MaterialId>,
        lookup: &dyn MaterialLookup,
    ) -> CalcResult<()> {
        let layer = self.layer_mut(index)?;
        layer.material_id = material_id.filter(|id| !id.is_nil());
        layer.material_name.clear();
        self.recompute(lookup);
        Ok(())
    }

    pub fn set_layer_description(&mut self, index: usize, description: impl Into<String>) -> CalcResult<()> {
        self.layer_mut(index)?.description = description.into();
        Ok(())
    }

    /// Renumber, re-resolve materials and refresh every cached value.
    ///
    /// Call after the catalog itself changed.
    pub fn recompute(&mut self, lookup: &dyn MaterialLookup) {
        let totals = calculate(&self.layers, lookup);

        for (i, (layer, r_value)) in self.layers.iter_mut().zip(&totals.layer_r_values).enumerate() {
            layer.layer_number = i + 1;
            layer.r_value = *r_value;
            layer.material_name = match layer.material_id.as_ref() {
                None => String::new(),
                Some(id) => match lookup.lookup(id) {
                    Some(material) => material.name.clone(),
                    None if layer.material_name.is_empty() => UNKNOWN_MATERIAL_NAME.to_string(),
                    None => std::mem::take(&mut layer.material_name),
                },
            };
        }

        trace!(
            assembly = %self.name,
            layers = self.layers.len(),
            r_value = totals.total_r_value.0,
            "recomputed assembly"
        );

        self.totals = totals;
        for listener in &mut self.listeners {
            listener(&self.totals);
        }
    }

    /// Register a callback for "aggregates changed".
    pub fn subscribe(&mut self, listener: impl FnMut(&ThermalResult) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Σ layer R-values from the last recompute (m²·K/W)
    pub fn total_r_value(&self) -> RValue {
        self.totals.total_r_value
    }

    /// 1 / total R-value, or `UFactor::NoResistance`
    pub fn u_factor(&self) -> UFactor {
        self.totals.u_factor
    }

    /// Σ layer thicknesses (mm)
    pub fn total_thickness_mm(&self) -> Millimeters {
        self.totals.total_thickness_mm
    }

    pub fn totals(&self) -> &ThermalResult {
        &self.totals
    }

    fn layer_mut(&mut self, index: usize) -> CalcResult<&mut Layer> {
        let len = self.layers.len();
        self.layers.get_mut(index).ok_or_else(|| {
            CalcError::invalid_input("layer", index.to_string(), format!("Assembly has {} layers", len))
        })
    }
}

fn check_thickness(thickness: Millimeters) -> CalcResult<()> {
    if thickness.0.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(
            "thickness",
            thickness.0.to_string(),
            "Thickness must be a finite number of millimeters",
        ))
    }
}

impl fmt::Debug for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembly")
            .field("name", &self.name)
            .field("assembly_type", &self.assembly_type)
            .field("layers", &self.layers)
            .field("totals", &self.totals)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

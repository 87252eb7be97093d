//! Assembly-level aggregation over an ordered list of layers.

use serde::{Deserialize, Serialize};

use super::layer::resolve_layer_r_value;
use super::UFactor;
use crate::materials::{MaterialId, MaterialLookup};
use crate::units::{Millimeters, RValue};

/// Anything that can be fed to [`calculate`] as one layer.
pub trait ThermalLayer {
    fn material_id(&self) -> Option<&MaterialId>;
    fn thickness(&self) -> Millimeters;
}

/// Minimal standalone layer description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInput {
    pub material_id: Option<MaterialId>,
    pub thickness_mm: Millimeters,
}

impl LayerInput {
    pub fn new(material_id: Option<MaterialId>, thickness_mm: Millimeters) -> Self {
        LayerInput {
            material_id,
            thickness_mm,
        }
    }
}

impl ThermalLayer for LayerInput {
    fn material_id(&self) -> Option<&MaterialId> {
        self.material_id.as_ref()
    }

    fn thickness(&self) -> Millimeters {
        self.thickness_mm
    }
}

/// Results of one pass over an assembly.
///
/// ## JSON Example
///
/// ```json
/// {
///   "layer_r_values": [0.1528, 2.5, 0.05],
///   "total_r_value": 2.7028,
///   "u_factor": { "finite": 0.37 },
///   "total_thickness_mm": 222.5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermalResult {
    /// Per-layer R-values, same order as the input (m²·K/W)
    pub layer_r_values: Vec<RValue>,

    /// Σ layer R-values (m²·K/W)
    pub total_r_value: RValue,

    /// 1 / total, or the no-resistance sentinel
    pub u_factor: UFactor,

    /// Σ layer thicknesses as entered, including non-positive ones (mm)
    pub total_thickness_mm: Millimeters,
}

/// Compute per-layer and total thermal properties.
///
/// Layers are visited in order and each material is resolved through
/// `lookup`. Unresolved materials contribute zero resistance.
pub fn calculate<L: ThermalLayer>(layers: &[L], lookup: &dyn MaterialLookup) -> ThermalResult {
    let layer_r_values: Vec<RValue> = layers
        .iter()
        .map(|layer| resolve_layer_r_value(lookup, layer.material_id(), layer.thickness()))
        .collect();

    let total_r_value: RValue = layer_r_values.iter().copied().sum();
    let total_thickness_mm: Millimeters = layers.iter().map(ThermalLayer::thickness).sum();

    ThermalResult {
        u_factor: UFactor::from_r_value(total_r_value),
        layer_r_values,
        total_r_value,
        total_thickness_mm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{default_materials, Material};

    fn by_name<'a>(materials: &'a [Material], name: &str) -> &'a Material {
        materials.iter().find(|m| m.name == name).unwrap()
    }

    #[test]
    fn test_empty_assembly() {
        let materials = default_materials();
        let result = calculate::<LayerInput>(&[], &materials);
        assert_eq!(result.total_r_value, RValue(0.0));
        assert_eq!(result.u_factor, UFactor::NoResistance);
        assert_eq!(result.total_thickness_mm, Millimeters(0.0));
        assert!(result.layer_r_values.is_empty());
    }

    #[test]
    fn test_masonry_cavity_wall() {
        let materials = default_materials();
        let layers = [
            LayerInput::new(Some(by_name(&materials, "Brick").id), Millimeters(102.5)),
            LayerInput::new(Some(by_name(&materials, "Mineral Wool").id), Millimeters(100.0)),
            LayerInput::new(Some(by_name(&materials, "Gypsum Board").id), Millimeters(12.5)),
        ];

        let result = calculate(&layers, &materials);

        // 0.1025/0.72 + 0.1/0.04 + 0.0125/0.25
        let expected = 0.1025 / 0.72 + 2.5 + 0.05;
        assert!((result.total_r_value.0 - expected).abs() < 1e-9);
        assert!((result.u_factor.value().unwrap() - 1.0 / expected).abs() < 1e-9);
        assert_eq!(result.total_thickness_mm, Millimeters(215.0));
        assert_eq!(result.layer_r_values.len(), 3);
        assert!((result.layer_r_values[1].0 - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_unresolved_layers_only() {
        let materials = default_materials();
        let layers = [
            LayerInput::new(None, Millimeters(50.0)),
            LayerInput::new(Some(MaterialId::new()), Millimeters(80.0)),
        ];

        let result = calculate(&layers, &materials);
        assert_eq!(result.total_r_value, RValue(0.0));
        assert!(result.u_factor.is_no_resistance());
        assert_eq!(result.total_thickness_mm, Millimeters(130.0));
    }
}

//! Single-layer thermal resistance.

use crate::materials::{Material, MaterialId, MaterialLookup};
use crate::units::{Meters, Millimeters, RValue};

/// R-value of one slab: `(thickness_mm / 1000) / k`.
///
/// Zero when the material is missing, the thickness is not positive, or
/// the conductivity is not positive.
pub fn layer_r_value(material: Option<&Material>, thickness: Millimeters) -> RValue {
    let Some(material) = material else {
        return RValue(0.0);
    };
    let k = material.thermal_conductivity;
    if !(thickness.0 > 0.0 && k.0 > 0.0) || !thickness.0.is_finite() {
        return RValue(0.0);
    }
    Meters::from(thickness) / k
}

/// Resolve `material_id` against `lookup`, then compute [`layer_r_value`].
///
/// `None` and dangling identifiers both contribute zero.
pub fn resolve_layer_r_value(
    lookup: &dyn MaterialLookup,
    material_id: Option<&MaterialId>,
    thickness: Millimeters,
) -> RValue {
    let material = material_id.and_then(|id| lookup.lookup(id));
    layer_r_value(material, thickness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Conductivity;

    fn wool() -> Material {
        Material::new("Mineral Wool", "Insulation", 0.04, 30.0, 840.0, 1.0)
    }

    #[test]
    fn test_mineral_wool_100mm() {
        let r = layer_r_value(Some(&wool()), Millimeters(100.0));
        assert!((r.0 - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_brick_110mm() {
        let brick = Material::new("Brick", "Masonry", 0.72, 1800.0, 840.0, 10.0);
        let r = layer_r_value(Some(&brick), Millimeters(110.0));
        // 0.11 / 0.72 = 0.15278
        assert!((r.0 - 0.152_777_777).abs() < 1e-6);
    }

    #[test]
    fn test_zero_cases() {
        assert_eq!(layer_r_value(None, Millimeters(100.0)), RValue(0.0));
        assert_eq!(layer_r_value(Some(&wool()), Millimeters(0.0)), RValue(0.0));
        assert_eq!(layer_r_value(Some(&wool()), Millimeters(-20.0)), RValue(0.0));

        let mut broken = wool();
        broken.thermal_conductivity = Conductivity(0.0);
        assert_eq!(layer_r_value(Some(&broken), Millimeters(100.0)), RValue(0.0));
        broken.thermal_conductivity = Conductivity(-1.0);
        assert_eq!(layer_r_value(Some(&broken), Millimeters(100.0)), RValue(0.0));
    }

    #[test]
    fn test_resolve_against_lookup() {
        let material = wool();
        let id = material.id;
        let materials = vec![material];

        let r = resolve_layer_r_value(&materials, Some(&id), Millimeters(50.0));
        assert!((r.0 - 1.25).abs() < 1e-12);

        let dangling = MaterialId::new();
        assert_eq!(resolve_layer_r_value(&materials, Some(&dangling), Millimeters(50.0)), RValue(0.0));
        assert_eq!(resolve_layer_r_value(&materials, None, Millimeters(50.0)), RValue(0.0));
    }
}

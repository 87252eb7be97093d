//! Seed materials written to an empty catalog on first run.
//!
//! Reference values (W/(m·K), kg/m³, J/(kg·K), μ):
//!
//! | Name           | Category        | k    | ρ    | c   | μ  |
//! |----------------|-----------------|------|------|-----|----|
//! | Brick          | Masonry         | 0.72 | 1800 | 840 | 10 |
//! | Concrete Block | Masonry         | 1.0  | 2000 | 840 | 6  |
//! | Mineral Wool   | Insulation      | 0.04 | 30   | 840 | 1  |
//! | Gypsum Board   | Board Materials | 0.25 | 900  | 840 | 8  |

use super::Material;

/// The four seed materials, each with a fresh identifier.
pub fn default_materials() -> Vec<Material> {
    vec![
        Material::new("Brick", "Masonry", 0.72, 1800.0, 840.0, 10.0)
            .with_description("Standard clay brick"),
        Material::new("Concrete Block", "Masonry", 1.0, 2000.0, 840.0, 6.0)
            .with_description("Standard hollow concrete block"),
        Material::new("Mineral Wool", "Insulation", 0.04, 30.0, 840.0, 1.0)
            .with_description("Standard mineral wool insulation"),
        Material::new("Gypsum Board", "Board Materials", 0.25, 900.0, 840.0, 8.0)
            .with_description("Standard drywall"),
    ]
}

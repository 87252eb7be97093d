//! End-to-end checks of the thermal and persistence guarantees.

use proptest::prelude::*;
use tempfile::TempDir;

use ufactor_core::assembly::{Assembly, AssemblyType, Layer};
use ufactor_core::calculations::UFactor;
use ufactor_core::file_io::{load_project, save_project};
use ufactor_core::materials::{Material, MaterialCatalog, MaterialId};
use ufactor_core::project::Project;
use ufactor_core::units::Millimeters;

fn seeded_catalog(dir: &TempDir) -> MaterialCatalog {
    MaterialCatalog::open(dir.path().join("materials.json"))
}

fn ids(catalog: &MaterialCatalog) -> Vec<MaterialId> {
    catalog.materials().iter().map(|m| m.id).collect()
}

fn expected_r(catalog: &MaterialCatalog, layers: &[(usize, f64)]) -> f64 {
    layers
        .iter()
        .map(|&(m, mm)| mm / 1000.0 / catalog.materials()[m].thermal_conductivity.0)
        .sum()
}

fn build(catalog: &MaterialCatalog, layers: &[(usize, f64)]) -> Assembly {
    let ids = ids(catalog);
    let mut assembly = Assembly::new("Wall", AssemblyType::Wall);
    for &(m, mm) in layers {
        assembly
            .add_layer(Layer::new(Some(ids[m]), Millimeters(mm)), catalog)
            .unwrap();
    }
    assembly
}

fn assert_contiguous(assembly: &Assembly) {
    let numbers: Vec<usize> = assembly.layers().iter().map(Layer::layer_number).collect();
    let expected: Vec<usize> = (1..=assembly.len()).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn mineral_wool_reference_wall() {
    let dir = TempDir::new().unwrap();
    let catalog = seeded_catalog(&dir);
    let wool = catalog.find_by_name("Mineral Wool").unwrap().id;

    let mut wall = Assembly::new("Reference", AssemblyType::Wall);
    wall.add_layer(Layer::new(Some(wool), Millimeters(100.0)), &catalog).unwrap();

    assert!((wall.total_r_value().0 - 2.5).abs() < 1e-9);
    match wall.u_factor() {
        UFactor::Finite(u) => assert!((u.0 - 0.4).abs() < 1e-9),
        UFactor::NoResistance => panic!("expected a finite U-factor"),
    }
}

#[test]
fn empty_assembly_has_no_resistance() {
    let wall = Assembly::new("Empty", AssemblyType::Floor);
    assert_eq!(wall.total_r_value().0, 0.0);
    assert_eq!(wall.u_factor(), UFactor::NoResistance);
    assert_eq!(wall.total_thickness_mm().0, 0.0);
}

#[test]
fn deleting_a_referenced_material_zeroes_the_layer() {
    let dir = TempDir::new().unwrap();
    let mut catalog = seeded_catalog(&dir);
    let brick = catalog.find_by_name("Brick").unwrap().id;

    let mut project = Project::new("Demolition");
    project
        .assembly_mut(0)
        .unwrap()
        .add_layer(Layer::new(Some(brick), Millimeters(215.0)), &catalog)
        .unwrap();

    assert!(catalog.remove(&brick).is_some());
    project.recompute_all(&catalog);

    assert!(catalog.get_by_id(&brick).is_none());
    let wall = project.assembly(0).unwrap();
    assert_eq!(wall.layer(0).unwrap().r_value().0, 0.0);
    assert!(wall.u_factor().is_no_resistance());
}

#[test]
fn catalog_and_project_survive_a_restart() {
    let dir = TempDir::new().unwrap();
    let mut catalog = seeded_catalog(&dir);
    let cork = catalog
        .add(Material::new("Cork", "Insulation", 0.045, 120.0, 1800.0, 5.0))
        .unwrap();
    catalog.save().unwrap();

    let mut project = Project::new("Restart");
    let roof = project.add_assembly(Assembly::new("Roof", AssemblyType::Roof));
    project
        .assembly_mut(roof)
        .unwrap()
        .add_layer(Layer::new(Some(cork), Millimeters(90.0)), &catalog)
        .unwrap();
    let path = dir.path().join("restart.ufactor");
    save_project(&project, &path).unwrap();

    let catalog = MaterialCatalog::open(catalog.path());
    assert_eq!(catalog.len(), 5);
    let loaded = load_project(&path, &catalog).unwrap();
    let roof = loaded.assembly(1).unwrap();
    assert_eq!(roof.assembly_type(), &AssemblyType::Roof);
    assert!((roof.total_r_value().0 - 2.0).abs() < 1e-9);
}

fn layer_strategy() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((0usize..4, 1.0f64..400.0), 0..8)
}

proptest! {
    #[test]
    fn total_r_is_sum_regardless_of_order(layers in layer_strategy(), seed in any::<u64>()) {
        let dir = TempDir::new().unwrap();
        let catalog = seeded_catalog(&dir);

        let mut shuffled = layers.clone();
        let len = shuffled.len();
        if len > 1 {
            shuffled.rotate_left((seed as usize) % len);
        }

        let forward = build(&catalog, &layers);
        let rotated = build(&catalog, &shuffled);
        let expected = expected_r(&catalog, &layers);

        prop_assert!((forward.total_r_value().0 - expected).abs() < 1e-9);
        prop_assert!((rotated.total_r_value().0 - expected).abs() < 1e-9);

        match forward.u_factor() {
            UFactor::Finite(u) => prop_assert!((u.0 - 1.0 / expected).abs() < 1e-9),
            UFactor::NoResistance => prop_assert!(layers.is_empty()),
        }
    }

    #[test]
    fn numbering_stays_contiguous(
        layers in layer_strategy(),
        ops in prop::collection::vec((0u8..3, 0usize..10, 0usize..10), 0..12),
    ) {
        let dir = TempDir::new().unwrap();
        let catalog = seeded_catalog(&dir);
        let mut assembly = build(&catalog, &layers);
        let ids = ids(&catalog);

        for (op, a, b) in ops {
            match op {
                0 => {
                    assembly
                        .add_layer(Layer::new(Some(ids[a % ids.len()]), Millimeters(b as f64 * 10.0)), &catalog)
                        .unwrap();
                }
                1 => {
                    assembly.remove_layer(a, &catalog);
                }
                _ => {
                    assembly.move_layer(a, b, &catalog);
                }
            }
            assert_contiguous(&assembly);
        }

        let thickness: f64 = assembly.layers().iter().map(|l| l.thickness().0).sum();
        prop_assert!((assembly.total_thickness_mm().0 - thickness).abs() < 1e-9);
    }
}

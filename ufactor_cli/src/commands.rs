//! Command handlers.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use tracing::{info, warn};

use ufactor_core::assembly::{Assembly, AssemblyType, Layer};
use ufactor_core::calculations::UFactor;
use ufactor_core::config::AppConfig;
use ufactor_core::file_io::{load_project, save_project, with_project_extension};
use ufactor_core::materials::{Material, MaterialCatalog, MaterialId};
use ufactor_core::project::Project;
use ufactor_core::units::{Conductivity, Millimeters};

use crate::cli::{AddMaterialArgs, AssemblyTarget, MaterialsCommand, ProjectCommand, UpdateMaterialArgs};

/// Loaded configuration plus the catalog every command resolves against.
pub struct Context {
    pub config: AppConfig,
    pub catalog: MaterialCatalog,
}

impl Context {
    /// Open the catalog, seeding and persisting defaults on a clean first run.
    pub fn open(config: AppConfig, catalog_override: Option<PathBuf>) -> Result<Self> {
        let catalog_path = catalog_override.unwrap_or_else(|| config.catalog_path.clone());
        let first_run = !catalog_path.exists();

        let catalog = if config.settings.seed_defaults {
            MaterialCatalog::open(&catalog_path)
        } else {
            MaterialCatalog::load(&catalog_path)
        };

        if let Some(warning) = catalog.load_warning() {
            warn!("{warning}; leaving the catalog file as it is");
        } else if first_run && !catalog.is_empty() {
            if let Some(dir) = catalog.path().parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
            catalog.save()?;
            info!(path = %catalog.path().display(), "created material catalog");
        }

        Ok(Context { config, catalog })
    }

    fn save_catalog(&self) -> Result<()> {
        if let Some(dir) = self.catalog.path().parent() {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        self.catalog.save()?;
        Ok(())
    }

    /// Accept a UUID or a (case-insensitive) material name.
    fn resolve_material(&self, reference: &str) -> Result<MaterialId> {
        if let Ok(id) = reference.parse::<MaterialId>() {
            return Ok(id);
        }
        match self.catalog.find_by_name(reference) {
            Some(material) => Ok(material.id),
            None => bail!("no material named or identified by '{reference}'"),
        }
    }
}

// ============================================================================
// Materials
// ============================================================================

pub fn run_materials(ctx: &mut Context, command: MaterialsCommand) -> Result<()> {
    match command {
        MaterialsCommand::List { category, json } => {
            let materials: Vec<&Material> = match &category {
                Some(c) => ctx.catalog.in_category(c).collect(),
                None => ctx.catalog.materials().iter().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&materials)?);
            } else {
                print_material_table(&materials);
            }
        }
        MaterialsCommand::Categories => {
            for category in ctx.catalog.list_categories() {
                println!("{category}");
            }
        }
        MaterialsCommand::Add(args) => {
            let id = ctx.catalog.add(material_from_args(args))?;
            ctx.save_catalog()?;
            println!("{id}");
        }
        MaterialsCommand::Update(args) => {
            let id = ctx.resolve_material(&args.material)?;
            let current = ctx
                .catalog
                .get_by_id(&id)
                .with_context(|| format!("no material {id} in the catalog"))?;
            let edited = apply_material_edits(current.clone(), args);
            ctx.catalog.update(edited)?;
            ctx.save_catalog()?;
            println!("Updated {id}");
        }
        MaterialsCommand::Remove { id } => {
            let id: MaterialId = id.parse()?;
            match ctx.catalog.remove(&id) {
                Some(material) => {
                    ctx.save_catalog()?;
                    println!("Removed {} ({id})", material.name);
                }
                None => println!("No material {id}; nothing to remove"),
            }
        }
    }
    Ok(())
}

fn material_from_args(args: AddMaterialArgs) -> Material {
    Material::new(
        args.name,
        args.category,
        args.conductivity,
        args.density,
        args.specific_heat,
        args.vapor_resistance,
    )
    .with_description(args.description)
}

fn apply_material_edits(mut material: Material, args: UpdateMaterialArgs) -> Material {
    if let Some(name) = args.name {
        material.name = name;
    }
    if let Some(category) = args.category {
        material.category = category;
    }
    if let Some(k) = args.conductivity {
        material.thermal_conductivity = Conductivity(k);
    }
    if let Some(density) = args.density {
        material.density = density;
    }
    if let Some(c) = args.specific_heat {
        material.specific_heat = c;
    }
    if let Some(mu) = args.vapor_resistance {
        material.vapor_resistance = mu;
    }
    if let Some(description) = args.description {
        material.description = description;
    }
    material
}

fn print_material_table(materials: &[&Material]) {
    println!(
        "{:<36}  {:<20}  {:<16}  {:>8}  {:>8}  {:>6}  {:>5}",
        "ID", "Name", "Category", "k", "ρ", "c", "μ"
    );
    for m in materials {
        println!(
            "{:<36}  {:<20}  {:<16}  {:>8.3}  {:>8.0}  {:>6.0}  {:>5.1}",
            m.id, m.name, m.category, m.thermal_conductivity.0, m.density, m.specific_heat, m.vapor_resistance
        );
    }
}

// ============================================================================
// Projects
// ============================================================================

pub fn run_project(ctx: &mut Context, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::New {
            path,
            name,
            description,
        } => {
            let path = project_path(ctx, &path)?;
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            let name = name.unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let mut project = Project::new(name);
            project.meta.description = description;
            save_project(&project, &path)?;
            println!("Created {}", path.display());
        }
        ProjectCommand::Show { path, json } => {
            let project = open_project(ctx, &path)?;
            let report = ProjectReport::new(&project);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        ProjectCommand::AddAssembly {
            path,
            name,
            assembly_type,
        } => {
            edit_project(ctx, &path, |project, _| {
                let index = project.add_assembly(Assembly::new(name, AssemblyType::parse(&assembly_type)));
                println!("Added assembly {}", index + 1);
                Ok(())
            })?;
        }
        ProjectCommand::RemoveAssembly { path, target } => {
            edit_project(ctx, &path, |project, _| {
                let removed = target
                    .assembly
                    .checked_sub(1)
                    .and_then(|i| project.remove_assembly(i))
                    .with_context(|| format!("assembly {} does not exist", target.assembly))?;
                println!("Removed assembly '{}'", removed.name());
                Ok(())
            })?;
        }
        ProjectCommand::AddLayer {
            path,
            target,
            material,
            thickness,
            description,
        } => {
            let material_id = ctx.resolve_material(&material)?;
            edit_project(ctx, &path, |project, catalog| {
                let assembly = assembly_mut(project, &target)?;
                let layer = Layer::new(Some(material_id), Millimeters(thickness)).with_description(description);
                let index = assembly.add_layer(layer, catalog)?;
                println!("Added layer {} to '{}'", index + 1, assembly.name());
                Ok(())
            })?;
        }
        ProjectCommand::SetLayer {
            path,
            target,
            layer,
            material,
            thickness,
            description,
        } => {
            let material_id = match material.as_deref() {
                None => None,
                Some(m) if m.eq_ignore_ascii_case("none") => Some(None),
                Some(m) => Some(Some(ctx.resolve_material(m)?)),
            };
            edit_project(ctx, &path, |project, catalog| {
                let assembly = assembly_mut(project, &target)?;
                let index = layer_index(layer)?;
                if let Some(id) = material_id {
                    assembly.set_layer_material(index, id, catalog)?;
                }
                if let Some(mm) = thickness {
                    assembly.set_layer_thickness(index, Millimeters(mm), catalog)?;
                }
                if let Some(text) = description {
                    assembly.set_layer_description(index, text)?;
                }
                Ok(())
            })?;
        }
        ProjectCommand::RemoveLayer { path, target, layer } => {
            edit_project(ctx, &path, |project, catalog| {
                let assembly = assembly_mut(project, &target)?;
                if assembly.remove_layer(layer_index(layer)?, catalog).is_none() {
                    bail!("assembly '{}' has no layer {layer}", assembly.name());
                }
                Ok(())
            })?;
        }
        ProjectCommand::MoveLayer {
            path,
            target,
            from,
            to,
        } => {
            edit_project(ctx, &path, |project, catalog| {
                let assembly = assembly_mut(project, &target)?;
                if !assembly.move_layer(layer_index(from)?, layer_index(to)?, catalog) {
                    println!("Nothing to move");
                }
                Ok(())
            })?;
        }
    }
    Ok(())
}

/// Bare file names land in the configured projects folder.
fn project_path(ctx: &Context, path: &Path) -> Result<PathBuf> {
    let path = with_project_extension(path);
    let is_bare_name = path.parent().map_or(true, |p| p.as_os_str().is_empty());
    if is_bare_name && !path.exists() {
        let dir = ctx.config.ensure_projects_dir()?;
        return Ok(dir.join(path));
    }
    Ok(path)
}

fn open_project(ctx: &Context, path: &Path) -> Result<Project> {
    let path = project_path(ctx, path)?;
    load_project(&path, &ctx.catalog).with_context(|| format!("opening {}", path.display()))
}

/// Load, apply `edit`, save. Nothing is written if `edit` fails.
fn edit_project(
    ctx: &Context,
    path: &Path,
    edit: impl FnOnce(&mut Project, &MaterialCatalog) -> Result<()>,
) -> Result<()> {
    let path = project_path(ctx, path)?;
    let mut project = load_project(&path, &ctx.catalog).with_context(|| format!("opening {}", path.display()))?;
    edit(&mut project, &ctx.catalog)?;
    save_project(&project, &path)?;
    Ok(())
}

fn assembly_mut<'a>(project: &'a mut Project, target: &AssemblyTarget) -> Result<&'a mut Assembly> {
    let count = project.assembly_count();
    target
        .assembly
        .checked_sub(1)
        .and_then(|i| project.assembly_mut(i))
        .with_context(|| format!("assembly {} does not exist (project has {count})", target.assembly))
}

fn layer_index(number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("layer numbers start at 1"),
    }
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProjectReport {
    pub name: String,
    pub description: String,
    pub assemblies: Vec<AssemblyReport>,
}

#[derive(Debug, Serialize)]
pub struct AssemblyReport {
    pub name: String,
    pub assembly_type: String,
    pub total_r_value: f64,
    pub u_factor: UFactor,
    pub total_thickness_mm: f64,
    pub layers: Vec<LayerReport>,
}

#[derive(Debug, Serialize)]
pub struct LayerReport {
    pub layer_number: usize,
    pub material: String,
    pub thickness_mm: f64,
    pub r_value: f64,
    pub description: String,
}

impl ProjectReport {
    pub fn new(project: &Project) -> Self {
        ProjectReport {
            name: project.meta.name.clone(),
            description: project.meta.description.clone(),
            assemblies: project.assemblies().iter().map(AssemblyReport::new).collect(),
        }
    }
}

impl AssemblyReport {
    fn new(assembly: &Assembly) -> Self {
        AssemblyReport {
            name: assembly.name().to_string(),
            assembly_type: assembly.assembly_type().to_string(),
            total_r_value: assembly.total_r_value().0,
            u_factor: assembly.u_factor(),
            total_thickness_mm: assembly.total_thickness_mm().0,
            layers: assembly
                .layers()
                .iter()
                .map(|layer| LayerReport {
                    layer_number: layer.layer_number(),
                    material: match layer.material_id() {
                        None => "(none)".to_string(),
                        Some(_) => layer.material_name().to_string(),
                    },
                    thickness_mm: layer.thickness().0,
                    r_value: layer.r_value().0,
                    description: layer.description().to_string(),
                })
                .collect(),
        }
    }
}

fn print_report(report: &ProjectReport) {
    println!("═══════════════════════════════════════");
    println!("  {}", report.name);
    if !report.description.is_empty() {
        println!("  {}", report.description);
    }
    println!("═══════════════════════════════════════");

    for (i, assembly) in report.assemblies.iter().enumerate() {
        println!();
        println!("{}. {} [{}]", i + 1, assembly.name, assembly.assembly_type);
        if assembly.layers.is_empty() {
            println!("   (no layers)");
        }
        for layer in &assembly.layers {
            println!(
                "   {:>2}  {:<20} {:>8.1} mm   R = {:.3} m²·K/W  {}",
                layer.layer_number, layer.material, layer.thickness_mm, layer.r_value, layer.description
            );
        }
        println!("   ───────────────────────────────────");
        println!("   Thickness: {:.1} mm", assembly.total_thickness_mm);
        println!("   R-value:   {:.3} m²·K/W", assembly.total_r_value);
        println!("   U-factor:  {}", assembly.u_factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use ufactor_core::config::Settings;

    fn context(dir: &TempDir) -> Context {
        let config = AppConfig::resolve(
            dir.path().to_path_buf(),
            Settings {
                projects_dir: Some(dir.path().join("projects")),
                ..Settings::default()
            },
        );
        Context::open(config, None).unwrap()
    }

    #[test]
    fn test_first_run_persists_defaults() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        assert_eq!(ctx.catalog.len(), 4);
        assert!(ctx.catalog.path().exists());
    }

    #[test]
    fn test_malformed_catalog_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let catalog_path = dir.path().join("materials.json");
        std::fs::write(&catalog_path, "oops").unwrap();

        let ctx = context(&dir);
        assert_eq!(ctx.catalog.len(), 4);
        assert_eq!(std::fs::read_to_string(&catalog_path).unwrap(), "oops");
    }

    #[test]
    fn test_project_editing_flow() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let path = dir.path().join("house.ufactor");

        run_project(
            &mut ctx,
            ProjectCommand::New {
                path: path.clone(),
                name: None,
                description: String::new(),
            },
        )
        .unwrap();

        for (material, thickness) in [("brick", 100.0), ("Mineral Wool", 100.0)] {
            run_project(
                &mut ctx,
                ProjectCommand::AddLayer {
                    path: path.clone(),
                    target: AssemblyTarget { assembly: 1 },
                    material: material.to_string(),
                    thickness,
                    description: String::new(),
                },
            )
            .unwrap();
        }

        run_project(
            &mut ctx,
            ProjectCommand::MoveLayer {
                path: path.clone(),
                target: AssemblyTarget { assembly: 1 },
                from: 2,
                to: 1,
            },
        )
        .unwrap();

        let project = open_project(&ctx, &path).unwrap();
        assert_eq!(project.meta.name, "house");
        let wall = project.assembly(0).unwrap();
        assert_eq!(wall.layer(0).unwrap().material_name(), "Mineral Wool");
        let expected = 2.5 + 0.1 / 0.72;
        assert!((wall.total_r_value().0 - expected).abs() < 1e-9);

        let err = run_project(
            &mut ctx,
            ProjectCommand::RemoveLayer {
                path: path.clone(),
                target: AssemblyTarget { assembly: 3 },
                layer: 1,
            },
        );
        assert!(err.is_err());
    }

    fn update_args(material: &str) -> UpdateMaterialArgs {
        UpdateMaterialArgs {
            material: material.to_string(),
            name: None,
            category: None,
            conductivity: None,
            density: None,
            specific_heat: None,
            vapor_resistance: None,
            description: None,
        }
    }

    #[test]
    fn test_update_material_persists_changes() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let id = ctx.catalog.find_by_name("Brick").unwrap().id;

        run_materials(
            &mut ctx,
            MaterialsCommand::Update(UpdateMaterialArgs {
                conductivity: Some(0.8),
                description: Some("Engineering brick".to_string()),
                ..update_args("brick")
            }),
        )
        .unwrap();

        let reloaded = MaterialCatalog::load(ctx.catalog.path());
        let brick = reloaded.get_by_id(&id).unwrap();
        assert_eq!(brick.thermal_conductivity.0, 0.8);
        assert_eq!(brick.description, "Engineering brick");
        assert_eq!(brick.density, 1800.0);
    }

    #[test]
    fn test_invalid_update_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let before = std::fs::read_to_string(ctx.catalog.path()).unwrap();
        let id = ctx.catalog.find_by_name("Gypsum Board").unwrap().id;

        let result = run_materials(
            &mut ctx,
            MaterialsCommand::Update(UpdateMaterialArgs {
                conductivity: Some(-0.25),
                ..update_args(&id.to_string())
            }),
        );

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(ctx.catalog.path()).unwrap(), before);
        assert_eq!(ctx.catalog.get_by_id(&id).unwrap().thermal_conductivity.0, 0.25);
    }

    #[test]
    fn test_remove_assembly() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let path = dir.path().join("annex.ufactor");
        let mut project = Project::new("Annex");
        project.add_assembly(Assembly::new("Roof", AssemblyType::Roof));
        save_project(&project, &path).unwrap();

        run_project(
            &mut ctx,
            ProjectCommand::RemoveAssembly {
                path: path.clone(),
                target: AssemblyTarget { assembly: 1 },
            },
        )
        .unwrap();

        let loaded = open_project(&ctx, &path).unwrap();
        assert_eq!(loaded.assembly_count(), 1);
        assert_eq!(loaded.assembly(0).unwrap().name(), "Roof");

        let missing = run_project(
            &mut ctx,
            ProjectCommand::RemoveAssembly {
                path,
                target: AssemblyTarget { assembly: 5 },
            },
        );
        assert!(missing.is_err());
    }

    #[test]
    fn test_bare_name_goes_to_projects_dir() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let resolved = project_path(&ctx, Path::new("office")).unwrap();
        assert_eq!(resolved, dir.path().join("projects").join("office.ufactor"));
    }

    #[test]
    fn test_report_marks_empty_references() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut project = Project::new("Report");
        project
            .assembly_mut(0)
            .unwrap()
            .add_layer(Layer::new(None, Millimeters(20.0)), &ctx.catalog)
            .unwrap();

        let report = ProjectReport::new(&project);
        let wall = &report.assemblies[0];
        assert_eq!(wall.layers[0].material, "(none)");
        assert!(wall.u_factor.is_no_resistance());
    }
}

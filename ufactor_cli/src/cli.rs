//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// UFactor - R-value and U-factor calculator for building assemblies
#[derive(Parser, Debug)]
#[command(name = "ufactor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Material catalog file to use instead of the configured one
    #[arg(long, global = true, env = "UFACTOR_CATALOG")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect and edit the material catalog
    #[command(subcommand)]
    Materials(MaterialsCommand),

    /// Create, inspect and edit project files
    #[command(subcommand)]
    Project(ProjectCommand),
}

#[derive(Subcommand, Debug)]
pub enum MaterialsCommand {
    /// List catalog materials
    List {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List distinct categories
    Categories,

    /// Add a material to the catalog
    Add(AddMaterialArgs),

    /// Change fields of an existing material
    Update(UpdateMaterialArgs),

    /// Remove a material by identifier
    Remove {
        /// Material UUID
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct AddMaterialArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub category: String,

    /// Thermal conductivity, W/(m·K)
    #[arg(long)]
    pub conductivity: f64,

    /// Density, kg/m³
    #[arg(long)]
    pub density: f64,

    /// Specific heat, J/(kg·K)
    #[arg(long)]
    pub specific_heat: f64,

    /// Vapor resistance factor μ
    #[arg(long, default_value_t = 0.0)]
    pub vapor_resistance: f64,

    #[arg(long, default_value = "")]
    pub description: String,
}

/// Only the given fields change; the rest keep their stored values.
#[derive(Args, Debug)]
pub struct UpdateMaterialArgs {
    /// Material UUID or name
    pub material: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Thermal conductivity, W/(m·K)
    #[arg(long, allow_negative_numbers = true)]
    pub conductivity: Option<f64>,

    /// Density, kg/m³
    #[arg(long, allow_negative_numbers = true)]
    pub density: Option<f64>,

    /// Specific heat, J/(kg·K)
    #[arg(long, allow_negative_numbers = true)]
    pub specific_heat: Option<f64>,

    /// Vapor resistance factor μ
    #[arg(long, allow_negative_numbers = true)]
    pub vapor_resistance: Option<f64>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a project file with one empty wall assembly
    New {
        /// Project file (".ufactor" is appended when there is no extension)
        path: PathBuf,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Print every assembly with its layers and totals
    Show {
        path: PathBuf,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Append an assembly
    AddAssembly {
        path: PathBuf,

        #[arg(long)]
        name: String,

        /// Wall, Roof, Floor, or any other label
        #[arg(long = "type", default_value = "Wall")]
        assembly_type: String,
    },

    /// Remove an assembly and its layers
    RemoveAssembly {
        path: PathBuf,

        #[command(flatten)]
        target: AssemblyTarget,
    },

    /// Append a layer to an assembly
    AddLayer {
        path: PathBuf,

        #[command(flatten)]
        target: AssemblyTarget,

        /// Material UUID or name
        #[arg(long)]
        material: String,

        /// Thickness in millimeters
        #[arg(long, allow_negative_numbers = true)]
        thickness: f64,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change a layer's material, thickness or description
    SetLayer {
        path: PathBuf,

        #[command(flatten)]
        target: AssemblyTarget,

        /// Layer number (1-based)
        #[arg(long)]
        layer: usize,

        /// Material UUID or name; "none" clears it
        #[arg(long)]
        material: Option<String>,

        /// Thickness in millimeters
        #[arg(long, allow_negative_numbers = true)]
        thickness: Option<f64>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a layer
    RemoveLayer {
        path: PathBuf,

        #[command(flatten)]
        target: AssemblyTarget,

        /// Layer number (1-based)
        #[arg(long)]
        layer: usize,
    },

    /// Move a layer to a new position
    MoveLayer {
        path: PathBuf,

        #[command(flatten)]
        target: AssemblyTarget,

        /// Current layer number (1-based)
        #[arg(long)]
        from: usize,

        /// New layer number (1-based)
        #[arg(long)]
        to: usize,
    },
}

#[derive(Args, Debug)]
pub struct AssemblyTarget {
    /// Assembly number (1-based)
    #[arg(long, default_value_t = 1)]
    pub assembly: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_layer() {
        let cli = Cli::try_parse_from([
            "ufactor",
            "project",
            "add-layer",
            "house.ufactor",
            "--assembly",
            "2",
            "--material",
            "Mineral Wool",
            "--thickness",
            "100",
        ])
        .unwrap();

        match cli.command {
            Command::Project(ProjectCommand::AddLayer {
                target,
                material,
                thickness,
                ..
            }) => {
                assert_eq!(target.assembly, 2);
                assert_eq!(material, "Mineral Wool");
                assert_eq!(thickness, 100.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_materials_update() {
        let cli = Cli::try_parse_from([
            "ufactor",
            "materials",
            "update",
            "Brick",
            "--conductivity",
            "0.8",
            "--description",
            "Engineering brick",
        ])
        .unwrap();

        match cli.command {
            Command::Materials(MaterialsCommand::Update(args)) => {
                assert_eq!(args.material, "Brick");
                assert_eq!(args.conductivity, Some(0.8));
                assert_eq!(args.description.as_deref(), Some("Engineering brick"));
                assert!(args.name.is_none());
                assert!(args.density.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_materials_list() {
        let cli = Cli::try_parse_from(["ufactor", "-v", "materials", "list", "--category", "Masonry"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Materials(MaterialsCommand::List { category: Some(ref c), json: false }) if c == "Masonry"
        ));
    }
}

//! # ufactor_core - Building Envelope Thermal Engine
//!
//! `ufactor_core` computes R-values and U-factors for layered wall, roof
//! and floor assemblies, backed by an editable material catalog and a
//! JSON project format.
//!
//! ## Design Philosophy
//!
//! - **Explicit dependencies**: the catalog is passed to whatever needs
//!   material resolution, never reached through a global
//! - **Never stale**: every assembly mutation recomputes before returning
//! - **Tolerant references**: a layer pointing at a deleted material simply
//!   contributes no resistance
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use ufactor_core::assembly::Layer;
//! use ufactor_core::materials::default_materials;
//! use ufactor_core::project::Project;
//! use ufactor_core::units::Millimeters;
//!
//! let materials = default_materials();
//! let wool = materials.iter().find(|m| m.name == "Mineral Wool").unwrap().id;
//!
//! let mut project = Project::new("Riverside Terrace");
//! let wall = project.assembly_mut(0).unwrap();
//! wall.add_layer(Layer::new(Some(wool), Millimeters(100.0)), &materials)?;
//!
//! println!("U = {}", wall.u_factor());
//! let json = ufactor_core::file_io::serialize_project(&project)?;
//! # let _ = json;
//! # Ok::<(), ufactor_core::errors::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Material records and the JSON-backed catalog store
//! - [`assembly`] - Ordered layers with cached thermal aggregates
//! - [`calculations`] - Pure R-value / U-factor functions
//! - [`project`] - Project container and metadata
//! - [`file_io`] - Project file format and atomic saves
//! - [`config`] - Per-user paths and settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod assembly;
pub mod calculations;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use assembly::{Assembly, AssemblyType, Layer};
pub use calculations::UFactor;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project};
pub use materials::{Material, MaterialCatalog, MaterialId, MaterialLookup};
pub use project::{Project, ProjectMetadata};

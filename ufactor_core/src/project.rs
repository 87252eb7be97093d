//! # Project Data Structures
//!
//! The `Project` struct is the root container for a set of assemblies.
//! Projects serialize to `.ufactor` files as camelCase JSON (see
//! [`file_io`](crate::file_io)).
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (name, description, timestamps, version)
//! └── assemblies: Vec<Assembly> (ordered, each owning its layers)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ufactor_core::project::Project;
//!
//! let project = Project::new("Riverside Terrace");
//! assert_eq!(project.assembly_count(), 1);
//! assert_eq!(project.assemblies()[0].name(), "Wall Assembly 1");
//! ```

use chrono::{DateTime, Utc};

use crate::assembly::{Assembly, AssemblyType};
use crate::materials::MaterialLookup;

/// Current format version written to project files
pub const FORMAT_VERSION: &str = "1.0";

/// Name given to projects created without one
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Project";

/// Name of the assembly seeded into a fresh project
pub const DEFAULT_ASSEMBLY_NAME: &str = "Wall Assembly 1";

/// Root project container.
///
/// Owns its assemblies outright; layers only reference catalog materials
/// by identifier, so dropping a project never touches the catalog.
#[derive(Debug)]
pub struct Project {
    pub meta: ProjectMetadata,
    assemblies: Vec<Assembly>,
}

impl Project {
    /// Create a project seeded with one empty wall assembly.
    pub fn new(name: impl Into<String>) -> Self {
        let mut project = Project::empty(name);
        project
            .assemblies
            .push(Assembly::new(DEFAULT_ASSEMBLY_NAME, AssemblyType::Wall));
        project
    }

    /// Create a project with no assemblies.
    pub fn empty(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                name: name.into(),
                description: String::new(),
                created: now,
                modified: now,
                version: FORMAT_VERSION.to_string(),
            },
            assemblies: Vec::new(),
        }
    }

    /// Assemble a project from already-built parts (used by file loading).
    pub fn from_parts(meta: ProjectMetadata, assemblies: Vec<Assembly>) -> Self {
        Project { meta, assemblies }
    }

    pub fn assemblies(&self) -> &[Assembly] {
        &self.assemblies
    }

    pub fn assembly(&self, index: usize) -> Option<&Assembly> {
        self.assemblies.get(index)
    }

    /// Get a mutable assembly.
    ///
    /// Note: This marks the project as modified whenever the index exists,
    /// since the caller is expected to change something.
    pub fn assembly_mut(&mut self, index: usize) -> Option<&mut Assembly> {
        if index < self.assemblies.len() {
            self.touch();
            self.assemblies.get_mut(index)
        } else {
            None
        }
    }

    /// Append an assembly. Returns its index.
    pub fn add_assembly(&mut self, assembly: Assembly) -> usize {
        self.assemblies.push(assembly);
        self.touch();
        self.assemblies.len() - 1
    }

    pub fn remove_assembly(&mut self, index: usize) -> Option<Assembly> {
        if index >= self.assemblies.len() {
            return None;
        }
        let removed = self.assemblies.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn find_assembly(&self, name: &str) -> Option<&Assembly> {
        self.assemblies.iter().find(|a| a.name() == name)
    }

    pub fn assembly_count(&self) -> usize {
        self.assemblies.len()
    }

    /// Re-resolve every layer after the catalog changed.
    pub fn recompute_all(&mut self, lookup: &dyn MaterialLookup) {
        for assembly in &mut self.assemblies {
            assembly.recompute(lookup);
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new(DEFAULT_PROJECT_NAME)
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMetadata {
    pub name: String,

    pub description: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,

    /// Format version (for migration compatibility)
    pub version: String,
}

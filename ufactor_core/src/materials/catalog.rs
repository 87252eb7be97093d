//! # Material Catalog Store
//!
//! An in-memory list of [`Material`] records bound to a JSON file.
//!
//! - Loading never fails: a missing file is an empty catalog, and an
//!   unreadable or malformed file is an empty catalog plus a warning.
//! - Mutations stay in memory until [`MaterialCatalog::save`] is called.
//! - Saves are atomic (temp file, fsync, rename).
//!
//! ## Example
//!
//! ```rust,no_run
//! use ufactor_core::materials::{Material, MaterialCatalog};
//! use std::path::Path;
//!
//! let mut catalog = MaterialCatalog::open(Path::new("materials.json"));
//! let id = catalog.add(Material::new("Cork", "Insulation", 0.045, 120.0, 1800.0, 5.0))?;
//! assert!(catalog.get_by_id(&id).is_some());
//! catalog.save()?;
//! # Ok::<(), ufactor_core::errors::CalcError>(())
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{default_materials, Material, MaterialId, MaterialLookup};
use crate::errors::{CalcError, CalcResult, FieldViolation};
use crate::file_io::write_atomic;

/// File name of the catalog inside the application data folder
pub const CATALOG_FILE_NAME: &str = "materials.json";

/// JSON-backed material catalog.
#[derive(Debug, Clone)]
pub struct MaterialCatalog {
    path: PathBuf,
    materials: Vec<Material>,
    load_warning: Option<CalcError>,
}

impl MaterialCatalog {
    /// Create an empty catalog bound to `path` without touching the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        MaterialCatalog {
            path: path.into(),
            materials: Vec::new(),
            load_warning: None,
        }
    }

    /// Read the catalog file at `path`.
    ///
    /// A missing file yields an empty catalog. Read failures and malformed
    /// JSON also yield an empty catalog; the cause is logged and kept in
    /// [`load_warning`](Self::load_warning).
    ///
    /// Records that fail validation or repeat an earlier identifier are
    /// skipped and reported as a `ValidationFailed` warning. Records with a
    /// nil identifier get a fresh one, as [`add`](Self::add) would assign.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut catalog = MaterialCatalog::new(path);

        let contents = match fs::read_to_string(&catalog.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %catalog.path.display(), "no material catalog yet");
                return catalog;
            }
            Err(e) => {
                let error = CalcError::file_error("read", catalog.path.display().to_string(), e.to_string());
                warn!(%error, "material catalog unreadable, starting empty");
                catalog.load_warning = Some(error);
                return catalog;
            }
        };

        match serde_json::from_str::<Vec<Material>>(&contents) {
            Ok(records) => {
                let (materials, violations) = admit_records(records);
                debug!(path = %catalog.path.display(), count = materials.len(), "loaded material catalog");
                catalog.materials = materials;
                if !violations.is_empty() {
                    let error = CalcError::ValidationFailed { violations };
                    warn!(%error, "skipped invalid material catalog records");
                    catalog.load_warning = Some(error);
                }
            }
            Err(e) => {
                let error = CalcError::malformed(catalog.path.display().to_string(), e.to_string());
                warn!(%error, "material catalog malformed, starting empty");
                catalog.load_warning = Some(error);
            }
        }

        catalog
    }

    /// [`load`](Self::load), then seed the default materials if nothing was loaded.
    ///
    /// The seeded records are not written until the caller saves.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut catalog = MaterialCatalog::load(path);
        if catalog.is_empty() {
            catalog.seed_defaults();
        }
        catalog
    }

    /// Append the default materials. Returns how many were added.
    pub fn seed_defaults(&mut self) -> usize {
        let defaults = default_materials();
        let count = defaults.len();
        self.materials.extend(defaults);
        info!(count, "seeded default materials");
        count
    }

    /// Write the full catalog to its backing file, replacing it atomically.
    pub fn save(&self) -> CalcResult<()> {
        let json = serde_json::to_string_pretty(&self.materials).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        write_atomic(&self.path, json.as_bytes())?;
        debug!(path = %self.path.display(), count = self.materials.len(), "saved material catalog");
        Ok(())
    }

    /// Validate and append a material.
    ///
    /// A nil identifier is replaced with a fresh one. Returns the stored identifier.
    pub fn add(&mut self, mut material: Material) -> CalcResult<MaterialId> {
        material.validate()?;

        if material.id.is_nil() {
            material.id = MaterialId::new();
        } else if self.get_by_id(&material.id).is_some() {
            return Err(CalcError::invalid_input(
                "id",
                material.id.to_string(),
                "A material with this identifier already exists",
            ));
        }

        let id = material.id;
        self.materials.push(material);
        Ok(id)
    }

    /// Validate and replace the record with the same identifier.
    pub fn update(&mut self, material: Material) -> CalcResult<()> {
        material.validate()?;

        let slot = self
            .materials
            .iter_mut()
            .find(|m| m.id == material.id)
            .ok_or_else(|| CalcError::material_not_found(material.id))?;
        *slot = material;
        Ok(())
    }

    /// Remove a material. Removing an unknown identifier is a no-op.
    pub fn remove(&mut self, id: &MaterialId) -> Option<Material> {
        let index = self.materials.iter().position(|m| &m.id == id)?;
        Some(self.materials.remove(index))
    }

    pub fn get_by_id(&self, id: &MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| &m.id == id)
    }

    /// First material whose name matches, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&Material> {
        let name = name.trim();
        self.materials.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Distinct categories in alphabetical order
    pub fn list_categories(&self) -> Vec<String> {
        self.materials
            .iter()
            .map(|m| m.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Materials in one category, in catalog order
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Material> + 'a {
        self.materials.iter().filter(move |m| m.category == category)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why the last load fell back to an empty catalog or skipped records
    pub fn load_warning(&self) -> Option<&CalcError> {
        self.load_warning.as_ref()
    }
}

/// Keep the records `add` would accept, in file order.
///
/// Violations are reported per record as `materials[i].field`.
fn admit_records(records: Vec<Material>) -> (Vec<Material>, Vec<FieldViolation>) {
    let mut seen = HashSet::new();
    let mut admitted = Vec::with_capacity(records.len());
    let mut violations = Vec::new();

    for (index, mut material) in records.into_iter().enumerate() {
        if let Err(e) = material.validate() {
            violations.extend(
                e.violations()
                    .iter()
                    .map(|v| FieldViolation::new(format!("materials[{index}].{}", v.field), v.message.clone())),
            );
            continue;
        }
        if material.id.is_nil() {
            material.id = MaterialId::new();
        }
        if !seen.insert(material.id) {
            violations.push(FieldViolation::new(
                format!("materials[{index}].id"),
                format!("Identifier {} is already used by an earlier record.", material.id),
            ));
            continue;
        }
        admitted.push(material);
    }

    (admitted, violations)
}

impl MaterialLookup for MaterialCatalog {
    fn lookup(&self, id: &MaterialId) -> Option<&Material> {
        self.get_by_id(id)
    }
}

//! # File I/O Module
//!
//! Project file reading/writing and the atomic write shared with the
//! material catalog.
//!
//! - **Atomic saves**: write to `<name>.tmp`, fsync, rename over the target
//! - **Stable format**: camelCase keys, `version` tag checked on load
//! - **Fresh aggregates**: R-values are never read from the file; they are
//!   recomputed against the caller's catalog
//!
//! ## File Format
//!
//! ```json
//! {
//!   "projectName": "Riverside Terrace",
//!   "description": "",
//!   "createdDate": "2025-03-01T09:30:00Z",
//!   "lastModified": "2025-03-02T16:05:12Z",
//!   "version": "1.0",
//!   "assemblies": [
//!     {
//!       "name": "Wall Assembly 1",
//!       "type": "Wall",
//!       "layers": [
//!         {
//!           "layerNumber": 1,
//!           "materialId": "6f1c1a5e-2f36-4f7d-9f43-3f2b0d0c9a10",
//!           "thickness": 100.0,
//!           "description": "",
//!           "materialName": "Mineral Wool"
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use ufactor_core::file_io::{load_project, save_project};
//! use ufactor_core::materials::MaterialCatalog;
//! use ufactor_core::project::Project;
//! use std::path::Path;
//!
//! let catalog = MaterialCatalog::open("materials.json");
//! let project = Project::new("Riverside Terrace");
//! save_project(&project, Path::new("riverside.ufactor"))?;
//!
//! let loaded = load_project(Path::new("riverside.ufactor"), &catalog)?;
//! assert_eq!(loaded.meta.name, "Riverside Terrace");
//! # Ok::<(), ufactor_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembly::{Assembly, AssemblyType, Layer};
use crate::errors::{CalcError, CalcResult};
use crate::materials::{MaterialId, MaterialLookup};
use crate::project::{Project, ProjectMetadata, DEFAULT_PROJECT_NAME, FORMAT_VERSION};
use crate::units::Millimeters;

/// Default project file extension (without the dot)
pub const PROJECT_EXTENSION: &str = "ufactor";

/// Source label used in errors when parsing text that did not come from a file
const IN_MEMORY_SOURCE: &str = "<input>";

/// One entry of an open/save dialog filter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    /// Extensions without the dot; `*` accepts everything
    pub extensions: &'static [&'static str],
}

/// Filters for project open dialogs: project files first, then all files.
pub fn project_file_filters() -> [FileFilter; 2] {
    [
        FileFilter {
            name: "UFactor Project Files",
            extensions: &[PROJECT_EXTENSION],
        },
        FileFilter {
            name: "All Files",
            extensions: &["*"],
        },
    ]
}

/// Append the project extension when `path` has none.
pub fn with_project_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(PROJECT_EXTENSION)
    }
}

// ============================================================================
// On-disk records
// ============================================================================

/// Project file root object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default = "default_project_name")]
    pub project_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    pub created_date: DateTime<Utc>,

    #[serde(default = "Utc::now", deserialize_with = "timestamp::deserialize")]
    pub last_modified: DateTime<Utc>,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub assemblies: Vec<AssemblyRecord>,
}

/// One assembly as stored in a project file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyRecord {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub assembly_type: AssemblyType,

    #[serde(default)]
    pub layers: Vec<LayerRecord>,
}

/// One layer as stored in a project file.
///
/// `materialName` is informational; `layerNumber` is rewritten on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRecord {
    #[serde(default)]
    pub layer_number: i64,

    /// UUID string; the nil UUID or an empty string means no material
    #[serde(default)]
    pub material_id: String,

    /// Millimeters
    #[serde(default)]
    pub thickness: f64,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub material_name: String,
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

impl From<&Project> for ProjectFile {
    fn from(project: &Project) -> Self {
        ProjectFile {
            project_name: project.meta.name.clone(),
            description: project.meta.description.clone(),
            created_date: project.meta.created,
            last_modified: project.meta.modified,
            version: project.meta.version.clone(),
            assemblies: project.assemblies().iter().map(AssemblyRecord::from).collect(),
        }
    }
}

impl From<&Assembly> for AssemblyRecord {
    fn from(assembly: &Assembly) -> Self {
        AssemblyRecord {
            name: assembly.name().to_string(),
            assembly_type: assembly.assembly_type().clone(),
            layers: assembly.layers().iter().map(LayerRecord::from).collect(),
        }
    }
}

impl From<&Layer> for LayerRecord {
    fn from(layer: &Layer) -> Self {
        LayerRecord {
            layer_number: layer.layer_number() as i64,
            material_id: layer.material_id().copied().unwrap_or_default().to_string(),
            thickness: layer.thickness().0,
            description: layer.description().to_string(),
            material_name: layer.material_name().to_string(),
        }
    }
}

impl LayerRecord {
    fn into_layer(self, source: &str) -> CalcResult<Layer> {
        let raw_id = self.material_id.trim();
        let material_id = if raw_id.is_empty() {
            None
        } else {
            let id: MaterialId = raw_id.parse().map_err(|_| {
                CalcError::malformed(source, format!("invalid materialId '{}'", self.material_id))
            })?;
            Some(id)
        };

        Ok(Layer::new(material_id, Millimeters(self.thickness))
            .with_description(self.description)
            .with_material_name(self.material_name))
    }
}

impl ProjectFile {
    fn into_project(self, source: &str, lookup: &dyn MaterialLookup) -> CalcResult<Project> {
        validate_version(&self.version)?;

        let mut assemblies = Vec::with_capacity(self.assemblies.len());
        for record in self.assemblies {
            let in_sequence = record
                .layers
                .iter()
                .enumerate()
                .all(|(i, l)| l.layer_number == i as i64 + 1);
            if !in_sequence {
                debug!(assembly = %record.name, "renumbering out-of-sequence layers");
            }

            let layers = record
                .layers
                .into_iter()
                .map(|l| l.into_layer(source))
                .collect::<CalcResult<Vec<_>>>()?;
            assemblies.push(Assembly::from_layers(record.name, record.assembly_type, layers, lookup)?);
        }

        let meta = ProjectMetadata {
            name: self.project_name,
            description: self.description,
            created: self.created_date,
            modified: self.last_modified,
            version: self.version,
        };
        Ok(Project::from_parts(meta, assemblies))
    }
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    /// RFC 3339 with any offset, or a bare local-style timestamp taken as UTC.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}

// ============================================================================
// Text conversion
// ============================================================================

/// Serialize a project to pretty-printed JSON.
pub fn serialize_project(project: &Project) -> CalcResult<String> {
    serde_json::to_string_pretty(&ProjectFile::from(project)).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })
}

/// Rebuild a project from JSON text, recomputing every assembly against `lookup`.
///
/// # Returns
///
/// * `Err(CalcError::MalformedFile)` - not JSON, wrong shape, bad identifier
/// * `Err(CalcError::VersionMismatch)` - unsupported major version
pub fn deserialize_project(text: &str, lookup: &dyn MaterialLookup) -> CalcResult<Project> {
    parse_project(text, IN_MEMORY_SOURCE, lookup)
}

fn parse_project(text: &str, source: &str, lookup: &dyn MaterialLookup) -> CalcResult<Project> {
    let file: ProjectFile = serde_json::from_str(text).map_err(|e| CalcError::malformed(source, e.to_string()))?;
    file.into_project(source, lookup)
}

// ============================================================================
// Disk access
// ============================================================================

/// Write `contents` to `path` so that readers see either the old file or the new one.
///
/// The save process:
/// 1. Write to a sibling `<file name>.tmp`
/// 2. Sync to disk (fsync)
/// 3. Rename over `path` (atomic on most filesystems)
pub fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = temp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    let written = tmp_file
        .write_all(contents)
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))
        .and_then(|_| {
            tmp_file.sync_all().map_err(|e| {
                CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
            })
        });
    if let Err(e) = written {
        drop(tmp_file);
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save a project snapshot with atomic write semantics.
///
/// The in-memory project is not modified; call [`Project::touch`] on edits.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serialize_project(project)?;
    write_atomic(path, json.as_bytes())?;
    debug!(path = %path.display(), assemblies = project.assembly_count(), "saved project");
    Ok(())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded, aggregates recomputed
/// * `Err(CalcError::FileError)` - I/O error
/// * `Err(CalcError::MalformedFile)` - Invalid JSON or structure
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
pub fn load_project(path: &Path, lookup: &dyn MaterialLookup) -> CalcResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project = parse_project(&contents, &path.display().to_string(), lookup)?;
    debug!(path = %path.display(), assemblies = project.assembly_count(), "loaded project");
    Ok(project)
}

/// Validate that a file version is compatible with the current format.
///
/// The major component must match; newer minor versions are accepted and
/// their unknown fields ignored.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: FORMAT_VERSION.to_string(),
    };

    let file_major = file_version
        .trim()
        .split('.')
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .ok_or_else(mismatch)?;
    let current_major = FORMAT_VERSION
        .split('.')
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .ok_or_else(mismatch)?;

    if file_major != current_major {
        return Err(mismatch());
    }
    Ok(())
}

//! # Configuration
//!
//! Where the catalog and projects live, plus a handful of user settings.
//!
//! Resolution order for the application data folder:
//! 1. `UFACTOR_DATA_DIR` environment variable
//! 2. `<platform data dir>/UFactor` (e.g. `~/.local/share/UFactor`)
//!
//! Inside it, `config.toml` may override individual paths:
//!
//! ```toml
//! catalog_path = "/shared/office/materials.json"
//! projects_dir = "/home/me/Documents/Thermal"
//! seed_defaults = true
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::materials::CATALOG_FILE_NAME;

/// Environment variable overriding the application data folder
pub const DATA_DIR_ENV: &str = "UFACTOR_DATA_DIR";

/// Folder name under the platform data directory
pub const APP_DIR_NAME: &str = "UFactor";

/// Folder name under the user's documents directory
pub const PROJECTS_DIR_NAME: &str = "UFactor Projects";

/// Settings file name inside the data folder
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// User-editable settings from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog file to use instead of `<data dir>/materials.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,

    /// Default folder for project files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_dir: Option<PathBuf>,

    /// Seed the default materials when the catalog comes up empty
    pub seed_defaults: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            catalog_path: None,
            projects_dir: None,
            seed_defaults: true,
        }
    }
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> CalcResult<Self> {
        toml::from_str(contents).map_err(|e| CalcError::config(format!("invalid {}: {}", CONFIG_FILE_NAME, e)))
    }
}

/// Resolved locations used by the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Folder holding the catalog and `config.toml`
    pub data_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub projects_dir: PathBuf,
    pub settings: Settings,
}

impl AppConfig {
    /// Resolve the data folder from the environment and platform, then read settings.
    pub fn load() -> CalcResult<Self> {
        let data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .ok_or_else(|| CalcError::config("Could not determine the user data directory"))?,
        };
        AppConfig::load_from(data_dir)
    }

    /// Read `config.toml` from `data_dir` (if present) and resolve paths.
    pub fn load_from(data_dir: impl Into<PathBuf>) -> CalcResult<Self> {
        let data_dir = data_dir.into();
        let config_path = data_dir.join(CONFIG_FILE_NAME);

        let settings = match fs::read_to_string(&config_path) {
            Ok(contents) => Settings::from_toml_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                return Err(CalcError::file_error("read", config_path.display().to_string(), e.to_string()));
            }
        };

        let config = AppConfig::resolve(data_dir, settings);
        debug!(
            catalog = %config.catalog_path.display(),
            projects = %config.projects_dir.display(),
            "resolved configuration"
        );
        Ok(config)
    }

    /// Combine a data folder with settings overrides.
    pub fn resolve(data_dir: PathBuf, settings: Settings) -> Self {
        let catalog_path = settings
            .catalog_path
            .clone()
            .unwrap_or_else(|| data_dir.join(CATALOG_FILE_NAME));
        let projects_dir = settings
            .projects_dir
            .clone()
            .unwrap_or_else(|| default_projects_dir(&data_dir));

        AppConfig {
            data_dir,
            catalog_path,
            projects_dir,
            settings,
        }
    }

    /// Create the catalog's parent folder so a first save can succeed.
    pub fn ensure_data_dir(&self) -> CalcResult<()> {
        let dir = self.catalog_path.parent().unwrap_or(&self.data_dir);
        create_dir(dir)
    }

    /// Create (if needed) and return the default projects folder.
    pub fn ensure_projects_dir(&self) -> CalcResult<&Path> {
        create_dir(&self.projects_dir)?;
        Ok(&self.projects_dir)
    }
}

/// `<documents>/UFactor Projects`, falling back to the data folder.
fn default_projects_dir(data_dir: &Path) -> PathBuf {
    dirs::document_dir()
        .map(|d| d.join(PROJECTS_DIR_NAME))
        .unwrap_or_else(|| data_dir.join(PROJECTS_DIR_NAME))
}

fn create_dir(dir: &Path) -> CalcResult<()> {
    fs::create_dir_all(dir).map_err(|e| CalcError::file_error("create directory", dir.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.catalog_path, dir.path().join(CATALOG_FILE_NAME));
        assert!(config.settings.seed_defaults);
        assert!(config.projects_dir.ends_with(PROJECTS_DIR_NAME));
    }

    #[test]
    fn test_config_file_overrides() {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("shared").join("office.json");
        let projects = dir.path().join("work");
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            format!(
                "catalog_path = {:?}\nprojects_dir = {:?}\nseed_defaults = false\n",
                catalog.display().to_string(),
                projects.display().to_string()
            ),
        )
        .unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.catalog_path, catalog);
        assert_eq!(config.projects_dir, projects);
        assert!(!config.settings.seed_defaults);

        config.ensure_data_dir().unwrap();
        assert!(dir.path().join("shared").is_dir());
        assert_eq!(config.ensure_projects_dir().unwrap(), projects.as_path());
        assert!(projects.is_dir());
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "seed_defaults = \"maybe\"").unwrap();
        let err = AppConfig::load_from(dir.path()).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_toml_str("projects_dir = \"/tmp/p\"").unwrap();
        assert_eq!(settings.projects_dir, Some(PathBuf::from("/tmp/p")));
        assert!(settings.catalog_path.is_none());
        assert!(settings.seed_defaults);
    }
}

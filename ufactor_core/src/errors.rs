//! # Error Types
//!
//! Structured error types for ufactor_core. Every variant carries enough
//! context (field name, file path, operation) for a front end to present
//! an actionable message without parsing strings.
//!
//! ## Example
//!
//! ```rust
//! use ufactor_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(thickness_mm: f64) -> CalcResult<()> {
//!     if !thickness_mm.is_finite() {
//!         return Err(CalcError::invalid_input(
//!             "thickness",
//!             thickness_mm.to_string(),
//!             "Thickness must be a finite number",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for ufactor_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// One rejected field of a material record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldViolation {
    /// Field name as it appears in the catalog file (camelCase)
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldViolation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Structured error type for catalog, assembly and project operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, bad index)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A material record failed validation; lists every offending field
    #[error("Material validation failed: {}", join_violations(.violations))]
    ValidationFailed { violations: Vec<FieldViolation> },

    /// Material not found in the catalog
    #[error("Material not found: {material_id}")]
    MaterialNotFound { material_id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File exists but its contents cannot be reconstructed
    #[error("Malformed file '{path}': {reason}")]
    MalformedFile { path: String, reason: String },

    /// JSON serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Configuration could not be read or resolved
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_id: impl fmt::Display) -> Self {
        CalcError::MaterialNotFound {
            material_id: material_id.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedFile error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::MalformedFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(reason: impl Into<String>) -> Self {
        CalcError::Config { reason: reason.into() }
    }

    /// Field-level violations, empty for every variant except `ValidationFailed`
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            CalcError::ValidationFailed { violations } => violations,
            _ => &[],
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::ValidationFailed { .. } => "VALIDATION_FAILED",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::MalformedFile { .. } => "MALFORMED_FILE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Config { .. } => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("thickness", "NaN", "Thickness must be a finite number");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::malformed("a.ufactor", "bad").error_code(), "MALFORMED_FILE");
        assert_eq!(CalcError::material_not_found("abc").error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let error = CalcError::ValidationFailed {
            violations: vec![
                FieldViolation::new("name", "Name is required."),
                FieldViolation::new("thermalConductivity", "Must be a positive number."),
            ],
        };
        let message = error.to_string();
        assert!(message.contains("name: Name is required."));
        assert!(message.contains("thermalConductivity"));
        assert_eq!(error.violations().len(), 2);
        assert!(CalcError::config("x").violations().is_empty());
    }
}

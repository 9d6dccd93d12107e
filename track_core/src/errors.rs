//! # Error Types
//!
//! Structured error types for track_core. These cover validation, catalog
//! lookups, and file operations. Note that the weight calculator itself does
//! NOT use these: an incomplete property bag is the normal mid-edit state and
//! is signalled by `Option::None`, never by an error (see [`crate::weight`]).
//!
//! ## Example
//!
//! ```rust
//! use track_core::errors::{TrackError, TrackResult};
//!
//! fn validate_safety_factor(factor: f64) -> TrackResult<()> {
//!     if factor < 1.0 {
//!         return Err(TrackError::InvalidInput {
//!             field: "safety_factor".to_string(),
//!             value: factor.to_string(),
//!             reason: "Safety factor must be >= 1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for track_core operations
pub type TrackResult<T> = Result<T, TrackError>;

/// Structured error type for tracker operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic handling by UI layers and other consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum TrackError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Catalog entry (material, profile, fastener) not found
    #[error("{kind} not found: {name}")]
    CatalogEntryNotFound { kind: String, name: String },

    /// Attempted in-place mutation of a shared global catalog entry
    #[error("Global {kind} '{name}' is read-only; fork a project copy instead")]
    GlobalEntryImmutable { kind: String, name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TrackError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TrackError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        TrackError::MissingField {
            field: field.into(),
        }
    }

    /// Create a CatalogEntryNotFound error
    pub fn catalog_entry_not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        TrackError::CatalogEntryNotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a GlobalEntryImmutable error
    pub fn global_entry_immutable(kind: impl Into<String>, name: impl Into<String>) -> Self {
        TrackError::GlobalEntryImmutable {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TrackError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        TrackError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TrackError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            TrackError::InvalidInput { .. } => "INVALID_INPUT",
            TrackError::MissingField { .. } => "MISSING_FIELD",
            TrackError::CatalogEntryNotFound { .. } => "CATALOG_ENTRY_NOT_FOUND",
            TrackError::GlobalEntryImmutable { .. } => "GLOBAL_ENTRY_IMMUTABLE",
            TrackError::FileError { .. } => "FILE_ERROR",
            TrackError::FileLocked { .. } => "FILE_LOCKED",
            TrackError::SerializationError { .. } => "SERIALIZATION_ERROR",
            TrackError::VersionMismatch { .. } => "VERSION_MISMATCH",
            TrackError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = TrackError::invalid_input("safety_factor", "0.5", "Must be >= 1");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: TrackError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TrackError::missing_field("quantity").error_code(),
            "MISSING_FIELD"
        );
        assert_eq!(
            TrackError::catalog_entry_not_found("Material", "unobtainium").error_code(),
            "CATALOG_ENTRY_NOT_FOUND"
        );
    }

    #[test]
    fn test_recoverable() {
        let locked = TrackError::file_locked("robot.bst", "pat@team", "2025-01-04T12:00:00Z");
        assert!(locked.is_recoverable());
        assert!(!TrackError::missing_field("x").is_recoverable());
    }
}

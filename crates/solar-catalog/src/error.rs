//! # Catalog Error Types
//!
//! Error types for reading, validating and replacing catalogs.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / ValidationError                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError (this module) ← Adds the file path                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in quote-api) ← Serialized for the client                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use solar_core::ValidationError;
use thiserror::Error;

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File system access failed.
    ///
    /// ## When This Occurs
    /// - Catalog file missing and seeding disabled
    /// - Upload directory not writable
    #[error("Catalog I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a catalog document.
    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Well-formed, but breaks a catalog rule (duplicate code, zero rating).
    #[error("Catalog rejected: {0}")]
    Invalid(#[from] ValidationError),

    /// Serializing a catalog for disk failed.
    #[error("Catalog serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl CatalogError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

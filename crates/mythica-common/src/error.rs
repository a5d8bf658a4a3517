//! Error types for Project Mythica.
//!
//! The per-tick simulation never fails; these errors cover loading data and
//! configuration at the edges.

use thiserror::Error;

/// Top-level error type for Mythica operations.
#[derive(Debug, Error)]
pub enum MythicaError {
    /// Game data failed validation
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// TOML parse errors
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation errors for catalog and tuning data.
#[derive(Debug, Error)]
pub enum DataError {
    /// A catalog that must not be empty has no entries
    #[error("{catalog} catalog is empty")]
    EmptyCatalog {
        /// Catalog name
        catalog: &'static str,
    },

    /// Two entries share a name
    #[error("duplicate {catalog} entry: {name}")]
    Duplicate {
        /// Catalog name
        catalog: &'static str,
        /// Offending entry name
        name: String,
    },

    /// A lookup by name failed
    #[error("unknown {catalog} entry: {name}")]
    Unknown {
        /// Catalog name
        catalog: &'static str,
        /// Requested name
        name: String,
    },

    /// A numeric field is out of range
    #[error("{catalog} entry {name}: invalid {field} ({value})")]
    InvalidField {
        /// Catalog name
        catalog: &'static str,
        /// Entry name
        name: String,
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
}

/// Result type alias for Mythica operations.
pub type MythicaResult<T> = Result<T, MythicaError>;

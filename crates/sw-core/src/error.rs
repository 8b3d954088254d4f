//! Error types for sw-core

use thiserror::Error;

/// Core error type for Stepwise
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {source}")]
    ConfigParseError {
        path: String,
        source: serde_yaml::Error,
    },

    /// E003: Invalid or missing configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Invalid value for an enumerated option
    #[error("[E004] Invalid {option} '{value}': must be one of {expected}")]
    InvalidOption {
        option: String,
        value: String,
        expected: String,
    },

    /// E005: Invalid state table name
    #[error("[E005] Invalid state table name '{name}': expected `table` or `schema.table` made of letters, digits and underscores")]
    InvalidTableName { name: String },

    /// E006: Migration file name does not match `<digits>_<anything>.sql`
    #[error("[E006] Invalid migration name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// E007: Migration version is zero
    #[error("[E007] Migration version must be nonzero: {name:?}")]
    ZeroVersion { name: String },

    /// E008: Two migration files share a version
    #[error("[E008] Two migrations for version {version}: {first:?}, {second:?}")]
    DuplicateVersion {
        version: u64,
        first: String,
        second: String,
    },

    /// E009: Migrations directory could not be read
    #[error("[E009] Failed to read migrations directory '{path}': {source}")]
    ReadDir {
        path: String,
        source: std::io::Error,
    },

    /// E010: Migration file could not be read
    #[error("[E010] Failed to read migration file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// E011: IO error with file path context
    #[error("[E011] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

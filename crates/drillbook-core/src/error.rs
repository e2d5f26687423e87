//! Error types for the drillbook engine.
//!
//! Only genuine failures live here: storage, catalog files, settings and
//! caller input. Routine outcomes such as an unsatisfiable stage or missing
//! workload history are modelled as values (see
//! [`crate::models::StagePick`] and [`crate::models::AcwrOutcome`]).

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Every failure the engine reports.
#[derive(Error, Debug)]
pub enum EngineError {
    /// SQLite connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// The database file was written by a newer drillbook
    #[error("Database schema version {found} is newer than the supported version {supported}")]
    UnsupportedSchema { found: i64, supported: i64 },
    /// Catalog, config or database file could not be read or created
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// The catalog document is not a list of activity records
    #[error("Invalid catalog: {reason}")]
    Catalog { reason: String },
    /// A setting in the engine configuration is out of range
    #[error("Invalid setting '{setting}': {reason}")]
    Setting { setting: String, reason: String },
    /// A plan, session or query parameter was rejected
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Malformed JSON in a catalog, config or saved plan
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// A blocking storage task panicked or was cancelled
    #[error("Background task failed: {source}")]
    BackgroundTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Builder for storage errors.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn with_source(self, source: rusqlite::Error) -> EngineError {
        EngineError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for rejected plan, session and query parameters.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Builder for out-of-range configuration settings.
pub struct SettingErrorBuilder {
    setting: String,
}

impl SettingErrorBuilder {
    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> EngineError {
        EngineError::Setting {
            setting: self.setting,
            reason: reason.into(),
        }
    }
}

impl EngineError {
    /// Creates a builder for storage errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for a rejected parameter, named as the caller sees
    /// it (`coach_id`, `period_key`, `plan`).
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a builder for a bad setting, named by its dotted path in
    /// the config file (`workload.chronic_window`).
    pub fn setting(setting: impl Into<String>) -> SettingErrorBuilder {
        SettingErrorBuilder {
            setting: setting.into(),
        }
    }

    /// A catalog document that cannot hold activity records.
    pub fn catalog(reason: impl Into<String>) -> Self {
        Self::Catalog {
            reason: reason.into(),
        }
    }

    /// Returns a mapper for I/O failures on `path`.
    pub fn file_system(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::FileSystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| EngineError::database(message).with_source(e))
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

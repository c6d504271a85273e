//! Error types for foodstock.
//!
//! Every failure surfaces to the caller as one of these variants. None of them
//! is fatal: the operation that produced it simply did not take effect.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for foodstock operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// An input value was missing or malformed.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    // === Referential Errors ===
    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// The id that could not be resolved.
        id: i64,
    },

    /// No item matches the given name and brand.
    #[error("item not found in stock: {name} ({})", .brand.as_deref().unwrap_or("no brand"))]
    UnknownItem {
        /// Item name that was looked up.
        name: String,
        /// Brand that was looked up.
        brand: Option<String>,
    },

    // === Ledger Errors ===
    /// A distribution would drive the stock of an item below zero.
    #[error("insufficient stock for {item}: available {available:.2}, requested {requested:.2}")]
    InsufficientStock {
        /// Human-readable item label.
        item: String,
        /// Quantity currently in stock.
        available: f64,
        /// Quantity the caller tried to distribute.
        requested: f64,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for foodstock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`], for callers that only need to know
/// which kind of correction to prompt for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input.
    Validation,
    /// A referenced donor, beneficiary or item could not be resolved.
    Referential,
    /// A distribution exceeded the available stock.
    InsufficientStock,
    /// The storage engine failed.
    Storage,
    /// Configuration could not be loaded or is invalid.
    Config,
    /// File system or serialization failure.
    Io,
    /// A bug.
    Internal,
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a not-found error for a record of the given kind.
    #[must_use]
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } | Self::UnknownItem { .. } => ErrorKind::Referential,
            Self::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            Self::DatabaseOpen { .. } | Self::DatabaseQuery(_) | Self::DatabaseMigration { .. } => {
                ErrorKind::Storage
            }
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } => ErrorKind::Config,
            Self::Io(_) | Self::DirectoryCreate { .. } | Self::Json(_) => ErrorKind::Io,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Check if this error is an input validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this error is a referential failure.
    #[must_use]
    pub fn is_referential(&self) -> bool {
        self.kind() == ErrorKind::Referential
    }

    /// Check if this error is an insufficient-stock rejection.
    #[must_use]
    pub fn is_insufficient_stock(&self) -> bool {
        matches!(self, Self::InsufficientStock { .. })
    }
}

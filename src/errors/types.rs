//! Error type definitions for the VIN cache service

use thiserror::Error;

/// Top-level application error type
///
/// Wraps the per-layer errors so services can use `?` freely while the web
/// layer still sees enough structure to pick a status code.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request input rejected before any store or network access
    #[error("{message}")]
    Validation { message: String },

    /// Repository layer errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Upstream decoder errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Repository layer specific errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The VIN is already present; enforced by the table's unique constraint
    #[error("Duplicate key: vehicle with vin {vin} already exists")]
    DuplicateKey { vin: String },

    /// Any other SQLite failure (I/O, permissions, corruption)
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Upstream decoder specific errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// The upstream service reported the VIN as invalid
    #[error("{message}")]
    InvalidVin { message: String },

    /// Transport failures talking to the decoder
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the decoder
    #[error("HTTP error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Parse error: {message}")]
    ParseError { message: String },
}

/// Export specific errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The blocking writer task panicked or was cancelled
    #[error("Export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the fault lies with the caller's input rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Source(SourceError::InvalidVin { .. })
        )
    }

    /// Message suitable for the `detail` field of an error body
    ///
    /// Client faults carry their own text verbatim (including the upstream's
    /// `ErrorText`); server faults are prefixed by their layer.
    pub fn detail(&self) -> String {
        match self {
            Self::Source(SourceError::InvalidVin { message }) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl RepositoryError {
    /// Create a duplicate key error
    pub fn duplicate_key<V: Into<String>>(vin: V) -> Self {
        Self::DuplicateKey { vin: vin.into() }
    }

    /// Whether this error is a unique-key conflict
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

impl SourceError {
    /// Create an invalid VIN error carrying the upstream's message
    pub fn invalid_vin<M: Into<String>>(message: M) -> Self {
        Self::InvalidVin {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }
}

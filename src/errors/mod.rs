//! Centralized error handling for the VIN cache service
//!
//! Each layer owns its error enum and the web layer is the only place
//! where errors are translated into HTTP status codes.
//!
//! # Error Categories
//!
//! - **Repository Errors**: SQLite failures and unique-key conflicts
//! - **Source Errors**: upstream decoder rejections and transport faults
//! - **Export Errors**: columnar file generation failures
//! - **Validation Errors**: malformed request input
//!
//! # Usage
//!
//! ```rust
//! use vin_cache::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::validation("VIN should have exactly 17 alphanumeric characters"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for Export Results
pub type ExportResult<T> = Result<T, ExportError>;

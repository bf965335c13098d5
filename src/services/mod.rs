//! Service layer
//!
//! Services hold the business flow; handlers stay thin and only translate
//! between HTTP and these calls.

pub mod lookup;

pub use lookup::LookupService;

//! Repository pattern implementation for data access
//!
//! Repositories own the SQL; services above them only see typed results.
//! "Not found" is always an empty value (`None`, `0`), never an error.

pub mod vehicle;

pub use vehicle::VehicleRepository;

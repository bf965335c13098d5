//! Caching VIN decoding service
//!
//! Decoded vehicles are kept in SQLite; misses are resolved through the
//! NHTSA vPIC API and written back. The cache can be exported as Parquet.

pub mod config;
pub mod database;
pub mod errors;
pub mod export;
pub mod models;
pub mod repositories;
pub mod services;
pub mod sources;
pub mod utils;
pub mod web;

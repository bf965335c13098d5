//! Bulk export of the vehicle cache

pub mod parquet;

pub use self::parquet::ParquetExporter;

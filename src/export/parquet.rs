//! Parquet export of the vehicle cache
//!
//! The whole table is written as a single record batch with one column per
//! table field, to a fixed path that is overwritten on every export.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tokio::fs;
use tracing::info;

use crate::config::StorageConfig;
use crate::errors::ExportResult;
use crate::models::VehicleRecord;

/// Writes vehicle records to `<export_dir>/<export_file_name>`
#[derive(Debug, Clone)]
pub struct ParquetExporter {
    export_dir: PathBuf,
    export_path: PathBuf,
}

impl ParquetExporter {
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            export_dir: storage.export_dir.clone(),
            export_path: storage.export_path(),
        }
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub async fn ensure_export_dir(&self) -> Result<(), std::io::Error> {
        if !self.export_dir.exists() {
            fs::create_dir_all(&self.export_dir).await?;
        }
        Ok(())
    }

    /// Write `records` in the given order and return the file path
    pub async fn write(&self, records: Vec<VehicleRecord>) -> ExportResult<PathBuf> {
        self.ensure_export_dir().await?;

        let path = self.export_path.clone();
        let row_count = records.len();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_parquet(&target, &records)).await??;

        info!("Exported {} vehicles to {}", row_count, path.display());
        Ok(path)
    }
}

fn vehicle_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("VIN", DataType::Utf8, false),
        Field::new("Make", DataType::Utf8, false),
        Field::new("Model", DataType::Utf8, false),
        Field::new("Year", DataType::Utf8, false),
        Field::new("Class", DataType::Utf8, false),
    ]))
}

fn string_column<'a>(values: impl Iterator<Item = &'a str>) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}

fn to_record_batch(records: &[VehicleRecord]) -> ExportResult<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.id))),
        string_column(records.iter().map(|r| r.vin.as_str())),
        string_column(records.iter().map(|r| r.make.as_str())),
        string_column(records.iter().map(|r| r.model.as_str())),
        string_column(records.iter().map(|r| r.year.as_str())),
        string_column(records.iter().map(|r| r.body_class.as_str())),
    ];

    // try_new rejects columns of unequal length
    Ok(RecordBatch::try_new(vehicle_schema(), columns)?)
}

fn write_parquet(path: &Path, records: &[VehicleRecord]) -> ExportResult<()> {
    let batch = to_record_batch(records)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

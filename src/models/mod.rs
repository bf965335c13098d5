use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Number of characters in a well-formed VIN
pub const VIN_LENGTH: usize = 17;

/// A cached row of the `vehicles` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VehicleRecord {
    pub id: i64,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: String,
    #[sqlx(rename = "class")]
    #[serde(rename = "class")]
    pub body_class: String,
}

/// Vehicle attributes as produced by the decoder, before they receive a row id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedVehicle {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: String,
    #[serde(rename = "class")]
    pub body_class: String,
}

impl From<VehicleRecord> for DecodedVehicle {
    fn from(record: VehicleRecord) -> Self {
        Self {
            vin: record.vin,
            make: record.make,
            model: record.model,
            year: record.year,
            body_class: record.body_class,
        }
    }
}

/// Request body shared by `/lookup` and `/remove`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VinRequest {
    pub vin: String,
}

/// Result of a lookup, with `cached` telling whether the store answered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleLookup {
    #[serde(flatten)]
    pub vehicle: DecodedVehicle,
    pub cached: bool,
}

impl VehicleLookup {
    pub fn cached(vehicle: impl Into<DecodedVehicle>) -> Self {
        Self {
            vehicle: vehicle.into(),
            cached: true,
        }
    }

    pub fn fresh(vehicle: DecodedVehicle) -> Self {
        Self {
            vehicle,
            cached: false,
        }
    }
}

/// Outcome of removing a VIN from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Response body of `/remove`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub vin: String,
    #[serde(rename = "deleteSuccess")]
    pub delete_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RemoveResponse {
    pub fn removed(vin: String) -> Self {
        Self {
            vin,
            delete_success: true,
            details: None,
        }
    }

    pub fn not_found(vin: String) -> Self {
        Self {
            vin,
            delete_success: false,
            details: Some("VIN not found".to_string()),
        }
    }

    pub fn failed(vin: String, details: String) -> Self {
        Self {
            vin,
            delete_success: false,
            details: Some(details),
        }
    }
}

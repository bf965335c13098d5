//! External VIN decoding sources
//!
//! The lookup service only depends on [`VinDecoder`]; [`VpicClient`] is the
//! implementation that talks to the NHTSA vPIC API.

use async_trait::async_trait;

use crate::errors::SourceResult;
use crate::models::DecodedVehicle;

pub mod vpic;

pub use vpic::VpicClient;

/// Resolves a VIN into vehicle attributes using an external authority
#[async_trait]
pub trait VinDecoder: Send + Sync {
    /// Decode a single VIN.
    ///
    /// Returns `SourceError::InvalidVin` when the authority rejects the VIN,
    /// and any other `SourceError` when the authority could not be reached or
    /// answered with something unexpected.
    async fn decode(&self, vin: &str) -> SourceResult<DecodedVehicle>;
}

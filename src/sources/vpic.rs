use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::VinDecoder;
use crate::config::DecoderConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::DecodedVehicle;
use crate::utils::sanitize_base_url;

/// vPIC reports a clean decode with this error code
const SUCCESS_ERROR_CODE: &str = "0";

#[derive(Debug, Deserialize)]
struct DecodeVinValuesResponse {
    #[serde(rename = "Results")]
    results: Vec<DecodeVinValues>,
}

#[derive(Debug, Deserialize)]
struct DecodeVinValues {
    #[serde(rename = "ErrorCode")]
    error_code: Option<String>,
    #[serde(rename = "ErrorText", default)]
    error_text: Option<String>,
    #[serde(rename = "Make", default)]
    make: Option<String>,
    #[serde(rename = "Model", default)]
    model: Option<String>,
    #[serde(rename = "ModelYear", default)]
    model_year: Option<String>,
    #[serde(rename = "BodyClass", default)]
    body_class: Option<String>,
}

/// Client for the NHTSA vPIC `decodevinvalues` endpoint
#[derive(Clone)]
pub struct VpicClient {
    client: Client,
    base_url: String,
}

impl VpicClient {
    pub fn new(config: &DecoderConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: sanitize_base_url(&config.base_url),
        }
    }

    fn decode_url(&self, vin: &str) -> String {
        format!(
            "{}/api/vehicles/decodevinvalues/{}?format=json",
            self.base_url,
            urlencoding::encode(vin)
        )
    }
}

#[async_trait]
impl VinDecoder for VpicClient {
    async fn decode(&self, vin: &str) -> SourceResult<DecodedVehicle> {
        let url = self.decode_url(vin);
        debug!("Decoding VIN {} via {}", vin, url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: DecodeVinValuesResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::parse_error(format!("invalid decoder response: {}", e)))?;

        interpret_response(vin, parsed)
    }
}

/// Turn the first `Results` entry into a vehicle or a typed rejection
fn interpret_response(vin: &str, response: DecodeVinValuesResponse) -> SourceResult<DecodedVehicle> {
    let first = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::parse_error("decoder response contained no Results"))?;

    let error_code = first
        .error_code
        .ok_or_else(|| SourceError::parse_error("decoder result is missing ErrorCode"))?;

    if error_code != SUCCESS_ERROR_CODE {
        let message = first.error_text.unwrap_or_default();
        warn!("Decoder rejected VIN {} (code {}): {}", vin, error_code, message);
        return Err(SourceError::invalid_vin(message));
    }

    Ok(DecodedVehicle {
        vin: vin.to_string(),
        make: first.make.unwrap_or_default(),
        model: first.model.unwrap_or_default(),
        year: first.model_year.unwrap_or_default(),
        body_class: first.body_class.unwrap_or_default(),
    })
}

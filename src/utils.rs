//! Utility functions for the VIN cache service
//!
//! - URL sanitization for the decoder base URL
//! - VIN format validation shared by the lookup and remove paths

use crate::errors::{AppError, AppResult};
use crate::models::VIN_LENGTH;

/// Sanitize a base URL by removing trailing slashes and ensuring proper format
pub fn sanitize_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().to_string();

    // Remove trailing slashes
    while url.ends_with('/') {
        url.pop();
    }

    // Ensure we have a scheme
    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("http://{}", url);
    }

    url
}

/// Check that a VIN has exactly 17 characters.
///
/// Only the length is enforced; the character set is left to the upstream
/// decoder, which reports malformed VINs with its own error text.
pub fn validate_vin(vin: &str) -> AppResult<()> {
    if vin.chars().count() != VIN_LENGTH {
        return Err(AppError::validation(format!(
            "VIN should have exactly {} alphanumeric characters",
            VIN_LENGTH
        )));
    }
    Ok(())
}

//! Random identifier generation.

use crate::error::AppError;
use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const NAME_LENGTH_BYTES: usize = 12;

/// Generates a URL-safe random identifier of 16 characters.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_name() -> Result<String, AppError> {
    let mut buffer = [0u8; NAME_LENGTH_BYTES];

    getrandom::fill(&mut buffer)
        .map_err(|e| AppError::internal(format!("Failed to generate random bytes: {}", e)))?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::NotifierError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex HMAC-SHA256 of the raw body, set by the quality
/// service when a webhook secret is configured.
pub const SIGNATURE_HEADER: &str = "x-sonar-webhook-hmac-sha256";

pub fn verify_signature(
    secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), NotifierError> {
    let signature = signature
        .ok_or_else(|| NotifierError::InvalidSignature(format!("missing {} header", SIGNATURE_HEADER)))?;

    let expected = hex::decode(signature.trim())
        .map_err(|e| NotifierError::InvalidSignature(format!("signature is not hex: {}", e)))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| NotifierError::ConfigError(format!("invalid webhook secret: {}", e)))?;
    mac.update(body);

    // Constant-time comparison.
    mac.verify_slice(&expected)
        .map_err(|_| NotifierError::InvalidSignature("digest mismatch".to_string()))
}

/// Hex signature for `body`, as the quality service would compute it.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, NotifierError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| NotifierError::ConfigError(format!("invalid webhook secret: {}", e)))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

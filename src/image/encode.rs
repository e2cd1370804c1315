//! Data URI encoding.

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine as _;

/// MIME type used when the origin sends no Content-Type.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Build `data:<mime>;base64,<payload>` with an unwrapped payload.
pub fn data_uri(content_type: Option<&str>, body: &[u8]) -> String {
    let mime = content_type.unwrap_or(FALLBACK_MIME);
    format!("data:{};base64,{}", mime, Base64.encode(body))
}

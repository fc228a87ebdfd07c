//! Response body handling.

use serde_json::Value;

use crate::error::FetchError;

/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Strips a leading UTF-8 byte order mark, if present.
pub fn strip_bom(body: &[u8]) -> &[u8] {
    body.strip_prefix(UTF8_BOM).unwrap_or(body)
}

/// Parses a raw response body as JSON.
///
/// The BOM is stripped first. A body that is empty (or only whitespace)
/// after stripping is rejected rather than treated as `null`.
///
/// # Errors
///
/// Returns `FetchError::MalformedResponse` for empty or invalid bodies.
pub fn parse_json(body: &[u8]) -> Result<Value, FetchError> {
    let body = strip_bom(body);
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::MalformedResponse("empty response body".to_string()));
    }
    serde_json::from_slice(body)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {e}")))
}

//! Image payload encoding for the `file` field of a resize request.

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub fn encode_file(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Builds a `data:<mime>;base64,...` URI, the form browsers hand out for local files.
#[cfg(test)]
pub(crate) fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", encode_file(bytes))
}

/// Drops a leading `data:<anything>;base64,` prefix if present, up to the last marker.
#[cfg(test)]
pub(crate) fn strip_data_uri_prefix(encoded: &str) -> &str {
    const MARKER: &str = ";base64,";
    if !encoded.starts_with("data:") {
        return encoded;
    }
    match encoded.rfind(MARKER) {
        Some(idx) if idx > "data:".len() => &encoded[idx + MARKER.len()..],
        _ => encoded,
    }
}

/// Decodes a `file` field the way the service does, tolerating a data-URI prefix.
#[cfg(test)]
pub(crate) fn decode_file(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(strip_data_uri_prefix(encoded.trim()))
}

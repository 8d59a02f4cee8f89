//! Opaque text blobs (generated code) stored gzip-compressed and base64-encoded.
//!
//! A compressed blob is written as `{"Zip": "1", "Value": "<base64>"}`; an
//! uncompressed one as a plain string. Decoding never fails: a corrupt blob
//! degrades to an empty string since generated code can be regenerated.

use super::reader::Leaf;
use crate::error::Error;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};
use std::io::{Read, Write};
use tracing::warn;

/// Marker attribute of a compressed blob.
pub const ZIP_MARKER: &str = "Zip";

const VALUE_KEY: &str = "Value";

/// Gzip `text` and encode the result as base64.
pub fn compress_text(text: &str) -> Result<String, Error> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let bytes = encoder.finish()?;
    Ok(STANDARD.encode(bytes))
}

/// Reverse [`compress_text`]. Returns `None` on any decoding failure.
pub fn decompress_text(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let mut text = String::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_string(&mut text)
        .ok()?;
    Some(text)
}

/// Encode a blob for the persisted document.
pub fn encode_blob(text: &str, compress: bool) -> Result<Value, Error> {
    if !compress || text.is_empty() {
        return Ok(Value::String(text.to_string()));
    }
    Ok(json!({ ZIP_MARKER: "1", VALUE_KEY: compress_text(text)? }))
}

/// Decode a blob written by [`encode_blob`].
///
/// Untagged values come back verbatim.
pub fn decode_blob(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => {
            let payload = map.get(VALUE_KEY).and_then(Value::as_str).unwrap_or("");
            let zipped = map.get(ZIP_MARKER).and_then(bool::from_value).unwrap_or(false);
            if !zipped {
                return payload.to_string();
            }
            decompress_text(payload).unwrap_or_else(|| {
                warn!(len = payload.len(), "discarding undecodable compressed blob");
                String::new()
            })
        }
        _ => String::new(),
    }
}

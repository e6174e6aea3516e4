//! Stock decoders for raw store bytes.
//!
//! Values come out of the store as opaque bytes. Callers that want a typed
//! view supply a decoder `Fn(&[u8]) -> Result<T, DecodeError>`; the two
//! decoders here cover the common text and integer cases. Decoders are only
//! ever run against bytes that were actually found, so a decode failure is
//! always distinguishable from a missing key.

use crate::error::DecodeError;

/// Decode raw bytes as UTF-8 text.
pub fn decode_utf8(raw: &[u8]) -> Result<String, DecodeError> {
    String::from_utf8(raw.to_vec()).map_err(|e| DecodeError::InvalidUtf8 {
        reason: e.to_string(),
    })
}

/// Decode raw bytes as a base-10 signed integer literal.
///
/// The bytes must be valid UTF-8 first; each failure maps to its own
/// variant so callers can tell a binary blob from a non-numeric string.
pub fn decode_i64(raw: &[u8]) -> Result<i64, DecodeError> {
    let text = decode_utf8(raw)?;
    text.trim()
        .parse::<i64>()
        .map_err(|e| DecodeError::MalformedInteger {
            reason: format!("{e}: {text:?}"),
        })
}

//! Base64 audio payload handling.

use base64::{DecodeError, Engine, prelude::BASE64_STANDARD};

/// Validate a base64 audio payload by decoding it and encoding it again.
///
/// On success the returned string is the canonical encoding of the decoded
/// bytes, which for well-formed input equals the input.
pub fn reencode_audio(payload: &str) -> Result<String, DecodeError> {
    let bytes = BASE64_STANDARD.decode(payload)?;
    Ok(BASE64_STANDARD.encode(bytes))
}

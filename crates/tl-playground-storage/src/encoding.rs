//! Reversible text encodings applied before storage.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

/// The serialize/deserialize capability.
pub trait Encoder {
    fn serialize(&self, value: &str) -> String;

    /// Reverse [`serialize`](Self::serialize). Absent or malformed input
    /// yields `""`.
    fn deserialize(&self, value: Option<&str>) -> String;
}

/// Standard alphabet, padded on encode. Decoding takes optional padding
/// and non-zero trailing bits, like `atob`.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64 over the UTF-8 bytes of the text.
///
/// Output matches the browser's `btoa` for ASCII input only; other text is
/// encoded as UTF-8. Decoding reads UTF-8 first and falls back to one
/// byte per character, so values written by `btoa` with Latin-1 text still
/// load. ASCII whitespace is ignored the way `atob` ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64;

impl Encoder for Base64 {
    fn serialize(&self, value: &str) -> String {
        ENGINE.encode(value.as_bytes())
    }

    fn deserialize(&self, value: Option<&str>) -> String {
        let Some(value) = value else {
            return String::new();
        };
        let compact: String = value.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        match ENGINE.decode(compact.as_bytes()) {
            Ok(bytes) => String::from_utf8(bytes).unwrap_or_else(|e| {
                tracing::debug!("decoded snippet is not UTF-8, reading as Latin-1");
                e.into_bytes().iter().map(|&b| b as char).collect()
            }),
            Err(e) => {
                tracing::debug!(error = %e, "malformed encoded snippet");
                String::new()
            }
        }
    }
}

/// Shorthand for [`Base64::serialize`].
pub fn encode(value: &str) -> String {
    Base64.serialize(value)
}

/// Shorthand for [`Base64::deserialize`].
pub fn decode(value: &str) -> String {
    Base64.deserialize(Some(value))
}

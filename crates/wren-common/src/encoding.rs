//! Decoding raw document bytes into UTF-8 text.
//!
//! Documents arrive as bytes in some declared character set. A byte order
//! mark always wins over the declared label; otherwise the label is
//! resolved through `encoding_rs` (WHATWG Encoding Standard labels, so
//! `latin1`, `utf8`, `windows-1252` and friends all work).

use encoding_rs::Encoding;
use thiserror::Error;

/// The label used when the caller does not pick one.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Errors that can occur while decoding document bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The label does not name any known encoding.
    #[error("unsupported encoding: {label}")]
    UnknownLabel {
        /// The label as given by the caller.
        label: String,
    },
    /// The bytes are not valid in the selected encoding.
    #[error("malformed byte sequence for encoding {encoding}")]
    Malformed {
        /// Canonical name of the encoding that rejected the input.
        encoding: &'static str,
    },
}

/// Returns true if `label` names an encoding we can decode.
#[must_use]
pub fn is_supported(label: &str) -> bool {
    Encoding::for_label(label.trim().as_bytes()).is_some()
}

/// Decode `bytes` into a `String` using the encoding named by `label`.
///
/// A UTF-8 or UTF-16 byte order mark overrides `label` and is not part of
/// the returned text.
///
/// # Errors
///
/// Returns [`EncodingError::UnknownLabel`] if `label` is not a known
/// encoding and no BOM is present, and [`EncodingError::Malformed`] if the
/// input contains byte sequences that are invalid for the chosen encoding.
pub fn decode(bytes: &[u8], label: &str) -> Result<String, EncodingError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => {
            let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                EncodingError::UnknownLabel {
                    label: label.to_string(),
                }
            })?;
            (encoding, bytes)
        }
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        return Err(EncodingError::Malformed {
            encoding: encoding.name(),
        });
    }
    Ok(text.into_owned())
}

//! Base64 handling and the canonical data-to-be-signed layout.
//!
//! All base64 in this crate is the standard alphabet with padding.

use crate::consts::SEPARATOR;
use base64ct::{Base64, Encoding};

/// Encodes `bytes` as padded, standard-alphabet base64 text.
pub fn encode_base64(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}

/// Decodes padded, standard-alphabet base64.
///
/// Returns `None` on any malformed input, including missing padding.
pub fn decode_base64(encoded: &[u8]) -> Option<Vec<u8>> {
    let encoded = std::str::from_utf8(encoded).ok()?;
    Base64::decode_vec(encoded).ok()
}

/// Builds the exact byte sequence a device hashes and signs.
///
/// The layout is `decimal(counter) "_" raw "_" base64(last_sig)`. Underscores inside `raw` are
/// copied verbatim; the trailing field can still be located unambiguously because the base64
/// alphabet has no `_`.
pub fn prepare_data(counter: u64, raw: &[u8], last_sig: &[u8]) -> Vec<u8> {
    let counter = counter.to_string();
    let last_sig = encode_base64(last_sig);

    let mut data = Vec::with_capacity(counter.len() + raw.len() + last_sig.len() + 2);
    data.extend_from_slice(counter.as_bytes());
    data.push(SEPARATOR);
    data.extend_from_slice(raw);
    data.push(SEPARATOR);
    data.extend_from_slice(last_sig.as_bytes());

    data
}

/// The three fields of a canonical data blob, borrowed from it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CanonicalParts<'a> {
    pub(crate) counter: u64,
    pub(crate) raw: &'a [u8],
    pub(crate) last_sig_base64: &'a [u8],
}

/// Splits canonical data back into its fields.
///
/// The counter ends at the first separator and the previous signature starts after the last
/// one; whatever lies between is the raw payload.
pub(crate) fn split_canonical(data: &[u8]) -> Option<CanonicalParts<'_>> {
    let first = data.iter().position(|&b| b == SEPARATOR)?;
    let last = data.iter().rposition(|&b| b == SEPARATOR)?;
    if first == last {
        return None;
    }

    let counter = std::str::from_utf8(&data[..first]).ok()?;
    // `u64::from_str` accepts a leading `+`, which `prepare_data` never writes.
    if counter.is_empty() || !counter.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(CanonicalParts {
        counter: counter.parse().ok()?,
        raw: &data[first + 1..last],
        last_sig_base64: &data[last + 1..],
    })
}

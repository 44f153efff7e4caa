//! Offline verification of a device's signature history.
//!
//! A verifier holding a device's identity, its public key, and the signatures in the order they
//! were issued can detect reordered, replayed, or omitted entries: every canonical data blob
//! names its position and the signature that preceded it.

use crate::device::{seed_signature, SignedData};
use crate::encoding::{encode_base64, split_canonical};
use crate::errors::ChainError;
use crate::signer::PublicKey;
use uuid::Uuid;

/// Checks that `entries` is the complete, ordered history of the device `id`.
///
/// The first entry must carry counter 0 and link to the identity seed; each later entry must
/// carry the next counter and link to the signature before it. Every signature must verify
/// under `public_key`.
///
/// # Errors
///
/// Returns the first violation found, tagged with the index of the offending entry.
pub fn verify_chain(
    id: &Uuid,
    public_key: &PublicKey,
    entries: &[SignedData],
) -> Result<(), ChainError> {
    let mut previous = seed_signature(id);

    for (index, entry) in entries.iter().enumerate() {
        let parts = split_canonical(&entry.data).ok_or(ChainError::Malformed { index })?;

        let expected = index as u64;
        if parts.counter != expected {
            return Err(ChainError::CounterMismatch {
                index,
                expected,
                found: parts.counter,
            });
        }

        if parts.last_sig_base64 != encode_base64(&previous).as_bytes() {
            return Err(ChainError::LinkMismatch { index });
        }

        if !public_key.verify(&entry.data, &entry.signature) {
            return Err(ChainError::BadSignature { index });
        }

        previous.clone_from(&entry.signature);
    }

    Ok(())
}

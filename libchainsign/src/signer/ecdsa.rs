use super::{Algorithm, PublicKey, Signer};
use crate::consts::ECC_SCALAR_LEN;
use crate::encoding::{decode_base64, encode_base64};
use crate::errors::Error;
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand_core::{CryptoRng, RngCore};

/// An ECDSA key pair on NIST P-256, hashing with SHA-256.
pub struct EccSigner {
    signing_key: SigningKey,
}

impl EccSigner {
    /// Generates a fresh key pair.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self {
            signing_key: SigningKey::random(rng),
        }
    }
}

impl Signer for EccSigner {
    /// Signs `data`, encoding the result as `base64(r || s)`.
    ///
    /// `r` and `s` are each left-padded to the full scalar width, so the raw signature is always
    /// 64 bytes and splits cleanly at its midpoint.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        let signature: Signature = self.signing_key.try_sign(data)?;
        Ok(encode_base64(&signature.to_bytes()).into_bytes())
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::Ecc(p256::PublicKey::from(self.signing_key.verifying_key()))
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Ecc
    }
}

pub(super) fn verify(key: &p256::PublicKey, data: &[u8], signature: &[u8]) -> bool {
    let signature = match decode_base64(signature).and_then(|raw| parse_signature(&raw)) {
        Some(signature) => signature,
        None => return false,
    };

    VerifyingKey::from(key).verify(data, &signature).is_ok()
}

/// Splits a raw `r || s` blob at its midpoint and reads each half as a big-endian integer.
///
/// Halves shorter than a scalar are zero-extended, which keeps signatures from encoders that
/// strip leading zero bytes readable as long as both halves ended up the same length.
fn parse_signature(raw: &[u8]) -> Option<Signature> {
    let (r, s) = raw.split_at(raw.len() / 2);
    if r.len() > ECC_SCALAR_LEN || s.len() > ECC_SCALAR_LEN {
        return None;
    }

    let mut fixed = [0u8; 2 * ECC_SCALAR_LEN];
    fixed[ECC_SCALAR_LEN - r.len()..ECC_SCALAR_LEN].copy_from_slice(r);
    fixed[2 * ECC_SCALAR_LEN - s.len()..].copy_from_slice(s);

    Signature::from_slice(&fixed).ok()
}

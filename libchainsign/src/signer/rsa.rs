use super::{Algorithm, PublicKey, Signer};
use crate::consts::RSA_KEY_BITS;
use crate::encoding::{decode_base64, encode_base64};
use crate::errors::Error;
use ::rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

/// An RSA key pair signing with PKCS#1 v1.5 over SHA-256.
pub struct RsaSigner {
    private_key: RsaPrivateKey,
    public_key: RsaPublicKey,
}

impl RsaSigner {
    /// Generates a fresh 2048-bit key pair.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self, Error> {
        Self::generate_with_bits(rng, RSA_KEY_BITS)
    }

    pub(crate) fn generate_with_bits<R: CryptoRng + RngCore>(
        rng: &mut R,
        bits: usize,
    ) -> Result<Self, Error> {
        let private_key =
            RsaPrivateKey::new(rng, bits).map_err(|e| Error::KeyGeneration(e.to_string()))?;
        let public_key = private_key.to_public_key();

        Ok(Self {
            private_key,
            public_key,
        })
    }
}

impl Signer for RsaSigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
        let hashed = Sha256::digest(data);
        // The RNG only blinds the private-key operation; PKCS#1 v1.5 output is deterministic.
        let signature = self.private_key.sign_with_rng(
            &mut rand_core::OsRng,
            Pkcs1v15Sign::new::<Sha256>(),
            &hashed,
        )?;

        Ok(encode_base64(&signature).into_bytes())
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::Rsa(self.public_key.clone())
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Rsa
    }
}

pub(super) fn verify(key: &RsaPublicKey, data: &[u8], signature: &[u8]) -> bool {
    let signature = match decode_base64(signature) {
        Some(signature) => signature,
        None => return false,
    };

    let hashed = Sha256::digest(data);
    key.verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, &signature)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> RsaSigner {
        RsaSigner::generate(&mut rand_core::OsRng).unwrap()
    }

    #[test]
    fn sign_and_verify() {
        let signer = signer();
        for msg in [&b""[..], b"Hello World!", &[0u8, 255, 17, 95][..]] {
            let sig = signer.sign(msg).unwrap();
            assert!(signer.verify(msg, &sig), "{:?} did not verify", msg);
        }
    }

    #[test]
    fn signature_is_base64_of_modulus_sized_block() {
        let signer = signer();
        let sig = signer.sign(b"payload").unwrap();
        let raw = decode_base64(&sig).unwrap();
        assert_eq!(raw.len(), RSA_KEY_BITS / 8);
    }

    #[test]
    fn tampering_is_detected() {
        let signer = signer();
        let sig = signer.sign(b"original").unwrap();

        assert!(!signer.verify(b"0riginal", &sig));

        let mut raw = decode_base64(&sig).unwrap();
        raw[10] ^= 0x01;
        assert!(!signer.verify(b"original", encode_base64(&raw).as_bytes()));
    }

    #[test]
    fn undecodable_signature_is_rejected() {
        let signer = signer();
        assert!(!signer.verify(b"data", b"not base64!"));
        assert!(!signer.verify(b"data", b""));
    }

    #[test]
    fn smaller_keys_still_round_trip() {
        let signer = RsaSigner::generate_with_bits(&mut rand_core::OsRng, 1024).unwrap();
        let sig = signer.sign(b"x").unwrap();
        assert!(signer.verify(b"x", &sig));
        assert_eq!(signer.algorithm(), Algorithm::Rsa);
    }
}

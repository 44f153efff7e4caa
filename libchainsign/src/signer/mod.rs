//! Signing back-ends and the factory that picks one by algorithm tag.

mod ecdsa;
mod rsa;

pub use self::ecdsa::EccSigner;
pub use self::rsa::RsaSigner;

use crate::consts::{ECC_TAG, RSA_TAG};
use crate::errors::Error;
use std::fmt::{self, Display};
use std::str::FromStr;
use p256::pkcs8::{EncodePublicKey, LineEnding};

/// The signature algorithm families a device can be created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// RSA with PKCS#1 v1.5 padding over SHA-256.
    Rsa,
    /// ECDSA on the NIST P-256 curve over SHA-256.
    Ecc,
}

impl Algorithm {
    /// The case-exact tag of this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => RSA_TAG,
            Self::Ecc => ECC_TAG,
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parses a tag case-insensitively.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_uppercase().as_str() {
            RSA_TAG => Ok(Self::Rsa),
            ECC_TAG => Ok(Self::Ecc),
            _ => Err(Error::UnsupportedAlgorithm(tag.to_string())),
        }
    }
}

/// The public half of a signer's key pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    Rsa(::rsa::RsaPublicKey),
    Ecc(p256::PublicKey),
}

impl PublicKey {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Rsa(_) => Algorithm::Rsa,
            Self::Ecc(_) => Algorithm::Ecc,
        }
    }

    /// Checks a base64 signature, as produced by [`Signer::sign`], over `data`.
    ///
    /// Undecodable signatures are reported as `false`, never as an error.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Rsa(key) => rsa::verify(key, data, signature),
            Self::Ecc(key) => ecdsa::verify(key, data, signature),
        }
    }

    /// Encodes the key as a PEM `SubjectPublicKeyInfo` document.
    pub fn to_pem(&self) -> Result<String, Error> {
        let pem = match self {
            Self::Rsa(key) => key.to_public_key_pem(LineEnding::LF),
            Self::Ecc(key) => key.to_public_key_pem(LineEnding::LF),
        };
        pem.map_err(|e| Error::PublicKeyEncoding(e.to_string()))
    }
}

/// An algorithm-specific key pair able to sign and verify.
///
/// The private key never leaves the implementor.
pub trait Signer: Send + Sync {
    /// Signs `data`, returning the base64 text of the raw algorithm signature.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, Error>;

    /// Checks a base64 signature over `data` against this signer's public key.
    fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        self.public_key().verify(data, signature)
    }

    fn public_key(&self) -> PublicKey;

    fn algorithm(&self) -> Algorithm;
}

/// Creates a signer with a freshly generated key pair for the given tag.
///
/// The tag is matched case-insensitively. Every call generates new keys.
///
/// # Errors
///
/// Returns [`Error::UnsupportedAlgorithm`] for unknown tags and [`Error::KeyGeneration`] if the
/// entropy source fails.
pub fn new_signer(tag: &str) -> Result<Box<dyn Signer>, Error> {
    let mut rng = rand_core::OsRng;

    let signer: Box<dyn Signer> = match tag.parse()? {
        Algorithm::Rsa => Box::new(RsaSigner::generate(&mut rng)?),
        Algorithm::Ecc => Box::new(EccSigner::generate(&mut rng)),
    };

    Ok(signer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(PublicKey: Clone, Send, Sync);
    assert_impl_all!(Algorithm: Clone, Copy, Send, Sync);

    #[test]
    fn factory_dispatches_case_insensitively() {
        let rsa = new_signer("rsa").unwrap();
        let ecc = new_signer("ECC").unwrap();

        assert_eq!(rsa.algorithm(), Algorithm::Rsa);
        assert_eq!(rsa.algorithm().to_string(), "RSA");
        assert_eq!(ecc.algorithm(), Algorithm::Ecc);
        assert_eq!(ecc.algorithm().to_string(), "ECC");
        assert_ne!(rsa.public_key(), ecc.public_key());
    }

    #[test]
    fn factory_rejects_unknown_tags() {
        for tag in ["XYZ", "", "ed25519", "rsa "] {
            match new_signer(tag) {
                Err(Error::UnsupportedAlgorithm(t)) => assert_eq!(t, tag),
                Err(e) => panic!("unexpected error for {:?}: {}", tag, e),
                Ok(_) => panic!("{:?} should not be accepted", tag),
            }
        }
    }

    #[test]
    fn factory_never_reuses_keys() {
        let a = new_signer("ecc").unwrap();
        let b = new_signer("ecc").unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn public_key_pem() {
        let ecc = new_signer("ECC").unwrap().public_key().to_pem().unwrap();
        assert!(ecc.starts_with("-----BEGIN PUBLIC KEY-----\n"));

        let rsa = new_signer("RSA").unwrap().public_key().to_pem().unwrap();
        assert!(rsa.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(rsa.len() > ecc.len());
    }

    #[test]
    fn keys_verify_only_their_own_signatures() {
        let a = new_signer("ECC").unwrap();
        let b = new_signer("ECC").unwrap();

        let sig = a.sign(b"message").unwrap();
        assert!(a.public_key().verify(b"message", &sig));
        assert!(!b.public_key().verify(b"message", &sig));
    }
}

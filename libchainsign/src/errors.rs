use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("device not found: {0}")]
    DeviceNotFound(Uuid),
    #[error("failed to generate key pair: {0}")]
    KeyGeneration(String),
    #[error("failed to sign data: {0}")]
    SignFailed(String),
    #[error("failed to encode public key: {0}")]
    PublicKeyEncoding(String),
    #[error(transparent)]
    InvalidChain(#[from] ChainError),
}

/// Reasons a signature history fails verification.
///
/// Every variant carries the zero-based position of the first offending entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("entry {index} is not of the form <counter>_<data>_<previous signature>")]
    Malformed { index: usize },
    #[error("entry {index} carries counter {found}, expected {expected}")]
    CounterMismatch {
        index: usize,
        expected: u64,
        found: u64,
    },
    #[error("entry {index} does not reference the previous signature")]
    LinkMismatch { index: usize },
    #[error("entry {index} has an invalid signature")]
    BadSignature { index: usize },
}

impl From<rsa::Error> for Error {
    fn from(e: rsa::Error) -> Self {
        Self::SignFailed(e.to_string())
    }
}

impl From<p256::ecdsa::Error> for Error {
    fn from(e: p256::ecdsa::Error) -> Self {
        Self::SignFailed(e.to_string())
    }
}

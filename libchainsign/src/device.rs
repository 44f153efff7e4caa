//! The signature device: a key pair bound to a monotonically advancing signature chain.

use crate::consts::DEVICE_ID_LEN;
use crate::encoding::{encode_base64, prepare_data};
use crate::errors::Error;
use crate::signer::{Algorithm, PublicKey, Signer};
use rand_core::{CryptoRng, RngCore};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::{Builder, Uuid};

/// The outcome of one successful [`SignatureDevice::sign_data`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedData {
    /// The counter value embedded in `data`, i.e. the number of signatures made before this one.
    pub counter: u64,
    /// The canonical bytes that were hashed and signed.
    pub data: Vec<u8>,
    /// The base64 signature over `data`.
    pub signature: Vec<u8>,
}

/// The immutable, shareable description of a device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: Uuid,
    pub label: String,
    pub algorithm: Algorithm,
    pub public_key: PublicKey,
}

struct ChainState {
    counter: u64,
    last_sig: Vec<u8>,
}

/// A signing-capable device.
///
/// The identity, label and key pair never change. The counter and the last signature only move
/// forward through [`sign_data`](Self::sign_data), which serializes callers on a per-device lock.
pub struct SignatureDevice {
    id: Uuid,
    label: String,
    signer: Box<dyn Signer>,
    chain: Mutex<ChainState>,
}

impl SignatureDevice {
    /// Creates a device with a random identity drawn from the operating system.
    ///
    /// An empty `label` is replaced by the hyphenated text form of the identity.
    pub fn new(label: impl Into<String>, signer: Box<dyn Signer>) -> Self {
        Self::with_rng(&mut rand_core::OsRng, label, signer)
    }

    pub fn with_rng<R: CryptoRng + RngCore>(
        rng: &mut R,
        label: impl Into<String>,
        signer: Box<dyn Signer>,
    ) -> Self {
        let mut id = [0u8; DEVICE_ID_LEN];
        rng.fill_bytes(&mut id);
        let id = Builder::from_random_bytes(id).into_uuid();

        let mut label = label.into();
        if label.is_empty() {
            label = id.to_string();
        }

        Self {
            id,
            label,
            signer,
            chain: Mutex::new(ChainState {
                counter: 0,
                last_sig: seed_signature(&id),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn algorithm(&self) -> Algorithm {
        self.signer.algorithm()
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: self.id,
            label: self.label.clone(),
            algorithm: self.algorithm(),
            public_key: self.public_key(),
        }
    }

    /// The number of signatures this device has produced.
    pub fn counter(&self) -> u64 {
        self.lock_chain().counter
    }

    /// The most recent signature, or the identity seed if nothing was signed yet.
    pub fn last_signature(&self) -> Vec<u8> {
        self.lock_chain().last_sig.clone()
    }

    /// Signs `raw` as the next link of this device's chain.
    ///
    /// The signed bytes are `counter "_" raw "_" base64(last signature)`. On success the counter
    /// is incremented and the new signature becomes the last signature, both under the same lock
    /// that was held while reading them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignFailed`] if the signer fails. The chain is left untouched in that
    /// case, so the next successful signature still links to the last successful one.
    pub fn sign_data(&self, raw: &[u8]) -> Result<SignedData, Error> {
        let mut chain = self.lock_chain();

        let data = prepare_data(chain.counter, raw, &chain.last_sig);
        let signature = self.signer.sign(&data)?;

        let counter = chain.counter;
        chain.last_sig = signature.clone();
        chain.counter += 1;

        Ok(SignedData {
            counter,
            data,
            signature,
        })
    }

    /// Checks a base64 signature over `data` with this device's public key.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        self.signer.verify(data, signature)
    }

    fn lock_chain(&self) -> MutexGuard<'_, ChainState> {
        // State is written only after signing succeeded, so a poisoned lock still guards a
        // consistent chain.
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The value a fresh device's chain starts from: the base64 text of its raw identity bytes.
pub fn seed_signature(id: &Uuid) -> Vec<u8> {
    encode_base64(id.as_bytes()).into_bytes()
}

impl std::fmt::Debug for SignatureDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureDevice")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("algorithm", &self.algorithm())
            .field("counter", &self.counter())
            .finish_non_exhaustive()
    }
}

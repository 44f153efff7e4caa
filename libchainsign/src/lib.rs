//! Issue per-device key pairs and chain every signature a device makes to the one before it.
//!
//! A [`SignatureDevice`] owns an RSA or ECDSA (P-256) key pair and a signature counter. Each
//! call to [`SignatureDevice::sign_data`] signs the canonical bytes
//!
//! ```text
//! <counter>_<data>_<base64 of the previous signature>
//! ```
//!
//! so anyone holding the public key and the ordered history can detect reordered, replayed, or
//! missing signatures (see [`verify_chain`]). A new device's "previous signature" is the base64
//! of its 16 raw identity bytes.
//!
//! Signatures are handed out as base64 text. ECDSA signatures encode `r || s`, each padded to
//! 32 bytes.
//!
//! ```
//! use libchainsign::{SigningService, verify_chain};
//!
//! let service = SigningService::in_memory();
//! let device = service.create_device("ecc", "till 1")?;
//!
//! let first = service.sign_data(&device.id, b"Hello World!")?;
//! assert!(first.data.starts_with(b"0_Hello World!_"));
//!
//! let second = service.sign_data(&device.id, b"again")?;
//! verify_chain(&device.id, &device.public_key, &[first, second])?;
//! # Ok::<(), libchainsign::errors::Error>(())
//! ```

pub mod consts;

mod chain;
pub use chain::verify_chain;

mod device;
pub use device::{seed_signature, DeviceInfo, SignatureDevice, SignedData};

mod encoding;
pub use encoding::{decode_base64, encode_base64, prepare_data};

pub mod errors;

mod registry;
pub use registry::{DeviceRegistry, InMemoryRegistry};

mod service;
pub use service::SigningService;

pub mod signer;
pub use signer::{new_signer, Algorithm, PublicKey, Signer};

#[cfg(test)]
mod test_utils;

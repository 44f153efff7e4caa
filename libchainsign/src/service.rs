//! The operations a transport invokes on the signing core.

use crate::device::{DeviceInfo, SignatureDevice, SignedData};
use crate::errors::Error;
use crate::registry::{DeviceRegistry, InMemoryRegistry};
use crate::signer::new_signer;
use std::sync::Arc;
use uuid::Uuid;

/// Creates, looks up, and signs with devices held in a registry.
pub struct SigningService<R = InMemoryRegistry> {
    registry: R,
}

impl SigningService {
    /// A service backed by a fresh, empty [`InMemoryRegistry`].
    pub fn in_memory() -> Self {
        Self::new(InMemoryRegistry::new())
    }
}

impl<R: DeviceRegistry> SigningService<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Creates a device with a new key pair for `algorithm` and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] for tags other than `RSA` and `ECC` (in any case).
    pub fn create_device(&self, algorithm: &str, label: &str) -> Result<DeviceInfo, Error> {
        let signer = new_signer(algorithm)?;
        let device = Arc::new(SignatureDevice::new(label, signer));
        let info = device.info();

        self.registry.set(info.id, device);

        Ok(info)
    }

    /// Signs `raw` with the device `id`, advancing its chain.
    ///
    /// The registry lock is released before signing starts.
    pub fn sign_data(&self, id: &Uuid, raw: &[u8]) -> Result<SignedData, Error> {
        self.device(id)?.sign_data(raw)
    }

    pub fn list_devices(&self) -> Vec<DeviceInfo> {
        self.registry
            .get_all()
            .iter()
            .map(|device| device.info())
            .collect()
    }

    pub fn get_device(&self, id: &Uuid) -> Result<DeviceInfo, Error> {
        self.device(id).map(|device| device.info())
    }

    fn device(&self, id: &Uuid) -> Result<Arc<SignatureDevice>, Error> {
        self.registry.get(id).ok_or(Error::DeviceNotFound(*id))
    }
}

impl Default for SigningService {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Algorithm;
    use static_assertions::assert_impl_all;

    assert_impl_all!(SigningService: Send, Sync);

    #[test]
    fn create_and_get() {
        let service = SigningService::in_memory();
        let created = service.create_device("ecc", "Device2").unwrap();

        assert_eq!(created.label, "Device2");
        assert_eq!(created.algorithm, Algorithm::Ecc);
        assert_eq!(service.get_device(&created.id).unwrap(), created);
    }

    #[test]
    fn create_with_empty_label_uses_id() {
        let service = SigningService::in_memory();
        let created = service.create_device("ECC", "").unwrap();
        assert_eq!(created.label, created.id.to_string());
    }

    #[test]
    fn create_rejects_unknown_algorithm() {
        let service = SigningService::in_memory();
        assert!(matches!(
            service.create_device("DSA", "x"),
            Err(Error::UnsupportedAlgorithm(tag)) if tag == "DSA"
        ));
        assert!(service.list_devices().is_empty());
    }

    #[test]
    fn unknown_device() {
        let service = SigningService::in_memory();
        let id = Uuid::from_u128(42);

        assert!(matches!(service.get_device(&id), Err(Error::DeviceNotFound(i)) if i == id));
        assert!(matches!(service.sign_data(&id, b"x"), Err(Error::DeviceNotFound(i)) if i == id));
    }

    #[test]
    fn sign_and_list() {
        let service = SigningService::in_memory();
        let rsa = service.create_device("RSA", "Device1").unwrap();
        let ecc = service.create_device("ECC", "Device2").unwrap();

        for (n, device) in [&rsa, &ecc, &rsa].into_iter().enumerate() {
            let signed = service.sign_data(&device.id, b"Hello World").unwrap();
            assert!(device.public_key.verify(&signed.data, &signed.signature));
            assert_eq!(signed.counter, if n == 2 { 1 } else { 0 });
        }

        let mut listed = service.list_devices();
        listed.sort_by(|a, b| a.label.cmp(&b.label));
        assert_eq!(listed, [rsa, ecc]);

        let device = service.registry().get(&listed[0].id).unwrap();
        assert_eq!(device.counter(), 2);
    }
}

//! Lookup of live devices by identity.

use crate::device::SignatureDevice;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Storage of devices shared between request handlers.
///
/// Implementers only hand out references; devices serialize their own mutation, so callers may
/// keep using a device after the registry lock is released.
pub trait DeviceRegistry: Send + Sync {
    /// Stores `device` under `id`. Visible to every subsequent [`get`](Self::get) once this returns.
    fn set(&self, id: Uuid, device: Arc<SignatureDevice>);

    fn get(&self, id: &Uuid) -> Option<Arc<SignatureDevice>>;

    /// A snapshot of every stored device, in no particular order.
    fn get_all(&self) -> Vec<Arc<SignatureDevice>>;
}

/// A process-local registry guarded by a reader-writer lock.
#[derive(Default)]
pub struct InMemoryRegistry {
    devices: RwLock<HashMap<Uuid, Arc<SignatureDevice>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

// The map is only ever modified by a single `insert`, so a poisoned lock cannot expose a
// half-finished update.
impl DeviceRegistry for InMemoryRegistry {
    fn set(&self, id: Uuid, device: Arc<SignatureDevice>) {
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, device);
    }

    fn get(&self, id: &Uuid) -> Option<Arc<SignatureDevice>> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn get_all(&self) -> Vec<Arc<SignatureDevice>> {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

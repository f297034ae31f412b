//! Ephemeral registry backend, used by tests and the "memory" config
//! option.

use std::sync::Mutex;

use netinv_common::device::{Device, DeviceId};
use netinv_common::error::{InventoryError, Result};

use super::DeviceRegistry;

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: Mutex<Vec<Device>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceRegistry for MemoryRegistry {
    fn add(&self, device: &Device) -> Result<()> {
        let mut records = self.records.lock().expect("registry poisoned");
        if records.iter().any(|d| d.id == device.id) {
            return Err(InventoryError::validation(format!(
                "device {} already exists",
                device.id
            )));
        }
        records.push(device.clone());
        Ok(())
    }

    fn get(&self, id: DeviceId) -> Result<Option<Device>> {
        let records = self.records.lock().expect("registry poisoned");
        Ok(records.iter().find(|d| d.id == id).cloned())
    }

    fn update(&self, device: &Device) -> Result<()> {
        let mut records = self.records.lock().expect("registry poisoned");
        match records.iter_mut().find(|d| d.id == device.id) {
            Some(slot) => {
                *slot = device.clone();
                Ok(())
            }
            None => Err(InventoryError::not_found(format!("device {}", device.id))),
        }
    }

    fn delete(&self, id: DeviceId) -> Result<()> {
        let mut records = self.records.lock().expect("registry poisoned");
        records.retain(|d| d.id != id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Device>> {
        Ok(self.records.lock().expect("registry poisoned").clone())
    }

    fn replace_all(&self, devices: &[Device]) -> Result<()> {
        let mut records = self.records.lock().expect("registry poisoned");
        *records = devices.to_vec();
        Ok(())
    }
}

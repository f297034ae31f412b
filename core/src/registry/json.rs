//! Flat-file registry backend: one JSON array of attribute maps.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use netinv_common::codec::{AttrMap, decode_device, encode_device};
use netinv_common::device::{Device, DeviceId};
use netinv_common::error::{InventoryError, Result};

use super::DeviceRegistry;

pub struct JsonRegistry {
    path: PathBuf,
    // Serializes read-modify-write cycles against the same file.
    io: Mutex<()>,
}

impl JsonRegistry {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            write_maps(&path, &[])?;
        }
        Ok(Self {
            path,
            io: Mutex::new(()),
        })
    }

    fn read_maps(&self) -> Result<Vec<AttrMap>> {
        let raw = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| {
            InventoryError::storage(format!("parsing registry {}", self.path.display()), e)
        })
    }
}

fn write_maps(path: &Path, maps: &[AttrMap]) -> Result<()> {
    let raw = serde_json::to_string_pretty(maps)
        .map_err(|e| InventoryError::storage("serializing registry", e))?;
    std::fs::write(path, raw)?;
    Ok(())
}

impl DeviceRegistry for JsonRegistry {
    fn add(&self, device: &Device) -> Result<()> {
        let _guard = self.io.lock().expect("registry io lock poisoned");
        let mut maps = self.read_maps()?;
        let id = device.id.to_string();
        if maps
            .iter()
            .any(|m| m.get("id").and_then(|v| v.as_str()) == Some(id.as_str()))
        {
            return Err(InventoryError::validation(format!(
                "device {id} already exists"
            )));
        }
        maps.push(encode_device(device));
        write_maps(&self.path, &maps)
    }

    fn get(&self, id: DeviceId) -> Result<Option<Device>> {
        let _guard = self.io.lock().expect("registry io lock poisoned");
        let id = id.to_string();
        for map in self.read_maps()? {
            if map.get("id").and_then(|v| v.as_str()) == Some(id.as_str()) {
                return decode_device(&map).map(Some);
            }
        }
        Ok(None)
    }

    fn update(&self, device: &Device) -> Result<()> {
        let _guard = self.io.lock().expect("registry io lock poisoned");
        let mut maps = self.read_maps()?;
        let id = device.id.to_string();
        for map in maps.iter_mut() {
            if map.get("id").and_then(|v| v.as_str()) == Some(id.as_str()) {
                *map = encode_device(device);
                return write_maps(&self.path, &maps);
            }
        }
        Err(InventoryError::not_found(format!("device {id}")))
    }

    fn delete(&self, id: DeviceId) -> Result<()> {
        let _guard = self.io.lock().expect("registry io lock poisoned");
        let mut maps = self.read_maps()?;
        let id = id.to_string();
        maps.retain(|m| m.get("id").and_then(|v| v.as_str()) != Some(id.as_str()));
        write_maps(&self.path, &maps)
    }

    fn list(&self) -> Result<Vec<Device>> {
        let _guard = self.io.lock().expect("registry io lock poisoned");
        self.read_maps()?.iter().map(decode_device).collect()
    }

    fn replace_all(&self, devices: &[Device]) -> Result<()> {
        let _guard = self.io.lock().expect("registry io lock poisoned");
        let maps: Vec<AttrMap> = devices.iter().map(encode_device).collect();
        write_maps(&self.path, &maps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netinv_common::device::{DeviceKind, ModelName, PortCount, SnmpCapability};

    fn device(addr: &str) -> Device {
        Device::fresh(
            addr.parse().unwrap(),
            "aa:bb:cc:dd:ee:ff".parse().unwrap(),
            SnmpCapability::V2c,
        )
    }

    fn open_temp() -> (tempfile::TempDir, JsonRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = JsonRegistry::open(dir.path().join("devices.json")).unwrap();
        (dir, registry)
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.json");
        let dev = device("10.0.0.1");

        let registry = JsonRegistry::open(&path).unwrap();
        registry.add(&dev).unwrap();
        drop(registry);

        let reopened = JsonRegistry::open(&path).unwrap();
        assert_eq!(reopened.get(dev.id).unwrap().unwrap(), dev);
    }

    #[test]
    fn subtype_payload_round_trips_through_the_file() {
        let (_dir, registry) = open_temp();
        let mut dev = device("10.0.0.1");
        dev.kind = DeviceKind::Switch {
            port_count: PortCount::new(16).unwrap(),
            model: ModelName::new("GS316").unwrap(),
            has_web_ui: true,
        };
        registry.add(&dev).unwrap();
        assert_eq!(registry.list().unwrap(), vec![dev]);
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let (_dir, registry) = open_temp();
        let dev = device("10.0.0.1");
        registry.add(&dev).unwrap();
        assert!(registry.add(&dev).is_err());
    }

    #[test]
    fn update_missing_is_not_found() {
        let (_dir, registry) = open_temp();
        assert!(matches!(
            registry.update(&device("10.0.0.1")),
            Err(InventoryError::NotFound(_))
        ));
    }

    #[test]
    fn corrupt_file_surfaces_as_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.json");
        std::fs::write(&path, "not json").unwrap();
        let registry = JsonRegistry::open(&path).unwrap();
        assert!(matches!(
            registry.list(),
            Err(InventoryError::Storage { .. })
        ));
    }
}

//! Durable storage of canonical device records.
//!
//! The registry is a key-value contract over device ids; entities cross
//! it as flat attribute maps (see `netinv_common::codec`). Two backends
//! are provided: an in-memory store and a flat JSON file.

use netinv_common::device::{Device, DeviceId};
use netinv_common::error::Result;

pub mod json;
pub mod memory;

pub use json::JsonRegistry;
pub use memory::MemoryRegistry;

pub trait DeviceRegistry: Send + Sync {
    /// Inserts a new record; a duplicate id is an error.
    fn add(&self, device: &Device) -> Result<()>;

    fn get(&self, id: DeviceId) -> Result<Option<Device>>;

    /// Replaces an existing record; a missing id is a not-found error.
    fn update(&self, device: &Device) -> Result<()>;

    /// Removes a record. Deleting an absent id is not an error.
    fn delete(&self, id: DeviceId) -> Result<()>;

    /// All records, in storage order.
    fn list(&self) -> Result<Vec<Device>>;

    /// Swaps the full snapshot, preserving the given order.
    fn replace_all(&self, devices: &[Device]) -> Result<()>;
}

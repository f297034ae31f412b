//! Inventory engine: reconciliation, classification, throughput
//! estimation and the ports they depend on.

pub mod bandwidth;
pub mod classifier;
pub mod enrich;
pub mod gateway;
pub mod ifindex;
pub mod inventory;
pub mod reconcile;
pub mod registry;

pub use bandwidth::{BandwidthSampler, SampleKey, Throughput};
pub use gateway::{EnrichmentGateway, OfflineGateway, SnmpScalars, SweepHost};
pub use inventory::InventoryService;
pub use reconcile::ScanReconciler;
pub use registry::{DeviceRegistry, JsonRegistry, MemoryRegistry};

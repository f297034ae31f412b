//! Service facade composing the engine.
//!
//! Owns the gateway and registry ports plus the reconciler and sampler
//! state; the request-handling layer above only ever talks to this
//! type. The registry instance is passed in by whoever composes the
//! process; there is no hidden global device list.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use netinv_common::codec::{AttrMap, decode_device, encode_device};
use netinv_common::config::InventoryConfig;
use netinv_common::device::{Device, DiscoveredHost, HardwareAddr, KindTag, SnmpCapability};
use netinv_common::error::{InventoryError, Result};

use crate::bandwidth::{BandwidthSampler, SampleKey, Throughput};
use crate::classifier::reclassify;
use crate::enrich::{self, EnrichmentPolicy};
use crate::gateway::EnrichmentGateway;
use crate::ifindex::resolve_interface_index;
use crate::reconcile::ScanReconciler;
use crate::registry::DeviceRegistry;

pub struct InventoryService {
    gateway: Arc<dyn EnrichmentGateway>,
    registry: Arc<dyn DeviceRegistry>,
    reconciler: ScanReconciler,
    sampler: BandwidthSampler,
    policy: EnrichmentPolicy,
    // Monotonic origin for bandwidth sample timestamps.
    epoch: Instant,
}

impl InventoryService {
    pub fn new(
        config: &InventoryConfig,
        gateway: Arc<dyn EnrichmentGateway>,
        registry: Arc<dyn DeviceRegistry>,
    ) -> Self {
        Self {
            gateway,
            registry,
            reconciler: ScanReconciler::new(config.debounce(), config.keep_previous_capability),
            sampler: BandwidthSampler::new(),
            policy: EnrichmentPolicy::from_config(&config.enrichment),
            epoch: Instant::now(),
        }
    }

    pub fn list_devices(&self) -> Result<Vec<Device>> {
        self.registry.list()
    }

    /// Runs one discovery cycle: sweep, per-host capability probe,
    /// reconcile against the stored snapshot, persist.
    ///
    /// A failed capability probe marks that entry `none` and moves on;
    /// it never aborts the batch.
    pub async fn trigger_discovery(&self) -> Result<Vec<Device>> {
        let previous = self.registry.list()?;
        let swept = self.gateway.sweep().await?;

        let mut batch = Vec::with_capacity(swept.len());
        for host in swept {
            let snmp = match self.gateway.probe_capability(host.address).await {
                Ok(capability) => capability,
                Err(e) => {
                    warn!(address = %host.address, "capability probe failed: {e}");
                    SnmpCapability::None
                }
            };
            batch.push(DiscoveredHost {
                address: host.address,
                hardware_id: host.hardware_id,
                snmp,
            });
        }

        let next = self.reconciler.reconcile(&previous, &batch);
        self.registry.replace_all(&next)?;
        info!(devices = next.len(), "discovery cycle complete");
        Ok(next)
    }

    /// Enriches a single device and writes it back.
    pub async fn enrich_device(&self, address: std::net::IpAddr) -> Result<Device> {
        let device = self.find_by_address(address)?;
        let enriched =
            enrich::enrich_device(Arc::clone(&self.gateway), device, &self.policy).await;
        self.registry.update(&enriched)?;
        Ok(enriched)
    }

    /// Enriches every stored device on the bounded worker pool.
    pub async fn enrich_all(&self) -> Result<Vec<Device>> {
        let devices = self.registry.list()?;
        enrich::enrich_all(
            Arc::clone(&self.gateway),
            self.registry.as_ref(),
            devices,
            &self.policy,
        )
        .await
    }

    /// Current throughput estimate for one device link.
    ///
    /// Bandwidth is optional enrichment: a device without management
    /// capability yields zero without any gateway traffic.
    pub async fn get_bandwidth(
        &self,
        address: std::net::IpAddr,
        hardware_id: HardwareAddr,
    ) -> Result<Throughput> {
        let device = self.find_by_address(address)?;
        if !device.snmp.is_available() {
            return Ok(Throughput::ZERO);
        }

        let table = match self.gateway.query_interface_table(address).await {
            Ok(table) => table,
            Err(InventoryError::Unsupported(_)) => return Ok(Throughput::ZERO),
            Err(e) => return Err(e),
        };
        let if_index = resolve_interface_index(&hardware_id, &table)?;
        let (in_octets, out_octets) = match self.gateway.query_octet_counters(address, if_index).await
        {
            Ok(counters) => counters,
            Err(InventoryError::Unsupported(_)) => return Ok(Throughput::ZERO),
            Err(e) => return Err(e),
        };

        let key = SampleKey {
            address,
            hardware_id,
        };
        Ok(self
            .sampler
            .feed(key, self.epoch.elapsed(), in_octets, out_octets))
    }

    /// Swaps a device's subtype, keeping all shared fields.
    pub fn reclassify(&self, address: std::net::IpAddr, target: KindTag) -> Result<Device> {
        let device = self.find_by_address(address)?;
        let changed = reclassify(device, target);
        self.registry.update(&changed)?;
        Ok(changed)
    }

    /// The whole snapshot as a JSON document of attribute maps.
    pub fn export_snapshot(&self) -> Result<String> {
        let maps: Vec<AttrMap> = self.registry.list()?.iter().map(encode_device).collect();
        serde_json::to_string_pretty(&maps)
            .map_err(|e| InventoryError::storage("serializing snapshot", e))
    }

    /// Replaces the registry contents with an exported snapshot.
    /// Records are validated on decode; a malformed document imports
    /// nothing.
    pub fn import_snapshot(&self, doc: &str) -> Result<usize> {
        let maps: Vec<AttrMap> = serde_json::from_str(doc)
            .map_err(|e| InventoryError::codec(format!("invalid snapshot document: {e}")))?;
        let devices: Vec<Device> = maps.iter().map(decode_device).collect::<Result<_>>()?;
        self.registry.replace_all(&devices)?;
        Ok(devices.len())
    }

    fn find_by_address(&self, address: std::net::IpAddr) -> Result<Device> {
        self.registry
            .list()?
            .into_iter()
            .find(|d| d.address == address)
            .ok_or_else(|| InventoryError::not_found(format!("device at {address}")))
    }
}

//! The outbound port for all network probing.
//!
//! Everything that actually touches the wire (address-resolution sweep,
//! service scanning, SNMP transport) sits behind this trait. The engine
//! only ever sees structured results or an `Unsupported` error, so the
//! reconciler and classifier stay fully testable without a network.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

use netinv_common::device::{HardwareAddr, ServiceEntry, SnmpCapability};
use netinv_common::error::Result;

/// One (address, hardware id) pair observed by a sweep, before any
/// capability probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepHost {
    pub address: IpAddr,
    pub hardware_id: HardwareAddr,
}

/// Management-protocol scalar values describing a device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnmpScalars {
    pub sys_descr: String,
    pub sys_name: String,
    pub sys_object_id: String,
    pub ip_forwarding: bool,
    /// System uptime in hundredths of a second.
    pub uptime_ticks: u64,
}

impl SnmpScalars {
    pub fn uptime(&self) -> Duration {
        Duration::from_millis(self.uptime_ticks * 10)
    }
}

/// Best-effort network probing operations.
///
/// Capability-style failures surface as [`InventoryError::Unsupported`]
/// and degrade the affected field; they must never abort a batch.
///
/// [`InventoryError::Unsupported`]: netinv_common::error::InventoryError::Unsupported
#[async_trait]
pub trait EnrichmentGateway: Send + Sync {
    /// One address-resolution sweep over the local network, yielding the
    /// (address, hardware id) pairs that answered.
    async fn sweep(&self) -> Result<Vec<SweepHost>>;

    /// Checks which management protocol version the device answers to.
    async fn probe_capability(&self, address: IpAddr) -> Result<SnmpCapability>;

    /// Port/service scan of a single host.
    async fn scan_services(&self, address: IpAddr) -> Result<Vec<ServiceEntry>>;

    /// Raw OS fingerprint string, e.g. from TCP/IP stack analysis.
    async fn query_os_fingerprint(&self, address: IpAddr) -> Result<String>;

    /// System scalar group of the device's management agent.
    async fn query_snmp_scalars(&self, address: IpAddr) -> Result<SnmpScalars>;

    /// Interface table as (interface index, raw hardware address text)
    /// pairs. The raw text is whatever the agent reports and may carry
    /// arbitrary delimiters.
    async fn query_interface_table(&self, address: IpAddr) -> Result<Vec<(u32, String)>>;

    /// Cumulative (in, out) octet counters for one interface.
    async fn query_octet_counters(&self, address: IpAddr, if_index: u32) -> Result<(u64, u64)>;
}

/// Gateway for processes running without a wired-in prober: the sweep
/// sees nothing and every probe reports its capability as unavailable.
/// Registry-only operations (list, export/import, reclassify) still
/// work against it.
#[derive(Debug, Default)]
pub struct OfflineGateway;

#[async_trait]
impl EnrichmentGateway for OfflineGateway {
    async fn sweep(&self) -> Result<Vec<SweepHost>> {
        Ok(Vec::new())
    }

    async fn probe_capability(&self, _address: IpAddr) -> Result<SnmpCapability> {
        Ok(SnmpCapability::None)
    }

    async fn scan_services(&self, address: IpAddr) -> Result<Vec<ServiceEntry>> {
        Err(unavailable(address))
    }

    async fn query_os_fingerprint(&self, address: IpAddr) -> Result<String> {
        Err(unavailable(address))
    }

    async fn query_snmp_scalars(&self, address: IpAddr) -> Result<SnmpScalars> {
        Err(unavailable(address))
    }

    async fn query_interface_table(&self, address: IpAddr) -> Result<Vec<(u32, String)>> {
        Err(unavailable(address))
    }

    async fn query_octet_counters(&self, address: IpAddr, _if_index: u32) -> Result<(u64, u64)> {
        Err(unavailable(address))
    }
}

fn unavailable(address: IpAddr) -> netinv_common::error::InventoryError {
    netinv_common::error::InventoryError::unsupported(format!("no prober wired for {address}"))
}

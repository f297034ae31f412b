//! Domain model for inventoried LAN devices.
//!
//! A [`Device`] is one shared record plus a discriminated subtype payload
//! ([`DeviceKind`]). Reclassification swaps the payload; it never grows
//! extra fields onto the shared base. All numeric bounds and enum tokens
//! are rejected at construction, never clamped.

pub mod fields;
pub mod hwaddr;

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{InventoryError, Result};

pub use fields::{LoadPercent, ModelName, PortCount};
pub use hwaddr::HardwareAddr;

/// Placeholder for descriptive fields no probe has filled in yet.
pub const UNKNOWN: &str = "Unknown";

/// Returns true when a descriptive string carries no real information.
///
/// Fresh records are seeded with [`UNKNOWN`]; the reconciler must not let
/// that placeholder clobber an enriched value from a previous snapshot.
pub fn is_placeholder(value: &str) -> bool {
    value.is_empty() || value == UNKNOWN
}

/// Opaque device identity, assigned once at first observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(Uuid);

impl DeviceId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|e| InventoryError::validation(format!("invalid device id {raw:?}: {e}")))
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Which management protocol version a device answered to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnmpCapability {
    #[default]
    None,
    V2c,
    V3,
}

impl SnmpCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::V2c => "v2c",
            Self::V3 => "v3",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "none" => Ok(Self::None),
            "v2c" => Ok(Self::V2c),
            "v3" => Ok(Self::V3),
            other => Err(InventoryError::validation(format!(
                "invalid snmp capability {other:?}"
            ))),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    Open,
    Closed,
    Filtered,
}

/// One scanned service on a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub port: u16,
    pub protocol: Protocol,
    pub status: PortStatus,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub version: String,
}

impl ServiceEntry {
    pub fn open_tcp(port: u16, service: &str) -> Self {
        Self {
            port,
            protocol: Protocol::Tcp,
            status: PortStatus::Open,
            service: service.to_string(),
            product: String::new(),
            version: String::new(),
        }
    }
}

/// Subtype discriminator, used at serialization and reclassification
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindTag {
    Lan,
    Router,
    Switch,
    Computer,
}

impl KindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lan => "LanDevice",
            Self::Router => "Router",
            Self::Switch => "Switch",
            Self::Computer => "Computer",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "LanDevice" => Ok(Self::Lan),
            "Router" => Ok(Self::Router),
            "Switch" => Ok(Self::Switch),
            "Computer" => Ok(Self::Computer),
            other => Err(InventoryError::validation(format!(
                "unsupported device type {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for KindTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subtype payload. A device carries exactly one of these at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceKind {
    Lan,
    Router,
    Switch {
        port_count: PortCount,
        model: ModelName,
        has_web_ui: bool,
    },
    Computer {
        cpu_load_pct: LoadPercent,
        mem_load_pct: LoadPercent,
    },
}

impl DeviceKind {
    pub fn tag(&self) -> KindTag {
        match self {
            Self::Lan => KindTag::Lan,
            Self::Router => KindTag::Router,
            Self::Switch { .. } => KindTag::Switch,
            Self::Computer { .. } => KindTag::Computer,
        }
    }
}

/// A device record in the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: DeviceId,
    pub address: IpAddr,
    pub hardware_id: HardwareAddr,
    pub vendor: String,
    pub os: String,
    pub hostname: String,
    pub tags: BTreeSet<String>,
    pub services: Vec<ServiceEntry>,
    pub connected: bool,
    pub uptime: Duration,
    pub snmp: SnmpCapability,
    pub kind: DeviceKind,
}

impl Device {
    /// Builds the minimal record for a host first seen in a discovery
    /// batch: new identity, reachable, capability from the probe,
    /// descriptive fields defaulted.
    pub fn fresh(address: IpAddr, hardware_id: HardwareAddr, snmp: SnmpCapability) -> Self {
        Self {
            id: DeviceId::new(),
            address,
            hardware_id,
            vendor: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
            hostname: UNKNOWN.to_string(),
            tags: BTreeSet::new(),
            services: Vec::new(),
            connected: true,
            uptime: Duration::ZERO,
            snmp,
            kind: DeviceKind::Lan,
        }
    }

    /// Sets the hostname, rejecting empty or whitespace-only values.
    pub fn set_hostname(&mut self, hostname: &str) -> Result<()> {
        if hostname.trim().is_empty() {
            return Err(InventoryError::validation(
                "hostname must be a non-empty string",
            ));
        }
        self.hostname = hostname.to_string();
        Ok(())
    }
}

/// One (address, hardware id) observation from a discovery sweep, with
/// the result of its best-effort capability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredHost {
    pub address: IpAddr,
    pub hardware_id: HardwareAddr,
    pub snmp: SnmpCapability,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> IpAddr {
        "192.168.0.10".parse().unwrap()
    }

    fn hw() -> HardwareAddr {
        "aa:bb:cc:dd:ee:ff".parse().unwrap()
    }

    #[test]
    fn fresh_record_defaults() {
        let dev = Device::fresh(addr(), hw(), SnmpCapability::V2c);
        assert!(dev.connected);
        assert_eq!(dev.snmp, SnmpCapability::V2c);
        assert_eq!(dev.vendor, UNKNOWN);
        assert_eq!(dev.kind, DeviceKind::Lan);
        assert!(dev.tags.is_empty());
        assert_eq!(dev.uptime, Duration::ZERO);
    }

    #[test]
    fn fresh_records_get_distinct_ids() {
        let a = Device::fresh(addr(), hw(), SnmpCapability::None);
        let b = Device::fresh(addr(), hw(), SnmpCapability::None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_hostname_rejected() {
        let mut dev = Device::fresh(addr(), hw(), SnmpCapability::None);
        assert!(dev.set_hostname("   ").is_err());
        assert!(dev.set_hostname("printer-3f").is_ok());
        assert_eq!(dev.hostname, "printer-3f");
    }

    #[test]
    fn capability_tokens_round_trip() {
        for cap in [SnmpCapability::None, SnmpCapability::V2c, SnmpCapability::V3] {
            assert_eq!(SnmpCapability::parse(cap.as_str()).unwrap(), cap);
        }
        assert!(SnmpCapability::parse("v1").is_err());
    }

    #[test]
    fn kind_tag_rejects_unknown_type() {
        assert!(KindTag::parse("Toaster").is_err());
        assert_eq!(KindTag::parse("Switch").unwrap(), KindTag::Switch);
    }

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder(UNKNOWN));
        assert!(!is_placeholder("openwrt.lan"));
    }
}

//! A scripted gateway for exercising full flows without a network.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;

use async_trait::async_trait;
use netinv_common::device::{HardwareAddr, ServiceEntry, SnmpCapability};
use netinv_common::error::{InventoryError, Result};
use netinv_core::{EnrichmentGateway, SnmpScalars, SweepHost};

pub fn mac(raw: &str) -> HardwareAddr {
    raw.parse().expect("well-formed test hardware address")
}

/// Everything the fake network knows about one host.
#[derive(Clone)]
pub struct HostScript {
    pub hardware_id: HardwareAddr,
    /// Whether the host answers the address-resolution sweep.
    pub in_sweep: bool,
    pub snmp: SnmpCapability,
    pub services: Vec<ServiceEntry>,
    pub os_fingerprint: Option<String>,
    pub scalars: Option<SnmpScalars>,
    pub interface_table: Vec<(u32, String)>,
    /// Counter readings handed out in order; the last one repeats.
    pub octet_counters: VecDeque<(u64, u64)>,
}

impl HostScript {
    pub fn new(hardware_id: HardwareAddr) -> Self {
        Self {
            hardware_id,
            in_sweep: true,
            snmp: SnmpCapability::None,
            services: Vec::new(),
            os_fingerprint: None,
            scalars: None,
            interface_table: Vec::new(),
            octet_counters: VecDeque::new(),
        }
    }
}

#[derive(Default)]
pub struct FakeGateway {
    hosts: Mutex<HashMap<IpAddr, HostScript>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, address: IpAddr, script: HostScript) {
        self.hosts
            .lock()
            .expect("gateway script lock")
            .insert(address, script);
    }

    pub fn set_in_sweep(&self, address: IpAddr, in_sweep: bool) {
        if let Some(script) = self
            .hosts
            .lock()
            .expect("gateway script lock")
            .get_mut(&address)
        {
            script.in_sweep = in_sweep;
        }
    }

    fn with_host<T>(&self, address: IpAddr, f: impl FnOnce(&mut HostScript) -> T) -> Result<T> {
        let mut hosts = self.hosts.lock().expect("gateway script lock");
        match hosts.get_mut(&address) {
            Some(script) => Ok(f(script)),
            None => Err(InventoryError::unsupported(format!(
                "{address} is not scripted"
            ))),
        }
    }
}

#[async_trait]
impl EnrichmentGateway for FakeGateway {
    async fn sweep(&self) -> Result<Vec<SweepHost>> {
        let hosts = self.hosts.lock().expect("gateway script lock");
        let mut swept: Vec<SweepHost> = hosts
            .iter()
            .filter(|(_, script)| script.in_sweep)
            .map(|(address, script)| SweepHost {
                address: *address,
                hardware_id: script.hardware_id,
            })
            .collect();
        swept.sort_by_key(|host| host.address);
        Ok(swept)
    }

    async fn probe_capability(&self, address: IpAddr) -> Result<SnmpCapability> {
        self.with_host(address, |script| script.snmp)
    }

    async fn scan_services(&self, address: IpAddr) -> Result<Vec<ServiceEntry>> {
        self.with_host(address, |script| script.services.clone())
    }

    async fn query_os_fingerprint(&self, address: IpAddr) -> Result<String> {
        self.with_host(address, |script| script.os_fingerprint.clone())?
            .ok_or_else(|| InventoryError::unsupported("no fingerprint scripted"))
    }

    async fn query_snmp_scalars(&self, address: IpAddr) -> Result<SnmpScalars> {
        self.with_host(address, |script| script.scalars.clone())?
            .ok_or_else(|| InventoryError::unsupported("no scalars scripted"))
    }

    async fn query_interface_table(&self, address: IpAddr) -> Result<Vec<(u32, String)>> {
        let table = self.with_host(address, |script| script.interface_table.clone())?;
        if table.is_empty() {
            return Err(InventoryError::unsupported("no interface table scripted"));
        }
        Ok(table)
    }

    async fn query_octet_counters(&self, address: IpAddr, _if_index: u32) -> Result<(u64, u64)> {
        let reading = self.with_host(address, |script| {
            if script.octet_counters.len() > 1 {
                script.octet_counters.pop_front()
            } else {
                script.octet_counters.front().copied()
            }
        })?;
        reading.ok_or_else(|| InventoryError::unsupported("no counters scripted"))
    }
}

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use netinv_common::config::InventoryConfig;
use netinv_common::device::{DeviceKind, KindTag, ServiceEntry, SnmpCapability};
use netinv_core::{
    InventoryService, JsonRegistry, MemoryRegistry, SnmpScalars, Throughput,
};

use crate::fake::{FakeGateway, HostScript, mac};

fn addr(last: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
}

fn config(debounce_secs: u64) -> InventoryConfig {
    InventoryConfig {
        scan_debounce_secs: debounce_secs,
        ..InventoryConfig::default()
    }
}

fn service_with(gateway: Arc<FakeGateway>, debounce_secs: u64) -> InventoryService {
    InventoryService::new(
        &config(debounce_secs),
        gateway,
        Arc::new(MemoryRegistry::new()),
    )
}

#[tokio::test]
async fn discovery_persists_swept_hosts() {
    let gateway = Arc::new(FakeGateway::new());
    let mut router = HostScript::new(mac("aa:bb:cc:00:00:01"));
    router.snmp = SnmpCapability::V2c;
    gateway.insert(addr(1), router);
    gateway.insert(addr(2), HostScript::new(mac("aa:bb:cc:00:00:02")));

    let service = service_with(Arc::clone(&gateway), 0);
    let devices = service.trigger_discovery().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert!(devices.iter().all(|d| d.connected));
    let router = devices.iter().find(|d| d.address == addr(1)).unwrap();
    assert_eq!(router.snmp, SnmpCapability::V2c);

    // The registry holds the same snapshot the call returned.
    assert_eq!(service.list_devices().unwrap(), devices);
}

#[tokio::test]
async fn vanished_host_goes_offline_but_stays_known() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.insert(addr(1), HostScript::new(mac("aa:bb:cc:00:00:01")));
    gateway.insert(addr(2), HostScript::new(mac("aa:bb:cc:00:00:02")));

    let service = service_with(Arc::clone(&gateway), 0);
    let first = service.trigger_discovery().await.unwrap();
    let id_of_2 = first.iter().find(|d| d.address == addr(2)).unwrap().id;

    gateway.set_in_sweep(addr(2), false);
    let second = service.trigger_discovery().await.unwrap();

    assert_eq!(second.len(), 2);
    let gone = second.iter().find(|d| d.address == addr(2)).unwrap();
    assert!(!gone.connected);
    assert_eq!(gone.id, id_of_2);
}

#[tokio::test]
async fn discovery_inside_debounce_window_reuses_snapshot() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.insert(addr(1), HostScript::new(mac("aa:bb:cc:00:00:01")));

    let service = service_with(Arc::clone(&gateway), 3600);
    let first = service.trigger_discovery().await.unwrap();

    // A new host shows up, but the window has not elapsed.
    gateway.insert(addr(9), HostScript::new(mac("aa:bb:cc:00:00:09")));
    let second = service.trigger_discovery().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn enrichment_fills_os_hostname_and_tags() {
    let gateway = Arc::new(FakeGateway::new());
    let mut script = HostScript::new(mac("aa:bb:cc:00:00:01"));
    script.snmp = SnmpCapability::V2c;
    script.services = vec![
        ServiceEntry::open_tcp(443, "https"),
        ServiceEntry::open_tcp(53, "domain"),
    ];
    script.os_fingerprint = Some("Linux 5.15".into());
    script.scalars = Some(SnmpScalars {
        sys_descr: "Edge router".into(),
        sys_name: "gw-lab".into(),
        sys_object_id: "1.3.6.1.4.1.14988.1".into(),
        ip_forwarding: true,
        uptime_ticks: 360_000,
    });
    gateway.insert(addr(1), script);

    let service = service_with(Arc::clone(&gateway), 0);
    service.trigger_discovery().await.unwrap();
    let device = service.enrich_device(addr(1)).await.unwrap();

    assert_eq!(device.os, "linux");
    assert_eq!(device.hostname, "gw-lab");
    assert!(device.tags.contains("router"));
    assert!(device.tags.contains("web interface"));
    assert_eq!(device.uptime.as_secs(), 3600);
    assert_eq!(device.services.len(), 2);

    // The write-back is visible through the registry.
    let stored = service.list_devices().unwrap();
    assert_eq!(stored[0].hostname, "gw-lab");
}

#[tokio::test]
async fn enrich_all_covers_every_stored_device() {
    let gateway = Arc::new(FakeGateway::new());
    for last in 1..=4u8 {
        let mut script = HostScript::new(mac(&format!("aa:bb:cc:00:00:{last:02x}")));
        script.os_fingerprint = Some("Windows 11".into());
        gateway.insert(addr(last), script);
    }

    let service = service_with(Arc::clone(&gateway), 0);
    service.trigger_discovery().await.unwrap();
    let enriched = service.enrich_all().await.unwrap();

    assert_eq!(enriched.len(), 4);
    assert!(service
        .list_devices()
        .unwrap()
        .iter()
        .all(|d| d.os == "windows"));
}

#[tokio::test]
async fn bandwidth_baselines_then_reports_zero_delta() {
    let hardware = mac("aa:bb:cc:00:00:01");
    let gateway = Arc::new(FakeGateway::new());
    let mut script = HostScript::new(hardware);
    script.snmp = SnmpCapability::V2c;
    script.interface_table = vec![(1, "00:00:00:00:00:99".into()), (2, "AA-BB-CC-00-00-01".into())];
    script.octet_counters = [(5_000, 2_500)].into_iter().collect();
    gateway.insert(addr(1), script);

    let service = service_with(Arc::clone(&gateway), 0);
    service.trigger_discovery().await.unwrap();

    // First reading only establishes the baseline.
    let first = service.get_bandwidth(addr(1), hardware).await.unwrap();
    assert_eq!(first, Throughput::ZERO);

    // Identical counters on the next reading mean zero throughput.
    let second = service.get_bandwidth(addr(1), hardware).await.unwrap();
    assert_eq!(second, Throughput::ZERO);
}

#[tokio::test]
async fn bandwidth_without_capability_skips_the_wire() {
    let hardware = mac("aa:bb:cc:00:00:01");
    let gateway = Arc::new(FakeGateway::new());
    // No interface table scripted: a query would fail, but capability
    // `none` must short-circuit before any gateway traffic.
    gateway.insert(addr(1), HostScript::new(hardware));

    let service = service_with(Arc::clone(&gateway), 0);
    service.trigger_discovery().await.unwrap();

    let throughput = service.get_bandwidth(addr(1), hardware).await.unwrap();
    assert_eq!(throughput, Throughput::ZERO);
}

#[tokio::test]
async fn reclassify_then_snapshot_roundtrip() {
    let gateway = Arc::new(FakeGateway::new());
    gateway.insert(addr(1), HostScript::new(mac("aa:bb:cc:00:00:01")));

    let service = service_with(Arc::clone(&gateway), 0);
    service.trigger_discovery().await.unwrap();
    let switch = service.reclassify(addr(1), KindTag::Switch).unwrap();
    match switch.kind {
        DeviceKind::Switch { port_count, .. } => assert_eq!(port_count.get(), 8),
        other => panic!("expected a switch, got {other:?}"),
    }

    let doc = service.export_snapshot().unwrap();

    // Import into a fresh service backed by a registry on disk.
    let dir = tempfile::tempdir().unwrap();
    let registry = JsonRegistry::open(dir.path().join("devices.json")).unwrap();
    let other = InventoryService::new(&config(0), Arc::new(FakeGateway::new()), Arc::new(registry));
    let count = other.import_snapshot(&doc).unwrap();

    assert_eq!(count, 1);
    let restored = other.list_devices().unwrap();
    assert_eq!(restored[0].id, switch.id);
    assert_eq!(restored[0].kind.tag(), KindTag::Switch);
}

//! Role and OS classification from heterogeneous signals.
//!
//! Everything in this module is a pure function: signals in, normalized
//! OS family and tag set out. No network access, no side effects, which
//! is what keeps the classification rules testable in isolation.

use std::collections::BTreeSet;

use netinv_common::device::{
    Device, DeviceKind, KindTag, LoadPercent, ModelName, PortCount, PortStatus, ServiceEntry,
    is_placeholder,
};

use crate::gateway::SnmpScalars;

/// Normalized operating-system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
    Ios,
    Android,
    Unknown,
}

impl OsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware nouns that show up in fingerprints and sysDescr strings.
/// A model designation is never an OS name.
const HARDWARE_NOUNS: &[&str] = &[
    "switch",
    "router",
    "gateway",
    "bridge",
    "access point",
    "jetstream",
];

/// Standardizes a raw OS label, avoiding hardware-model confusion.
///
/// Matching is lower-case and runs in priority order; the first hit
/// wins. Huawei gear reporting "android" is actually an embedded Linux,
/// so the vendor corrects that misreport.
pub fn normalize_os(raw: &str, vendor: &str) -> OsFamily {
    let raw = raw.to_lowercase();
    let vendor = vendor.to_lowercase();

    if raw.contains("windows") {
        return OsFamily::Windows;
    }
    if raw.contains("linux") {
        return OsFamily::Linux;
    }
    if raw.contains("mac") || raw.contains("darwin") {
        return OsFamily::MacOs;
    }
    if raw.contains("ios") {
        return OsFamily::Ios;
    }
    if raw.contains("android") && raw.contains("phone") {
        return OsFamily::Android;
    }
    if raw.contains("android") && vendor.contains("huawei") {
        return OsFamily::Linux;
    }
    if HARDWARE_NOUNS.iter().any(|noun| raw.contains(noun)) {
        return OsFamily::Unknown;
    }
    OsFamily::Unknown
}

const VENDOR_OS_TABLE: &[(OsFamily, &[&str])] = &[
    (
        OsFamily::Android,
        &[
            "samsung", "xiaomi", "huawei", "oneplus", "oppo", "realme", "google",
        ],
    ),
    (OsFamily::Ios, &["apple", "ipad", "iphone"]),
    (
        OsFamily::Windows,
        &["microsoft", "hp", "dell", "lenovo", "acer", "asus"],
    ),
    (OsFamily::Linux, &["raspberry", "ubuntu", "debian", "intel"]),
    (OsFamily::MacOs, &["macbook", "imac"]),
];

/// Falls back to the vendor name when the fingerprint gave nothing.
pub fn guess_os_by_vendor(vendor: &str) -> OsFamily {
    let vendor = vendor.to_lowercase();
    for (family, needles) in VENDOR_OS_TABLE {
        if needles.iter().any(|n| vendor.contains(n)) {
            return *family;
        }
    }
    OsFamily::Unknown
}

/// Normalization with the vendor fallback applied: the table is only
/// consulted when the raw label yields unknown and the vendor is known.
pub fn resolve_os(raw: &str, vendor: &str) -> OsFamily {
    let family = normalize_os(raw, vendor);
    if !family.is_known() && !is_placeholder(vendor) {
        return guess_os_by_vendor(vendor);
    }
    family
}

pub mod tags {
    pub const ROUTER: &str = "router";
    pub const SWITCH: &str = "switch";
    pub const NAS: &str = "nas";
    pub const PRINTER: &str = "printer";
    pub const CAMERA: &str = "camera";
    pub const WEB_INTERFACE: &str = "web interface";
    pub const VOIP: &str = "voip";
    pub const IOT: &str = "iot";
    pub const ACCESS_POINT: &str = "access point";
    pub const COMPUTER: &str = "computer";
    pub const PHONE: &str = "phone";
    pub const FIREWALL: &str = "firewall";
    pub const SERVER: &str = "server";
}

/// Computes the full tag set for a device: the union of the port-based,
/// vendor/OS-based and SNMP-descriptor-based sets. The three sets are
/// independent; duplicates collapse in the union.
pub fn assign_tags(device: &Device, snmp: Option<&SnmpScalars>) -> BTreeSet<String> {
    let mut out = tags_from_services(&device.services);
    out.extend(tags_from_vendor_and_os(&device.vendor, &device.os));
    if let Some(scalars) = snmp {
        out.extend(tags_from_snmp(scalars));
    }
    out
}

const ROUTER_PORTS: &[u16] = &[53, 67, 68, 161, 162, 500, 4500];
const NAS_PORTS: &[u16] = &[21, 139, 445, 548, 2049];
const PRINTER_PORTS: &[u16] = &[515, 631, 9100];
const CAMERA_PORTS: &[u16] = &[554, 8554];
const WEB_PORTS: &[u16] = &[80, 443, 8080, 8443];
const VOIP_PORTS: &[u16] = &[5060, 5061];
const IOT_PORTS: &[u16] = &[1883, 5683, 8883];
const RADIUS_PORTS: &[u16] = &[1812, 1813];

fn tags_from_services(services: &[ServiceEntry]) -> BTreeSet<String> {
    let mut out = BTreeSet::new();

    for entry in services.iter().filter(|s| s.status == PortStatus::Open) {
        let port = entry.port;
        let service = entry.service.to_lowercase();
        let product = entry.product.to_lowercase();

        if ROUTER_PORTS.contains(&port)
            || matches!(service.as_str(), "dns" | "domain" | "dhcp" | "snmp" | "isakmp")
        {
            out.insert(tags::ROUTER.into());
        }
        if matches!(service.as_str(), "ssh" | "http" | "telnet") && product.contains("switch") {
            out.insert(tags::SWITCH.into());
        }
        if NAS_PORTS.contains(&port)
            || matches!(
                service.as_str(),
                "ftp" | "nfs" | "afp" | "smb" | "netbios-ssn" | "microsoft-ds"
            )
        {
            out.insert(tags::NAS.into());
        }
        if PRINTER_PORTS.contains(&port)
            || matches!(service.as_str(), "printer" | "ipp" | "jetdirect")
        {
            out.insert(tags::PRINTER.into());
        }
        if CAMERA_PORTS.contains(&port) || service == "rtsp" {
            out.insert(tags::CAMERA.into());
        }
        if WEB_PORTS.contains(&port) || matches!(service.as_str(), "http" | "https") {
            out.insert(tags::WEB_INTERFACE.into());
        }
        if VOIP_PORTS.contains(&port) || service == "sip" {
            out.insert(tags::VOIP.into());
        }
        if IOT_PORTS.contains(&port) || matches!(service.as_str(), "mqtt" | "coap") {
            out.insert(tags::IOT.into());
        }
        if RADIUS_PORTS.contains(&port) || service == "radius" || has_word(&product, "ap") {
            out.insert(tags::ACCESS_POINT.into());
        }
    }
    out
}

const ROUTER_VENDORS: &[&str] = &["huawei", "tp-link", "cisco", "zyxel", "mikrotik"];
const PRINTER_VENDORS: &[&str] = &["hp", "epson", "canon", "brother"];
const IOT_VENDORS: &[&str] = &["tuya", "shelly", "sonoff", "xiaomi"];
const AP_VENDORS: &[&str] = &["ubiquiti", "aruba", "ruckus"];

fn tags_from_vendor_and_os(vendor: &str, os: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let vendor = vendor.to_lowercase();
    let os = os.to_lowercase();

    if ROUTER_VENDORS.iter().any(|v| vendor.contains(v)) {
        out.insert(tags::ROUTER.into());
    }
    if PRINTER_VENDORS.iter().any(|v| vendor.contains(v)) {
        out.insert(tags::PRINTER.into());
    }
    if IOT_VENDORS.iter().any(|v| vendor.contains(v)) {
        out.insert(tags::IOT.into());
    }
    if AP_VENDORS.iter().any(|v| vendor.contains(v)) {
        out.insert(tags::ACCESS_POINT.into());
    }

    match os.as_str() {
        "linux" | "windows" | "macos" => {
            out.insert(tags::COMPUTER.into());
        }
        "android" | "ios" => {
            out.insert(tags::PHONE.into());
        }
        _ => {}
    }
    out
}

/// Vendor-specific object-identifier prefixes with a known role.
const OID_ROLE_TABLE: &[(&str, &str)] = &[
    ("1.3.6.1.4.1.9.", tags::ROUTER),      // Cisco
    ("1.3.6.1.4.1.14988.", tags::ROUTER),  // MikroTik
    ("1.3.6.1.4.1.11863.", tags::SWITCH),  // TP-Link managed
    ("1.3.6.1.4.1.11.", tags::PRINTER),    // HP
];

const DESCR_KEYWORD_TABLE: &[(&str, &str)] = &[
    ("jetstream", tags::SWITCH),
    ("switch", tags::SWITCH),
    ("access point", tags::ACCESS_POINT),
    ("firewall", tags::FIREWALL),
    ("server", tags::SERVER),
    ("router", tags::ROUTER),
    ("printer", tags::PRINTER),
    ("camera", tags::CAMERA),
];

fn tags_from_snmp(scalars: &SnmpScalars) -> BTreeSet<String> {
    let mut out = BTreeSet::new();

    for (prefix, tag) in OID_ROLE_TABLE {
        if scalars.sys_object_id.starts_with(prefix) {
            out.insert((*tag).into());
        }
    }

    let haystack = format!("{} {}", scalars.sys_descr, scalars.sys_name).to_lowercase();
    for (keyword, tag) in DESCR_KEYWORD_TABLE {
        if haystack.contains(keyword) {
            out.insert((*tag).into());
        }
    }

    if scalars.ip_forwarding {
        out.insert(tags::ROUTER.into());
    }
    out
}

fn has_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|w| w == word)
}

/// Default port count used when a record is promoted to Switch without
/// hardware data; zero would violate the positivity bound.
const DEFAULT_SWITCH_PORTS: u32 = 8;

/// Replaces a device's subtype, carrying over all shared fields.
///
/// When the device already carries the target variant its payload is
/// kept; otherwise the payload is filled from the best available data
/// (web-UI presence is read off the scanned services) with "Unknown"
/// string and zero/default numeric fallbacks.
pub fn reclassify(device: Device, target: KindTag) -> Device {
    if device.kind.tag() == target {
        return device;
    }

    let kind = match target {
        KindTag::Lan => DeviceKind::Lan,
        KindTag::Router => DeviceKind::Router,
        KindTag::Switch => DeviceKind::Switch {
            port_count: PortCount::new(DEFAULT_SWITCH_PORTS).expect("positive constant"),
            model: ModelName::new(netinv_common::device::UNKNOWN).expect("non-empty constant"),
            has_web_ui: device
                .services
                .iter()
                .any(|s| s.status == PortStatus::Open && WEB_PORTS.contains(&s.port)),
        },
        KindTag::Computer => DeviceKind::Computer {
            cpu_load_pct: LoadPercent::default(),
            mem_load_pct: LoadPercent::default(),
        },
    };

    Device { kind, ..device }
}

//! Flat attribute-map codec for device records.
//!
//! Entities cross the registry boundary as flat `serde_json` maps with an
//! explicit `type` discriminator, one encode/decode pair per subtype.
//! The codec lives apart from the data types so storage concerns never
//! leak into the domain model.

use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::{Map, Value, json};

use crate::device::{
    Device, DeviceId, DeviceKind, HardwareAddr, KindTag, LoadPercent, ModelName, PortCount,
    ServiceEntry, SnmpCapability,
};
use crate::error::{InventoryError, Result};

/// Attribute map as stored by registry backends.
pub type AttrMap = Map<String, Value>;

pub fn encode_device(device: &Device) -> AttrMap {
    let mut map = encode_base(device);
    match &device.kind {
        DeviceKind::Lan | DeviceKind::Router => {}
        DeviceKind::Switch {
            port_count,
            model,
            has_web_ui,
        } => encode_switch(&mut map, *port_count, model, *has_web_ui),
        DeviceKind::Computer {
            cpu_load_pct,
            mem_load_pct,
        } => encode_computer(&mut map, *cpu_load_pct, *mem_load_pct),
    }
    map
}

pub fn decode_device(map: &AttrMap) -> Result<Device> {
    let tag = KindTag::parse(get_str(map, "type")?)?;
    let mut device = decode_base(map)?;
    device.kind = match tag {
        KindTag::Lan => DeviceKind::Lan,
        KindTag::Router => DeviceKind::Router,
        KindTag::Switch => decode_switch(map)?,
        KindTag::Computer => decode_computer(map)?,
    };
    Ok(device)
}

fn encode_base(device: &Device) -> AttrMap {
    let mut map = Map::new();
    map.insert("id".into(), json!(device.id.to_string()));
    map.insert("address".into(), json!(device.address.to_string()));
    map.insert("hardware_id".into(), json!(device.hardware_id.to_string()));
    map.insert("vendor".into(), json!(device.vendor));
    map.insert("os".into(), json!(device.os));
    map.insert("hostname".into(), json!(device.hostname));
    map.insert(
        "tags".into(),
        Value::Array(device.tags.iter().map(|t| json!(t)).collect()),
    );
    map.insert(
        "services".into(),
        serde_json::to_value(&device.services).unwrap_or(Value::Array(Vec::new())),
    );
    map.insert("connected".into(), json!(device.connected));
    map.insert("uptime_secs".into(), json!(device.uptime.as_secs()));
    map.insert("snmp".into(), json!(device.snmp.as_str()));
    map.insert("type".into(), json!(device.kind.tag().as_str()));
    map
}

fn decode_base(map: &AttrMap) -> Result<Device> {
    let address = get_str(map, "address")?
        .parse()
        .map_err(|e| InventoryError::codec(format!("invalid address: {e}")))?;
    let hardware_id: HardwareAddr = get_str(map, "hardware_id")?.parse()?;

    let tags: BTreeSet<String> = match map.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => BTreeSet::new(),
    };
    let services: Vec<ServiceEntry> = match map.get("services") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| InventoryError::codec(format!("invalid services list: {e}")))?,
        None => Vec::new(),
    };

    Ok(Device {
        id: DeviceId::parse(get_str(map, "id")?)?,
        address,
        hardware_id,
        vendor: get_str(map, "vendor")?.to_string(),
        os: get_str(map, "os")?.to_string(),
        hostname: get_str(map, "hostname")?.to_string(),
        tags,
        services,
        connected: get_bool(map, "connected")?,
        uptime: Duration::from_secs(get_u64(map, "uptime_secs")?),
        snmp: SnmpCapability::parse(get_str(map, "snmp")?)?,
        kind: DeviceKind::Lan,
    })
}

fn encode_switch(map: &mut AttrMap, port_count: PortCount, model: &ModelName, has_web_ui: bool) {
    map.insert("port_count".into(), json!(port_count.get()));
    map.insert("model".into(), json!(model.as_str()));
    map.insert("has_web_ui".into(), json!(has_web_ui));
}

fn decode_switch(map: &AttrMap) -> Result<DeviceKind> {
    let port_count = get_u64(map, "port_count")?;
    let port_count = u32::try_from(port_count)
        .map_err(|_| InventoryError::codec(format!("port_count {port_count} out of range")))?;
    Ok(DeviceKind::Switch {
        port_count: PortCount::new(port_count)?,
        model: ModelName::new(get_str(map, "model")?)?,
        has_web_ui: get_bool(map, "has_web_ui")?,
    })
}

fn encode_computer(map: &mut AttrMap, cpu: LoadPercent, mem: LoadPercent) {
    map.insert("cpu_load_pct".into(), json!(cpu.get()));
    map.insert("mem_load_pct".into(), json!(mem.get()));
}

fn decode_computer(map: &AttrMap) -> Result<DeviceKind> {
    Ok(DeviceKind::Computer {
        cpu_load_pct: decode_load(map, "cpu_load_pct")?,
        mem_load_pct: decode_load(map, "mem_load_pct")?,
    })
}

fn decode_load(map: &AttrMap, key: &str) -> Result<LoadPercent> {
    let value = get_u64(map, key)?;
    let value = u8::try_from(value)
        .map_err(|_| InventoryError::codec(format!("{key} {value} out of range")))?;
    LoadPercent::new(value)
}

fn get_str<'a>(map: &'a AttrMap, key: &str) -> Result<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| InventoryError::codec(format!("missing or non-string attribute {key:?}")))
}

fn get_bool(map: &AttrMap, key: &str) -> Result<bool> {
    map.get(key)
        .and_then(Value::as_bool)
        .ok_or_else(|| InventoryError::codec(format!("missing or non-boolean attribute {key:?}")))
}

fn get_u64(map: &AttrMap, key: &str) -> Result<u64> {
    map.get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| InventoryError::codec(format!("missing or non-integer attribute {key:?}")))
}

use colored::*;
use netinv_common::device::{Device, DeviceKind, ServiceEntry, is_placeholder};

use crate::terminal::{colors, print};

fn title(device: &Device) -> String {
    if is_placeholder(&device.hostname) {
        device.address.to_string()
    } else {
        device.hostname.clone()
    }
}

fn services_line(services: &[ServiceEntry]) -> String {
    let ports: Vec<String> = services
        .iter()
        .map(|s| format!("{}/{}", s.port, s.protocol.as_str()))
        .collect();
    ports.join(", ")
}

fn uptime_line(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

pub fn print_device(idx: usize, device: &Device) {
    print::tree_head(idx, &title(device));

    let mut rows: Vec<(String, ColoredString)> = vec![
        (
            String::from("addr"),
            device.address.to_string().color(colors::ADDR),
        ),
        (
            String::from("mac"),
            device.hardware_id.to_string().color(colors::TEXT_DEFAULT),
        ),
        (
            String::from("vendor"),
            device.vendor.clone().color(colors::TEXT_DEFAULT),
        ),
        (
            String::from("os"),
            device.os.clone().color(colors::TEXT_DEFAULT),
        ),
        (
            String::from("type"),
            device.kind.tag().as_str().color(colors::ACCENT),
        ),
        (
            String::from("snmp"),
            device.snmp.as_str().color(colors::TEXT_DEFAULT),
        ),
    ];

    if !device.tags.is_empty() {
        let tags: Vec<&str> = device.tags.iter().map(String::as_str).collect();
        rows.push((
            String::from("tags"),
            tags.join(", ").color(colors::TEXT_DEFAULT),
        ));
    }
    if !device.services.is_empty() {
        rows.push((
            String::from("ports"),
            services_line(&device.services).color(colors::TEXT_DEFAULT),
        ));
    }
    if !device.uptime.is_zero() {
        rows.push((
            String::from("uptime"),
            uptime_line(device.uptime.as_secs()).color(colors::TEXT_DEFAULT),
        ));
    }

    match &device.kind {
        DeviceKind::Switch {
            port_count,
            model,
            has_web_ui,
        } => {
            rows.push((
                String::from("ports#"),
                port_count.get().to_string().color(colors::TEXT_DEFAULT),
            ));
            rows.push((
                String::from("model"),
                model.as_str().to_string().color(colors::TEXT_DEFAULT),
            ));
            if *has_web_ui {
                rows.push((String::from("web ui"), "yes".color(colors::TEXT_DEFAULT)));
            }
        }
        DeviceKind::Computer {
            cpu_load_pct,
            mem_load_pct,
        } => {
            rows.push((
                String::from("cpu"),
                format!("{}%", cpu_load_pct.get()).color(colors::TEXT_DEFAULT),
            ));
            rows.push((
                String::from("mem"),
                format!("{}%", mem_load_pct.get()).color(colors::TEXT_DEFAULT),
            ));
        }
        DeviceKind::Lan | DeviceKind::Router => {}
    }

    let state: ColoredString = if device.connected {
        "online".color(colors::ONLINE)
    } else {
        "offline".color(colors::OFFLINE)
    };
    rows.push((String::from("state"), state));

    print::as_tree_one_level(rows);
}

pub fn print_device_list(devices: &[Device]) {
    if devices.is_empty() {
        print::no_results("devices");
        return;
    }
    for (idx, device) in devices.iter().enumerate() {
        print_device(idx + 1, device);
    }
    print::print_status(format!("{} device(s)", devices.len()));
}

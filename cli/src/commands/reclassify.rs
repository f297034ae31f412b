use std::net::IpAddr;

use anyhow::bail;
use netinv_common::device::KindTag;
use netinv_core::InventoryService;

use crate::terminal::{format, print};

fn parse_kind(raw: &str) -> anyhow::Result<KindTag> {
    match raw.to_ascii_lowercase().as_str() {
        "lan" | "landevice" => Ok(KindTag::Lan),
        "router" => Ok(KindTag::Router),
        "switch" => Ok(KindTag::Switch),
        "computer" => Ok(KindTag::Computer),
        other => bail!("unknown device type {other:?} (expected lan, router, switch or computer)"),
    }
}

pub fn reclassify(service: &InventoryService, address: IpAddr, kind: &str) -> anyhow::Result<()> {
    let target = parse_kind(kind)?;

    print::section("reclassify");
    let device = service.reclassify(address, target)?;
    format::print_device(1, &device);
    print::end_of_program();
    Ok(())
}

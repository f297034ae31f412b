use std::net::IpAddr;

use anyhow::Context;
use netinv_common::device::HardwareAddr;
use netinv_core::InventoryService;

use crate::terminal::print;

pub async fn bandwidth(
    service: &InventoryService,
    address: IpAddr,
    hardware: &str,
) -> anyhow::Result<()> {
    let hardware_id: HardwareAddr = hardware
        .parse()
        .with_context(|| format!("invalid hardware address {hardware:?}"))?;

    print::section("bandwidth");
    let throughput = service.get_bandwidth(address, hardware_id).await?;
    print::aligned_line("inbound", format!("{:.2} kbps", throughput.in_kbps));
    print::aligned_line("outbound", format!("{:.2} kbps", throughput.out_kbps));
    print::end_of_program();
    Ok(())
}

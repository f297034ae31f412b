use std::net::IpAddr;

use netinv_core::InventoryService;

use crate::terminal::{format, print};

pub async fn enrich(service: &InventoryService, address: Option<IpAddr>) -> anyhow::Result<()> {
    print::section("enrichment");
    match address {
        Some(address) => {
            let device = service.enrich_device(address).await?;
            format::print_device(1, &device);
        }
        None => {
            let devices = service.enrich_all().await?;
            format::print_device_list(&devices);
        }
    }
    print::end_of_program();
    Ok(())
}

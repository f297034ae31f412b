use netinv_core::InventoryService;

use crate::terminal::{format, print};

pub fn devices(service: &InventoryService) -> anyhow::Result<()> {
    print::section("device inventory");
    let devices = service.list_devices()?;
    format::print_device_list(&devices);
    print::end_of_program();
    Ok(())
}

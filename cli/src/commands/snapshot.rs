use std::fs;
use std::path::Path;

use anyhow::Context;
use netinv_core::InventoryService;

use crate::terminal::print;

pub fn export(service: &InventoryService, path: Option<&Path>) -> anyhow::Result<()> {
    let doc = service.export_snapshot()?;
    match path {
        Some(path) => {
            fs::write(path, &doc)
                .with_context(|| format!("writing snapshot to {}", path.display()))?;
            print::print_status(format!("snapshot written to {}", path.display()));
        }
        None => println!("{doc}"),
    }
    Ok(())
}

pub fn import(service: &InventoryService, path: &Path) -> anyhow::Result<()> {
    let doc = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot from {}", path.display()))?;
    let count = service.import_snapshot(&doc)?;
    print::print_status(format!("imported {} device(s)", count));
    Ok(())
}

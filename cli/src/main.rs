mod commands;
mod terminal;

use std::sync::Arc;

use commands::{CommandLine, Commands, bandwidth, devices, discover, enrich, reclassify, snapshot};
use netinv_common::config::InventoryConfig;
use netinv_core::registry::DeviceRegistry;
use netinv_core::{InventoryService, JsonRegistry, MemoryRegistry, OfflineGateway};
use terminal::print;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();

    terminal::logging::init(cli.verbose);
    print::header();

    let config = InventoryConfig::load(&cli.config)?;
    let registry: Arc<dyn DeviceRegistry> = match config.registry.backend.as_str() {
        "memory" => Arc::new(MemoryRegistry::new()),
        _ => Arc::new(JsonRegistry::open(config.registry.json_path.as_str())?),
    };
    let service = InventoryService::new(&config, Arc::new(OfflineGateway), registry);

    match cli.command {
        Commands::Devices => devices::devices(&service),
        Commands::Discover => discover::discover(&service).await,
        Commands::Enrich { address } => enrich::enrich(&service, address).await,
        Commands::Bandwidth { address, hardware } => {
            bandwidth::bandwidth(&service, address, &hardware).await
        }
        Commands::Reclassify { address, kind } => reclassify::reclassify(&service, address, &kind),
        Commands::Export { path } => snapshot::export(&service, path.as_deref()),
        Commands::Import { path } => snapshot::import(&service, &path),
    }
}

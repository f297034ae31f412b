pub mod bandwidth;
pub mod devices;
pub mod discover;
pub mod enrich;
pub mod reclassify;
pub mod snapshot;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "netinv")]
#[command(about = "A live inventory of the devices on your LAN.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "config/netinv.json")]
    pub config: PathBuf,

    /// Show debug-level output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every known device
    #[command(alias = "ls")]
    Devices,
    /// Run one discovery cycle and merge it into the inventory
    #[command(alias = "d")]
    Discover,
    /// Enrich one device, or all of them
    #[command(alias = "e")]
    Enrich { address: Option<IpAddr> },
    /// Estimate link throughput for a device
    #[command(alias = "b")]
    Bandwidth { address: IpAddr, hardware: String },
    /// Change a device's type (lan, router, switch, computer)
    #[command(alias = "r")]
    Reclassify { address: IpAddr, kind: String },
    /// Write the inventory snapshot as JSON (stdout when no path given)
    Export { path: Option<PathBuf> },
    /// Replace the inventory with a previously exported snapshot
    Import { path: PathBuf },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

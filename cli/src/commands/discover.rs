use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use netinv_core::InventoryService;

use crate::terminal::{format, print};

pub async fn discover(service: &InventoryService) -> anyhow::Result<()> {
    print::section("network discovery");

    let spinner = start_spinner("sweeping the local network");
    let start_time: Instant = Instant::now();
    let result = service.trigger_discovery().await;
    spinner.finish_and_clear();

    let devices = result?;
    format::print_device_list(&devices);
    print_summary(devices.len(), start_time.elapsed());
    print::end_of_program();
    Ok(())
}

fn start_spinner(msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_summary(count: usize, total_time: Duration) {
    print::print_status(format!(
        "merged {} host(s) in {:.2}s",
        count,
        total_time.as_secs_f64()
    ));
}

//! `canrun host` command implementation

use crate::host::{HostInfo, detect_host};
use crate::output::{OutputFormat, Table, gb, print_json};
use canrun_core::{FeasibilityEstimator, UsableMemory};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HostReport {
    #[serde(flatten)]
    host: HostInfo,
    usable: UsableMemory,
}

/// Execute the `canrun host` command
pub fn run(estimator: &FeasibilityEstimator, format: OutputFormat) -> anyhow::Result<()> {
    let host = detect_host();
    let usable = estimator.usable_memory(host.total_ram_gb, host.platform);
    let report = HostReport { host, usable };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            let mut table = Table::new(&["Field", "Value"]);
            table
                .add_row(["OS", report.host.os])
                .add_row(["Arch", report.host.arch])
                .add_row(["Platform".to_string(), report.host.platform.to_string()])
                .add_row(["Total RAM".to_string(), gb(Some(report.host.total_ram_gb))])
                .add_row(["Available RAM".to_string(), gb(Some(report.host.available_ram_gb))])
                .add_row(["OS reserve".to_string(), gb(Some(report.usable.reserved_gb))])
                .add_row(["Usable for inference".to_string(), gb(Some(report.usable.usable_ram_gb))]);
            println!("{table}");
        }
        OutputFormat::Text => {
            println!("  {}", "Host".bold());
            println!(
                "    OS:        {} ({}) → {}",
                report.host.os,
                report.host.arch,
                report.host.platform.to_string().cyan()
            );
            println!(
                "    RAM:       {} total, {} available now",
                gb(Some(report.host.total_ram_gb)).yellow(),
                gb(Some(report.host.available_ram_gb))
            );
            println!(
                "    Usable:    {} after a {} OS reserve",
                gb(Some(report.usable.usable_ram_gb)).green(),
                gb(Some(report.usable.reserved_gb))
            );
        }
    }
    Ok(())
}

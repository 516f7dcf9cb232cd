//! `canrun recommend` command implementation

use crate::cli::HostArgs;
use crate::host::RamSource;
use crate::output::{OutputFormat, Table, colored_verdict, gb, print_json};
use canrun_core::{CellVerdict, FeasibilityEstimator, PlatformClass, QuantKey};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RecommendReport {
    params_b: f64,
    platform: PlatformClass,
    ram_gb: Option<f64>,
    ram_source: RamSource,
    recommended: Option<CellVerdict>,
}

/// Execute the `canrun recommend` command
pub fn run(
    estimator: &FeasibilityEstimator,
    format: OutputFormat,
    params_b: f64,
    quants: &[QuantKey],
    context: Option<u32>,
    host: &HostArgs,
) -> anyhow::Result<()> {
    let target = host.resolve()?;
    let recommended =
        estimator.recommend_quant(params_b, quants, target.ram_gb, context, target.platform);
    let report = RecommendReport {
        params_b,
        platform: target.platform,
        ram_gb: target.ram_gb,
        ram_source: target.ram_source,
        recommended,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            let mut table = Table::new(&["Params", "Quant", "Total", "Headroom", "Verdict"]);
            if let Some(cell) = &report.recommended {
                table.add_row([
                    format!("{}B", report.params_b),
                    cell.quant.to_string(),
                    gb(Some(cell.total_gb)),
                    gb(cell.headroom_gb),
                    cell.verdict.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Text => match (&report.recommended, report.ram_gb) {
            (Some(cell), _) => {
                println!(
                    "{} {}B: use {} ({} total, {})",
                    "✓".green(),
                    report.params_b,
                    cell.quant.to_string().bold(),
                    gb(Some(cell.total_gb)),
                    colored_verdict(cell.verdict)
                );
                println!("  {}", cell.quant.config().desc.dimmed());
            }
            (None, None) => println!(
                "{} No RAM figure available; pass --ram to get a recommendation",
                "!".yellow()
            ),
            (None, Some(ram)) => println!(
                "{} No quantization of a {}B model fits in {} on {}",
                "✗".red(),
                report.params_b,
                gb(Some(ram)),
                report.platform
            ),
        },
    }
    Ok(())
}

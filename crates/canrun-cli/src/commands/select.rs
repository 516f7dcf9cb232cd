//! `canrun select` command implementation

use crate::cli::HostArgs;
use crate::host::RamSource;
use crate::output::{OutputFormat, Table, colored_verdict, gb, print_json, verdict_cell};
use canrun_core::{FeasibilityEstimator, ModelVariant, PlatformClass, VariantCatalog, Verdict};
use colored::Colorize;
use comfy_table::Cell;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct Candidate<'a> {
    id: &'a str,
    params_b: f64,
    quant: String,
    verdict: Verdict,
    total_gb: f64,
    headroom_gb: Option<f64>,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct SelectReport<'a> {
    platform: PlatformClass,
    ram_gb: Option<f64>,
    ram_source: RamSource,
    selected: Option<&'a ModelVariant>,
    candidates: Vec<Candidate<'a>>,
}

/// Execute the `canrun select` command
pub fn run(
    estimator: &FeasibilityEstimator,
    format: OutputFormat,
    catalog_path: &Path,
    host: &HostArgs,
) -> anyhow::Result<()> {
    let catalog = VariantCatalog::load(catalog_path)?;
    let target = host.resolve()?;

    let selected = estimator.select_best(&catalog.variants, target.ram_gb, target.platform);
    let candidates = catalog
        .variants
        .iter()
        .map(|v| {
            let a = estimator.assess(v, target.ram_gb, target.platform);
            Candidate {
                id: &v.id,
                params_b: v.params_b,
                quant: v.quant.to_string(),
                verdict: a.verdict,
                total_gb: a.estimate.total_gb,
                headroom_gb: a.headroom_gb,
                selected: selected.is_some_and(|s| std::ptr::eq(s, v)),
            }
        })
        .collect();

    let report = SelectReport {
        platform: target.platform,
        ram_gb: target.ram_gb,
        ram_source: target.ram_source,
        selected,
        candidates,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_table(&report),
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &SelectReport<'_>) {
    match (report.selected, report.ram_gb) {
        (Some(v), _) => println!(
            "{} Best fit: {} ({}B, {})",
            "✓".green(),
            v.id.bold(),
            v.params_b,
            v.quant
        ),
        (None, None) => println!(
            "{} No RAM figure available; pass --ram to select a variant",
            "!".yellow()
        ),
        (None, Some(_)) => println!("{} No variant in the catalog fits", "✗".red()),
    }
    println!();
    for c in &report.candidates {
        let marker = if c.selected { "*" } else { " " };
        println!(
            "  {marker} {:<32} {:>9}  {}",
            c.id,
            gb(Some(c.total_gb)),
            colored_verdict(c.verdict)
        );
    }
}

fn print_table(report: &SelectReport<'_>) {
    let mut table = Table::new(&["", "Variant", "Params", "Quant", "Total", "Headroom", "Verdict"]);
    for c in &report.candidates {
        table.add_cells(vec![
            Cell::new(if c.selected { "*" } else { "" }),
            Cell::new(c.id),
            Cell::new(format!("{}B", c.params_b)),
            Cell::new(&c.quant),
            Cell::new(gb(Some(c.total_gb))),
            Cell::new(gb(c.headroom_gb)),
            verdict_cell(c.verdict.as_str(), c.verdict),
        ]);
    }
    println!("{table}");
}

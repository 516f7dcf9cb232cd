//! `canrun estimate` command implementation

use crate::cli::HostArgs;
use crate::host::{HostTarget, RamSource};
use crate::output::{OutputFormat, Table, colored_verdict, gb, print_json, verdict_cell};
use canrun_core::{Assessment, FeasibilityEstimator, ModelVariant};
use colored::Colorize;
use comfy_table::Cell;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct EstimateReport<'a> {
    variant: &'a ModelVariant,
    ram_source: RamSource,
    assessment: Assessment,
    /// Largest context that still fits at least `tight`
    max_context: Option<u32>,
}

/// Execute the `canrun estimate` command
pub fn run(
    estimator: &FeasibilityEstimator,
    format: OutputFormat,
    variant: ModelVariant,
    context_override: Option<u32>,
    host: &HostArgs,
) -> anyhow::Result<()> {
    let target = host.resolve()?;
    let assessment =
        estimator.assess_with_context(&variant, context_override, target.ram_gb, target.platform);
    let report = EstimateReport {
        variant: &variant,
        ram_source: target.ram_source,
        assessment,
        max_context: estimator.max_context(&variant, target.ram_gb, target.platform),
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_table(&report),
        OutputFormat::Text => print_text(&report, &target),
    }
    Ok(())
}

fn print_text(report: &EstimateReport<'_>, target: &HostTarget) {
    let v = report.variant;
    let a = &report.assessment;
    let e = &a.estimate;

    println!(
        "{} {} ({}B, {}, {} tokens) on {}",
        "→".green(),
        v.id.bold(),
        v.params_b,
        v.quant,
        e.context,
        a.platform.to_string().cyan()
    );
    println!();
    println!("  Weights:        {}", gb(Some(e.weights_gb)));
    println!("  KV cache:       {}", gb(Some(e.kv_cache_gb)));
    println!("  Runtime:        {}", gb(Some(e.runtime_overhead_gb)));
    println!("  Total:          {}", gb(Some(e.total_gb)).bold());
    if let Some(mem) = a.memory {
        let source = match target.ram_source {
            RamSource::Detected => " (detected)",
            _ => "",
        };
        println!(
            "  Usable RAM:     {} of {}{}",
            gb(Some(mem.usable_ram_gb)),
            gb(Some(mem.total_ram_gb)),
            source
        );
        println!("  Headroom:       {}", gb(a.headroom_gb));
    }
    println!();
    println!(
        "  Verdict:        {} ({})",
        colored_verdict(a.verdict),
        a.verdict.label()
    );
    println!("                  {}", a.verdict.description().dimmed());
    println!("                  {}", a.detail().dimmed());
    if let Some(ctx) = report.max_context {
        println!("  Max context:    {ctx} tokens");
    }
}

fn print_table(report: &EstimateReport<'_>) {
    let a = &report.assessment;
    let e = &a.estimate;

    let mut table = Table::new(&["Field", "Value"]);
    table
        .add_row(["Variant".to_string(), report.variant.id.clone()])
        .add_row(["Quantization".to_string(), report.variant.quant.to_string()])
        .add_row(["Platform".to_string(), a.platform.to_string()])
        .add_row(["Context".to_string(), e.context.to_string()])
        .add_row(["Weights".to_string(), gb(Some(e.weights_gb))])
        .add_row(["KV cache".to_string(), gb(Some(e.kv_cache_gb))])
        .add_row(["Runtime".to_string(), gb(Some(e.runtime_overhead_gb))])
        .add_row(["Total".to_string(), gb(Some(e.total_gb))])
        .add_row([
            "Usable RAM".to_string(),
            gb(a.memory.map(|m| m.usable_ram_gb)),
        ])
        .add_row(["Headroom".to_string(), gb(a.headroom_gb)])
        .add_row([
            "Max context".to_string(),
            report
                .max_context
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    table.add_cells(vec![
        Cell::new("Verdict"),
        verdict_cell(a.verdict.as_str(), a.verdict),
    ]);
    println!("{table}");
}

//! `canrun matrix` command implementation

use crate::cli::HostArgs;
use crate::host::RamSource;
use crate::output::{OutputFormat, Table, colored_verdict, gb, print_json, verdict_cell};
use canrun_core::{FeasibilityEstimator, PlatformClass, QuantKey, QuantMatrixRow};
use colored::Colorize;
use comfy_table::Cell;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MatrixReport {
    platform: PlatformClass,
    ram_gb: Option<f64>,
    ram_source: RamSource,
    context: u32,
    rows: Vec<QuantMatrixRow>,
}

/// Execute the `canrun matrix` command
pub fn run(
    estimator: &FeasibilityEstimator,
    format: OutputFormat,
    sizes: &[f64],
    quants: &[QuantKey],
    context: Option<u32>,
    host: &HostArgs,
) -> anyhow::Result<()> {
    let target = host.resolve()?;
    let rows = estimator.build_matrix(sizes, quants, target.ram_gb, context, target.platform);
    let report = MatrixReport {
        platform: target.platform,
        ram_gb: target.ram_gb,
        ram_source: target.ram_source,
        context: context.unwrap_or(estimator.config().matrix.default_context),
        rows,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_table(&report),
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn header(report: &MatrixReport) -> String {
    format!(
        "{} RAM on {}, {} tokens of context",
        gb(report.ram_gb),
        report.platform,
        report.context
    )
}

fn print_text(report: &MatrixReport) {
    println!("{} {}", "→".green(), header(report));
    println!();
    for row in &report.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| format!("{}:{}", c.quant, colored_verdict(c.verdict)))
            .collect();
        println!("  {:>7}B  {}", row.params_b, cells.join("  "));
    }
}

fn print_table(report: &MatrixReport) {
    let Some(first) = report.rows.first() else {
        println!("No parameter sizes given.");
        return;
    };

    let quant_names: Vec<String> = first.cells.iter().map(|c| c.quant.to_string()).collect();
    let mut headers = vec!["Params"];
    headers.extend(quant_names.iter().map(String::as_str));

    let mut table = Table::new(&headers);
    for row in &report.rows {
        let mut cells = vec![Cell::new(format!("{}B", row.params_b))];
        cells.extend(row.cells.iter().map(|c| {
            verdict_cell(format!("{}\n{:.1} GB", c.verdict, c.total_gb), c.verdict)
        }));
        table.add_cells(cells);
    }

    println!("{}", header(report));
    println!("{table}");
}

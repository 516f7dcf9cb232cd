//! `canrun quants` command implementation

use crate::output::{OutputFormat, Table, print_json};
use canrun_core::quant::catalog;
use colored::Colorize;

/// Execute the `canrun quants` command
pub fn run(format: OutputFormat) -> anyhow::Result<()> {
    let entries = catalog();

    match format {
        OutputFormat::Json => print_json(entries)?,
        OutputFormat::Table => {
            let mut table = Table::new(&["Quant", "Bits", "Bytes/param", "Description"]);
            for q in entries {
                table.add_row([
                    q.label.to_string(),
                    q.bits.to_string(),
                    format!("{:.2}", q.bytes_per_param),
                    q.desc.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Text => {
            for q in entries {
                println!(
                    "  {:<7} {:>2}-bit  {:.2} B/param  {}",
                    q.label.bold(),
                    q.bits,
                    q.bytes_per_param,
                    q.desc.dimmed()
                );
            }
        }
    }
    Ok(())
}

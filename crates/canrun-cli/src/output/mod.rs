//! Output formatting module
//!
//! Renders command results as colored text, JSON for automation, or tables.

use crate::error::CliError;
use canrun_core::Verdict;
use colored::{ColoredString, Colorize};
use serde::Serialize;

mod table;

pub use table::{Table, verdict_cell};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for automation
    Json,
    /// Table-formatted output
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Verdict label colored by severity.
pub fn colored_verdict(verdict: Verdict) -> ColoredString {
    let text = verdict.as_str();
    match verdict {
        Verdict::Comfortable => text.green().bold(),
        Verdict::Tight => text.yellow().bold(),
        Verdict::Maybe => text.truecolor(255, 165, 0).bold(),
        Verdict::No => text.red().bold(),
        Verdict::Unknown => text.dimmed(),
    }
}

/// `12.34 GB`, or `-` when absent.
pub fn gb(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2} GB"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gb_formatting() {
        assert_eq!(gb(Some(7.415)), "7.42 GB");
        assert_eq!(gb(Some(-1.0)), "-1.00 GB");
        assert_eq!(gb(None), "-");
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}

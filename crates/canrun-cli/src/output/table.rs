//! Table formatting for CLI output

use canrun_core::Verdict;
use comfy_table::{Cell, Color, ContentArrangement, Table as ComfyTable, presets::UTF8_FULL};
use std::fmt;

/// Table for CLI output
#[derive(Debug, Clone)]
pub struct Table {
    inner: ComfyTable,
}

impl Table {
    /// Create a table with the given headers
    pub fn new(headers: &[&str]) -> Self {
        let mut inner = ComfyTable::new();
        inner
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(120)
            .set_header(headers.iter().map(|h| Cell::new(h)));
        Self { inner }
    }

    /// Add a row of plain strings
    pub fn add_row<I, S>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .add_row(row.into_iter().map(|s| Cell::new(s.into())));
        self
    }

    /// Add a row of pre-styled cells
    pub fn add_cells(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.inner.add_row(cells);
        self
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Cell showing `content`, colored by verdict
pub fn verdict_cell(content: impl Into<String>, verdict: Verdict) -> Cell {
    let color = match verdict {
        Verdict::Comfortable => Color::Green,
        Verdict::Tight => Color::Yellow,
        Verdict::Maybe => Color::DarkYellow,
        Verdict::No => Color::Red,
        Verdict::Unknown => Color::Grey,
    };
    Cell::new(content.into()).fg(color)
}

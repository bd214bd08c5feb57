//! Statement table extraction from HTML documents.
//!
//! Statements are exported as a single HTML table. Summary and section
//! heading rows use `colspan`, so spanned cells are repeated across every
//! column they cover, keeping column identity positional.

use scraper::{ElementRef, Html, Selector};
use statement_core::{Error, RawTable, Result, Row};
use tracing::debug;

/// Largest `colspan` honored; HTML clamps spans to the same bound.
const MAX_COLSPAN: usize = 1000;

/// Reads the first table of a statement document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTableReader;

impl HtmlTableReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the first `<table>` of `html` into a raw table.
    pub fn read(&self, html: &str) -> Result<RawTable> {
        let table_selector = selector("table")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("td, th")?;

        let document = Html::parse_document(html);
        let table = document
            .select(&table_selector)
            .next()
            .ok_or_else(|| Error::malformed("document contains no table"))?;

        let rows: Vec<Row> = table
            .select(&row_selector)
            .map(|row| read_row(row, &cell_selector))
            .collect();

        let raw = RawTable::new(rows);
        debug!(
            rows = raw.len(),
            width = raw.width(),
            "read statement table"
        );
        Ok(raw)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Other(format!("invalid selector '{css}': {e:?}")))
}

fn read_row(row: ElementRef<'_>, cell_selector: &Selector) -> Row {
    let mut cells = Vec::new();
    for cell in row.select(cell_selector) {
        let text = cell_text(cell);
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);
        cells.extend(std::iter::repeat(text).take(span));
    }
    cells
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}

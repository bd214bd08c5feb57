//! Statement segmentation into closed and open sections.
//!
//! The body of a statement (everything after the leading garbage rows) starts
//! with the header row, lists closed trades, then a marker row whose last
//! cell reads "Open Trades:", followed by the open trades. Each role's export
//! carries its own boilerplate rows, removed according to its trim policy.

use statement_core::config::{LayoutConfig, TrimConfig, TrimPolicy};
use statement_core::{
    Config, Error, RawTable, Result, Row, Section, SectionKind, SourceRole,
};
use tracing::{debug, warn};

/// Closed and open sections of one statement, plus its header labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedTable {
    /// Positional column labels.
    pub header: Row,
    pub closed: Section,
    pub open: Section,
}

/// Splits a raw statement table into sections.
#[derive(Debug, Clone)]
pub struct TableSegmenter {
    layout: LayoutConfig,
    trim: TrimConfig,
}

impl TableSegmenter {
    /// Create a segmenter from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            layout: config.layout.clone(),
            trim: config.trim.clone(),
        }
    }

    /// Split `table` into closed and open sections for `role`.
    pub fn segment(&self, table: &RawTable, role: &SourceRole) -> Result<SegmentedTable> {
        let skipped = self.layout.skipped_rows;
        if table.len() <= skipped {
            return Err(Error::malformed(format!(
                "statement has {} rows, expected a header after {} leading rows",
                table.len(),
                skipped
            )));
        }

        let body = &table.rows()[skipped..];
        let header = body[0].clone();

        let split = self.find_marker(body)?;
        let closed_rows = body[..split].to_vec();
        let open_rows: Vec<Row> = body[split..]
            .iter()
            .filter(|row| !self.is_closed_pl_row(row))
            .cloned()
            .collect();

        let policy = self.trim.for_role(role);
        let closed = trim_section(
            Section::new(SectionKind::Closed, closed_rows),
            policy.closed_leading,
            policy.closed_trailing,
        )?;
        let open = trim_section(
            Section::new(SectionKind::Open, open_rows),
            policy.open_leading,
            policy.open_trailing,
        )?;

        debug!(
            %role,
            closed = closed.len(),
            open = open.len(),
            "segmented statement"
        );

        Ok(SegmentedTable {
            header,
            closed,
            open,
        })
    }

    /// Trim policy applied for a role.
    pub fn policy(&self, role: &SourceRole) -> TrimPolicy {
        self.trim.for_role(role)
    }

    /// Index of the marker row within the body.
    fn find_marker(&self, body: &[Row]) -> Result<usize> {
        let marker = self.layout.open_trades_marker.as_str();
        let mut matches = body
            .iter()
            .enumerate()
            .filter(|(_, row)| row.last().map(String::as_str) == Some(marker))
            .map(|(i, _)| i);

        let split = matches.next().ok_or_else(|| {
            Error::malformed(format!("marker '{marker}' not found in last column"))
        })?;

        let extra = matches.count();
        if extra > 0 {
            warn!(
                extra,
                "marker '{}' appears more than once, splitting at the first", marker
            );
        }
        Ok(split)
    }

    fn is_closed_pl_row(&self, row: &Row) -> bool {
        let marker = self.layout.closed_pl_marker.as_str();
        row.first().map_or(false, |cell| cell.contains(marker))
    }
}

fn trim_section(mut section: Section, leading: usize, trailing: usize) -> Result<Section> {
    if leading == 0 && trailing == 0 {
        return Ok(section);
    }
    if section.len() < leading + trailing {
        return Err(Error::malformed(format!(
            "{:?} section has {} rows, layout trims {} leading and {} trailing",
            section.kind,
            section.len(),
            leading,
            trailing
        )));
    }
    let end = section.len() - trailing;
    section.rows.truncate(end);
    section.rows.drain(..leading);
    Ok(section)
}

//! Column label resolution for statement sections.
//!
//! Statements label both the open and the close price column "Price". The
//! first occurrence is the open price, the next one the close price; column
//! order is the only distinguishing feature.

use statement_core::config::ColumnConfig;
use statement_core::{Config, Error, Result, Row, Section, SectionKind, SourceRole};
use tracing::debug;

/// A section with resolved, unique column labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    pub kind: SectionKind,
    pub columns: Vec<String>,
    /// Rows, each exactly `columns.len()` cells wide.
    pub rows: Vec<Row>,
}

impl SectionTable {
    /// Position of the first column with this label.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Position of a column the caller cannot do without.
    pub fn require(&self, label: &str) -> Result<usize> {
        self.column_index(label).ok_or_else(|| {
            Error::malformed(format!("{:?} section has no '{}' column", self.kind, label))
        })
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows[row][column].as_str()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolves duplicate price labels, the size column and the source tag.
#[derive(Debug, Clone)]
pub struct ColumnDisambiguator {
    columns: ColumnConfig,
}

impl ColumnDisambiguator {
    /// Create a disambiguator from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            columns: config.columns.clone(),
        }
    }

    /// Rename the two generic price labels. Labels without a generic price
    /// column come back unchanged.
    pub fn resolve_labels(&self, header: &[String]) -> Vec<String> {
        let mut labels = header.to_vec();
        let generic = self.columns.price.as_str();

        if let Some(first) = labels.iter().position(|l| l == generic) {
            labels[first] = self.columns.open_price.clone();
            if let Some(offset) = labels[first + 1..].iter().position(|l| l == generic) {
                labels[first + 1 + offset] = self.columns.close_price.clone();
            }
        }
        labels
    }

    /// Build a labelled section table for `role`.
    pub fn apply(&self, header: &[String], section: Section, role: &SourceRole) -> SectionTable {
        let mut columns = self.resolve_labels(header);
        let mut rows = section.rows;
        for row in &mut rows {
            row.resize(columns.len(), String::new());
        }

        if !role.is_principal() {
            let size = self.columns.size.as_str();
            let has_size = columns.iter().any(|c| c == size);
            let volume = columns.iter().position(|c| *c == self.columns.volume);
            match volume {
                Some(volume) if !has_size => columns[volume] = size.to_string(),
                None if !has_size => {
                    columns.push(size.to_string());
                    for row in &mut rows {
                        row.push(String::new());
                    }
                }
                _ => {}
            }
        }

        let tag = role.source_tag();
        let source = columns.iter().position(|c| *c == self.columns.source);
        match source {
            Some(source) => {
                for row in &mut rows {
                    row[source] = tag.to_string();
                }
            }
            None => {
                columns.push(self.columns.source.clone());
                for row in &mut rows {
                    row.push(tag.to_string());
                }
            }
        }

        debug!(
            kind = ?section.kind,
            columns = columns.len(),
            rows = rows.len(),
            "resolved columns"
        );

        SectionTable {
            kind: section.kind,
            columns,
            rows,
        }
    }
}

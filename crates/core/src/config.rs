//! Configuration structures for the trade statement normalizer.
//!
//! The defaults describe the one statement layout the pipeline understands.
//! Every section can be overridden from JSON; omitted fields keep their
//! defaults.

use crate::error::Result;
use crate::types::SourceRole;
use serde::{Deserialize, Serialize};

/// Main configuration for the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Statement layout configuration.
    pub layout: LayoutConfig,
    /// Column label configuration.
    pub columns: ColumnConfig,
    /// Per-role row trimming.
    pub trim: TrimConfig,
    /// Copy annotation configuration.
    pub annotation: AnnotationConfig,
    /// Timestamp parsing configuration.
    pub time: TimeConfig,
}

impl Config {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Statement layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Leading rows of the raw table that carry no data.
    pub skipped_rows: usize,
    /// Last-column cell value of the row that starts the open section.
    pub open_trades_marker: String,
    /// First-cell text of summary rows removed from the open section.
    pub closed_pl_marker: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            skipped_rows: 2,
            open_trades_marker: "Open Trades:".to_string(),
            closed_pl_marker: "Closed P/L:".to_string(),
        }
    }
}

/// Column labels as they appear in the export, plus the labels we assign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub ticket: String,
    pub open_time: String,
    pub close_time: String,
    /// Generic label shared by the open and close price columns.
    pub price: String,
    pub open_price: String,
    pub close_price: String,
    pub profit: String,
    pub take_profit: String,
    pub size: String,
    /// Size label used by secondary exports.
    pub volume: String,
    pub source: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            ticket: "Ticket".to_string(),
            open_time: "Open Time".to_string(),
            close_time: "Close Time".to_string(),
            price: "Price".to_string(),
            open_price: "Open Price".to_string(),
            close_price: "Close Price".to_string(),
            profit: "Profit".to_string(),
            take_profit: "T / P".to_string(),
            size: "Size".to_string(),
            volume: "Volume".to_string(),
            source: "Source".to_string(),
        }
    }
}

/// Rows dropped from each section of one export layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimPolicy {
    /// Rows dropped from the start of the closed section.
    pub closed_leading: usize,
    /// Rows dropped from the end of the closed section.
    pub closed_trailing: usize,
    /// Rows dropped from the start of the open section.
    pub open_leading: usize,
    /// Rows dropped from the end of the open section.
    pub open_trailing: usize,
}

impl TrimPolicy {
    /// A policy that keeps every row.
    pub const NONE: TrimPolicy = TrimPolicy {
        closed_leading: 0,
        closed_trailing: 0,
        open_leading: 0,
        open_trailing: 0,
    };

    /// The principal export wraps closed trades in a header and a footer row
    /// and ends with a ten-row summary block.
    pub const PRINCIPAL: TrimPolicy = TrimPolicy {
        closed_leading: 1,
        closed_trailing: 1,
        open_leading: 0,
        open_trailing: 10,
    };
}

/// Per-role trim policy table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    pub principal: TrimPolicy,
    pub secondary: TrimPolicy,
    pub tertiary: TrimPolicy,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            principal: TrimPolicy::PRINCIPAL,
            secondary: TrimPolicy::NONE,
            tertiary: TrimPolicy::NONE,
        }
    }
}

impl TrimConfig {
    /// Policy for a source role.
    pub fn for_role(&self, role: &SourceRole) -> TrimPolicy {
        match role {
            SourceRole::Principal => self.principal,
            SourceRole::Secondary => self.secondary,
            SourceRole::Tertiary(_) => self.tertiary,
        }
    }
}

/// Copy annotation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Substring that marks a cell as a copy annotation candidate.
    pub keyword: String,
    /// Pattern applied to the candidate cell; group 1 is the identifier.
    pub pattern: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            keyword: "copy".to_string(),
            pattern: r"#(\d+)/".to_string(),
        }
    }
}

/// Timestamp parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Separator used by the export between date components.
    pub export_separator: char,
    /// `chrono` formats tried in order after the separator is normalized.
    /// Formats without a time component parse to midnight.
    pub formats: Vec<String>,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            export_separator: '.',
            formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
                "%Y-%m-%d".to_string(),
            ],
        }
    }
}

//! Core data types for the trade statement normalizer.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of cell text. Empty cells are empty strings.
pub type Row = Vec<String>;

/// Column names of a normalized event table, in order.
pub const EVENT_COLUMNS: [&str; 12] = [
    "Time", "Price", "Profit", "T/P", "Size", "Ticket", "Source", "Type", "CopyRef", "Day",
    "Month", "Year",
];

/// Fields shown alongside each plotted event.
pub const HOVER_FIELDS: [&str; 6] = ["Profit", "T/P", "Source", "Size", "Ticket", "CopyRef"];

/// Columns left out of a per-statement data view.
pub const HIDDEN_DISPLAY_COLUMNS: [&str; 5] = ["Source", "Type", "Day", "Month", "Year"];

/// Columns of a per-statement data view, in event column order.
pub fn display_columns() -> Vec<&'static str> {
    EVENT_COLUMNS
        .iter()
        .copied()
        .filter(|c| !HIDDEN_DISPLAY_COLUMNS.contains(c))
        .collect()
}

/// Source tag of principal rows.
pub const PRINCIPAL_SOURCE: &str = "Principal";

/// A table read from a statement document. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Row>,
}

impl RawTable {
    /// Create a table, right-padding every row to the widest one.
    pub fn new(mut rows: Vec<Row>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows }
    }

    /// All rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Which part of the statement a section came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// Closed trade history.
    Closed,
    /// Currently open trades.
    Open,
}

/// A contiguous run of rows sharing one record schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn new(kind: SectionKind, rows: Vec<Row>) -> Self {
        Self { kind, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Role of an uploaded statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceRole {
    /// The main account.
    Principal,
    /// A generic secondary account.
    Secondary,
    /// A named secondary account, identified by its file id.
    Tertiary(String),
}

impl SourceRole {
    /// Tertiary role for an uploaded file; the id is the name before the first `.`.
    pub fn tertiary_from_file_name(file_name: &str) -> Self {
        let id = file_name.split('.').next().unwrap_or(file_name);
        SourceRole::Tertiary(id.to_string())
    }

    pub fn is_principal(&self) -> bool {
        matches!(self, SourceRole::Principal)
    }

    /// Value of the Source column. Independent of the file id.
    pub fn source_tag(&self) -> &'static str {
        match self {
            SourceRole::Principal => PRINCIPAL_SOURCE,
            SourceRole::Secondary => "df2",
            SourceRole::Tertiary(_) => "df3",
        }
    }

    pub fn file_id(&self) -> Option<&str> {
        match self {
            SourceRole::Tertiary(id) => Some(id),
            _ => None,
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRole::Principal => write!(f, "principal"),
            SourceRole::Secondary => write!(f, "secondary"),
            SourceRole::Tertiary(id) => write!(f, "tertiary '{id}'"),
        }
    }
}

/// Copy-trading annotation attached to a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CopyRef {
    /// Principal rows are never annotated.
    NotApplicable,
    /// No annotation was found.
    Unmatched,
    /// The copied trade identifier.
    Copy(String),
}

impl CopyRef {
    pub const NOT_APPLICABLE: &'static str = "no aplica";
    pub const UNMATCHED: &'static str = "null";
    pub const COPY_PREFIX: &'static str = "Copy: ";
}

impl fmt::Display for CopyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyRef::NotApplicable => f.write_str(Self::NOT_APPLICABLE),
            CopyRef::Unmatched => f.write_str(Self::UNMATCHED),
            CopyRef::Copy(id) => write!(f, "{}{}", Self::COPY_PREFIX, id),
        }
    }
}

impl From<CopyRef> for String {
    fn from(copy_ref: CopyRef) -> Self {
        copy_ref.to_string()
    }
}

impl From<String> for CopyRef {
    fn from(text: String) -> Self {
        match text.as_str() {
            Self::NOT_APPLICABLE => CopyRef::NotApplicable,
            _ => match text.strip_prefix(Self::COPY_PREFIX) {
                Some(id) => CopyRef::Copy(id.to_string()),
                None => CopyRef::Unmatched,
            },
        }
    }
}

/// Structural origin of an event, assigned before display labelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProvisionalTag {
    /// Open leg of a closed trade.
    OpenDf1,
    /// Close leg of a closed trade.
    CloseDf1,
    /// A currently open trade.
    OpenDf2,
    /// Any open event of a tertiary file.
    OpenDf3,
    /// Close leg of a tertiary closed trade.
    CloseDf3,
}

impl ProvisionalTag {
    pub const ALL: [ProvisionalTag; 5] = [
        ProvisionalTag::OpenDf1,
        ProvisionalTag::CloseDf1,
        ProvisionalTag::OpenDf2,
        ProvisionalTag::OpenDf3,
        ProvisionalTag::CloseDf3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProvisionalTag::OpenDf1 => "Open df1",
            ProvisionalTag::CloseDf1 => "Close df1",
            ProvisionalTag::OpenDf2 => "Open df2",
            ProvisionalTag::OpenDf3 => "Open df3",
            ProvisionalTag::CloseDf3 => "Close df3",
        }
    }
}

impl fmt::Display for ProvisionalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized trade event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    #[serde(rename = "Time")]
    pub time: Option<NaiveDateTime>,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    /// Profit as exported, unparsed.
    #[serde(rename = "Profit")]
    pub profit: String,
    /// Take-profit level as exported, unparsed.
    #[serde(rename = "T/P")]
    pub take_profit: String,
    #[serde(rename = "Size")]
    pub size: Option<f64>,
    #[serde(rename = "Ticket")]
    pub ticket: String,
    #[serde(rename = "Source")]
    pub source: String,
    /// Provisional tag until classified, display label afterwards.
    #[serde(rename = "Type")]
    pub event_type: String,
    #[serde(rename = "CopyRef")]
    pub copy_ref: CopyRef,
    #[serde(rename = "Day")]
    pub day: Option<u32>,
    #[serde(rename = "Month")]
    pub month: Option<u32>,
    #[serde(rename = "Year")]
    pub year: Option<i32>,
}

impl TradeEvent {
    /// Recompute Day/Month/Year from Time.
    pub fn derive_calendar(&mut self) {
        self.day = self.time.map(|t| t.day());
        self.month = self.time.map(|t| t.month());
        self.year = self.time.map(|t| t.year());
    }

    /// Whether Day/Month/Year are the calendar components of Time.
    pub fn calendar_consistent(&self) -> bool {
        match self.time {
            Some(t) => {
                self.day == Some(t.day())
                    && self.month == Some(t.month())
                    && self.year == Some(t.year())
            }
            None => self.day.is_none() && self.month.is_none() && self.year.is_none(),
        }
    }

    pub fn is_principal(&self) -> bool {
        self.source == PRINCIPAL_SOURCE
    }

    /// The event as shown in a per-statement data view.
    pub fn display_row(&self) -> DisplayRow<'_> {
        DisplayRow {
            time: self.time,
            price: self.price,
            profit: &self.profit,
            take_profit: &self.take_profit,
            size: self.size,
            ticket: &self.ticket,
            copy_ref: &self.copy_ref,
        }
    }
}

/// A trade event restricted to the data view columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow<'a> {
    #[serde(rename = "Time")]
    pub time: Option<NaiveDateTime>,
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "Profit")]
    pub profit: &'a str,
    #[serde(rename = "T/P")]
    pub take_profit: &'a str,
    #[serde(rename = "Size")]
    pub size: Option<f64>,
    #[serde(rename = "Ticket")]
    pub ticket: &'a str,
    #[serde(rename = "CopyRef")]
    pub copy_ref: &'a CopyRef,
}

/// A normalized event table: a column schema and its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTable {
    columns: Vec<String>,
    events: Vec<TradeEvent>,
}

impl EventTable {
    /// Create a table with the standard event columns.
    pub fn new(events: Vec<TradeEvent>) -> Self {
        let columns = EVENT_COLUMNS.iter().map(|c| c.to_string()).collect();
        Self::with_columns(columns, events)
    }

    /// Create a table with an explicit column schema.
    pub fn with_columns(columns: Vec<String>, events: Vec<TradeEvent>) -> Self {
        Self { columns, events }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn events(&self) -> &[TradeEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TradeEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Rebuild the table with transformed rows, keeping the schema.
    pub fn map_events(self, f: impl FnMut(TradeEvent) -> TradeEvent) -> Self {
        Self {
            columns: self.columns,
            events: self.events.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_event(time: Option<NaiveDateTime>) -> TradeEvent {
        TradeEvent {
            time,
            price: Some(100.0),
            profit: "5.00".to_string(),
            take_profit: "110".to_string(),
            size: None,
            ticket: "T1".to_string(),
            source: PRINCIPAL_SOURCE.to_string(),
            event_type: ProvisionalTag::OpenDf1.as_str().to_string(),
            copy_ref: CopyRef::NotApplicable,
            day: None,
            month: None,
            year: None,
        }
    }

    #[test]
    fn test_raw_table_pads_rows() {
        let table = RawTable::new(vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string(), "d".to_string()],
        ]);
        assert_eq!(table.width(), 3);
        assert_eq!(table.rows()[0], vec!["a", "", ""]);
    }

    #[test]
    fn test_role_tags() {
        assert_eq!(SourceRole::Principal.source_tag(), "Principal");
        assert_eq!(SourceRole::Secondary.source_tag(), "df2");
        assert_eq!(SourceRole::Tertiary("x".to_string()).source_tag(), "df3");
        assert_eq!(SourceRole::Secondary.file_id(), None);
    }

    #[test]
    fn test_tertiary_from_file_name() {
        let role = SourceRole::tertiary_from_file_name("account42.statement.htm");
        assert_eq!(role.file_id(), Some("account42"));
    }

    #[test]
    fn test_copy_ref_text() {
        assert_eq!(CopyRef::NotApplicable.to_string(), "no aplica");
        assert_eq!(CopyRef::Unmatched.to_string(), "null");
        assert_eq!(CopyRef::Copy("42".to_string()).to_string(), "Copy: 42");
        for (text, expected) in [
            ("Copy: 7", CopyRef::Copy("7".to_string())),
            ("no aplica", CopyRef::NotApplicable),
            ("null", CopyRef::Unmatched),
        ] {
            assert_eq!(CopyRef::from(text.to_string()), expected);
        }
    }

    #[test]
    fn test_derive_calendar() {
        let time = NaiveDate::from_ymd_opt(2023, 1, 5)
            .and_then(|d| d.and_hms_opt(10, 30, 0));
        let mut event = make_event(time);
        assert!(!event.calendar_consistent());

        event.derive_calendar();
        assert_eq!(
            (event.day, event.month, event.year),
            (Some(5), Some(1), Some(2023))
        );
        assert!(event.calendar_consistent());

        let mut empty = make_event(None);
        empty.derive_calendar();
        assert!(empty.calendar_consistent());
        assert_eq!(empty.year, None);
    }

    #[test]
    fn test_event_serializes_with_column_names() {
        let mut event = make_event(None);
        event.copy_ref = CopyRef::Copy("42".to_string());
        let json = serde_json::to_value(&event).unwrap();
        let object = json.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        for column in EVENT_COLUMNS {
            assert!(keys.contains(&column), "missing {column}");
        }
        assert_eq!(json["CopyRef"], "Copy: 42");
        assert_eq!(json["T/P"], "110");
    }

    #[test]
    fn test_display_row_keeps_display_columns() {
        let event = make_event(None);
        let json = serde_json::to_value(event.display_row()).unwrap();
        let object = json.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();

        let columns = display_columns();
        assert_eq!(
            columns,
            vec!["Time", "Price", "Profit", "T/P", "Size", "Ticket", "CopyRef"]
        );
        assert_eq!(keys.len(), columns.len());
        for column in &columns {
            assert!(keys.contains(column), "missing {column}");
        }
        for hidden in HIDDEN_DISPLAY_COLUMNS {
            assert!(!keys.contains(&hidden), "{hidden} shown");
        }
        assert_eq!(json["CopyRef"], "no aplica");
    }

    #[test]
    fn test_event_table_schema() {
        let table = EventTable::new(vec![make_event(None)]);
        assert_eq!(table.columns().len(), EVENT_COLUMNS.len());
        assert_eq!(table.len(), 1);
        approx::assert_relative_eq!(table.events()[0].price.unwrap(), 100.0);
    }
}

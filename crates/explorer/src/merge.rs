//! Union of per-file event tables.

use crate::filter::EventFilter;
use statement_core::{Error, EventTable, Result, TradeEvent, EVENT_COLUMNS};
use tracing::debug;

/// The union of every loaded event table, ready for filtering.
///
/// Built from scratch on every load and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    columns: Vec<String>,
    events: Vec<TradeEvent>,
}

impl Default for MergedTable {
    fn default() -> Self {
        Self {
            columns: EVENT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            events: Vec::new(),
        }
    }
}

impl MergedTable {
    /// Union `tables` in order. All tables must share one column schema.
    ///
    /// Missing sizes become 0 and tickets are trimmed so that identifier
    /// lookups compare clean text.
    pub fn merge<'a>(tables: impl IntoIterator<Item = &'a EventTable>) -> Result<Self> {
        let mut merged: Option<Self> = None;

        for table in tables {
            match merged.as_mut() {
                None => {
                    merged = Some(Self {
                        columns: table.columns().to_vec(),
                        events: table.events().to_vec(),
                    });
                }
                Some(acc) => {
                    if acc.columns != table.columns() {
                        return Err(Error::schema_mismatch(format!(
                            "cannot merge columns [{}] into [{}]",
                            table.columns().join(", "),
                            acc.columns.join(", ")
                        )));
                    }
                    acc.events.extend_from_slice(table.events());
                }
            }
        }

        let mut merged = merged.unwrap_or_default();
        for event in &mut merged.events {
            event.size.get_or_insert(0.0);
            let ticket = event.ticket.trim();
            if ticket.len() != event.ticket.len() {
                event.ticket = ticket.to_string();
            }
        }

        debug!(events = merged.events.len(), "merged event tables");
        Ok(merged)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn events(&self) -> &[TradeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events passing `filter`.
    pub fn filter(&self, filter: &EventFilter) -> Vec<&TradeEvent> {
        filter.apply(&self.events)
    }

    /// Serialize selected rows as a JSON array keyed by column name.
    pub fn rows_to_json(rows: &[&TradeEvent]) -> Result<String> {
        Ok(serde_json::to_string(rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statement_core::CopyRef;

    fn event(ticket: &str, size: Option<f64>) -> TradeEvent {
        TradeEvent {
            time: None,
            price: Some(10.0),
            profit: "1".to_string(),
            take_profit: String::new(),
            size,
            ticket: ticket.to_string(),
            source: "Principal".to_string(),
            event_type: "Open Trades - Main".to_string(),
            copy_ref: CopyRef::NotApplicable,
            day: None,
            month: None,
            year: None,
        }
    }

    #[test]
    fn test_union_preserves_order() {
        let a = EventTable::new(vec![event("1", Some(1.0)), event("2", Some(2.0))]);
        let b = EventTable::new(vec![event("3", Some(3.0))]);
        let merged = MergedTable::merge([&a, &b]).unwrap();

        let tickets: Vec<&str> = merged.events().iter().map(|e| e.ticket.as_str()).collect();
        assert_eq!(tickets, vec!["1", "2", "3"]);
        assert_eq!(merged.columns(), a.columns());
    }

    #[test]
    fn test_coerces_size_and_ticket() {
        let table = EventTable::new(vec![event("  12345 ", None), event("7", Some(0.5))]);
        let merged = MergedTable::merge([&table]).unwrap();

        assert_eq!(merged.events()[0].ticket, "12345");
        assert_relative_eq!(merged.events()[0].size.unwrap(), 0.0);
        assert_relative_eq!(merged.events()[1].size.unwrap(), 0.5);
        // The source table is untouched.
        assert_eq!(table.events()[0].size, None);
    }

    #[test]
    fn test_schema_mismatch() {
        let a = EventTable::new(vec![event("1", None)]);
        let mut columns = a.columns().to_vec();
        columns.pop();
        let b = EventTable::with_columns(columns, vec![event("2", None)]);

        let err = MergedTable::merge([&a, &b]).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn test_empty_merge() {
        let merged = MergedTable::merge(std::iter::empty()).unwrap();
        assert!(merged.is_empty());
        assert_eq!(merged.columns().len(), EVENT_COLUMNS.len());
    }

    #[test]
    fn test_rows_to_json() {
        let table = EventTable::new(vec![event("5", None)]);
        let merged = MergedTable::merge([&table]).unwrap();
        let rows = merged.filter(&EventFilter::All);
        let json = MergedTable::rows_to_json(&rows).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Ticket"], "5");
        assert_eq!(value[0]["Size"], 0.0);
        assert_eq!(value[0]["CopyRef"], "no aplica");
    }
}

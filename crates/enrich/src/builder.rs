//! Projection of statement sections into trade events.
//!
//! A closed trade yields two events (its open leg and its close leg), an
//! open trade yields one. All events share one output schema regardless of
//! the section or role they came from.

use crate::annotator::AnnotatedSection;
use chrono::{NaiveDate, NaiveDateTime};
use statement_core::config::{ColumnConfig, TimeConfig};
use statement_core::{Config, EventTable, ProvisionalTag, Result, SourceRole, TradeEvent};
use tracing::debug;

/// Which time/price pair of a section a projection reads.
struct Leg<'a> {
    time: &'a str,
    price: &'a str,
    tag: ProvisionalTag,
}

/// Builds the event table of one statement.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    columns: ColumnConfig,
    time: TimeConfig,
    marker: String,
}

impl EventBuilder {
    /// Create an event builder from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            columns: config.columns.clone(),
            time: config.time.clone(),
            marker: config.layout.open_trades_marker.clone(),
        }
    }

    /// Project both sections of a statement into one event table.
    pub fn build(
        &self,
        closed: &AnnotatedSection,
        open: &AnnotatedSection,
        role: &SourceRole,
    ) -> Result<EventTable> {
        let (open_leg, close_leg, open_trade) = match role {
            SourceRole::Tertiary(_) => (
                ProvisionalTag::OpenDf3,
                ProvisionalTag::CloseDf3,
                ProvisionalTag::OpenDf3,
            ),
            _ => (
                ProvisionalTag::OpenDf1,
                ProvisionalTag::CloseDf1,
                ProvisionalTag::OpenDf2,
            ),
        };

        let mut events = self.project(
            closed,
            Leg {
                time: &self.columns.open_time,
                price: &self.columns.open_price,
                tag: open_leg,
            },
        )?;
        events.extend(self.project(
            closed,
            Leg {
                time: &self.columns.close_time,
                price: &self.columns.close_price,
                tag: close_leg,
            },
        )?);
        events.extend(self.project(
            open,
            Leg {
                time: &self.columns.open_time,
                price: &self.columns.open_price,
                tag: open_trade,
            },
        )?);

        for event in &mut events {
            event.derive_calendar();
        }

        debug!(%role, events = events.len(), "built events");
        Ok(EventTable::new(events))
    }

    fn project(&self, section: &AnnotatedSection, leg: Leg<'_>) -> Result<Vec<TradeEvent>> {
        let table = &section.table;
        let time = table.require(leg.time)?;
        let price = table.require(leg.price)?;
        let profit = table.require(&self.columns.profit)?;
        let take_profit = table.require(&self.columns.take_profit)?;
        let size = table.require(&self.columns.size)?;
        let ticket = table.require(&self.columns.ticket)?;
        let source = table.require(&self.columns.source)?;

        let mut events = Vec::with_capacity(table.len());
        for (i, copy_ref) in section.copy_refs.iter().enumerate() {
            if self.is_structural(&table.rows[i], table.cell(i, ticket)) {
                continue;
            }
            events.push(TradeEvent {
                time: self.parse_time(table.cell(i, time)),
                price: parse_number(table.cell(i, price)),
                profit: table.cell(i, profit).to_string(),
                take_profit: table.cell(i, take_profit).to_string(),
                size: parse_number(table.cell(i, size)),
                ticket: table.cell(i, ticket).to_string(),
                source: table.cell(i, source).to_string(),
                event_type: leg.tag.as_str().to_string(),
                copy_ref: copy_ref.clone(),
                day: None,
                month: None,
                year: None,
            });
        }
        Ok(events)
    }

    /// Section marker and header echo rows describe layout, not trades.
    fn is_structural(&self, row: &[String], ticket: &str) -> bool {
        ticket == self.columns.ticket || row.iter().any(|cell| *cell == self.marker)
    }

    /// Parse an export timestamp; anything unparseable is `None`.
    pub fn parse_time(&self, text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let normalized = text.replace(self.time.export_separator, "-");

        self.time.formats.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(&normalized, format)
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(&normalized, format)
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
        })
    }
}

/// Numeric coercion; invalid text is `None`.
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

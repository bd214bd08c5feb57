//! Filters over merged trade events.
//!
//! Calendar filters compare the derived Day/Month/Year fields, so events
//! without a timestamp never match them. The identifier filter unifies two
//! lookups: principal tickets by equality and copied trades by their copy
//! annotation.

use serde::{Deserialize, Serialize};
use statement_core::{Result, TradeEvent};

/// One filter mode with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EventFilter {
    /// Every event.
    All,
    /// One calendar day.
    Day { day: u32, month: u32, year: i32 },
    /// One calendar month.
    Month { month: u32, year: i32 },
    /// One year.
    Year { year: i32 },
    /// Inclusive day range within one month.
    DayRange {
        start_day: u32,
        end_day: u32,
        month: u32,
        year: i32,
    },
    /// Inclusive month range, possibly spanning years.
    MonthRange {
        start_month: u32,
        start_year: i32,
        end_month: u32,
        end_year: i32,
    },
    /// Inclusive year range.
    YearRange { start_year: i32, end_year: i32 },
    /// Principal ticket or copy identifier.
    Identifier { identifier: String },
}

impl EventFilter {
    /// Parse filter parameters from JSON, e.g. `{"mode": "year", "year": 2023}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Select matching events, preserving their order.
    ///
    /// Identifier matches list principal rows before copied rows. An empty
    /// identifier selects everything.
    pub fn apply<'a>(&self, events: &'a [TradeEvent]) -> Vec<&'a TradeEvent> {
        match self {
            EventFilter::Identifier { identifier } => {
                let identifier = identifier.trim();
                if identifier.is_empty() {
                    return events.iter().collect();
                }
                let principal = events
                    .iter()
                    .filter(|e| e.is_principal() && e.ticket == identifier);
                let copied = events.iter().filter(|e| {
                    !e.is_principal() && e.copy_ref.to_string().contains(identifier)
                });
                principal.chain(copied).collect()
            }
            _ => events.iter().filter(|e| self.matches(e)).collect(),
        }
    }

    /// Whether a single event passes the filter.
    pub fn matches(&self, event: &TradeEvent) -> bool {
        let (day, month, year) = (event.day, event.month, event.year);
        match self {
            EventFilter::All => true,
            EventFilter::Day {
                day: d,
                month: m,
                year: y,
            } => day == Some(*d) && month == Some(*m) && year == Some(*y),
            EventFilter::Month { month: m, year: y } => month == Some(*m) && year == Some(*y),
            EventFilter::Year { year: y } => year == Some(*y),
            EventFilter::DayRange {
                start_day,
                end_day,
                month: m,
                year: y,
            } => {
                month == Some(*m)
                    && year == Some(*y)
                    && day.map_or(false, |d| (*start_day..=*end_day).contains(&d))
            }
            EventFilter::MonthRange {
                start_month,
                start_year,
                end_month,
                end_year,
            } => match (month, year) {
                (Some(m), Some(y)) => {
                    if start_year == end_year {
                        y == *start_year && (*start_month..=*end_month).contains(&m)
                    } else {
                        (y > *start_year && y < *end_year)
                            || (y == *start_year && m >= *start_month)
                            || (y == *end_year && m <= *end_month)
                    }
                }
                _ => false,
            },
            EventFilter::YearRange {
                start_year,
                end_year,
            } => year.map_or(false, |y| (*start_year..=*end_year).contains(&y)),
            EventFilter::Identifier { identifier } => {
                let identifier = identifier.trim();
                if identifier.is_empty() {
                    true
                } else if event.is_principal() {
                    event.ticket == identifier
                } else {
                    event.copy_ref.to_string().contains(identifier)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use statement_core::CopyRef;

    fn event(
        ticket: &str,
        source: &str,
        copy_ref: CopyRef,
        date: Option<(i32, u32, u32)>,
    ) -> TradeEvent {
        let mut event = TradeEvent {
            time: date
                .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                .and_then(|d| d.and_hms_opt(12, 0, 0)),
            price: Some(1.0),
            profit: String::new(),
            take_profit: String::new(),
            size: Some(0.0),
            ticket: ticket.to_string(),
            source: source.to_string(),
            event_type: "Open Transactions - Main".to_string(),
            copy_ref,
            day: None,
            month: None,
            year: None,
        };
        event.derive_calendar();
        event
    }

    fn dated(date: (i32, u32, u32)) -> TradeEvent {
        event("1", "Principal", CopyRef::NotApplicable, Some(date))
    }

    fn dates(events: &[&TradeEvent]) -> Vec<(i32, u32, u32)> {
        events
            .iter()
            .map(|e| (e.year.unwrap(), e.month.unwrap(), e.day.unwrap()))
            .collect()
    }

    fn calendar() -> Vec<TradeEvent> {
        vec![
            dated((2022, 11, 30)),
            dated((2022, 12, 1)),
            dated((2023, 1, 5)),
            dated((2023, 1, 20)),
            dated((2023, 6, 15)),
            dated((2024, 2, 1)),
            event("2", "Principal", CopyRef::NotApplicable, None),
        ]
    }

    #[test]
    fn test_exact_filters() {
        let events = calendar();
        let day = EventFilter::Day {
            day: 5,
            month: 1,
            year: 2023,
        }
        .apply(&events);
        assert_eq!(dates(&day), vec![(2023, 1, 5)]);

        let month = EventFilter::Month {
            month: 1,
            year: 2023,
        }
        .apply(&events);
        assert_eq!(dates(&month), vec![(2023, 1, 5), (2023, 1, 20)]);

        let year = EventFilter::Year { year: 2022 }.apply(&events);
        assert_eq!(dates(&year), vec![(2022, 11, 30), (2022, 12, 1)]);
    }

    #[test]
    fn test_day_range_is_intra_month() {
        let events = calendar();
        let filter = EventFilter::DayRange {
            start_day: 1,
            end_day: 10,
            month: 1,
            year: 2023,
        };
        assert_eq!(dates(&filter.apply(&events)), vec![(2023, 1, 5)]);
    }

    #[test]
    fn test_month_range_across_years() {
        let events = calendar();
        let filter = EventFilter::MonthRange {
            start_month: 12,
            start_year: 2022,
            end_month: 1,
            end_year: 2024,
        };
        assert_eq!(
            dates(&filter.apply(&events)),
            vec![(2022, 12, 1), (2023, 1, 5), (2023, 1, 20), (2023, 6, 15)]
        );
    }

    #[test]
    fn test_month_range_same_year() {
        let events = calendar();
        let filter = EventFilter::MonthRange {
            start_month: 1,
            start_year: 2023,
            end_month: 3,
            end_year: 2023,
        };
        assert_eq!(
            dates(&filter.apply(&events)),
            vec![(2023, 1, 5), (2023, 1, 20)]
        );
    }

    #[test]
    fn test_year_range() {
        let events = calendar();
        let filter = EventFilter::YearRange {
            start_year: 2023,
            end_year: 2024,
        };
        assert_eq!(filter.apply(&events).len(), 4);
    }

    #[test]
    fn test_null_time_never_matches_calendar() {
        let undated = event("9", "df3", CopyRef::Unmatched, None);
        for filter in [
            EventFilter::Year { year: 2023 },
            EventFilter::YearRange {
                start_year: i32::MIN,
                end_year: i32::MAX,
            },
            EventFilter::MonthRange {
                start_month: 1,
                start_year: 2000,
                end_month: 12,
                end_year: 2100,
            },
        ] {
            assert!(!filter.matches(&undated));
        }
        assert!(EventFilter::All.matches(&undated));
    }

    #[test]
    fn test_identifier_principal_ticket_exact() {
        let events = vec![event("12345", "Principal", CopyRef::NotApplicable, None)];
        let hit = EventFilter::Identifier {
            identifier: "12345".into(),
        };
        let miss = EventFilter::Identifier {
            identifier: "1234".into(),
        };
        assert_eq!(hit.apply(&events).len(), 1);
        assert!(miss.apply(&events).is_empty());
    }

    #[test]
    fn test_identifier_copy_substring() {
        let events = vec![event("7", "df3", CopyRef::Copy("42".into()), None)];
        for identifier in ["42", "Copy: 42", " 42 "] {
            let filter = EventFilter::Identifier {
                identifier: identifier.into(),
            };
            assert_eq!(filter.apply(&events).len(), 1, "{identifier}");
        }
        let miss = EventFilter::Identifier {
            identifier: "43".into(),
        };
        assert!(miss.apply(&events).is_empty());
    }

    #[test]
    fn test_identifier_orders_principal_first() {
        let events = vec![
            event("A", "df3", CopyRef::Copy("100".into()), None),
            event("100", "Principal", CopyRef::NotApplicable, None),
            event("100", "df3", CopyRef::Unmatched, None),
        ];
        let filter = EventFilter::Identifier {
            identifier: "100".into(),
        };
        let matched = filter.apply(&events);
        assert_eq!(matched.len(), 2);
        assert!(matched[0].is_principal());
        assert_eq!(matched[1].ticket, "A");
    }

    #[test]
    fn test_empty_identifier_selects_all() {
        let events = calendar();
        let filter = EventFilter::Identifier {
            identifier: "  ".into(),
        };
        assert_eq!(filter.apply(&events).len(), events.len());
        assert!(events.iter().all(|e| filter.matches(e)));

        let copied = event("7", "df3", CopyRef::Copy("42".into()), None);
        assert!(filter.matches(&copied));
    }

    #[test]
    fn test_from_json() {
        let filter =
            EventFilter::from_json(r#"{"mode": "month", "month": 1, "year": 2023}"#).unwrap();
        assert_eq!(
            filter,
            EventFilter::Month {
                month: 1,
                year: 2023
            }
        );

        let filter =
            EventFilter::from_json(r#"{"mode": "identifier", "identifier": "42"}"#).unwrap();
        assert_eq!(
            filter,
            EventFilter::Identifier {
                identifier: "42".into()
            }
        );

        assert!(EventFilter::from_json(r#"{"mode": "week"}"#).is_err());
    }
}

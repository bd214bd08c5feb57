//! Merged event exploration for the trade statement normalizer.
//!
//! This crate provides:
//! - Union of per-file event tables
//! - Date and identifier filters over the union
//! - Marker and color styles per event type
//! - A session that loads statements and rebuilds the union

pub mod filter;
pub mod merge;
pub mod session;
pub mod style;

pub use filter::EventFilter;
pub use merge::MergedTable;
pub use session::{StatementInput, TradeExplorer};
pub use style::{MarkerShape, SeriesStyle, StyleMap};

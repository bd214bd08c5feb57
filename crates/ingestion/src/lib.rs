//! Statement ingestion for the trade statement normalizer.
//!
//! This crate handles:
//! - Reading the statement table out of an HTML document
//! - Splitting the table into closed and open sections
//! - Resolving duplicate column labels

pub mod columns;
pub mod html;
pub mod segmenter;

pub use columns::{ColumnDisambiguator, SectionTable};
pub use html::HtmlTableReader;
pub use segmenter::{SegmentedTable, TableSegmenter};

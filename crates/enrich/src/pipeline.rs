//! Per-file normalization pipeline.
//!
//! Runs every stage for one statement: read, segment, resolve columns,
//! annotate, build events, classify. Each run is independent of every other
//! run, so several files can be processed concurrently.

use crate::annotator::CopyAnnotator;
use crate::builder::EventBuilder;
use crate::classifier::TypeClassifier;
use statement_core::{Config, EventTable, RawTable, Result, SourceRole};
use statement_ingestion::{ColumnDisambiguator, HtmlTableReader, TableSegmenter};
use tracing::info;

/// All stages needed to normalize one statement.
#[derive(Debug, Clone)]
pub struct FilePipeline {
    reader: HtmlTableReader,
    segmenter: TableSegmenter,
    disambiguator: ColumnDisambiguator,
    annotator: CopyAnnotator,
    builder: EventBuilder,
}

impl FilePipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            reader: HtmlTableReader::new(),
            segmenter: TableSegmenter::new(config),
            disambiguator: ColumnDisambiguator::new(config),
            annotator: CopyAnnotator::new(config)?,
            builder: EventBuilder::new(config),
        })
    }

    /// Normalize a statement document.
    pub fn process_html(&self, html: &str, role: &SourceRole) -> Result<EventTable> {
        let raw = self.reader.read(html)?;
        self.process_table(&raw, role)
    }

    /// Normalize an already extracted statement table.
    pub fn process_table(&self, raw: &RawTable, role: &SourceRole) -> Result<EventTable> {
        let segmented = self.segmenter.segment(raw, role)?;

        let closed = self
            .disambiguator
            .apply(&segmented.header, segmented.closed, role);
        let open = self
            .disambiguator
            .apply(&segmented.header, segmented.open, role);

        let closed = self.annotator.annotate(closed, role);
        let open = self.annotator.annotate(open, role);

        let events = self.builder.build(&closed, &open, role)?;
        let events = TypeClassifier::for_role(role).classify(events);

        info!(%role, events = events.len(), "normalized statement");
        Ok(events)
    }
}

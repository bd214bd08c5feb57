//! Interactive exploration session.
//!
//! Holds the normalized table of every loaded statement and rebuilds the
//! merged view and style map from scratch after each load. A statement that
//! fails to normalize is reported and leaves the session as it was.

use crate::filter::EventFilter;
use crate::merge::MergedTable;
use crate::style::StyleMap;
use rayon::prelude::*;
use statement_core::{
    Config, DisplayRow, EventTable, Result, SourceRole, TradeEvent, HOVER_FIELDS,
};
use statement_enrich::FilePipeline;
use tracing::{info, warn};

/// One uploaded statement document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementInput {
    /// File name as uploaded.
    pub name: String,
    pub html: String,
    pub role: SourceRole,
}

impl StatementInput {
    pub fn principal(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            html: html.into(),
            role: SourceRole::Principal,
        }
    }

    /// A tertiary statement, identified by the file name before its first `.`.
    pub fn tertiary(name: impl Into<String>, html: impl Into<String>) -> Self {
        let name = name.into();
        let role = SourceRole::tertiary_from_file_name(&name);
        Self {
            name,
            html: html.into(),
            role,
        }
    }
}

/// Loaded statements and their merged view.
#[derive(Debug, Clone)]
pub struct TradeExplorer {
    pipeline: FilePipeline,
    tables: Vec<(SourceRole, EventTable)>,
    merged: MergedTable,
    styles: StyleMap,
}

impl TradeExplorer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            pipeline: FilePipeline::new(config)?,
            tables: Vec::new(),
            merged: MergedTable::default(),
            styles: StyleMap::default(),
        })
    }

    /// Load the principal statement, replacing any previous one.
    pub fn load_principal(&mut self, name: &str, html: &str) -> Result<usize> {
        self.load(StatementInput::principal(name, html))
    }

    /// Load a tertiary statement, replacing one with the same file id.
    pub fn load_tertiary(&mut self, name: &str, html: &str) -> Result<usize> {
        self.load(StatementInput::tertiary(name, html))
    }

    /// Normalize and install one statement. Returns its event count.
    pub fn load(&mut self, input: StatementInput) -> Result<usize> {
        let table = normalize(&self.pipeline, &input)?;
        let events = table.len();
        self.commit(vec![(input.role, table)])?;
        Ok(events)
    }

    /// Normalize several statements in parallel, then install the ones that
    /// succeeded in a single rebuild.
    ///
    /// Returns one result per input, in input order.
    pub fn load_batch(&mut self, inputs: Vec<StatementInput>) -> Result<Vec<Result<usize>>> {
        let pipeline = &self.pipeline;
        let processed: Vec<(SourceRole, Result<EventTable>)> = inputs
            .into_par_iter()
            .map(|input| {
                let result = normalize(pipeline, &input);
                (input.role, result)
            })
            .collect();

        let mut loaded = Vec::new();
        let mut results = Vec::with_capacity(processed.len());
        for (role, result) in processed {
            match result {
                Ok(table) => {
                    results.push(Ok(table.len()));
                    loaded.push((role, table));
                }
                Err(e) => results.push(Err(e)),
            }
        }

        if !loaded.is_empty() {
            self.commit(loaded)?;
        }
        Ok(results)
    }

    /// Rebuild merged view and styles with `loaded` installed. The session
    /// changes only if the rebuild succeeds.
    fn commit(&mut self, loaded: Vec<(SourceRole, EventTable)>) -> Result<()> {
        let mut tables = self.tables.clone();
        for (role, table) in loaded {
            match tables.iter_mut().find(|(r, _)| *r == role) {
                Some(slot) => slot.1 = table,
                None => tables.push((role, table)),
            }
        }
        // Stable: principal first, the rest in load order.
        tables.sort_by_key(|(role, _)| !role.is_principal());

        let merged = MergedTable::merge(tables.iter().map(|(_, table)| table))?;
        let styles = StyleMap::new(tables.iter().filter_map(|(role, _)| role.file_id()));

        info!(
            statements = tables.len(),
            events = merged.len(),
            "rebuilt merged view"
        );
        self.tables = tables;
        self.merged = merged;
        self.styles = styles;
        Ok(())
    }

    pub fn merged(&self) -> &MergedTable {
        &self.merged
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    /// Roles of the loaded statements, principal first.
    pub fn roles(&self) -> impl Iterator<Item = &SourceRole> {
        self.tables.iter().map(|(role, _)| role)
    }

    /// Normalized table of one loaded statement, as it was before merging.
    pub fn statement(&self, role: &SourceRole) -> Option<&EventTable> {
        self.tables
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, table)| table)
    }

    /// Every loaded statement, principal first.
    pub fn statements(&self) -> impl Iterator<Item = (&SourceRole, &EventTable)> {
        self.tables.iter().map(|(role, table)| (role, table))
    }

    /// Data view rows of one statement as JSON, without the hidden columns.
    pub fn statement_json(&self, role: &SourceRole) -> Result<Option<String>> {
        match self.statement(role) {
            Some(table) => {
                let rows: Vec<DisplayRow<'_>> =
                    table.events().iter().map(TradeEvent::display_row).collect();
                Ok(Some(serde_json::to_string(&rows)?))
            }
            None => Ok(None),
        }
    }

    /// Columns shown on hover.
    pub fn hover_fields(&self) -> &'static [&'static str] {
        &HOVER_FIELDS
    }

    /// Events of the merged view passing `filter`.
    pub fn view(&self, filter: &EventFilter) -> Vec<&TradeEvent> {
        self.merged.filter(filter)
    }

    /// JSON rows of the events passing `filter`.
    pub fn view_json(&self, filter: &EventFilter) -> Result<String> {
        MergedTable::rows_to_json(&self.view(filter))
    }
}

fn normalize(pipeline: &FilePipeline, input: &StatementInput) -> Result<EventTable> {
    match pipeline.process_html(&input.html, &input.role) {
        Ok(table) => {
            info!(file = %input.name, role = %input.role, events = table.len(), "loaded statement");
            Ok(table)
        }
        Err(e) => {
            warn!(file = %input.name, role = %input.role, error = %e, "rejected statement");
            Err(e)
        }
    }
}

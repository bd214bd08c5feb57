//! Copy-trading annotation extraction.
//!
//! Secondary exports print the copy-trading comment of a trade on the row
//! *after* the trade. A row mentioning "copy" with a `#<id>/` token therefore
//! annotates the row before it. Principal statements are never annotated.

use regex::Regex;
use statement_core::config::AnnotationConfig;
use statement_core::{Config, CopyRef, Error, Result, SourceRole};
use statement_ingestion::SectionTable;
use tracing::debug;

/// A section table with one copy annotation per row.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSection {
    pub table: SectionTable,
    /// Parallel to `table.rows`.
    pub copy_refs: Vec<CopyRef>,
}

/// Extracts copy identifiers from row text.
#[derive(Debug, Clone)]
pub struct CopyAnnotator {
    keyword: String,
    pattern: Regex,
}

impl CopyAnnotator {
    /// Create an annotator from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::from_annotation_config(&config.annotation)
    }

    fn from_annotation_config(config: &AnnotationConfig) -> Result<Self> {
        let pattern = Regex::new(&config.pattern)
            .map_err(|e| Error::config(format!("invalid copy pattern: {e}")))?;
        if pattern.captures_len() < 2 {
            return Err(Error::config(format!(
                "copy pattern '{}' has no capture group for the identifier",
                config.pattern
            )));
        }
        Ok(Self {
            keyword: config.keyword.clone(),
            pattern,
        })
    }

    /// Attach copy annotations to the rows of `table`.
    pub fn annotate(&self, table: SectionTable, role: &SourceRole) -> AnnotatedSection {
        if role.is_principal() {
            let copy_refs = vec![CopyRef::NotApplicable; table.len()];
            return AnnotatedSection { table, copy_refs };
        }

        let mut copy_refs = vec![CopyRef::Unmatched; table.len()];
        let mut matched = 0usize;
        for i in 1..table.len() {
            if let Some(id) = self.extract(&table.rows[i]) {
                // Later rows overwrite; each target row has exactly one source row.
                copy_refs[i - 1] = CopyRef::Copy(id);
                matched += 1;
            }
        }

        debug!(
            kind = ?table.kind,
            rows = table.len(),
            matched,
            "annotated copy trades"
        );
        AnnotatedSection { table, copy_refs }
    }

    /// Identifier from the first cell mentioning the keyword, if it matches.
    fn extract(&self, row: &[String]) -> Option<String> {
        let keyword = self.keyword.as_str();
        let cell = row.iter().find(|cell| cell.contains(keyword))?;
        self.pattern
            .captures(cell)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

//! Event enrichment for the trade statement normalizer.
//!
//! This crate handles:
//! - Copy-trading annotation extraction
//! - Projection of sections into trade events
//! - Display labelling of event types
//! - The per-file pipeline tying ingestion and enrichment together

pub mod annotator;
pub mod builder;
pub mod classifier;
pub mod pipeline;

pub use annotator::{AnnotatedSection, CopyAnnotator};
pub use builder::EventBuilder;
pub use classifier::TypeClassifier;
pub use pipeline::FilePipeline;

//! Core types and configuration for the trade statement normalizer.
//!
//! This crate provides shared types used across all other crates:
//! - Raw table, section and role types
//! - The normalized trade event and event table
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

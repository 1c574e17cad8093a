//! Domain types used throughout the service.
//!
//! This module defines:
//!
//! - the fixed column names the model was trained with
//! - dataset records (`LoadRecord`) and their summaries
//! - the aligned per-request `FeatureVector`
//! - resolved runtime configuration

pub mod types;

pub use types::*;

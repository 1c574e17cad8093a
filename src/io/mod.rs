//! Input helpers.
//!
//! - dataset CSV ingest (`dataset`)
//! - model / scaler / label encoder JSON artifacts (`artifact`)

pub mod artifact;
pub mod dataset;

pub use artifact::*;
pub use dataset::*;

//! `demand-api` library crate.
//!
//! The binary (`demand`) is a thin wrapper around this library so that:
//!
//! - feature alignment and load queries are testable without HTTP
//! - the router can be driven in-process from integration tests
//! - the CLI one-shot commands reuse the exact request-time code

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod models;
pub mod predict;
pub mod query;
pub mod server;

//! Read-only queries over the historical dataset.

pub mod filter;
pub mod summary;

pub use filter::{LoadFilter, LoadQuery, first_param};
pub use summary::{dataset_stats, monthly_averages, weekly_averages};

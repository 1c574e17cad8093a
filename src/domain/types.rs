//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so the same values
//! can be returned by HTTP handlers and printed by the CLI without conversion.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;

/// Input fields expanded into `<field>_<value>` indicator columns.
pub const CATEGORICAL_FIELDS: [&str; 3] = ["Public Holiday", "Seasonal Factor", "Day of Week"];

/// Columns passed through the fitted scaler, in scaler order.
pub const NUMERICAL_FEATURES: [&str; 4] = [
    "Temperature (°C)",
    "Humidity (%)",
    "Wind Speed (km/h)",
    "Rain (mm)",
];

/// Dataset column holding the calendar day.
pub const DATE_COLUMN: &str = "Date";

/// Dataset column holding the historical demand in MW.
pub const LOAD_COLUMN: &str = "Historical Demand (MW)";

/// One row of the historical dataset.
///
/// `date` is kept exactly as it appears in the source file: month filtering is
/// a prefix match on this string. `day` is the parsed calendar day used for
/// week ranges and summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadRecord {
    pub date: String,
    #[serde(skip)]
    pub day: NaiveDate,
    pub load: f64,
}

/// A single record aligned to the model's training columns.
///
/// `names` borrows the model's feature list, so building a vector per request
/// only allocates the values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'a> {
    names: &'a [String],
    values: Vec<f64>,
}

impl<'a> FeatureVector<'a> {
    /// # Panics
    /// Panics if `values` and `names` differ in length.
    pub fn new(names: &'a [String], values: Vec<f64>) -> Self {
        assert_eq!(names.len(), values.len(), "feature vector length mismatch");
        Self { names, values }
    }

    pub fn names(&self) -> &'a [String] {
        self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.position(name).map(|idx| self.values[idx])
    }

    pub fn set_at(&mut self, idx: usize, value: f64) {
        self.values[idx] = value;
    }
}

/// Mean load for one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub month: String,
    pub avg_load: f64,
}

/// Mean load for one week-of-month bucket (`Week 1` .. `Week 5`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAverage {
    pub week: String,
    pub avg_load: f64,
}

/// Summary stats about the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub n_records: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub min_load: Option<f64>,
    pub max_load: Option<f64>,
    pub mean_load: Option<f64>,
}

/// Where the startup artifacts live.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    /// The label encoder is optional; nothing reads it at request time.
    pub encoder: Option<PathBuf>,
    pub dataset: PathBuf,
    /// Year used for month prefixes and default week start.
    pub dataset_year: i32,
}

/// Resolved server configuration.
///
/// This is derived from CLI flags, environment variables and defaults.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub artifacts: ArtifactPaths,
    pub host: String,
    pub port: u16,
}

impl ServeConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::config(format!("Invalid HOST:PORT '{}:{}': {e}", self.host, self.port)))
    }
}

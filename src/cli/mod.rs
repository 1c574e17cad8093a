//! Command-line parsing for the demand service.
//!
//! Argument parsing and command dispatch stay separate from the prediction and
//! query code. Every artifact flag falls back to an environment variable, so a
//! `.env` file next to the binary is enough to configure a deployment.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "demand", version, about = "Electricity demand prediction and load-data API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Predict a single JSON record without starting the server.
    Predict(PredictArgs),
    /// Run a load-data query against the dataset and print the JSON result.
    Query(QueryArgs),
}

/// Startup artifacts shared by all commands.
#[derive(Debug, Args, Clone)]
pub struct ArtifactArgs {
    /// Model artifact (JSON).
    #[arg(long, env = "MODEL_PATH", default_value = "model.json")]
    pub model: PathBuf,

    /// Fitted scaler artifact (JSON).
    #[arg(long, env = "SCALER_PATH", default_value = "scaler.json")]
    pub scaler: PathBuf,

    /// Label encoder artifact (JSON). Optional.
    #[arg(long, env = "ENCODER_PATH")]
    pub encoder: Option<PathBuf>,

    /// Historical dataset (CSV with `Date` and `Historical Demand (MW)`).
    #[arg(long, env = "DATASET_PATH", default_value = "Dataset.csv")]
    pub dataset: PathBuf,

    /// Year covered by the dataset; used for month prefixes and the default week.
    #[arg(long, env = "DATASET_YEAR", default_value_t = 2024)]
    pub dataset_year: i32,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// JSON file holding one record, or `-` for stdin.
    #[arg(short, long, value_name = "JSON", default_value = "-")]
    pub input: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// `year`, `month` or `week`.
    #[arg(long, default_value = "year")]
    pub filter: String,

    /// Two-digit month for `--filter month`.
    #[arg(long)]
    pub month: Option<String>,

    /// First day for `--filter week`.
    #[arg(long)]
    pub start_date: Option<String>,
}

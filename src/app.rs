//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - loads the startup artifacts each command needs
//! - runs the server or a one-shot command

use std::io::Read;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{ArtifactArgs, Command, PredictArgs, QueryArgs, ServeArgs};
use crate::domain::{ArtifactPaths, ServeConfig};
use crate::error::AppError;
use crate::query::{LoadFilter, LoadQuery};

pub mod context;

use context::ServiceContext;

/// Entry point for the `demand` binary.
pub fn run() -> Result<(), AppError> {
    // Optional; a missing .env is fine.
    dotenvy::dotenv().ok();
    init_tracing();

    // `demand` and `demand --port 8080` behave like `demand serve ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Predict(args) => handle_predict(args),
        Command::Query(args) => handle_query(args),
    }
}

fn init_tracing() {
    // Logs go to stderr so `predict`/`query` output stays pipeable.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demand_api=info,tower_http=info".into()),
        )
        .try_init();
}

pub fn artifact_paths_from_args(args: &ArtifactArgs) -> ArtifactPaths {
    ArtifactPaths {
        model: args.model.clone(),
        scaler: args.scaler.clone(),
        encoder: args.encoder.clone(),
        dataset: args.dataset.clone(),
        dataset_year: args.dataset_year,
    }
}

pub fn serve_config_from_args(args: &ServeArgs) -> ServeConfig {
    ServeConfig {
        artifacts: artifact_paths_from_args(&args.artifacts),
        host: args.host.clone(),
        port: args.port,
    }
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let config = serve_config_from_args(&args);
    let ctx = Arc::new(ServiceContext::load(&config.artifacts)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::internal(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(crate::server::serve(&config, ctx))
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let paths = artifact_paths_from_args(&args.artifacts);
    let service = context::load_prediction(&paths)?;

    let body = read_input(&args.input)?;
    let prediction = service.predict_json(&body)?;

    println!("{}", serde_json::json!({ "prediction": prediction }));
    Ok(())
}

fn handle_query(args: QueryArgs) -> Result<(), AppError> {
    let paths = artifact_paths_from_args(&args.artifacts);
    let query = LoadQuery {
        filter: Some(args.filter),
        month: args.month,
        start_date: args.start_date,
    };
    // Resolve the filter first so a bad flag fails before the CSV is read.
    let filter = LoadFilter::from_query(&query, paths.dataset_year)?;
    let dataset = context::load_dataset(&paths)?;

    let records = filter.apply(dataset.records());
    let out = serde_json::to_string_pretty(&records)
        .map_err(|e| AppError::internal(format!("Failed to serialize records: {e}")))?;
    println!("{out}");
    Ok(())
}

fn read_input(path: &std::path::Path) -> Result<Vec<u8>, AppError> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| AppError::invalid_input(format!("Failed to read stdin: {e}")))?;
        return Ok(buf);
    }
    std::fs::read(path).map_err(|e| AppError::invalid_input(format!("Failed to read '{}': {e}", path.display())))
}

/// Rewrite argv so `demand` defaults to `demand serve`.
///
/// Rules:
/// - `demand`                        -> `demand serve`
/// - `demand --port 8080 ...`        -> `demand serve --port 8080 ...`
/// - `demand --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "serve" | "predict" | "query");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
        return argv;
    }

    argv
}

//! API route handlers.
//!
//! Status codes follow the contract the dashboard was built against:
//! `/predict` answers 200 even for failures, `/api/load-data` uses 400 for an
//! unknown filter and 500 for everything else.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use crate::app::context::ServiceContext;
use crate::error::{AppError, ErrorKind};
use crate::query::{LoadFilter, LoadQuery, dataset_stats, first_param, monthly_averages, weekly_averages};

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Log the full error and build a sanitized body.
fn error_response(status: StatusCode, err: &AppError) -> Response {
    match err.kind() {
        ErrorKind::InvalidInput | ErrorKind::UnsupportedFilter => warn!(%status, "request rejected: {err}"),
        ErrorKind::Config | ErrorKind::Data | ErrorKind::Internal => error!(%status, "request failed: {err}"),
    }
    let body = ErrorResponse {
        error: err.public_message().to_string(),
    };
    (status, Json(body)).into_response()
}

/// `POST /predict`
///
/// The body is read raw so malformed JSON takes the same error path as every
/// other failure instead of an extractor rejection. An oversized or unreadable
/// body is reported the same way.
pub async fn predict(State(ctx): State<Arc<ServiceContext>>, body: Result<Bytes, BytesRejection>) -> Response {
    let result = body
        .map_err(|rej| AppError::invalid_input(format!("Failed to read request body: {}", rej.body_text())))
        .and_then(|body| ctx.prediction.predict_json(&body));
    match result {
        Ok(prediction) => Json(PredictionResponse { prediction }).into_response(),
        Err(err) => error_response(StatusCode::OK, &err),
    }
}

/// Query pairs in arrival order; repeated keys are kept so the first wins.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

fn query_pairs(params: QueryPairs) -> Result<Vec<(String, String)>, AppError> {
    params
        .map(|Query(pairs)| pairs)
        .map_err(|rej| AppError::invalid_input(format!("Invalid query string: {}", rej.body_text())))
}

/// `GET /api/load-data`
pub async fn load_data(State(ctx): State<Arc<ServiceContext>>, params: QueryPairs) -> Response {
    let result = query_pairs(params)
        .and_then(|pairs| LoadFilter::from_query(&LoadQuery::from_pairs(&pairs), ctx.dataset_year));
    match result {
        Ok(filter) => Json(filter.apply(ctx.dataset.records())).into_response(),
        Err(err) if err.kind() == ErrorKind::UnsupportedFilter => error_response(StatusCode::BAD_REQUEST, &err),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err),
    }
}

/// `GET /api/load-data/monthly`
pub async fn monthly(State(ctx): State<Arc<ServiceContext>>) -> Response {
    Json(monthly_averages(ctx.dataset.records())).into_response()
}

/// `GET /api/load-data/weekly`
pub async fn weekly(State(ctx): State<Arc<ServiceContext>>, params: QueryPairs) -> Response {
    let result = query_pairs(params).and_then(|pairs| {
        let month = first_param(&pairs, "month")
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:04}-01", ctx.dataset_year));
        weekly_averages(ctx.dataset.records(), &month)
    });
    match result {
        Ok(weeks) => Json(weeks).into_response(),
        Err(err) if err.kind() == ErrorKind::InvalidInput => error_response(StatusCode::BAD_REQUEST, &err),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err),
    }
}

/// `GET /api/load-data/stats`
pub async fn stats(State(ctx): State<Arc<ServiceContext>>) -> Response {
    Json(dataset_stats(ctx.dataset.records())).into_response()
}

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<serde_json::Value> {
    Json(json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - which resources are loaded?
pub async fn readiness(State(ctx): State<Arc<ServiceContext>>) -> Json<serde_json::Value> {
    let model = ctx.prediction.model();
    Json(json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION"),
        "model": {
            "kind": model.kind(),
            "features": model.feature_names().len(),
        },
        "scaler": ctx.prediction.scaler().kind(),
        "dataset": {
            "records": ctx.dataset.len(),
            "skipped_rows": ctx.dataset.row_errors().len(),
            "year": ctx.dataset_year,
        },
        "label_encoder_classes": ctx.label_encoder.as_ref().map(|e| e.classes().len()),
    }))
}

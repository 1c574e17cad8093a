//! Single-record prediction.
//!
//! Raw JSON object → one-hot expansion → reconciliation → scaling → model.
//! The steps are split so each can be tested without the web layer; the HTTP
//! handler and the `predict` CLI command both go through [`PredictionService`].

use serde_json::{Map, Value};

use crate::domain::{CATEGORICAL_FIELDS, FeatureVector};
use crate::error::AppError;
use crate::features::{Scaler, expand, reconcile};
use crate::models::Predictor;

/// Model + scaler pair loaded at startup.
pub struct PredictionService {
    model: Box<dyn Predictor>,
    scaler: Scaler,
}

impl PredictionService {
    pub fn new(model: Box<dyn Predictor>, scaler: Scaler) -> Self {
        Self { model, scaler }
    }

    pub fn model(&self) -> &dyn Predictor {
        self.model.as_ref()
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// Expand, reconcile and scale one record into the model's column layout.
    pub fn prepare<'a>(&'a self, record: &Map<String, Value>) -> Result<FeatureVector<'a>, AppError> {
        let expanded = expand(record, &CATEGORICAL_FIELDS);
        let mut vector = reconcile(&expanded, self.model.feature_names())?;
        self.scaler.apply(&mut vector)?;
        Ok(vector)
    }

    pub fn predict_record(&self, record: &Map<String, Value>) -> Result<f64, AppError> {
        let vector = self.prepare(record)?;
        let y = self.model.predict(vector.values())?;
        if !y.is_finite() {
            return Err(AppError::internal("Model returned a non-finite prediction."));
        }
        Ok(y)
    }

    /// Parse a request body and predict it.
    pub fn predict_json(&self, body: &[u8]) -> Result<f64, AppError> {
        let record = parse_record(body)?;
        self.predict_record(&record)
    }
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("model", &self.model.kind())
            .field("n_features", &self.model.feature_names().len())
            .field("scaler", &self.scaler.kind())
            .finish()
    }
}

/// Parse a body that must hold exactly one JSON object.
pub fn parse_record(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::invalid_input("Request body is empty; expected a JSON object."));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_input(format!("Malformed JSON body: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AppError::invalid_input(format!(
            "Expected a JSON object, got {}.",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

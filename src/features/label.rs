//! Category label encoder.
//!
//! Shipped alongside the model but not consulted by any request handler; the
//! readiness probe reports its class count so a missing or stale artifact is
//! visible.

use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let encoder: LabelEncoder = serde_json::from_str(json)
            .map_err(|e| AppError::config(format!("Invalid label encoder JSON: {e}")))?;
        if encoder.classes.is_empty() {
            return Err(AppError::config("Label encoder has no classes."));
        }
        Ok(encoder)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

//! Read the JSON artifacts produced by the training notebook.

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::features::{LabelEncoder, Scaler};
use crate::models::{ModelArtifact, Predictor};

fn read_text(path: &Path, what: &str) -> Result<String, AppError> {
    fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("Failed to read {what} '{}': {e}", path.display())))
}

/// Read and validate a model artifact.
pub fn read_model(path: &Path) -> Result<Box<dyn Predictor>, AppError> {
    let text = read_text(path, "model")?;
    let artifact = ModelArtifact::from_json_str(&text)
        .map_err(|e| AppError::config(format!("{}: {e}", path.display())))?;
    Ok(artifact.into_predictor())
}

/// Read and validate a scaler artifact.
pub fn read_scaler(path: &Path) -> Result<Scaler, AppError> {
    let text = read_text(path, "scaler")?;
    Scaler::from_json_str(&text).map_err(|e| AppError::config(format!("{}: {e}", path.display())))
}

/// Read a label encoder artifact.
pub fn read_label_encoder(path: &Path) -> Result<LabelEncoder, AppError> {
    let text = read_text(path, "label encoder")?;
    LabelEncoder::from_json_str(&text).map_err(|e| AppError::config(format!("{}: {e}", path.display())))
}

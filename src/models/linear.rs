//! Linear regression: `y = intercept + Σ coefᵢ · xᵢ`.

use nalgebra::DVector;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Predictor, check_row_len};

#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(AppError::config(format!(
                "Linear model has {} coefficients for {} features.",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AppError::config("Linear model parameters must be finite."));
        }
        Ok(())
    }
}

impl Predictor for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<f64, AppError> {
        check_row_len(self.coefficients.len(), row)?;
        let beta = DVector::from_column_slice(&self.coefficients);
        let x = DVector::from_column_slice(row);
        Ok(self.intercept + beta.dot(&x))
    }

    fn kind(&self) -> &'static str {
        "linear"
    }
}

//! Fitted numeric scaler.
//!
//! The scaler only ever sees the four weather columns. It is applied after
//! reconciliation, so a weather column the caller omitted is scaled from 0
//! like any other value.

use serde::Deserialize;

use crate::domain::{FeatureVector, NUMERICAL_FEATURES};
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard {
        #[serde(default = "default_feature_names")]
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `x * scale + min`
    MinMax {
        #[serde(default = "default_feature_names")]
        feature_names: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

fn default_feature_names() -> Vec<String> {
    NUMERICAL_FEATURES.iter().map(|s| s.to_string()).collect()
}

impl Scaler {
    /// Parse and validate a scaler from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let scaler: Scaler =
            serde_json::from_str(json).map_err(|e| AppError::config(format!("Invalid scaler JSON: {e}")))?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let (names, offset, scale) = self.parts();

        let expected = default_feature_names();
        if names != expected.as_slice() {
            return Err(AppError::config(format!(
                "Scaler features {names:?} do not match the numerical columns {expected:?}."
            )));
        }
        if offset.len() != names.len() || scale.len() != names.len() {
            return Err(AppError::config(format!(
                "Scaler parameter lengths ({}, {}) do not match {} features.",
                offset.len(),
                scale.len(),
                names.len()
            )));
        }
        if offset.iter().any(|v| !v.is_finite()) {
            return Err(AppError::config("Scaler offsets must be finite."));
        }
        if scale.iter().any(|v| !v.is_finite() || *v == 0.0) {
            return Err(AppError::config("Scaler scale entries must be finite and non-zero."));
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scaler::Standard { .. } => "standard",
            Scaler::MinMax { .. } => "min_max",
        }
    }

    pub fn feature_names(&self) -> &[String] {
        self.parts().0
    }

    /// Transform values laid out in `feature_names` order.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, AppError> {
        let n = self.feature_names().len();
        if values.len() != n {
            return Err(AppError::internal(format!(
                "Scaler expects {n} values, got {}.",
                values.len()
            )));
        }

        let out = match self {
            Scaler::Standard { mean, scale, .. } => values
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            Scaler::MinMax { min, scale, .. } => values
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (lo, s))| x * s + lo)
                .collect(),
        };
        Ok(out)
    }

    /// Scale the numerical columns of `vector` in place, leaving the rest alone.
    pub fn apply(&self, vector: &mut FeatureVector<'_>) -> Result<(), AppError> {
        let mut positions = Vec::with_capacity(self.feature_names().len());
        for name in self.feature_names() {
            let idx = vector.position(name).ok_or_else(|| {
                AppError::internal(format!("Scaled column `{name}` is not a trained model feature."))
            })?;
            positions.push(idx);
        }

        let raw: Vec<f64> = positions.iter().map(|&i| vector.values()[i]).collect();
        let scaled = self.transform(&raw)?;
        for (&idx, value) in positions.iter().zip(scaled) {
            vector.set_at(idx, value);
        }
        Ok(())
    }

    fn parts(&self) -> (&[String], &[f64], &[f64]) {
        match self {
            Scaler::Standard {
                feature_names,
                mean,
                scale,
            } => (feature_names.as_slice(), mean.as_slice(), scale.as_slice()),
            Scaler::MinMax {
                feature_names,
                min,
                scale,
            } => (feature_names.as_slice(), min.as_slice(), scale.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn standard() -> Scaler {
        Scaler::Standard {
            feature_names: default_feature_names(),
            mean: vec![20.0, 50.0, 10.0, 1.0],
            scale: vec![5.0, 10.0, 2.0, 0.5],
        }
    }

    #[test]
    fn standard_transform() {
        let out = standard().transform(&[25.0, 60.0, 10.0, 0.0]).unwrap();
        assert_eq!(out, vec![1.0, 1.0, 0.0, -2.0]);
    }

    #[test]
    fn min_max_transform() {
        let scaler = Scaler::MinMax {
            feature_names: default_feature_names(),
            min: vec![0.0, -1.0, 0.0, 0.0],
            scale: vec![0.1, 0.01, 1.0, 2.0],
        };
        scaler.validate().unwrap();
        let out = scaler.transform(&[10.0, 100.0, 3.0, 0.5]).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] - 0.0).abs() < 1e-12);
        assert_eq!(out[2], 3.0);
        assert_eq!(out[3], 1.0);
    }

    #[test]
    fn apply_only_touches_numerical_columns() {
        let mut names: Vec<String> = vec!["Day of Week_Monday".to_string()];
        names.extend(default_feature_names());
        names.push("Public Holiday_No".to_string());

        let mut v = FeatureVector::new(&names, vec![1.0, 25.0, 60.0, 10.0, 0.0, 1.0]);
        standard().apply(&mut v).unwrap();
        assert_eq!(v.values(), &[1.0, 1.0, 1.0, 0.0, -2.0, 1.0]);
    }

    #[test]
    fn apply_fails_when_model_lacks_a_numerical_column() {
        let names: Vec<String> = vec!["Temperature (°C)".to_string()];
        let mut v = FeatureVector::new(&names, vec![1.0]);
        let err = standard().apply(&mut v).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let json = r#"{"kind":"standard","mean":[0,0,0,0],"scale":[1,0,1,1]}"#;
        assert!(Scaler::from_json_str(json).is_err());
    }

    #[test]
    fn feature_names_default_to_numerical_columns() {
        let json = r#"{"kind":"standard","mean":[0,0,0,0],"scale":[1,1,1,1]}"#;
        let scaler = Scaler::from_json_str(json).unwrap();
        assert_eq!(scaler.feature_names().len(), 4);
        assert_eq!(scaler.kind(), "standard");
    }
}

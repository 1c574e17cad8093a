//! Pre-trained regression models.
//!
//! The service never trains anything: it loads a frozen model artifact and
//! calls it through the [`Predictor`] trait. Two artifact kinds are supported:
//!
//! - `linear`: intercept + coefficient per feature
//! - `tree_ensemble`: averaged (forest) or summed (boosted) regression trees

pub mod linear;
pub mod tree;

use serde::Deserialize;

use crate::error::AppError;

pub use linear::LinearModel;
pub use tree::{Aggregation, RegressionTree, TreeEnsemble, TreeNode};

/// A frozen model that maps one aligned feature row to a number.
pub trait Predictor: Send + Sync {
    /// Ordered column names the model was trained on.
    fn feature_names(&self) -> &[String];

    /// Predict a single row laid out in `feature_names` order.
    fn predict(&self, row: &[f64]) -> Result<f64, AppError>;

    /// Short label for logs and the readiness probe.
    fn kind(&self) -> &'static str;
}

/// Any model artifact the service knows how to load.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    /// Parse and validate an artifact from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).map_err(|e| AppError::config(format!("Invalid model JSON: {e}")))?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let names = self.feature_names();
        if names.is_empty() {
            return Err(AppError::config("Model artifact lists no feature names."));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(AppError::config(format!("Duplicate model feature name: `{name}`")));
            }
        }
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }

    pub fn into_predictor(self) -> Box<dyn Predictor> {
        match self {
            ModelArtifact::Linear(m) => Box::new(m),
            ModelArtifact::TreeEnsemble(m) => Box::new(m),
        }
    }

    fn feature_names(&self) -> &[String] {
        match self {
            ModelArtifact::Linear(m) => &m.feature_names,
            ModelArtifact::TreeEnsemble(m) => &m.feature_names,
        }
    }
}

/// Guard shared by both model kinds.
pub(crate) fn check_row_len(expected: usize, row: &[f64]) -> Result<(), AppError> {
    if row.len() != expected {
        return Err(AppError::internal(format!(
            "Model expects {expected} features, got {}.",
            row.len()
        )));
    }
    Ok(())
}

//! Regression tree ensembles.
//!
//! Trees are stored as flat node arrays. A split sends a row left when
//! `row[feature] <= threshold`. Children must sit at a higher index than their
//! parent, which bounds every walk by the node count.

use serde::Deserialize;

use crate::error::AppError;
use crate::models::{Predictor, check_row_len};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!("node {idx} splits on feature {feature} (only {n_features})"));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {idx} has a NaN threshold"));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx} has invalid child index {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {idx} is not finite"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    pub fn evaluate(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// How per-tree outputs are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Random-forest style average.
    #[default]
    Mean,
    /// Boosting style `base_score + learning_rate * Σ trees`.
    Sum,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub trees: Vec<RegressionTree>,
}

fn default_learning_rate() -> f64 {
    1.0
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.trees.is_empty() {
            return Err(AppError::config("Tree ensemble has no trees."));
        }
        if !(self.base_score.is_finite() && self.learning_rate.is_finite()) {
            return Err(AppError::config("Tree ensemble base_score/learning_rate must be finite."));
        }
        let n_features = self.feature_names.len();
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| AppError::config(format!("Invalid tree {i}: {e}")))?;
        }
        Ok(())
    }
}

impl Predictor for TreeEnsemble {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, row: &[f64]) -> Result<f64, AppError> {
        check_row_len(self.feature_names.len(), row)?;
        let total: f64 = self.trees.iter().map(|t| t.evaluate(row)).sum();
        let y = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + self.learning_rate * total,
        };
        Ok(y)
    }

    fn kind(&self) -> &'static str {
        match self.aggregation {
            Aggregation::Mean => "tree_ensemble(mean)",
            Aggregation::Sum => "tree_ensemble(sum)",
        }
    }
}

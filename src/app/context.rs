//! Process-wide resources shared by every request.
//!
//! Everything here is loaded once at startup and never mutated afterwards, so
//! handlers share it through an `Arc` without locking.

use tracing::{debug, info, warn};

use crate::domain::ArtifactPaths;
use crate::error::AppError;
use crate::features::LabelEncoder;
use crate::io::{Dataset, read_label_encoder, read_model, read_scaler};
use crate::predict::PredictionService;

/// How many skipped dataset rows are echoed individually at debug level.
const ROW_ERRORS_LOGGED: usize = 10;

#[derive(Debug)]
pub struct ServiceContext {
    pub prediction: PredictionService,
    pub dataset: Dataset,
    /// Loaded for parity with the training artifacts; no handler uses it.
    pub label_encoder: Option<LabelEncoder>,
    /// Year the dataset covers; prefixes month filters.
    pub dataset_year: i32,
}

impl ServiceContext {
    /// Load every artifact named in `paths`.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, AppError> {
        let prediction = load_prediction(paths)?;
        let dataset = load_dataset(paths)?;

        let label_encoder = match &paths.encoder {
            Some(path) => {
                let encoder = read_label_encoder(path)?;
                info!(
                    path = %path.display(),
                    classes = encoder.classes().len(),
                    "label encoder loaded (not used by request handlers)"
                );
                Some(encoder)
            }
            None => None,
        };

        Ok(Self {
            prediction,
            dataset,
            label_encoder,
            dataset_year: paths.dataset_year,
        })
    }
}

/// Load the model and scaler only.
pub fn load_prediction(paths: &ArtifactPaths) -> Result<PredictionService, AppError> {
    let model = read_model(&paths.model)?;
    info!(
        path = %paths.model.display(),
        kind = model.kind(),
        features = model.feature_names().len(),
        "model loaded"
    );

    let scaler = read_scaler(&paths.scaler)?;
    info!(path = %paths.scaler.display(), kind = scaler.kind(), "scaler loaded");

    Ok(PredictionService::new(model, scaler))
}

/// Load the dataset only.
pub fn load_dataset(paths: &ArtifactPaths) -> Result<Dataset, AppError> {
    let dataset = Dataset::load(&paths.dataset)?;
    info!(
        path = %paths.dataset.display(),
        records = dataset.len(),
        rows_read = dataset.rows_read(),
        "dataset loaded"
    );

    if !dataset.row_errors().is_empty() {
        warn!(skipped = dataset.row_errors().len(), "dataset rows skipped");
        for e in dataset.row_errors().iter().take(ROW_ERRORS_LOGGED) {
            debug!(line = e.line, "{}", e.message);
        }
    }
    if dataset.is_empty() {
        warn!("dataset has no usable records; load queries will return empty results");
    }

    Ok(dataset)
}

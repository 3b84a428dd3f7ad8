//! Loading and reconciling the model artifact bundle.
//!
//! An artifact directory holds three required files (model, feature names,
//! model metadata) and optionally a scaler and a feature mask, which switch
//! on the derived-feature path. Loading is all or nothing: any missing or
//! inconsistent piece fails the whole load.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{ModelKind, PredictorConfig};
use crate::error::{PredictorError, Result};
use crate::feature_selection::FeatureMask;
use crate::features::FeatureTransformer;
use crate::io::read_json_file;
use crate::models::gbdt::GBDTClassifier;
use crate::models::{load_model, ClassifierModel};
use crate::preprocessing::Scaler;
use crate::record::{ThalEncoding, FEATURE_NAMES, N_BASE_FEATURES};

/// Metadata written next to the model at training time.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub model_type: ModelKind,
    /// Held-out accuracy in `[0, 1]`.
    pub accuracy: f64,
    pub training_date: NaiveDate,
    /// Number of hyperparameter search trials, when recorded.
    #[serde(default)]
    pub n_trials: Option<u32>,
    /// Width of the vector the model consumes, when recorded.
    #[serde(default)]
    pub feature_count: Option<usize>,
    #[serde(default)]
    pub thal_encoding: ThalEncoding,
}

/// Everything needed to score a record. Immutable after load.
pub struct ModelArtifact {
    model: Box<dyn ClassifierModel>,
    feature_names: Vec<String>,
    info: ModelInfo,
    transformer: Option<FeatureTransformer>,
    below_accuracy_threshold: bool,
}

impl ModelArtifact {
    /// Assemble an artifact from parts already in memory, applying the same
    /// reconciliation as [`ModelArtifact::load`].
    pub fn from_parts(
        model: Box<dyn ClassifierModel>,
        feature_names: Vec<String>,
        info: ModelInfo,
        transformer: Option<FeatureTransformer>,
        accuracy_threshold: f64,
    ) -> Result<Self> {
        check_feature_names(&feature_names)?;

        if !(0.0..=1.0).contains(&info.accuracy) {
            return Err(PredictorError::ArtifactMismatch(format!(
                "model accuracy {} outside [0, 1]",
                info.accuracy
            )));
        }

        let input_width = transformer
            .as_ref()
            .map_or(N_BASE_FEATURES, FeatureTransformer::output_width);

        if let Some(declared) = info.feature_count {
            if declared != input_width {
                return Err(PredictorError::ArtifactMismatch(format!(
                    "model_info declares {} features but the pipeline produces {}",
                    declared, input_width
                )));
            }
        }
        if let Some(trained) = model.n_features() {
            if trained != input_width {
                return Err(PredictorError::ArtifactMismatch(format!(
                    "{} model expects {} features but the pipeline produces {}",
                    model.name(),
                    trained,
                    input_width
                )));
            }
        }

        let below_accuracy_threshold = info.accuracy < accuracy_threshold;
        if below_accuracy_threshold {
            warn!(
                "Model accuracy ({:.2}%) below threshold ({:.2}%)",
                info.accuracy * 100.0,
                accuracy_threshold * 100.0
            );
        }

        Ok(ModelArtifact {
            model,
            feature_names,
            info,
            transformer,
            below_accuracy_threshold,
        })
    }

    /// Load the bundle described by `config`.
    pub fn load(config: &PredictorConfig) -> Result<Self> {
        config.validate()?;

        // Fail on absent core files before parsing anything.
        for path in [
            config.model_path(),
            config.feature_names_path(),
            config.model_info_path(),
        ] {
            if !path.exists() {
                return Err(PredictorError::MissingArtifact(path));
            }
        }

        let feature_names: Vec<String> = read_json_file(config.feature_names_path())?;
        let info: ModelInfo = read_json_file(config.model_info_path())?;
        let transformer = load_transformer(config)?;

        let model = match info.model_type {
            ModelKind::GBDT => {
                let gbdt = GBDTClassifier::load(config.model_path())?;
                let gbdt = match (gbdt.n_features(), info.feature_count) {
                    (Some(_), _) => gbdt,
                    (None, Some(n)) => gbdt.with_n_features(n),
                    (None, None) => {
                        return Err(PredictorError::ArtifactMismatch(format!(
                            "{} records no feature size and model_info has no feature_count",
                            config.model_path().display()
                        )))
                    }
                };
                let boxed: Box<dyn ClassifierModel> = Box::new(gbdt);
                boxed
            }
            kind => load_model(kind, config.model_path())?,
        };

        let artifact = Self::from_parts(
            model,
            feature_names,
            info,
            transformer,
            config.accuracy_threshold,
        )?;

        info!(
            "Loaded {} model from {} (accuracy {:.2}%, trained {}, derived features: {})",
            artifact.info.model_type,
            config.artifact_dir.display(),
            artifact.info.accuracy * 100.0,
            artifact.info.training_date,
            if artifact.transformer.is_some() { "on" } else { "off" }
        );

        Ok(artifact)
    }

    /// Load once and hand out a shared read-only handle.
    pub fn load_shared(config: &PredictorConfig) -> Result<Arc<Self>> {
        Self::load(config).map(Arc::new)
    }

    pub fn model(&self) -> &dyn ClassifierModel {
        self.model.as_ref()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn transformer(&self) -> Option<&FeatureTransformer> {
        self.transformer.as_ref()
    }

    pub fn thal_encoding(&self) -> ThalEncoding {
        self.info.thal_encoding
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            model_type: self.info.model_type,
            accuracy: self.info.accuracy,
            training_date: self.info.training_date,
            n_trials: self.info.n_trials,
            feature_count: self
                .transformer
                .as_ref()
                .map_or(N_BASE_FEATURES, FeatureTransformer::output_width),
            supports_probability: self.model.supports_probability(),
            derived_features: self.transformer.is_some(),
            thal_encoding: self.info.thal_encoding,
            below_accuracy_threshold: self.below_accuracy_threshold,
        }
    }
}

impl fmt::Debug for ModelArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelArtifact")
            .field("model", &self.model.name())
            .field("feature_names", &self.feature_names)
            .field("info", &self.info)
            .field("transformer", &self.transformer)
            .field("below_accuracy_threshold", &self.below_accuracy_threshold)
            .finish()
    }
}

fn check_feature_names(names: &[String]) -> Result<()> {
    if names.len() != N_BASE_FEATURES {
        return Err(PredictorError::ArtifactMismatch(format!(
            "expected {} feature names, artifact lists {}",
            N_BASE_FEATURES,
            names.len()
        )));
    }
    for (i, (got, want)) in names.iter().zip(FEATURE_NAMES).enumerate() {
        if got != want {
            return Err(PredictorError::ArtifactMismatch(format!(
                "feature {} is '{}' in the artifact but '{}' in the record schema",
                i, got, want
            )));
        }
    }
    Ok(())
}

fn load_transformer(config: &PredictorConfig) -> Result<Option<FeatureTransformer>> {
    let scaler_path = config.scaler_path();
    let mask_path = config.feature_mask_path();

    match (scaler_path.exists(), mask_path.exists()) {
        (false, false) => Ok(None),
        (false, true) => Err(PredictorError::ArtifactMismatch(format!(
            "{} is present without {}",
            mask_path.display(),
            scaler_path.display()
        ))),
        (true, has_mask) => {
            let scaler: Scaler = read_json_file(&scaler_path)?;
            let mask: Option<FeatureMask> = if has_mask {
                Some(read_json_file(&mask_path)?)
            } else {
                None
            };
            FeatureTransformer::new(scaler, mask).map(Some)
        }
    }
}

/// Descriptive view of a loaded artifact.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArtifactSummary {
    pub model_type: ModelKind,
    pub accuracy: f64,
    pub training_date: NaiveDate,
    pub n_trials: Option<u32>,
    pub feature_count: usize,
    pub supports_probability: bool,
    pub derived_features: bool,
    pub thal_encoding: ThalEncoding,
    pub below_accuracy_threshold: bool,
}

/// Presence of one artifact file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileCheck {
    pub path: PathBuf,
    pub required: bool,
    pub exists: bool,
}

/// Report which artifact files exist, without loading any of them.
pub fn check_artifact_files(config: &PredictorConfig) -> Vec<FileCheck> {
    [
        (config.model_path(), true),
        (config.feature_names_path(), true),
        (config.model_info_path(), true),
        (config.scaler_path(), false),
        (config.feature_mask_path(), false),
    ]
    .into_iter()
    .map(|(path, required)| FileCheck {
        exists: path.exists(),
        path,
        required,
    })
    .collect()
}

//! Prediction entry point: record → vector → (transform) → model → band.
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::artifact::ModelArtifact;
use crate::config::PredictorConfig;
use crate::error::Result;
use crate::inference::{self, Prediction};
use crate::record::PatientRecord;
use crate::risk::{classify_prediction, RiskBand, RiskPolicy, RiskThresholds};

/// Probability above which an assessment is flagged as critical.
pub const CRITICAL_PROBABILITY: f64 = 0.8;

/// Outcome of scoring one record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub prediction: Prediction,
    pub band: RiskBand,
}

impl RiskAssessment {
    pub fn is_critical(&self) -> bool {
        self.prediction.probability > CRITICAL_PROBABILITY
    }
}

/// Stateless scorer over a shared, read-only artifact.
#[derive(Debug, Clone)]
pub struct HeartRiskPredictor {
    artifact: Arc<ModelArtifact>,
    thresholds: RiskThresholds,
    policy: RiskPolicy,
    validate_input: bool,
}

impl HeartRiskPredictor {
    /// Default thresholds, probability policy, validation on.
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        HeartRiskPredictor {
            artifact,
            thresholds: RiskThresholds::default(),
            policy: RiskPolicy::default(),
            validate_input: true,
        }
    }

    pub fn with_config(artifact: Arc<ModelArtifact>, config: &PredictorConfig) -> Result<Self> {
        config.validate()?;
        Ok(HeartRiskPredictor {
            artifact,
            thresholds: config.risk_thresholds,
            policy: config.risk_policy,
            validate_input: config.validate_input,
        })
    }

    /// Load the artifact described by `config` and wrap it.
    pub fn from_config(config: &PredictorConfig) -> Result<Self> {
        let artifact = ModelArtifact::load_shared(config)?;
        Self::with_config(artifact, config)
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn policy(&self) -> RiskPolicy {
        self.policy
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Label and probability only, without banding.
    pub fn predict_raw(&self, record: &PatientRecord) -> Result<Prediction> {
        if self.validate_input {
            record.validate(self.artifact.thal_encoding())?;
        }

        let base = record.to_feature_vector();
        let features = match self.artifact.transformer() {
            Some(transformer) => transformer.transform(&base)?,
            None => base,
        };
        debug!("Model input ({} features): {:?}", features.len(), features.as_slice());

        inference::predict(self.artifact.model(), &features.to_vec())
    }

    pub fn predict(&self, record: &PatientRecord) -> Result<RiskAssessment> {
        let prediction = self.predict_raw(record)?;
        let band = classify_prediction(&prediction, self.policy, &self.thresholds);
        Ok(RiskAssessment { prediction, band })
    }
}

//! Normalizes model output to a `(label, probability)` pair.
//!
//! Models without a probability output are scored through their margin:
//! `clamp((score + 1) * 50, 0, 100)` percent. That mapping is an affine
//! approximation with no calibration guarantee, and predictions produced
//! this way carry [`ProbabilitySource::DecisionFunction`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::models::ClassifierModel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilitySource {
    /// Probability reported by the model itself.
    Model,
    /// Rescaled margin score.
    DecisionFunction,
}

/// Binary label plus positive-class probability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub label: u8,
    pub probability: f64,
    pub source: ProbabilitySource,
}

impl Prediction {
    pub fn percent(&self) -> f64 {
        self.probability * 100.0
    }
}

/// Map a raw margin to a pseudo-probability percentage in `[0, 100]`.
pub fn decision_score_to_percent(score: f64) -> f64 {
    ((score + 1.0) * 50.0).clamp(0.0, 100.0)
}

/// Run one row through the model.
pub fn predict(model: &dyn ClassifierModel, x: &[f64]) -> Result<Prediction> {
    if model.supports_probability() {
        let probability = model.predict_proba(x)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(PredictorError::Inference(format!(
                "{} returned probability {} outside [0, 1]",
                model.name(),
                probability
            )));
        }
        let label = model.predict(x)?;
        debug!("{}: p={:.4} label={}", model.name(), probability, label);
        Ok(Prediction {
            label,
            probability,
            source: ProbabilitySource::Model,
        })
    } else {
        let score = model.decision_function(x)?;
        if !score.is_finite() {
            return Err(PredictorError::Inference(format!(
                "{} returned a non-finite decision score",
                model.name()
            )));
        }
        let probability = decision_score_to_percent(score) / 100.0;
        let label = (score > 0.0) as u8;
        debug!(
            "{}: no probability output, decision score {:.4} rescaled to p={:.4}",
            model.name(),
            score,
            probability
        );
        Ok(Prediction {
            label,
            probability,
            source: ProbabilitySource::DecisionFunction,
        })
    }
}

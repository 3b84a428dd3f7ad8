//! Ordinal risk bands derived from a predicted probability.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::inference::Prediction;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Low => write!(f, "LOW"),
            RiskBand::Medium => write!(f, "MEDIUM"),
            RiskBand::High => write!(f, "HIGH"),
        }
    }
}

/// Lower bounds (inclusive) of the MEDIUM and HIGH bands, as probabilities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 0.30,
            high: 0.70,
        }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<()> {
        if !(0.0 <= self.medium && self.medium < self.high && self.high <= 1.0) {
            return Err(PredictorError::InvalidConfig(format!(
                "risk thresholds must satisfy 0 <= medium < high <= 1, got medium={} high={}",
                self.medium, self.high
            )));
        }
        Ok(())
    }

    /// `p < medium` LOW, `medium <= p < high` MEDIUM, `p >= high` HIGH.
    pub fn classify(&self, probability: f64) -> RiskBand {
        if probability >= self.high {
            RiskBand::High
        } else if probability >= self.medium {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }
}

/// Which part of the prediction decides the band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskPolicy {
    /// Band the probability with [`RiskThresholds`].
    #[default]
    Probability,
    /// Label 1 is HIGH, label 0 is LOW; MEDIUM is never produced.
    PredictedLabel,
}

/// Band a probability with the default 30% / 70% thresholds.
pub fn classify_probability(probability: f64) -> RiskBand {
    RiskThresholds::default().classify(probability)
}

/// Band a full prediction under the given policy.
pub fn classify_prediction(
    prediction: &Prediction,
    policy: RiskPolicy,
    thresholds: &RiskThresholds,
) -> RiskBand {
    match policy {
        RiskPolicy::Probability => thresholds.classify(prediction.probability),
        RiskPolicy::PredictedLabel => {
            if prediction.label == 1 {
                RiskBand::High
            } else {
                RiskBand::Low
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ProbabilitySource;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(classify_probability(0.0), RiskBand::Low);
        assert_eq!(classify_probability(0.2999), RiskBand::Low);
        assert_eq!(classify_probability(0.30), RiskBand::Medium);
        assert_eq!(classify_probability(0.6999), RiskBand::Medium);
        assert_eq!(classify_probability(0.70), RiskBand::High);
        assert_eq!(classify_probability(1.0), RiskBand::High);
    }

    #[test]
    fn test_bands_are_ordered() {
        assert!(RiskBand::Low < RiskBand::Medium);
        assert!(RiskBand::Medium < RiskBand::High);
        assert_eq!(RiskBand::Medium.to_string(), "MEDIUM");
        assert_eq!(serde_json::to_string(&RiskBand::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn test_label_policy_ignores_probability() {
        let prediction = Prediction {
            label: 1,
            probability: 0.4,
            source: ProbabilitySource::Model,
        };
        let t = RiskThresholds::default();
        assert_eq!(
            classify_prediction(&prediction, RiskPolicy::PredictedLabel, &t),
            RiskBand::High
        );
        assert_eq!(
            classify_prediction(&prediction, RiskPolicy::Probability, &t),
            RiskBand::Medium
        );
    }

    #[test]
    fn test_threshold_validation() {
        assert!(RiskThresholds::default().validate().is_ok());
        assert!(RiskThresholds { medium: 0.7, high: 0.3 }.validate().is_err());
        assert!(RiskThresholds { medium: 0.3, high: 1.2 }.validate().is_err());
    }
}

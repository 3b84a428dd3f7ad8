use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::io::read_json_file;
use crate::risk::{RiskPolicy, RiskThresholds};

/// Supported model families.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    #[serde(rename = "gbdt", alias = "xgboost")]
    GBDT,
    #[serde(rename = "svm")]
    SVM,
    #[serde(rename = "random_forest", alias = "rf")]
    RandomForest,
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" | "xgboost" => Ok(ModelKind::GBDT),
            "svm" => Ok(ModelKind::SVM),
            "random_forest" | "random-forest" | "rf" => Ok(ModelKind::RandomForest),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: gbdt, svm, random_forest",
                s
            )),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::GBDT => write!(f, "gbdt"),
            ModelKind::SVM => write!(f, "svm"),
            ModelKind::RandomForest => write!(f, "random_forest"),
        }
    }
}

/// Where the artifact lives and how predictions are banded.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PredictorConfig {
    pub artifact_dir: PathBuf,
    pub model_file: String,
    pub feature_names_file: String,
    pub model_info_file: String,
    pub scaler_file: String,
    pub feature_mask_file: String,
    /// Artifacts reporting a lower accuracy are loaded with a warning.
    pub accuracy_threshold: f64,
    pub risk_thresholds: RiskThresholds,
    pub risk_policy: RiskPolicy,
    /// Check records against their domains before inference.
    pub validate_input: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("."),
            model_file: "model.json".to_string(),
            feature_names_file: "feature_names.json".to_string(),
            model_info_file: "model_info.json".to_string(),
            scaler_file: "scaler.json".to_string(),
            feature_mask_file: "feature_mask.json".to_string(),
            accuracy_threshold: 0.5,
            risk_thresholds: RiskThresholds::default(),
            risk_policy: RiskPolicy::default(),
            validate_input: true,
        }
    }
}

impl PredictorConfig {
    pub fn with_artifact_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            artifact_dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }

    pub fn feature_names_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.feature_names_file)
    }

    pub fn model_info_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_info_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.scaler_file)
    }

    pub fn feature_mask_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.feature_mask_file)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.accuracy_threshold) {
            return Err(PredictorError::InvalidConfig(format!(
                "accuracy_threshold must be within [0, 1], got {}",
                self.accuracy_threshold
            )));
        }
        self.risk_thresholds.validate()
    }
}

/// Load a predictor configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PredictorConfig> {
    let config: PredictorConfig = read_json_file(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_from_str() {
        assert_eq!("GBDT".parse::<ModelKind>().unwrap(), ModelKind::GBDT);
        assert_eq!("xgboost".parse::<ModelKind>().unwrap(), ModelKind::GBDT);
        assert_eq!("rf".parse::<ModelKind>().unwrap(), ModelKind::RandomForest);
        let err = "lstm".parse::<ModelKind>().unwrap_err();
        assert!(err.contains("Unknown model type"));
    }

    #[test]
    fn test_model_kind_serde_names() {
        let kind: ModelKind = serde_json::from_str("\"random_forest\"").unwrap();
        assert_eq!(kind, ModelKind::RandomForest);
        assert_eq!(serde_json::to_string(&ModelKind::SVM).unwrap(), "\"svm\"");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PredictorConfig =
            serde_json::from_str(r#"{"artifact_dir": "/models", "accuracy_threshold": 0.8}"#)
                .unwrap();
        assert_eq!(config.model_path(), PathBuf::from("/models/model.json"));
        assert_eq!(config.accuracy_threshold, 0.8);
        assert!(config.validate_input);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = PredictorConfig {
            accuracy_threshold: 1.5,
            ..PredictorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

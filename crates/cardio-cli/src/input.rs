//! Turning command-line arguments into a predictor configuration and a
//! patient record.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ArgMatches;

use cardio_classifiers::record::{FEATURE_NAMES, N_BASE_FEATURES};
use cardio_classifiers::{PatientRecord, PredictorConfig};

/// Build a config from JSON text, keeping the default for every field that
/// is missing or does not parse.
pub fn config_from_json(config_json: &str) -> Result<PredictorConfig> {
    let partial: serde_json::Value =
        serde_json::from_str(config_json).context("Config is not valid JSON")?;
    let mut config = PredictorConfig::default();

    macro_rules! load_or_default {
        ($field:ident) => {
            if let Some(val) = partial.get(stringify!($field)) {
                if let Ok(parsed) = serde_json::from_value(val.clone()) {
                    config.$field = parsed;
                } else {
                    log::warn!(
                        "Config Invalid value for '{}', using default: {:?}",
                        stringify!($field),
                        config.$field
                    );
                }
            } else {
                log::debug!(
                    "Config Missing field '{}', using default: {:?}",
                    stringify!($field),
                    config.$field
                );
            }
        };
    }

    load_or_default!(artifact_dir);
    load_or_default!(model_file);
    load_or_default!(feature_names_file);
    load_or_default!(model_info_file);
    load_or_default!(scaler_file);
    load_or_default!(feature_mask_file);
    load_or_default!(accuracy_threshold);
    load_or_default!(risk_thresholds);
    load_or_default!(risk_policy);
    load_or_default!(validate_input);

    Ok(config)
}

pub fn load_config_file(config_path: &Path) -> Result<PredictorConfig> {
    let config_json = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
    config_from_json(&config_json)
        .with_context(|| format!("Failed to parse config file: {:?}", config_path))
}

/// Config file (if any) plus `--artifact-dir` and `--model-file` overrides.
pub fn config_from_arguments(matches: &ArgMatches) -> Result<PredictorConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("[Cardio] Using config: {:?}", path);
            load_config_file(path)?
        }
        None => PredictorConfig::default(),
    };

    if let Some(dir) = matches.get_one::<PathBuf>("artifact_dir") {
        config.artifact_dir = dir.clone();
    }
    if let Some(model_file) = matches.get_one::<String>("model_file") {
        config.model_file = model_file.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Patient from `--patient <file.json>` or from the per-attribute flags.
pub fn patient_from_arguments(matches: &ArgMatches) -> Result<PatientRecord> {
    if let Some(path) = matches.get_one::<PathBuf>("patient") {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read patient file: {:?}", path))?;
        let record: PatientRecord = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse patient file: {:?}", path))?;
        return Ok(record);
    }

    let mut values = Vec::with_capacity(N_BASE_FEATURES);
    let mut missing = Vec::new();
    for name in FEATURE_NAMES {
        match matches.get_one::<f64>(name) {
            Some(v) => values.push(*v),
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        bail!(
            "Missing patient attributes: --{} (or pass --patient <file.json>)",
            missing.join(", --")
        );
    }

    Ok(PatientRecord::from_feature_slice(&values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardio_classifiers::risk::RiskPolicy;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = config_from_json(
            r#"{"artifact_dir": "/opt/models", "risk_policy": "predicted_label", "accuracy_threshold": "high"}"#,
        )
        .unwrap();
        assert_eq!(config.artifact_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.risk_policy, RiskPolicy::PredictedLabel);
        assert_eq!(config.accuracy_threshold, 0.5);
        assert_eq!(config.model_file, "model.json");
    }

    #[test]
    fn test_config_must_be_json() {
        assert!(config_from_json("artifact_dir = 1").is_err());
    }
}

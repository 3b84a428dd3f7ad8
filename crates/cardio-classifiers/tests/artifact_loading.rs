//! Artifact directories: required files, reconciliation and the derived
//! feature path.

mod common;

use std::fs;

use serde_json::json;

use cardio_classifiers::artifact::check_artifact_files;
use cardio_classifiers::config::PredictorConfig;
use cardio_classifiers::feature_selection::FeatureMask;
use cardio_classifiers::features::N_DERIVED_FEATURES;
use cardio_classifiers::models::random_forest::ForestModel;
use cardio_classifiers::preprocessing::Scaler;
use cardio_classifiers::{
    HeartRiskPredictor, ModelArtifact, ModelKind, PredictorError, RiskBand,
};

use common::*;

// ---------------------------------------------------------------------------
// Required files
// ---------------------------------------------------------------------------

#[test]
fn each_missing_core_file_fails_the_load() {
    init_logging();
    for name in ["model.json", "feature_names.json", "model_info.json"] {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
        fs::remove_file(dir.path().join(name)).unwrap();

        let config = PredictorConfig::with_artifact_dir(dir.path());
        match ModelArtifact::load(&config) {
            Err(PredictorError::MissingArtifact(path)) => {
                assert!(path.ends_with(name), "{} reported as {}", name, path.display())
            }
            Err(other) => panic!("{}: unexpected error {}", name, other),
            Ok(_) => panic!("{}: load succeeded without the file", name),
        }
    }
}

#[test]
fn file_check_reports_presence() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
    let config = PredictorConfig::with_artifact_dir(dir.path());

    let checks = check_artifact_files(&config);
    assert_eq!(checks.len(), 5);
    assert!(checks.iter().filter(|c| c.required).all(|c| c.exists));
    assert!(checks.iter().filter(|c| !c.required).all(|c| !c.exists));
}

#[test]
fn summary_describes_loaded_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
    let artifact = ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).unwrap();

    let summary = artifact.summary();
    assert_eq!(summary.model_type, ModelKind::RandomForest);
    assert_eq!(summary.feature_count, 13);
    assert_eq!(summary.n_trials, Some(100));
    assert!(summary.supports_probability);
    assert!(!summary.derived_features);
    assert!(!summary.below_accuracy_threshold);
    assert_eq!(artifact.feature_names()[12], "thal");
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[test]
fn reordered_feature_names_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
    write_json(
        dir.path(),
        "feature_names.json",
        &[
            "sex", "age", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang",
            "oldpeak", "slope", "ca", "thal",
        ],
    );

    let err = ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).unwrap_err();
    assert!(matches!(err, PredictorError::ArtifactMismatch(_)), "{}", err);
}

#[test]
fn declared_width_must_match_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
    write_model_info(dir.path(), ModelKind::RandomForest, 0.85, Some(20));

    let err = ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).unwrap_err();
    assert!(err.to_string().contains("20"), "{}", err);
}

#[test]
fn model_type_must_match_model_file() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::SVM, &baseline_forest());

    assert!(ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).is_err());
}

#[test]
fn unparsable_metadata_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
    fs::write(dir.path().join("model_info.json"), "{ not json").unwrap();

    let err = ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).unwrap_err();
    assert!(matches!(err, PredictorError::ArtifactParse { .. }), "{}", err);
}

#[test]
fn low_accuracy_loads_with_flag() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
    write_model_info(dir.path(), ModelKind::RandomForest, 0.42, None);

    let artifact = ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).unwrap();
    assert!(artifact.summary().below_accuracy_threshold);
}

// ---------------------------------------------------------------------------
// Derived feature path
// ---------------------------------------------------------------------------

const RATIO_THALACH_AGE: usize = 22;

fn identity_scaler() -> Scaler {
    Scaler::new(vec![0.0; N_DERIVED_FEATURES], vec![1.0; N_DERIVED_FEATURES]).unwrap()
}

/// First thirteen derived columns plus `thalach/(age+1)`.
fn ratio_mask() -> FeatureMask {
    let mut support = vec![false; N_DERIVED_FEATURES];
    for s in support.iter_mut().take(13) {
        *s = true;
    }
    support[RATIO_THALACH_AGE] = true;
    FeatureMask::new(support).unwrap()
}

fn ratio_forest() -> ForestModel {
    let mut trees = baseline_trees();
    trees.push(stump(13, 3.0, 0.8, 0.2));
    ForestModel {
        n_features: 14,
        trees,
    }
}

#[test]
fn mask_without_scaler_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
    write_json(dir.path(), "feature_mask.json", &ratio_mask());

    let err = ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).unwrap_err();
    assert!(matches!(err, PredictorError::ArtifactMismatch(_)), "{}", err);
}

#[test]
fn scaler_and_mask_drive_the_derived_path() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "model.json", &ratio_forest());
    write_feature_names(dir.path());
    write_model_info(dir.path(), ModelKind::RandomForest, 0.87, Some(14));
    write_json(dir.path(), "scaler.json", &identity_scaler());
    write_json(dir.path(), "feature_mask.json", &ratio_mask());

    let predictor =
        HeartRiskPredictor::from_config(&PredictorConfig::with_artifact_dir(dir.path())).unwrap();
    let transformer = predictor.artifact().transformer().unwrap();
    assert_eq!(transformer.output_width(), 14);
    assert_eq!(transformer.output_names()[13], "thalach/(age+1)");

    let a = predictor.predict(&scenario_a()).unwrap();
    assert!((a.prediction.probability - 0.1625).abs() < 1e-9);
    assert_eq!(a.band, RiskBand::Low);

    let b = predictor.predict(&scenario_b()).unwrap();
    assert!((b.prediction.probability - 0.8625).abs() < 1e-9);
    assert_eq!(b.band, RiskBand::High);
}

#[test]
fn scaler_width_must_match_derived_layout() {
    let dir = tempfile::tempdir().unwrap();
    write_artifact(dir.path(), ModelKind::RandomForest, &baseline_forest());
    write_json(
        dir.path(),
        "scaler.json",
        &json!({ "mean": [0.0, 0.0], "std": [1.0, 1.0] }),
    );

    let err = ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).unwrap_err();
    assert!(matches!(err, PredictorError::ArtifactMismatch(_)), "{}", err);
}

#[test]
fn transform_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    write_json(dir.path(), "scaler.json", &identity_scaler());
    write_json(dir.path(), "feature_mask.json", &ratio_mask());
    write_json(dir.path(), "model.json", &ratio_forest());
    write_feature_names(dir.path());
    write_model_info(dir.path(), ModelKind::RandomForest, 0.87, None);

    let artifact = ModelArtifact::load(&PredictorConfig::with_artifact_dir(dir.path())).unwrap();
    let transformer = artifact.transformer().unwrap();
    let base = scenario_b().to_feature_vector();
    let first = transformer.transform(&base).unwrap();
    let second = transformer.transform(&base).unwrap();
    assert_eq!(first, second);
    assert!((first[13] - 120.0 / 66.0).abs() < 1e-12);
}

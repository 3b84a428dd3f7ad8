//! Shared fixtures: artifact directories written into temp dirs.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::json;

use cardio_classifiers::models::random_forest::{ForestModel, TreeNode};
use cardio_classifiers::models::svm::{Kernel, SvmModel};
use cardio_classifiers::record::FEATURE_NAMES;
use cardio_classifiers::{ModelKind, PatientRecord};

pub const AGE: usize = 0;
pub const THALACH: usize = 7;
pub const OLDPEAK: usize = 9;
pub const CA: usize = 11;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 35-year-old female with normal vitals.
pub fn scenario_a() -> PatientRecord {
    PatientRecord {
        age: 35,
        sex: 0,
        cp: 0,
        trestbps: 120.0,
        chol: 200.0,
        fbs: 0,
        restecg: 0,
        thalach: 180.0,
        exang: 0,
        oldpeak: 0.0,
        slope: 1,
        ca: 0,
        thal: 1,
    }
}

/// 65-year-old male with multiple risk factors.
pub fn scenario_b() -> PatientRecord {
    PatientRecord {
        age: 65,
        sex: 1,
        cp: 3,
        trestbps: 160.0,
        chol: 300.0,
        fbs: 1,
        restecg: 1,
        thalach: 120.0,
        exang: 1,
        oldpeak: 2.5,
        slope: 2,
        ca: 2,
        thal: 2,
    }
}

pub fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> TreeNode {
    TreeNode::Split {
        feature,
        threshold,
        left: Box::new(TreeNode::Leaf { value: left }),
        right: Box::new(TreeNode::Leaf { value: right }),
    }
}

/// Three stumps on vessels, max heart rate and ST depression.
pub fn baseline_trees() -> Vec<TreeNode> {
    vec![
        stump(CA, 0.5, 0.1, 0.9),
        stump(THALACH, 140.0, 0.85, 0.15),
        stump(OLDPEAK, 1.5, 0.2, 0.9),
    ]
}

pub fn baseline_forest() -> ForestModel {
    ForestModel {
        n_features: FEATURE_NAMES.len(),
        trees: baseline_trees(),
    }
}

/// Linear SVM without Platt scaling: `ca - 0.5`.
pub fn vessel_svm() -> SvmModel {
    let mut weights = vec![0.0; FEATURE_NAMES.len()];
    weights[CA] = 1.0;
    SvmModel {
        kernel: Kernel::Linear,
        support_vectors: vec![weights],
        dual_coef: vec![1.0],
        intercept: -0.5,
        platt: None,
    }
}

pub fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) {
    let text = serde_json::to_string_pretty(value).expect("serialize fixture");
    fs::write(dir.join(name), text).expect("write fixture");
}

pub fn write_feature_names(dir: &Path) {
    write_json(dir, "feature_names.json", &FEATURE_NAMES);
}

pub fn write_model_info(dir: &Path, kind: ModelKind, accuracy: f64, feature_count: Option<usize>) {
    let mut info = json!({
        "model_type": kind,
        "accuracy": accuracy,
        "training_date": "2025-06-01",
        "n_trials": 100,
    });
    if let Some(n) = feature_count {
        info["feature_count"] = json!(n);
    }
    write_json(dir, "model_info.json", &info);
}

/// Write the three required files.
pub fn write_artifact<T: Serialize>(dir: &Path, kind: ModelKind, model: &T) {
    write_json(dir, "model.json", model);
    write_feature_names(dir);
    write_model_info(dir, kind, 0.8525, None);
}

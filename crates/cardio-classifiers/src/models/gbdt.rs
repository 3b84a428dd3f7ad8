use std::fs;
use std::path::Path;

use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use log::debug;

use crate::error::{PredictorError, Result};
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_width, logit};

/// Gradient Boosting Decision Tree (GBDT) classifier
///
/// Wraps a model written by `GBDT::save_model` and trained with a
/// classification loss (`LogLikelyhood` or `BinaryLogistic`), so that
/// `GBDT::predict` yields positive-class probabilities.
pub struct GBDTClassifier {
    model: GBDT,
    n_features: Option<usize>,
}

impl GBDTClassifier {
    pub fn new(model: GBDT) -> Self {
        GBDTClassifier {
            model,
            n_features: None,
        }
    }

    /// Load a model saved by `GBDT::save_model`. The trained width is read
    /// from the saved `conf.feature_size`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |reason: String| PredictorError::ModelLoad {
            path: path.to_path_buf(),
            reason,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| load_error("path is not valid UTF-8".to_string()))?;
        let model = GBDT::load_model(path_str).map_err(|e| load_error(e.to_string()))?;

        let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let saved: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;
        let n_features = saved
            .get("conf")
            .and_then(|conf| conf.get("feature_size"))
            .and_then(serde_json::Value::as_u64)
            .and_then(|n| usize::try_from(n).ok());

        debug!(
            "Loaded GBDT model from {} ({:?} features)",
            path.display(),
            n_features
        );
        Ok(GBDTClassifier { model, n_features })
    }

    /// Width for models whose saved config does not carry one.
    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = Some(n_features);
        self
    }
}

impl ClassifierModel for GBDTClassifier {
    fn supports_probability(&self) -> bool {
        true
    }

    fn predict_proba(&self, x: &[f64]) -> Result<f64> {
        check_width(self.name(), self.n_features, x)?;

        let row = x.iter().map(|&v| v as f32).collect::<Vec<f32>>();
        let mut test_x = DataVec::new();
        test_x.push(Data::new_training_data(row, 1.0, 0.0, None));

        let predictions = self.model.predict(&test_x);
        let p = predictions
            .first()
            .copied()
            .ok_or_else(|| PredictorError::Inference("GBDT returned no prediction".to_string()))?
            as f64;
        if !p.is_finite() {
            return Err(PredictorError::Inference(format!(
                "GBDT returned a non-finite score: {}",
                p
            )));
        }
        Ok(p.clamp(0.0, 1.0))
    }

    /// Log-odds of the predicted probability.
    fn decision_function(&self, x: &[f64]) -> Result<f64> {
        Ok(logit(self.predict_proba(x)?))
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}

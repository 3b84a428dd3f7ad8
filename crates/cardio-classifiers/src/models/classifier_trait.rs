use crate::error::{PredictorError, Result};

/// Contract every loaded model family satisfies.
///
/// Model families differ in whether they can produce calibrated
/// probabilities. Instead of probing at call time, each implementation
/// declares it through [`ClassifierModel::supports_probability`], and the
/// inference adapter picks the probability or the margin path up front.
pub trait ClassifierModel: Send + Sync {
    /// Whether [`ClassifierModel::predict_proba`] returns a real probability.
    fn supports_probability(&self) -> bool;

    /// Probability of the positive class (disease present), in `[0, 1]`.
    fn predict_proba(&self, x: &[f64]) -> Result<f64>;

    /// Raw margin score; positive means the positive class.
    fn decision_function(&self, x: &[f64]) -> Result<f64>;

    /// Binary label, 1 for the positive class.
    fn predict(&self, x: &[f64]) -> Result<u8> {
        if self.supports_probability() {
            Ok((self.predict_proba(x)? >= 0.5) as u8)
        } else {
            Ok((self.decision_function(x)? > 0.0) as u8)
        }
    }

    /// Input width the model was trained on, when the format records it.
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}

pub(crate) fn no_probability(name: &str) -> PredictorError {
    PredictorError::Inference(format!("{} does not provide probabilities", name))
}

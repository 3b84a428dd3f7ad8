use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::io::read_json_file;
use crate::models::classifier_trait::{no_probability, ClassifierModel};
use crate::models::utils::{check_width, sigmoid};

/// Kernel used by the support vector model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    #[serde(alias = "gauss")]
    Rbf { gamma: f64 },
    #[serde(alias = "poly")]
    Polynomial { gamma: f64, coef0: f64, degree: i32 },
}

impl Kernel {
    pub fn eval(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf { gamma } => {
                let sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * sq).exp()
            }
            Kernel::Polynomial {
                gamma,
                coef0,
                degree,
            } => (gamma * dot(a, b) + coef0).powi(*degree),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Platt sigmoid parameters, `P(y=1 | f) = 1 / (1 + exp(a*f + b))`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PlattScaling {
    pub a: f64,
    pub b: f64,
}

/// Serialized support vector model.
///
/// `decision(x) = sum_i dual_coef[i] * K(support_vectors[i], x) + intercept`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SvmModel {
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub platt: Option<PlattScaling>,
}

impl SvmModel {
    fn check(&self) -> Result<usize> {
        if self.support_vectors.is_empty() {
            return Err(PredictorError::ArtifactMismatch(
                "SVM has no support vectors".to_string(),
            ));
        }
        if self.support_vectors.len() != self.dual_coef.len() {
            return Err(PredictorError::ArtifactMismatch(format!(
                "SVM has {} support vectors but {} dual coefficients",
                self.support_vectors.len(),
                self.dual_coef.len()
            )));
        }
        let width = self.support_vectors[0].len();
        if self.support_vectors.iter().any(|sv| sv.len() != width) {
            return Err(PredictorError::ArtifactMismatch(
                "SVM support vectors have differing lengths".to_string(),
            ));
        }
        Ok(width)
    }
}

/// Support vector classifier. Probabilities are only available when the
/// model was exported with Platt scaling; otherwise callers fall back to the
/// margin from [`ClassifierModel::decision_function`].
pub struct SVMClassifier {
    model: SvmModel,
    n_features: usize,
}

impl SVMClassifier {
    pub fn new(model: SvmModel) -> Result<Self> {
        let n_features = model.check()?;
        Ok(SVMClassifier { model, n_features })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let model: SvmModel = read_json_file(path)?;
        Self::new(model)
    }

    pub fn model(&self) -> &SvmModel {
        &self.model
    }
}

impl ClassifierModel for SVMClassifier {
    fn supports_probability(&self) -> bool {
        self.model.platt.is_some()
    }

    fn predict_proba(&self, x: &[f64]) -> Result<f64> {
        let platt = self.model.platt.ok_or_else(|| no_probability(self.name()))?;
        let f = self.decision_function(x)?;
        Ok(sigmoid(-(platt.a * f + platt.b)))
    }

    fn decision_function(&self, x: &[f64]) -> Result<f64> {
        check_width(self.name(), Some(self.n_features), x)?;
        let score = self
            .model
            .support_vectors
            .iter()
            .zip(self.model.dual_coef.iter())
            .map(|(sv, coef)| coef * self.model.kernel.eval(sv, x))
            .sum::<f64>()
            + self.model.intercept;
        Ok(score)
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn name(&self) -> &str {
        "svm"
    }
}

//! Pre-fit standardization applied on the transformer path.
//!
//! The scaler is fit offline together with the model and shipped in the
//! artifact bundle as `{"mean": [...], "std": [...]}`. This module only
//! applies it.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// Simple standard scaler (per-column mean/std).
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Minimum stddev to avoid division by zero when transforming.
    const MIN_STD: f64 = 1e-6;

    pub fn new(mean: Vec<f64>, std: Vec<f64>) -> Result<Self> {
        let scaler = Scaler { mean, std };
        scaler.check()?;
        Ok(scaler)
    }

    /// Number of columns this scaler was fit on.
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Reject shapes or values that cannot have come from a fit.
    pub fn check(&self) -> Result<()> {
        if self.mean.len() != self.std.len() {
            return Err(PredictorError::ArtifactMismatch(format!(
                "scaler has {} means but {} standard deviations",
                self.mean.len(),
                self.std.len()
            )));
        }
        if self.mean.is_empty() {
            return Err(PredictorError::ArtifactMismatch(
                "scaler is empty".to_string(),
            ));
        }
        if let Some(i) = self
            .mean
            .iter()
            .chain(self.std.iter())
            .position(|v| !v.is_finite())
        {
            return Err(PredictorError::ArtifactMismatch(format!(
                "scaler parameter {} is not finite",
                i
            )));
        }
        if let Some(i) = self.std.iter().position(|&s| s < 0.0) {
            return Err(PredictorError::ArtifactMismatch(format!(
                "scaler std[{}] is negative",
                i
            )));
        }
        Ok(())
    }

    /// Standardize one row: `(x - mean) / max(std, MIN_STD)`.
    pub fn transform(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.width() {
            return Err(PredictorError::Inference(format!(
                "scaler expects {} features, got {}",
                self.width(),
                x.len()
            )));
        }
        Ok(x
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(&v, (&m, &s))| (v - m) / s.max(Self::MIN_STD))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_standardizes() {
        let sc = Scaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        let out = sc.transform(&Array1::from_vec(vec![3.0, 0.0])).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_std_is_floored() {
        let sc = Scaler::new(vec![5.0], vec![0.0]).unwrap();
        let out = sc.transform(&Array1::from_vec(vec![5.0])).unwrap();
        assert_eq!(out[0], 0.0);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        assert!(Scaler::new(vec![0.0, 1.0], vec![1.0]).is_err());
        let sc = Scaler::new(vec![0.0], vec![1.0]).unwrap();
        assert!(sc.transform(&Array1::from_vec(vec![1.0, 2.0])).is_err());
    }
}

//! Pre-fit feature selection mask.
//!
//! Stored as `{"support": [true, false, ...]}`, one flag per expanded column
//! in the order produced by [`crate::features::derive_features`]. Selected
//! columns keep their relative order.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct FeatureMask {
    pub support: Vec<bool>,
}

impl FeatureMask {
    pub fn new(support: Vec<bool>) -> Result<Self> {
        let mask = FeatureMask { support };
        mask.check()?;
        Ok(mask)
    }

    /// Keep the first `k` of `width` columns.
    pub fn first_k(width: usize, k: usize) -> Result<Self> {
        Self::new((0..width).map(|i| i < k).collect())
    }

    pub fn check(&self) -> Result<()> {
        if self.n_selected() == 0 {
            return Err(PredictorError::ArtifactMismatch(
                "feature mask selects no columns".to_string(),
            ));
        }
        Ok(())
    }

    /// Width of the input the mask applies to.
    pub fn width(&self) -> usize {
        self.support.len()
    }

    /// Width of the output.
    pub fn n_selected(&self) -> usize {
        self.support.iter().filter(|&&keep| keep).count()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.support
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect()
    }

    /// Select names alongside values, for logging and reports.
    pub fn select_names<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        self.selected_indices()
            .into_iter()
            .filter_map(|i| names.get(i).map(String::as_str))
            .collect()
    }

    pub fn apply(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        if x.len() != self.width() {
            return Err(PredictorError::Inference(format!(
                "feature mask expects {} features, got {}",
                self.width(),
                x.len()
            )));
        }
        Ok(x
            .iter()
            .zip(self.support.iter())
            .filter_map(|(&v, &keep)| keep.then_some(v))
            .collect())
    }
}

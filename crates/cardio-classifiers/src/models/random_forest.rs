use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};
use crate::io::read_json_file;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::utils::{check_width, logit};

/// Decision tree node. Rows go left when `x[feature] <= threshold`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TreeNode {
    /// Leaf holding the positive-class probability.
    Leaf { value: f64 },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    fn check(&self, n_features: usize) -> Result<()> {
        match self {
            TreeNode::Leaf { value } => {
                if !(0.0..=1.0).contains(value) {
                    return Err(PredictorError::ArtifactMismatch(format!(
                        "leaf probability {} outside [0, 1]",
                        value
                    )));
                }
                Ok(())
            }
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(PredictorError::ArtifactMismatch(format!(
                        "split on feature {} but the forest has {} features",
                        feature, n_features
                    )));
                }
                if threshold.is_nan() {
                    return Err(PredictorError::ArtifactMismatch(
                        "split threshold is NaN".to_string(),
                    ));
                }
                left.check(n_features)?;
                right.check(n_features)
            }
        }
    }
}

/// Serialized forest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<TreeNode>,
}

/// Random forest classifier; the probability is the mean leaf value.
pub struct RandomForestClassifier {
    model: ForestModel,
}

impl RandomForestClassifier {
    pub fn new(model: ForestModel) -> Result<Self> {
        if model.trees.is_empty() {
            return Err(PredictorError::ArtifactMismatch(
                "random forest has no trees".to_string(),
            ));
        }
        for tree in &model.trees {
            tree.check(model.n_features)?;
        }
        Ok(RandomForestClassifier { model })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let model: ForestModel = read_json_file(path)?;
        Self::new(model)
    }

    pub fn n_trees(&self) -> usize {
        self.model.trees.len()
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn supports_probability(&self) -> bool {
        true
    }

    fn predict_proba(&self, x: &[f64]) -> Result<f64> {
        check_width(self.name(), Some(self.model.n_features), x)?;
        let total: f64 = self.model.trees.iter().map(|t| t.predict(x)).sum();
        Ok(total / self.model.trees.len() as f64)
    }

    fn decision_function(&self, x: &[f64]) -> Result<f64> {
        Ok(logit(self.predict_proba(x)?))
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.model.n_features)
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> TreeNode {
        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(TreeNode::Leaf { value: left }),
            right: Box::new(TreeNode::Leaf { value: right }),
        }
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = RandomForestClassifier::new(ForestModel {
            n_features: 2,
            trees: vec![stump(0, 0.5, 0.2, 0.8), stump(1, 10.0, 0.0, 1.0)],
        })
        .unwrap();

        assert!((forest.predict_proba(&[0.0, 0.0]).unwrap() - 0.1).abs() < 1e-12);
        assert!((forest.predict_proba(&[1.0, 20.0]).unwrap() - 0.9).abs() < 1e-12);
        // threshold itself goes left
        assert!((forest.predict_proba(&[0.5, 10.0]).unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(forest.predict(&[1.0, 20.0]).unwrap(), 1);
    }

    #[test]
    fn test_forest_rejects_out_of_range_feature() {
        let err = RandomForestClassifier::new(ForestModel {
            n_features: 1,
            trees: vec![stump(3, 0.5, 0.2, 0.8)],
        })
        .err()
        .unwrap();
        assert!(err.to_string().contains("feature 3"));
    }

    #[test]
    fn test_forest_rejects_bad_leaf() {
        assert!(RandomForestClassifier::new(ForestModel {
            n_features: 1,
            trees: vec![stump(0, 0.5, -0.2, 0.8)],
        })
        .is_err());
    }

    #[test]
    fn test_tree_json_layout() {
        let json = r#"{"Split": {"feature": 0, "threshold": 1.0,
            "left": {"Leaf": {"value": 0.25}}, "right": {"Leaf": {"value": 0.75}}}}"#;
        let tree: TreeNode = serde_json::from_str(json).unwrap();
        assert_eq!(tree.predict(&[2.0]), 0.75);
    }
}

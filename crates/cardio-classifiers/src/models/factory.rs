use std::path::Path;

use crate::config::ModelKind;
use crate::error::Result;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::gbdt::GBDTClassifier;
use crate::models::random_forest::RandomForestClassifier;
use crate::models::svm::SVMClassifier;

/// Load a boxed classifier of the given kind from `path`.
pub fn load_model<P: AsRef<Path>>(kind: ModelKind, path: P) -> Result<Box<dyn ClassifierModel>> {
    let model: Box<dyn ClassifierModel> = match kind {
        ModelKind::GBDT => Box::new(GBDTClassifier::load(path)?),
        ModelKind::SVM => Box::new(SVMClassifier::load(path)?),
        ModelKind::RandomForest => Box::new(RandomForestClassifier::load(path)?),
    };
    Ok(model)
}

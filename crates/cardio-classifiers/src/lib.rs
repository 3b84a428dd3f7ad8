//! cardio-classifiers: feature preparation and inference for a fixed-schema
//! cardiac risk classifier.
//!
//! A [`record::PatientRecord`] of 13 clinical attributes is turned into a
//! fixed-order feature vector, optionally expanded/scaled/selected by the
//! artifact's [`features::FeatureTransformer`], scored by a pre-trained
//! model behind [`models::ClassifierModel`] and finally banded into
//! LOW/MEDIUM/HIGH by [`risk`].
//!
//! Models are trained elsewhere; this crate only loads the artifact bundle
//! (see [`artifact`]) once and shares it read-only.
pub mod artifact;
pub mod clinical;
pub mod config;
pub mod error;
pub mod feature_selection;
pub mod features;
pub mod inference;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod record;
pub mod risk;

pub use artifact::{ModelArtifact, ModelInfo};
pub use config::{ModelKind, PredictorConfig};
pub use error::{PredictorError, Result};
pub use inference::{Prediction, ProbabilitySource};
pub use pipeline::{HeartRiskPredictor, RiskAssessment};
pub use record::{PatientRecord, ThalEncoding};
pub use risk::{RiskBand, RiskPolicy, RiskThresholds};

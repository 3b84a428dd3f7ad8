//! Patient record and the fixed-order feature vector built from it.
//!
//! The column order below is the order the model was trained on. The
//! artifact's `feature_names.json` must match it exactly; see
//! [`crate::artifact`].

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{PredictorError, Result};

/// Number of base clinical attributes.
pub const N_BASE_FEATURES: usize = 13;

/// Column names in feature-vector order.
pub const FEATURE_NAMES: [&str; N_BASE_FEATURES] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Categorical encoding used for the thalassemia result.
///
/// Trained artifacts disagree on this, so the artifact declares which one it
/// expects and records are checked against it.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThalEncoding {
    /// 0 normal, 1 fixed defect, 2 reversible defect, 3 unknown.
    #[default]
    Ordinal,
    /// 1, 3 normal, 6 fixed defect, 7 reversible defect.
    Clinical,
}

impl ThalEncoding {
    pub fn allowed_values(&self) -> &'static [u8] {
        match self {
            ThalEncoding::Ordinal => &[0, 1, 2, 3],
            ThalEncoding::Clinical => &[1, 3, 6, 7],
        }
    }
}

impl fmt::Display for ThalEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThalEncoding::Ordinal => write!(f, "ordinal"),
            ThalEncoding::Clinical => write!(f, "clinical"),
        }
    }
}

/// One patient's 13 clinical attributes.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PatientRecord {
    /// Age in years.
    pub age: u32,
    /// 0 = female, 1 = male.
    pub sex: u8,
    /// Chest pain type (0-3), 3 = asymptomatic.
    pub cp: u8,
    /// Resting blood pressure (mmHg).
    pub trestbps: f64,
    /// Serum cholesterol (mg/dl).
    pub chol: f64,
    /// Fasting blood sugar > 120 mg/dl.
    pub fbs: u8,
    /// Resting ECG result (0-2).
    pub restecg: u8,
    /// Maximum heart rate achieved (bpm).
    pub thalach: f64,
    /// Exercise induced angina.
    pub exang: u8,
    /// ST depression induced by exercise relative to rest.
    pub oldpeak: f64,
    /// Slope of the peak exercise ST segment (0-2).
    pub slope: u8,
    /// Number of major vessels coloured by fluoroscopy (0-3).
    pub ca: u8,
    /// Thalassemia result, see [`ThalEncoding`].
    pub thal: u8,
}

/// Inclusive physiological bounds accepted for the continuous attributes.
const AGE_RANGE: (u32, u32) = (1, 120);
const TRESTBPS_RANGE: (f64, f64) = (50.0, 250.0);
const CHOL_RANGE: (f64, f64) = (50.0, 700.0);
const THALACH_RANGE: (f64, f64) = (40.0, 250.0);
const OLDPEAK_RANGE: (f64, f64) = (0.0, 6.2);

impl PatientRecord {
    /// Build the model input vector in [`FEATURE_NAMES`] order.
    ///
    /// No validation happens here; call [`PatientRecord::validate`] at the
    /// input boundary.
    pub fn to_feature_vector(&self) -> Array1<f64> {
        Array1::from_vec(vec![
            self.age as f64,
            self.sex as f64,
            self.cp as f64,
            self.trestbps,
            self.chol,
            self.fbs as f64,
            self.restecg as f64,
            self.thalach,
            self.exang as f64,
            self.oldpeak,
            self.slope as f64,
            self.ca as f64,
            self.thal as f64,
        ])
    }

    /// Rebuild a record from a vector in [`FEATURE_NAMES`] order.
    ///
    /// Integer-typed attributes must carry integral, non-negative values.
    pub fn from_feature_slice(values: &[f64]) -> Result<Self> {
        if values.len() != N_BASE_FEATURES {
            return Err(PredictorError::InvalidInput {
                field: "features".to_string(),
                reason: format!(
                    "expected {} values, got {}",
                    N_BASE_FEATURES,
                    values.len()
                ),
            });
        }

        Ok(PatientRecord {
            age: whole_years(values[0])?,
            sex: categorical(values[1], FEATURE_NAMES[1])?,
            cp: categorical(values[2], FEATURE_NAMES[2])?,
            trestbps: values[3],
            chol: values[4],
            fbs: categorical(values[5], FEATURE_NAMES[5])?,
            restecg: categorical(values[6], FEATURE_NAMES[6])?,
            thalach: values[7],
            exang: categorical(values[8], FEATURE_NAMES[8])?,
            oldpeak: values[9],
            slope: categorical(values[10], FEATURE_NAMES[10])?,
            ca: categorical(values[11], FEATURE_NAMES[11])?,
            thal: categorical(values[12], FEATURE_NAMES[12])?,
        })
    }

    /// Check every attribute against its domain. The first violation wins.
    pub fn validate(&self, thal_encoding: ThalEncoding) -> Result<()> {
        if self.age < AGE_RANGE.0 || self.age > AGE_RANGE.1 {
            return Err(PredictorError::invalid_input(
                "age",
                format!("{} outside {}..={}", self.age, AGE_RANGE.0, AGE_RANGE.1),
            ));
        }
        check_one_of("sex", self.sex, &[0, 1])?;
        check_one_of("cp", self.cp, &[0, 1, 2, 3])?;
        check_range("trestbps", self.trestbps, TRESTBPS_RANGE)?;
        check_range("chol", self.chol, CHOL_RANGE)?;
        check_one_of("fbs", self.fbs, &[0, 1])?;
        check_one_of("restecg", self.restecg, &[0, 1, 2])?;
        check_range("thalach", self.thalach, THALACH_RANGE)?;
        check_one_of("exang", self.exang, &[0, 1])?;
        check_range("oldpeak", self.oldpeak, OLDPEAK_RANGE)?;
        check_one_of("slope", self.slope, &[0, 1, 2])?;
        check_one_of("ca", self.ca, &[0, 1, 2, 3])?;
        check_one_of("thal", self.thal, thal_encoding.allowed_values())
            .map_err(|e| match e {
                PredictorError::InvalidInput { field, reason } => PredictorError::InvalidInput {
                    field,
                    reason: format!("{} ({} encoding)", reason, thal_encoding),
                },
                other => other,
            })?;
        Ok(())
    }
}

fn check_one_of(field: &str, value: u8, allowed: &[u8]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(PredictorError::invalid_input(
            field,
            format!("{} not one of {:?}", value, allowed),
        ))
    }
}

fn check_range(field: &str, value: f64, (lo, hi): (f64, f64)) -> Result<()> {
    if !value.is_finite() {
        return Err(PredictorError::invalid_input(field, "value is not finite"));
    }
    if value < lo || value > hi {
        return Err(PredictorError::invalid_input(
            field,
            format!("{} outside {}..={}", value, lo, hi),
        ));
    }
    Ok(())
}

fn integral(value: f64, field: &str) -> Result<u64> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(PredictorError::invalid_input(
            field,
            format!("{} is not a non-negative integer", value),
        ));
    }
    Ok(value as u64)
}

fn whole_years(value: f64) -> Result<u32> {
    let v = integral(value, "age")?;
    u32::try_from(v).map_err(|_| PredictorError::invalid_input("age", format!("{} out of range", v)))
}

fn categorical(value: f64, field: &str) -> Result<u8> {
    let v = integral(value, field)?;
    u8::try_from(v).map_err(|_| PredictorError::invalid_input(field, format!("{} out of range", v)))
}

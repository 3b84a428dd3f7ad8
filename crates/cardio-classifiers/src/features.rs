//! Derived features for the extended model variant.
//!
//! The expanded vector is the 13 base attributes followed by squares,
//! pairwise products and two ratios, in that order:
//!
//! | block        | columns                                              |
//! |--------------|------------------------------------------------------|
//! | base         | `age` .. `thal` (13)                                 |
//! | squares      | `age`, `trestbps`, `chol`, `thalach`, `oldpeak` (5)  |
//! | interactions | `age*trestbps`, `age*chol`, `thalach*oldpeak`, `cp*exang` (4) |
//! | ratios       | `thalach/(age+1)`, `chol/(trestbps+1)` (2)           |
//!
//! The `+1` in the ratio denominators is fixed and not configurable.

use ndarray::Array1;

use crate::error::{PredictorError, Result};
use crate::feature_selection::FeatureMask;
use crate::preprocessing::Scaler;
use crate::record::{FEATURE_NAMES, N_BASE_FEATURES};

const AGE: usize = 0;
const CP: usize = 2;
const TRESTBPS: usize = 3;
const CHOL: usize = 4;
const THALACH: usize = 7;
const EXANG: usize = 8;
const OLDPEAK: usize = 9;

/// Base columns that also appear squared.
pub const SQUARED: [usize; 5] = [AGE, TRESTBPS, CHOL, THALACH, OLDPEAK];

/// Column pairs that appear as products.
pub const INTERACTIONS: [(usize, usize); 4] = [
    (AGE, TRESTBPS),
    (AGE, CHOL),
    (THALACH, OLDPEAK),
    (CP, EXANG),
];

/// `(numerator, denominator)`; the denominator is offset by one.
pub const RATIOS: [(usize, usize); 2] = [(THALACH, AGE), (CHOL, TRESTBPS)];

/// Width of the vector returned by [`derive_features`].
pub const N_DERIVED_FEATURES: usize =
    N_BASE_FEATURES + SQUARED.len() + INTERACTIONS.len() + RATIOS.len();

/// Expand a base vector into the derived layout described above.
pub fn derive_features(base: &Array1<f64>) -> Result<Array1<f64>> {
    if base.len() != N_BASE_FEATURES {
        return Err(PredictorError::Inference(format!(
            "expected {} base features, got {}",
            N_BASE_FEATURES,
            base.len()
        )));
    }

    let mut out = Vec::with_capacity(N_DERIVED_FEATURES);
    out.extend(base.iter().copied());
    out.extend(SQUARED.iter().map(|&i| base[i] * base[i]));
    out.extend(INTERACTIONS.iter().map(|&(a, b)| base[a] * base[b]));
    out.extend(RATIOS.iter().map(|&(num, den)| base[num] / (base[den] + 1.0)));

    Ok(Array1::from_vec(out))
}

/// Names of the derived columns, aligned with [`derive_features`].
pub fn derived_feature_names() -> Vec<String> {
    let mut names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    names.extend(SQUARED.iter().map(|&i| format!("{}^2", FEATURE_NAMES[i])));
    names.extend(
        INTERACTIONS
            .iter()
            .map(|&(a, b)| format!("{}*{}", FEATURE_NAMES[a], FEATURE_NAMES[b])),
    );
    names.extend(
        RATIOS
            .iter()
            .map(|&(num, den)| format!("{}/({}+1)", FEATURE_NAMES[num], FEATURE_NAMES[den])),
    );
    names
}

/// Derive, scale, then select. Built from the optional scaler and mask
/// shipped with an artifact.
#[derive(Clone, Debug)]
pub struct FeatureTransformer {
    scaler: Scaler,
    mask: Option<FeatureMask>,
}

impl FeatureTransformer {
    pub fn new(scaler: Scaler, mask: Option<FeatureMask>) -> Result<Self> {
        scaler.check()?;
        if scaler.width() != N_DERIVED_FEATURES {
            return Err(PredictorError::ArtifactMismatch(format!(
                "scaler width {} does not match {} derived features",
                scaler.width(),
                N_DERIVED_FEATURES
            )));
        }
        if let Some(mask) = &mask {
            mask.check()?;
            if mask.width() != N_DERIVED_FEATURES {
                return Err(PredictorError::ArtifactMismatch(format!(
                    "feature mask width {} does not match {} derived features",
                    mask.width(),
                    N_DERIVED_FEATURES
                )));
            }
        }
        Ok(FeatureTransformer { scaler, mask })
    }

    /// Width of the vector handed to the model.
    pub fn output_width(&self) -> usize {
        self.mask
            .as_ref()
            .map_or(N_DERIVED_FEATURES, FeatureMask::n_selected)
    }

    /// Names of the columns handed to the model.
    pub fn output_names(&self) -> Vec<String> {
        let names = derived_feature_names();
        match &self.mask {
            Some(mask) => mask
                .select_names(&names)
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => names,
        }
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    pub fn mask(&self) -> Option<&FeatureMask> {
        self.mask.as_ref()
    }

    pub fn transform(&self, base: &Array1<f64>) -> Result<Array1<f64>> {
        let derived = derive_features(base)?;
        let scaled = self.scaler.transform(&derived)?;
        match &self.mask {
            Some(mask) => mask.apply(&scaled),
            None => Ok(scaled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Array1<f64> {
        Array1::from_vec(vec![
            50.0, 1.0, 2.0, 140.0, 250.0, 0.0, 0.0, 150.0, 1.0, 1.5, 1.0, 1.0, 1.0,
        ])
    }

    #[test]
    fn test_derived_layout() {
        let d = derive_features(&base()).unwrap();
        assert_eq!(d.len(), N_DERIVED_FEATURES);
        assert_eq!(N_DERIVED_FEATURES, 24);

        // base block is untouched
        assert_eq!(d.slice(ndarray::s![..13]).to_vec(), base().to_vec());
        // squares
        assert_eq!(d[13], 2500.0);
        assert_eq!(d[14], 19600.0);
        assert_eq!(d[15], 62500.0);
        assert_eq!(d[16], 22500.0);
        assert_eq!(d[17], 2.25);
        // interactions
        assert_eq!(d[18], 7000.0);
        assert_eq!(d[19], 12500.0);
        assert_eq!(d[20], 225.0);
        assert_eq!(d[21], 2.0);
        // ratios
        assert!((d[22] - 150.0 / 51.0).abs() < 1e-12);
        assert!((d[23] - 250.0 / 141.0).abs() < 1e-12);
    }

    #[test]
    fn test_names_align_with_values() {
        let names = derived_feature_names();
        assert_eq!(names.len(), N_DERIVED_FEATURES);
        assert_eq!(names[13], "age^2");
        assert_eq!(names[18], "age*trestbps");
        assert_eq!(names[21], "cp*exang");
        assert_eq!(names[22], "thalach/(age+1)");
        assert_eq!(names[23], "chol/(trestbps+1)");
    }

    #[test]
    fn test_ratio_offset_handles_zero_denominator() {
        let mut b = base();
        b[TRESTBPS] = 0.0;
        let d = derive_features(&b).unwrap();
        assert_eq!(d[23], 250.0);
    }

    #[test]
    fn test_derive_rejects_wrong_base_width() {
        let short = Array1::from_vec(vec![1.0; N_BASE_FEATURES - 1]);
        let err = derive_features(&short).unwrap_err();
        assert!(matches!(err, PredictorError::Inference(_)), "{}", err);
    }

    #[test]
    fn test_transformer_rejects_wrong_scaler_width() {
        let scaler = Scaler::new(vec![0.0; 13], vec![1.0; 13]).unwrap();
        assert!(FeatureTransformer::new(scaler, None).is_err());
    }

    #[test]
    fn test_transformer_identity_scaler_with_mask() {
        let scaler = Scaler::new(vec![0.0; 24], vec![1.0; 24]).unwrap();
        let mask = FeatureMask::first_k(24, 13).unwrap();
        let t = FeatureTransformer::new(scaler, Some(mask)).unwrap();
        assert_eq!(t.output_width(), 13);
        let out = t.transform(&base()).unwrap();
        assert_eq!(out.to_vec(), base().to_vec());
        assert_eq!(t.output_names()[12], "thal");
    }
}

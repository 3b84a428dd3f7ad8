//! Small helpers shared by the model wrappers.
use crate::error::{PredictorError, Result};

/// Fail when the input row does not have the width the model was trained on.
pub fn check_width(name: &str, expected: Option<usize>, x: &[f64]) -> Result<()> {
    match expected {
        Some(n) if n != x.len() => Err(PredictorError::Inference(format!(
            "{} expects {} features, got {}",
            name,
            n,
            x.len()
        ))),
        _ => Ok(()),
    }
}

/// Logistic function, stable for large magnitudes.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Log-odds of a probability, clamped away from 0 and 1.
pub fn logit(p: f64) -> f64 {
    let p = p.clamp(1e-12, 1.0 - 1e-12);
    (p / (1.0 - p)).ln()
}

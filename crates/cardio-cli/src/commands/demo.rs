use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use cardio_classifiers::clinical::example_profiles;
use cardio_classifiers::{HeartRiskPredictor, PredictorConfig, RiskAssessment};

#[derive(Debug, Serialize)]
pub struct DemoResult {
    pub name: &'static str,
    pub description: &'static str,
    pub assessment: RiskAssessment,
}

/// Score every example profile against one loaded artifact.
pub fn run_demo<W: Write + ?Sized>(
    config: &PredictorConfig,
    json: bool,
    out: &mut W,
) -> Result<Vec<DemoResult>> {
    let predictor = HeartRiskPredictor::from_config(config).with_context(|| {
        format!("Failed to load model artifact from {:?}", config.artifact_dir)
    })?;

    let mut results = Vec::new();
    for profile in example_profiles() {
        let assessment = predictor
            .predict(&profile.record)
            .with_context(|| format!("Failed to score example '{}'", profile.name))?;
        results.push(DemoResult {
            name: profile.name,
            description: profile.description,
            assessment,
        });
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &results)?;
        writeln!(out)?;
    } else {
        for r in &results {
            writeln!(
                out,
                "{:<26} {:<7} {:>7.2}%  {}",
                r.name,
                r.assessment.band.to_string(),
                r.assessment.prediction.percent(),
                r.description
            )?;
        }
    }
    Ok(results)
}

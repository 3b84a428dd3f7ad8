use std::io::Write;

use anyhow::{Context, Result};

use cardio_classifiers::{HeartRiskPredictor, PatientRecord, PredictorConfig, RiskAssessment};

use crate::output::{write_text_report, PredictionReport};

/// Load the artifact, score one patient and print the report.
pub fn run_predict<W: Write + ?Sized>(
    config: &PredictorConfig,
    patient: &PatientRecord,
    json: bool,
    out: &mut W,
) -> Result<RiskAssessment> {
    let predictor = HeartRiskPredictor::from_config(config).with_context(|| {
        format!("Failed to load model artifact from {:?}", config.artifact_dir)
    })?;
    let assessment = predictor.predict(patient)?;
    log::info!(
        "[Cardio] {} risk ({:.2}%)",
        assessment.band,
        assessment.prediction.percent()
    );

    if json {
        serde_json::to_writer_pretty(&mut *out, &PredictionReport::new(patient, &assessment))?;
        writeln!(out)?;
    } else {
        write_text_report(out, patient, &assessment)?;
    }
    Ok(assessment)
}

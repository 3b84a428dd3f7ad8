use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use cardio_classifiers::io::{read_patients_csv, write_assessments_csv, PatientRow};
use cardio_classifiers::{HeartRiskPredictor, PredictorConfig, RiskAssessment, RiskBand};

/// Score rows in order; the first failing row aborts the batch.
pub fn score_rows(
    predictor: &HeartRiskPredictor,
    rows: &[PatientRow],
) -> Result<Vec<(String, RiskAssessment)>> {
    rows.iter()
        .map(|row| {
            predictor
                .predict(&row.record)
                .map(|assessment| (row.id.clone(), assessment))
                .with_context(|| format!("Failed to score patient '{}'", row.id))
        })
        .collect()
}

/// Number of assessments per band.
pub fn band_counts(scored: &[(String, RiskAssessment)]) -> BTreeMap<RiskBand, usize> {
    let mut counts = BTreeMap::new();
    for (_, assessment) in scored {
        *counts.entry(assessment.band).or_insert(0) += 1;
    }
    counts
}

pub fn run_batch(
    config: &PredictorConfig,
    input: &Path,
    output: Option<&Path>,
) -> Result<Vec<(String, RiskAssessment)>> {
    let rows = read_patients_csv(input)
        .with_context(|| format!("Failed to read patients from {:?}", input))?;
    log::info!("[Cardio] Read {} patients from {:?}", rows.len(), input);

    let predictor = HeartRiskPredictor::from_config(config).with_context(|| {
        format!("Failed to load model artifact from {:?}", config.artifact_dir)
    })?;
    let scored = score_rows(&predictor, &rows)?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            write_assessments_csv(BufWriter::new(file), &scored)?;
            log::info!("[Cardio] Wrote {} assessments to {:?}", scored.len(), path);
        }
        None => write_assessments_csv(io::stdout().lock(), &scored)?,
    }

    for (band, n) in band_counts(&scored) {
        log::info!("[Cardio] {}: {}", band, n);
    }
    Ok(scored)
}

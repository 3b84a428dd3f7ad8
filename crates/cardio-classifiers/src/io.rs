//! File IO: artifact JSON documents and batch CSV tables.
use std::fs;
use std::io::Write;
use std::path::Path;

use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PredictorError, Result};
use crate::inference::ProbabilitySource;
use crate::pipeline::RiskAssessment;
use crate::record::{PatientRecord, FEATURE_NAMES, N_BASE_FEATURES};
use crate::risk::RiskBand;

/// Read and parse a JSON document. A missing file is reported as
/// [`PredictorError::MissingArtifact`].
pub fn read_json_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PredictorError::MissingArtifact(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| PredictorError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| PredictorError::ArtifactParse {
        path: path.to_path_buf(),
        source,
    })
}

/// One patient row from a batch file.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRow {
    /// Value of the optional `id` column, or the 1-based row number.
    pub id: String,
    pub record: PatientRecord,
}

/// Read patients from a CSV (or TSV, by extension) with one column per
/// feature name. Extra columns are ignored; an `id` column is kept.
pub fn read_patients_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PatientRow>> {
    let path = path.as_ref();
    let delimiter = match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut feature_indices = Vec::with_capacity(N_BASE_FEATURES);
    for name in FEATURE_NAMES {
        let idx = find_column(&headers, name).ok_or_else(|| PredictorError::InvalidInput {
            field: name.to_string(),
            reason: format!("missing column in {}", path.display()),
        })?;
        feature_indices.push(idx);
    }
    let id_idx = find_column(&headers, "id");

    let mut rows = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let mut values = Vec::with_capacity(N_BASE_FEATURES);
        for (&col, name) in feature_indices.iter().zip(FEATURE_NAMES) {
            let raw = record.get(col).unwrap_or("");
            let value = raw.parse::<f64>().map_err(|_| PredictorError::InvalidInput {
                field: name.to_string(),
                reason: format!("row {}: '{}' is not a number", row_idx + 1, raw),
            })?;
            values.push(value);
        }
        let patient = PatientRecord::from_feature_slice(&values).map_err(|e| match e {
            PredictorError::InvalidInput { field, reason } => PredictorError::InvalidInput {
                field,
                reason: format!("row {}: {}", row_idx + 1, reason),
            },
            other => other,
        })?;
        let id = id_idx
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| (row_idx + 1).to_string());
        rows.push(PatientRow {
            id,
            record: patient,
        });
    }

    Ok(rows)
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

#[derive(Debug, Serialize)]
struct AssessmentRow<'a> {
    id: &'a str,
    label: u8,
    probability: f64,
    risk_band: RiskBand,
    source: ProbabilitySource,
}

/// Write one CSV line per assessment.
pub fn write_assessments_csv<W: Write>(
    writer: W,
    rows: &[(String, RiskAssessment)],
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (id, assessment) in rows {
        wtr.serialize(AssessmentRow {
            id,
            label: assessment.prediction.label,
            probability: assessment.prediction.probability,
            risk_band: assessment.band,
            source: assessment.prediction.source,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

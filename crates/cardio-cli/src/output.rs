//! Text and JSON rendering of assessments and artifact summaries.
use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use cardio_classifiers::artifact::{ArtifactSummary, FileCheck};
use cardio_classifiers::clinical::{
    profile_summary, risk_factors, ProfileRow, RiskFactor, RISK_FACTOR_RULES,
};
use cardio_classifiers::{PatientRecord, ProbabilitySource, RiskAssessment, RiskBand};

/// Everything `predict --json` prints for one patient.
#[derive(Debug, Serialize)]
pub struct PredictionReport {
    pub patient: PatientRecord,
    pub label: u8,
    pub probability: f64,
    pub risk_band: RiskBand,
    pub source: ProbabilitySource,
    pub critical: bool,
    pub risk_factors: Vec<RiskFactor>,
    pub profile: Vec<ProfileRow>,
}

impl PredictionReport {
    pub fn new(patient: &PatientRecord, assessment: &RiskAssessment) -> Self {
        PredictionReport {
            patient: *patient,
            label: assessment.prediction.label,
            probability: assessment.prediction.probability,
            risk_band: assessment.band,
            source: assessment.prediction.source,
            critical: assessment.is_critical(),
            risk_factors: risk_factors(patient),
            profile: profile_summary(patient),
        }
    }
}

fn band_message(band: RiskBand) -> &'static str {
    match band {
        RiskBand::Low => "Low risk of heart disease",
        RiskBand::Medium => "Moderate risk of heart disease",
        RiskBand::High => "High risk of heart disease",
    }
}

pub fn write_text_report<W: Write + ?Sized>(
    out: &mut W,
    patient: &PatientRecord,
    assessment: &RiskAssessment,
) -> Result<()> {
    let prediction = &assessment.prediction;
    writeln!(out, "Risk level:      {} ({})", assessment.band, band_message(assessment.band))?;
    writeln!(out, "Probability:     {:.2}%", prediction.percent())?;
    writeln!(
        out,
        "Predicted class: {} ({})",
        prediction.label,
        if prediction.label == 1 {
            "heart disease"
        } else {
            "no heart disease"
        }
    )?;
    if prediction.source == ProbabilitySource::DecisionFunction {
        writeln!(
            out,
            "Source:          rescaled decision score (not a calibrated probability)"
        )?;
    }
    if assessment.is_critical() {
        writeln!(out, "CRITICAL: probability above 80%, seek medical review")?;
    }

    let factors = risk_factors(patient);
    writeln!(out)?;
    writeln!(out, "Risk factors ({} of {}):", factors.len(), RISK_FACTOR_RULES)?;
    if factors.is_empty() {
        writeln!(out, "  none")?;
    }
    for factor in &factors {
        writeln!(out, "  - {}", factor)?;
    }

    writeln!(out)?;
    writeln!(out, "Patient profile:")?;
    for row in profile_summary(patient) {
        writeln!(out, "  {:<15} {:<12} {}", row.attribute, row.value, row.status)?;
    }
    Ok(())
}

pub fn write_file_checks<W: Write + ?Sized>(out: &mut W, checks: &[FileCheck]) -> Result<()> {
    for check in checks {
        writeln!(
            out,
            "{:<8} {:<9} {}",
            if check.exists { "found" } else { "MISSING" },
            if check.required { "required" } else { "optional" },
            check.path.display()
        )?;
    }
    Ok(())
}

pub fn write_summary<W: Write + ?Sized>(out: &mut W, summary: &ArtifactSummary) -> Result<()> {
    writeln!(out, "Model type:       {}", summary.model_type)?;
    writeln!(
        out,
        "Accuracy:         {:.2}%{}",
        summary.accuracy * 100.0,
        if summary.below_accuracy_threshold {
            " (below threshold)"
        } else {
            ""
        }
    )?;
    writeln!(out, "Training date:    {}", summary.training_date)?;
    if let Some(n) = summary.n_trials {
        writeln!(out, "Search trials:    {}", n)?;
    }
    writeln!(out, "Features:         {}", summary.feature_count)?;
    writeln!(out, "Derived features: {}", if summary.derived_features { "yes" } else { "no" })?;
    writeln!(
        out,
        "Probabilities:    {}",
        if summary.supports_probability {
            "model"
        } else {
            "rescaled decision score"
        }
    )?;
    writeln!(out, "Thal encoding:    {}", summary.thal_encoding)?;
    Ok(())
}

use std::io::Write;

use anyhow::{bail, Context, Result};

use cardio_classifiers::artifact::{check_artifact_files, ArtifactSummary};
use cardio_classifiers::{ModelArtifact, PredictorConfig};

use crate::output::{write_file_checks, write_summary};

/// Print file presence, then load the artifact and print its summary.
pub fn run_check<W: Write + ?Sized>(config: &PredictorConfig, out: &mut W) -> Result<ArtifactSummary> {
    writeln!(out, "Artifact directory: {}", config.artifact_dir.display())?;
    let checks = check_artifact_files(config);
    write_file_checks(out, &checks)?;

    let missing: Vec<String> = checks
        .iter()
        .filter(|c| c.required && !c.exists)
        .map(|c| c.path.display().to_string())
        .collect();
    if !missing.is_empty() {
        bail!("Required artifact files are missing: {}", missing.join(", "));
    }

    let artifact = ModelArtifact::load(config).context("Artifact files exist but failed to load")?;
    let summary = artifact.summary();
    writeln!(out)?;
    write_summary(out, &summary)?;
    Ok(summary)
}

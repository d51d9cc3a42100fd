//! Export chart data to CSV and conversations to markdown.
//!
//! The CSV files are meant to be easy to consume in spreadsheets; the
//! transcript is a human-readable record of one advisor session.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::advisor::ChatSession;
use crate::app::pipeline::AnalysisOutput;
use crate::domain::Choice;
use crate::error::AppError;
use crate::estimator::{SensitivityCurve, YieldSeries};

/// Write the yield trend to CSV.
pub fn write_series_csv(path: &Path, series: &YieldSeries) -> Result<(), AppError> {
    let mut file = create(path, "series CSV")?;
    writeln!(file, "season,yield_q_per_acre,is_prediction")
        .map_err(|e| AppError::runtime(format!("Failed to write series CSV header: {e}")))?;

    let last = series.len().saturating_sub(1);
    for (i, p) in series.points().iter().enumerate() {
        writeln!(file, "{},{:.4},{}", p.label, p.value, i == last)
            .map_err(|e| AppError::runtime(format!("Failed to write series CSV row: {e}")))?;
    }
    Ok(())
}

/// Write the sensitivity curve to CSV.
pub fn write_curve_csv(path: &Path, curve: &SensitivityCurve) -> Result<(), AppError> {
    let mut file = create(path, "curve CSV")?;
    writeln!(file, "improvement_pct,yield_q_per_acre")
        .map_err(|e| AppError::runtime(format!("Failed to write curve CSV header: {e}")))?;

    for p in &curve.points {
        writeln!(file, "{:.4},{:.4}", p.x, p.y)
            .map_err(|e| AppError::runtime(format!("Failed to write curve CSV row: {e}")))?;
    }
    Ok(())
}

/// Write the profile context and every chat turn as markdown.
pub fn write_transcript_markdown(
    path: &Path,
    analysis: &AnalysisOutput,
    session: &ChatSession,
) -> Result<(), AppError> {
    let mut file = create(path, "transcript")?;
    let p = &analysis.profile;
    let w = |e: std::io::Error| AppError::runtime(format!("Failed to write transcript: {e}"));

    writeln!(file, "# {} advisor transcript", analysis.settings.variant.title()).map_err(w)?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339()).map_err(w)?;
    writeln!(file, "- dashboard: {}", analysis.settings.variant.label()).map_err(w)?;
    writeln!(file, "- location: {:.4}, {:.4}", p.location.lat, p.location.lon).map_err(w)?;
    writeln!(file, "- soil: {} (pH {:.1})", p.soil_condition, p.soil_ph).map_err(w)?;
    writeln!(file, "- seed: {}", p.seed_quality).map_err(w)?;
    writeln!(file, "- weather: {}", p.weather).map_err(w)?;
    writeln!(file, "- pests: {}, disease: {}", p.pest_observed, p.disease_observed).map_err(w)?;
    writeln!(
        file,
        "- predicted yield ({}): {:.2} q/acre",
        analysis.season,
        analysis.predicted()
    )
    .map_err(w)?;

    if session.is_empty() {
        writeln!(file, "\n_No questions asked._").map_err(w)?;
    }
    for msg in session.messages() {
        writeln!(
            file,
            "\n## {} ({})\n\n{}",
            msg.role.display_name(),
            msg.at.format("%Y-%m-%d %H:%M:%S"),
            msg.content.trim_end()
        )
        .map_err(w)?;
    }

    tracing::info!(path = %path.display(), turns = session.messages().len() / 2, "wrote transcript");
    Ok(())
}

fn create(path: &Path, what: &str) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create {what} '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::analyze;
    use crate::domain::{FarmProfile, SeedQuality, SoilCondition, Variant};
    use crate::estimator::EstimatorSettings;

    fn classic_output() -> AnalysisOutput {
        let mut profile = FarmProfile::default_for(Variant::Classic);
        profile.soil_condition = SoilCondition::Excellent;
        profile.seed_quality = SeedQuality::CertifiedElite;
        analyze(&profile, &EstimatorSettings::new(Variant::Classic), 2026).unwrap()
    }

    #[test]
    fn series_csv_marks_prediction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        write_series_csv(&path, &classic_output().series).unwrap();

        let txt = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            txt,
            "season,yield_q_per_acre,is_prediction\n2025,12.0000,false\n2026,22.5000,true\n"
        );
    }

    #[test]
    fn curve_csv_has_header_and_ten_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        write_curve_csv(&path, &classic_output().curve).unwrap();

        let txt = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "0.0000,22.5000");
        assert_eq!(lines[10], "100.0000,33.7500");
    }

    #[test]
    fn transcript_without_questions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.md");
        write_transcript_markdown(&path, &classic_output(), &ChatSession::new()).unwrap();

        let txt = std::fs::read_to_string(&path).unwrap();
        assert!(txt.starts_with("# Farm Yield Dashboard advisor transcript\n"));
        assert!(txt.contains("- predicted yield (2026): 22.50 q/acre"));
        assert!(txt.contains("_No questions asked._"));
    }
}

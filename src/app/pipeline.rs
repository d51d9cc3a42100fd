//! Shared analysis pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> estimate -> trend series -> sensitivity curve -> field status
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::Datelike;
use serde::Serialize;

use crate::domain::FarmProfile;
use crate::error::AppError;
use crate::estimator::{
    EstimatorSettings, SensitivityCurve, YieldBreakdown, YieldSeries, breakdown, sensitivity_curve,
};
use crate::report::{FieldStatus, assess_field_status};

/// All computed outputs for one profile.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutput {
    pub profile: FarmProfile,
    pub settings: EstimatorSettings,
    pub season: i32,
    pub breakdown: YieldBreakdown,
    pub series: YieldSeries,
    pub curve: SensitivityCurve,
    pub status: FieldStatus,
}

impl AnalysisOutput {
    /// Predicted yield for the current season (q/acre).
    pub fn predicted(&self) -> f64 {
        self.breakdown.value
    }
}

/// The calendar year used to label the current prediction.
pub fn current_season() -> i32 {
    chrono::Local::now().year()
}

/// Run the full analysis for `profile`.
pub fn analyze(
    profile: &FarmProfile,
    settings: &EstimatorSettings,
    season: i32,
) -> Result<AnalysisOutput, AppError> {
    profile.validate(settings.variant)?;

    let breakdown = breakdown(profile, settings);
    let series = YieldSeries::build(profile, season, breakdown.value);
    let curve = sensitivity_curve(breakdown.value);
    let status = assess_field_status(profile);

    Ok(AnalysisOutput {
        profile: profile.clone(),
        settings: *settings,
        season,
        breakdown,
        series,
        curve,
        status,
    })
}

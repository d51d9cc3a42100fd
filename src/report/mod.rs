//! Reporting utilities: field status and formatted terminal output.

use serde::Serialize;

use crate::domain::{FarmProfile, SeedQuality};

mod format;

pub use format::*;

/// A problem that flags the field as critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldIssue {
    PestActivity,
    DiseaseSymptoms,
    DamagedSeed,
}

impl FieldIssue {
    pub fn display_name(self) -> &'static str {
        match self {
            FieldIssue::PestActivity => "Pest activity observed",
            FieldIssue::DiseaseSymptoms => "Disease symptoms observed",
            FieldIssue::DamagedSeed => "Seeds damaged/discolored",
        }
    }
}

/// Diagnostic summary verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "issues", rename_all = "kebab-case")]
pub enum FieldStatus {
    Stable,
    Critical(Vec<FieldIssue>),
}

impl FieldStatus {
    pub fn is_critical(&self) -> bool {
        matches!(self, FieldStatus::Critical(_))
    }

    pub fn headline(&self) -> &'static str {
        match self {
            FieldStatus::Stable => "Field Status: Stable",
            FieldStatus::Critical(_) => "Critical Issues Detected. Consult the AI assistant.",
        }
    }
}

/// Flag pests, disease and damaged seed, in that order.
pub fn assess_field_status(profile: &FarmProfile) -> FieldStatus {
    let mut issues = Vec::new();
    if profile.pest_observed {
        issues.push(FieldIssue::PestActivity);
    }
    if profile.disease_observed {
        issues.push(FieldIssue::DiseaseSymptoms);
    }
    if profile.seed_quality == SeedQuality::DamagedDiscolored {
        issues.push(FieldIssue::DamagedSeed);
    }

    if issues.is_empty() {
        FieldStatus::Stable
    } else {
        FieldStatus::Critical(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_stable() {
        assert_eq!(assess_field_status(&FarmProfile::default()), FieldStatus::Stable);
    }

    #[test]
    fn issues_are_listed_in_fixed_order() {
        let mut profile = FarmProfile::default();
        profile.seed_quality = SeedQuality::DamagedDiscolored;
        profile.disease_observed = true;
        profile.pest_observed = true;
        assert_eq!(
            assess_field_status(&profile),
            FieldStatus::Critical(vec![
                FieldIssue::PestActivity,
                FieldIssue::DiseaseSymptoms,
                FieldIssue::DamagedSeed,
            ])
        );
    }

    #[test]
    fn disease_alone_is_critical() {
        let mut profile = FarmProfile::default();
        profile.disease_observed = true;
        assert!(assess_field_status(&profile).is_critical());
    }
}

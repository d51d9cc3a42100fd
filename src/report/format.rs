//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the estimator stays free of presentation concerns
//! - output changes are localized (the CLI and the TUI share these strings)

use crate::app::pipeline::AnalysisOutput;
use crate::domain::Choice;
use crate::estimator::{SensitivityCurve, YieldBreakdown, YieldSeries};
use crate::report::FieldStatus;

/// Diagnostic summary card: site, seed, water and field status.
pub fn format_summary(output: &AnalysisOutput) -> String {
    let p = &output.profile;
    let mut out = String::new();

    out.push_str(&format!(
        "=== {} ({} dashboard) ===\n",
        output.settings.variant.title(),
        output.settings.variant.label()
    ));
    out.push_str(&format!(
        "Location: lat {:.4}, lon {:.4}\n",
        p.location.lat, p.location.lon
    ));
    out.push_str(&format!("Land Status: {} / {}\n", p.land_type, p.soil_condition));
    out.push_str(&format!("Soil pH: {:.1}\n", p.soil_ph));
    out.push_str(&format!("Seed Quality: {}\n", p.seed_quality));
    out.push_str(&format!("Water Security: {} ({})\n", p.water_level, p.water_source));
    out.push_str(&format!("Resources: {} labor, {}\n", p.labor, p.equipment_label()));
    out.push_str(&format!("Weather: {}\n", p.weather));

    out.push('\n');
    out.push_str(&format_status(&output.status));
    out
}

/// Status headline plus one bullet per issue.
pub fn format_status(status: &FieldStatus) -> String {
    let mut out = String::new();
    out.push_str(status.headline());
    out.push('\n');
    if let FieldStatus::Critical(issues) = status {
        for issue in issues {
            out.push_str(&format!("- {}\n", issue.display_name()));
        }
    }
    out
}

/// Base, fired adjustments and the final estimate.
pub fn format_breakdown(breakdown: &YieldBreakdown) -> String {
    let mut out = String::new();
    out.push_str("Predicted yield:\n");
    out.push_str(&format!("  {:<28} {:>8.2}\n", "base", breakdown.base));
    for adj in &breakdown.applied {
        out.push_str(&format!("  {:<28} {:>+8.2}\n", adj.name, adj.delta));
    }
    out.push_str(&format!("  {:-<28} {:->8}\n", "", ""));
    if breakdown.clamped {
        out.push_str(&format!("  {:<28} {:>8.2}\n", "raw total", breakdown.raw));
        out.push_str(&format!("  {:<28} {:>8.2} q/acre\n", "estimate (clamped at 0)", breakdown.value));
    } else {
        out.push_str(&format!("  {:<28} {:>8.2} q/acre\n", "estimate", breakdown.value));
    }
    out
}

/// Season-by-season table; the current prediction is starred.
pub fn format_series_table(series: &YieldSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8} {:>10}\n", "season", "q/acre"));
    out.push_str(&format!("{:-<8} {:-<10}\n", "", ""));
    let last = series.len().saturating_sub(1);
    for (i, p) in series.points().iter().enumerate() {
        let marker = if i == last { " *" } else { "" };
        out.push_str(&format!("{:<8} {:>10.2}{marker}\n", truncate(&p.label, 8), p.value));
    }
    out
}

/// Improvement-vs-yield table for the sensitivity curve.
pub fn format_curve_table(curve: &SensitivityCurve) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>14} {:>10}\n", "improvement %", "q/acre"));
    out.push_str(&format!("{:->14} {:->10}\n", "", ""));
    for p in &curve.points {
        out.push_str(&format!("{:>14.1} {:>10.2}\n", p.x, p.y));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::analyze;
    use crate::domain::{FarmProfile, SeedQuality, SoilCondition, Variant};
    use crate::estimator::{EstimatorSettings, sensitivity_curve};

    #[test]
    fn breakdown_lists_terms_and_total() {
        let mut profile = FarmProfile::default_for(Variant::Classic);
        profile.soil_condition = SoilCondition::Excellent;
        profile.seed_quality = SeedQuality::CertifiedElite;
        let output = analyze(&profile, &EstimatorSettings::new(Variant::Classic), 2026).unwrap();

        let txt = format_breakdown(&output.breakdown);
        assert!(txt.contains("Excellent soil"));
        assert!(txt.contains("+3.50"));
        assert!(txt.contains("Certified Elite seed"));
        assert!(txt.contains("22.50 q/acre"));
    }

    #[test]
    fn summary_flags_critical_fields() {
        let mut profile = FarmProfile::default();
        profile.pest_observed = true;
        let output = analyze(&profile, &EstimatorSettings::default(), 2026).unwrap();

        let txt = format_summary(&output);
        assert!(txt.contains("Land Status: Flat / Healthy"));
        assert!(txt.contains("Resources: 10 labor, Tractor\n"));
        assert!(txt.contains("Critical Issues Detected"));
        assert!(txt.contains("- Pest activity observed"));
    }

    #[test]
    fn curve_table_golden() {
        let curve = sensitivity_curve(20.0);
        let txt = format_curve_table(&curve);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[2], "           0.0      20.00");
        assert_eq!(lines[11], "         100.0      30.00");
    }

    #[test]
    fn series_table_stars_current_season() {
        let output = analyze(&FarmProfile::default(), &EstimatorSettings::default(), 2026).unwrap();
        let txt = format_series_table(&output.series);
        assert!(txt.contains("2025          12.00\n"));
        assert!(txt.contains("2026           0.00 *\n"));
    }
}

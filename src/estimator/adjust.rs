//! The adjustment table and the scoring function.

use serde::Serialize;

use crate::domain::{FarmProfile, SeedQuality, SoilCondition, Variant};
use crate::estimator::EstimatorSettings;

/// One additive term of the estimate.
#[derive(Debug, Clone, Copy)]
pub struct Adjustment {
    pub name: &'static str,
    /// Change in q/acre when the predicate holds.
    pub delta: f64,
    pub applies: fn(&FarmProfile) -> bool,
}

/// All adjustments, in report order. Order does not affect the total.
pub const ADJUSTMENTS: [Adjustment; 4] = [
    Adjustment {
        name: "Excellent soil",
        delta: 3.5,
        applies: soil_is_excellent,
    },
    Adjustment {
        name: "Certified Elite seed",
        delta: 4.0,
        applies: seed_is_certified_elite,
    },
    Adjustment {
        name: "Damaged/Discolored seed",
        delta: -6.0,
        applies: seed_is_damaged,
    },
    Adjustment {
        name: "Pest activity",
        delta: -5.0,
        applies: pest_observed,
    },
];

fn soil_is_excellent(p: &FarmProfile) -> bool {
    p.soil_condition == SoilCondition::Excellent
}

fn seed_is_certified_elite(p: &FarmProfile) -> bool {
    p.seed_quality == SeedQuality::CertifiedElite
}

fn seed_is_damaged(p: &FarmProfile) -> bool {
    p.seed_quality == SeedQuality::DamagedDiscolored
}

fn pest_observed(p: &FarmProfile) -> bool {
    p.pest_observed
}

/// An adjustment that fired for a given profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedAdjustment {
    pub name: &'static str,
    pub delta: f64,
}

/// How an estimate was assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldBreakdown {
    pub variant: Variant,
    pub base: f64,
    pub applied: Vec<AppliedAdjustment>,
    /// `base + sum(applied)`, before any clamping.
    pub raw: f64,
    /// The reported estimate.
    pub value: f64,
    /// True when clamping changed the value.
    pub clamped: bool,
}

/// Sum `base` and `deltas`. Pulled out so callers can check commutativity.
pub fn total(base: f64, deltas: impl IntoIterator<Item = f64>) -> f64 {
    deltas.into_iter().fold(base, |acc, d| acc + d)
}

/// Score `profile` and keep the list of adjustments that fired.
pub fn breakdown(profile: &FarmProfile, settings: &EstimatorSettings) -> YieldBreakdown {
    let base = settings.variant.base_yield();
    let applied: Vec<AppliedAdjustment> = ADJUSTMENTS
        .iter()
        .filter(|adj| (adj.applies)(profile))
        .map(|adj| AppliedAdjustment {
            name: adj.name,
            delta: adj.delta,
        })
        .collect();

    let raw = total(base, applied.iter().map(|a| a.delta));
    let (value, clamped) = if settings.clamp_at_zero && raw < 0.0 {
        (0.0, true)
    } else {
        (raw, false)
    };

    tracing::debug!(
        variant = %settings.variant,
        base,
        raw,
        value,
        adjustments = applied.len(),
        "estimated yield"
    );

    YieldBreakdown {
        variant: settings.variant,
        base,
        applied,
        raw,
        value,
        clamped,
    }
}

/// Predicted yield in q/acre.
pub fn estimate(profile: &FarmProfile, settings: &EstimatorSettings) -> f64 {
    breakdown(profile, settings).value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Choice;

    fn classic() -> (FarmProfile, EstimatorSettings) {
        (
            FarmProfile::default_for(Variant::Classic),
            EstimatorSettings::new(Variant::Classic),
        )
    }

    #[test]
    fn excellent_soil_and_elite_seed_without_pests() {
        let (mut profile, settings) = classic();
        profile.soil_condition = SoilCondition::Excellent;
        profile.seed_quality = SeedQuality::CertifiedElite;
        profile.pest_observed = false;
        assert!((estimate(&profile, &settings) - 22.5).abs() < 1e-12);
    }

    #[test]
    fn damaged_seed_with_pests() {
        let (mut profile, settings) = classic();
        profile.soil_condition = SoilCondition::Average;
        profile.seed_quality = SeedQuality::DamagedDiscolored;
        profile.pest_observed = true;
        assert!((estimate(&profile, &settings) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn estimate_is_deterministic() {
        let (mut profile, settings) = classic();
        profile.pest_observed = true;
        let a = estimate(&profile, &settings);
        let b = estimate(&profile.clone(), &settings);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn damaged_seed_costs_exactly_six() {
        for &variant in Variant::ALL {
            let settings = EstimatorSettings::new(variant);
            for &seed in variant.seed_choices() {
                if seed == SeedQuality::DamagedDiscolored {
                    continue;
                }
                for &soil in variant.soil_choices() {
                    for pest in [false, true] {
                        let mut before = FarmProfile::default_for(variant);
                        before.soil_condition = soil;
                        before.seed_quality = seed;
                        before.pest_observed = pest;
                        let mut after = before.clone();
                        after.seed_quality = SeedQuality::DamagedDiscolored;

                        let base_delta = if seed == SeedQuality::CertifiedElite { 4.0 } else { 0.0 };
                        let drop = estimate(&before, &settings) - estimate(&after, &settings);
                        assert!(
                            (drop - 6.0 - base_delta).abs() < 1e-12,
                            "{variant} {soil} {seed} pest={pest}: drop {drop}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn pests_cost_exactly_five() {
        for &variant in Variant::ALL {
            let settings = EstimatorSettings::new(variant);
            for &seed in variant.seed_choices() {
                for &soil in variant.soil_choices() {
                    let mut clean = FarmProfile::default_for(variant);
                    clean.soil_condition = soil;
                    clean.seed_quality = seed;
                    let mut infested = clean.clone();
                    infested.pest_observed = true;
                    let drop = estimate(&clean, &settings) - estimate(&infested, &settings);
                    assert!((drop - 5.0).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn adjustments_commute() {
        let deltas: Vec<f64> = ADJUSTMENTS.iter().map(|a| a.delta).collect();
        let forward = total(15.0, deltas.iter().copied());
        let backward = total(15.0, deltas.iter().rev().copied());
        let shuffled = total(15.0, [deltas[2], deltas[0], deltas[3], deltas[1]]);
        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
        assert!((forward - 11.5).abs() < 1e-12);
    }

    #[test]
    fn lifecycle_can_go_negative_unless_clamped() {
        let mut profile = FarmProfile::default_for(Variant::Lifecycle);
        profile.seed_quality = SeedQuality::DamagedDiscolored;
        profile.pest_observed = true;

        let mut settings = EstimatorSettings::new(Variant::Lifecycle);
        let raw = breakdown(&profile, &settings);
        assert!((raw.value + 11.0).abs() < 1e-12);
        assert!(!raw.clamped);

        settings.clamp_at_zero = true;
        let clamped = breakdown(&profile, &settings);
        assert_eq!(clamped.value, 0.0);
        assert!((clamped.raw + 11.0).abs() < 1e-12);
        assert!(clamped.clamped);
    }

    #[test]
    fn breakdown_lists_fired_adjustments_in_order() {
        let (mut profile, settings) = classic();
        profile.soil_condition = SoilCondition::Excellent;
        profile.pest_observed = true;
        let names: Vec<&str> = breakdown(&profile, &settings)
            .applied
            .iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Excellent soil", "Pest activity"]);
    }
}

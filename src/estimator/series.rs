//! Year-by-year yield trend for the first chart.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::FarmProfile;

/// Most past seasons shown before the current prediction.
pub const MAX_HISTORY_POINTS: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldPoint {
    pub label: String,
    /// Quintals per acre.
    pub value: f64,
}

/// Ordered `(label, value)` pairs; the last point is the current prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldSeries {
    points: Vec<YieldPoint>,
}

impl YieldSeries {
    /// Build the trend for `season`.
    ///
    /// Past seasons come from `profile.yield_history` (later entries win on
    /// duplicate years, seasons at or after `season` are ignored). With no
    /// usable history, the single `yield_record` is shown for the previous
    /// season.
    pub fn build(profile: &FarmProfile, season: i32, current: f64) -> Self {
        let mut past: BTreeMap<i32, f64> = BTreeMap::new();
        for entry in &profile.yield_history {
            if entry.year < season {
                past.insert(entry.year, entry.value);
            }
        }
        if past.is_empty() {
            past.insert(season - 1, profile.yield_record);
        }

        let skip = past.len().saturating_sub(MAX_HISTORY_POINTS);
        let mut points: Vec<YieldPoint> = past
            .into_iter()
            .skip(skip)
            .map(|(year, value)| YieldPoint {
                label: year.to_string(),
                value,
            })
            .collect();
        points.push(YieldPoint {
            label: season.to_string(),
            value: current,
        });

        Self { points }
    }

    pub fn points(&self) -> &[YieldPoint] {
        &self.points
    }

    /// The prediction for the current season.
    pub fn current(&self) -> Option<&YieldPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as `(index, value)` pairs for plotting.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearYield;

    #[test]
    fn falls_back_to_yield_record() {
        let profile = FarmProfile::default();
        let series = YieldSeries::build(&profile, 2026, 22.5);
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].label, "2025");
        assert_eq!(series.points()[0].value, 12.0);
        let current = series.current().unwrap();
        assert_eq!(current.label, "2026");
        assert_eq!(current.value, 22.5);
    }

    #[test]
    fn history_is_sorted_deduplicated_and_capped() {
        let mut profile = FarmProfile::default();
        profile.yield_history = (2010..2024)
            .rev()
            .map(|year| YearYield { year, value: 10.0 })
            .collect();
        profile.yield_history.push(YearYield { year: 2023, value: 14.0 });
        profile.yield_history.push(YearYield { year: 2030, value: 99.0 });

        let series = YieldSeries::build(&profile, 2024, 18.0);
        assert_eq!(series.len(), MAX_HISTORY_POINTS + 1);
        let labels: Vec<&str> = series.points().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"2015"));
        assert_eq!(labels[labels.len() - 2], "2023");
        assert_eq!(series.points()[labels.len() - 2].value, 14.0);
        assert_eq!(series.current().unwrap().label, "2024");
    }
}

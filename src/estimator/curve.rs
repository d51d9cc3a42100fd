//! Sensitivity curve for the second chart.
//!
//! `y = current * (1 + x / 200)` sampled at evenly spaced `x` over `[0, 100]`.
//! This is a display artifact; it does not re-run the estimator.

use serde::Serialize;

/// Number of samples on the curve.
pub const SENSITIVITY_SAMPLES: usize = 10;
/// Input-improvement range (percent) covered by the curve.
pub const SENSITIVITY_RANGE: (f64, f64) = (0.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensitivityPoint {
    /// Input improvement, percent.
    pub x: f64,
    /// Projected yield, q/acre.
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityCurve {
    pub points: Vec<SensitivityPoint>,
}

impl SensitivityCurve {
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.y)).collect()
    }
}

/// Projected yield at input improvement `x` (percent).
pub fn sensitivity_at(current: f64, x: f64) -> f64 {
    current * (1.0 + x / 200.0)
}

/// Sample the curve over `SENSITIVITY_RANGE`.
pub fn sensitivity_curve(current: f64) -> SensitivityCurve {
    let (start, end) = SENSITIVITY_RANGE;
    let n = SENSITIVITY_SAMPLES;
    let points = (0..n)
        .map(|i| {
            // Multiply before dividing so the last sample lands exactly on `end`.
            let x = start + (end - start) * i as f64 / (n - 1) as f64;
            SensitivityPoint {
                x,
                y: sensitivity_at(current, x),
            }
        })
        .collect();
    SensitivityCurve { points }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_improvement_is_one_and_a_half() {
        assert!((sensitivity_at(22.5, 100.0) - 33.75).abs() < 1e-12);
    }

    #[test]
    fn curve_spans_range_with_ten_samples() {
        let curve = sensitivity_curve(22.5);
        assert_eq!(curve.points.len(), SENSITIVITY_SAMPLES);
        assert_eq!(curve.points[0].x, 0.0);
        assert_eq!(curve.points[0].y, 22.5);
        let last = curve.points.last().unwrap();
        assert_eq!(last.x, 100.0);
        assert!((last.y - 33.75).abs() < 1e-12);
        assert!(curve.points.windows(2).all(|w| w[1].x > w[0].x));
    }

    #[test]
    fn negative_yield_slopes_down() {
        let curve = sensitivity_curve(-4.0);
        assert!(curve.points.windows(2).all(|w| w[1].y < w[0].y));
    }
}

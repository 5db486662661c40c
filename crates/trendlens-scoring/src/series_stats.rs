//! Series statistics: slope, acceleration, consistency, and breadth.
//!
//! Pure functions over a chronological list of interest values. Each
//! returns a sub-score bounded to the composition mode's range
//! (0-100 averaged, 0-25 additive). Short series degrade to defined
//! defaults rather than failing.
//!
//! Regression runs against sample index, not date, so sample spacing is
//! assumed uniform.
//!
//! The scales and the dispersion ceiling are calibrated on a 0-100 interest
//! index. Callers holding raw search volumes run the timeline through
//! [`to_interest_index`] first so the same shape scores the same either way.

use trendlens_core::defaults::{
    ACCELERATION_SCALE, BREADTH_REGION_CEILING, CONSISTENCY_DISPERSION_CEILING,
    INTEREST_INDEX_MAX, MIN_POINTS_ACCELERATION, MIN_POINTS_CONSISTENCY, MIN_POINTS_SLOPE, SLOPE_SCALE,
    TREND_MIDPOINT,
};
use trendlens_core::{CompositionMode, Series};

/// Rescale a timeline onto the 0-100 interest index.
///
/// Values already within the index are returned unchanged. A timeline whose
/// finite peak exceeds the index maximum is treated as raw volume and scaled
/// so the peak maps to 100.
pub fn to_interest_index(values: &[f64]) -> Vec<f64> {
    let peak = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);

    if peak <= INTEREST_INDEX_MAX {
        return values.to_vec();
    }
    let factor = INTEREST_INDEX_MAX / peak;
    values.iter().map(|v| v * factor).collect()
}

/// Ordinary least-squares slope of `values` against their index.
///
/// Returns 0.0 for fewer than two points.
pub fn raw_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < MIN_POINTS_SLOPE {
        return 0.0;
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n_f;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Slope of the second half minus slope of the first half.
///
/// The split point is `floor(n / 2)`. Returns 0.0 for fewer than four points.
pub fn raw_acceleration(values: &[f64]) -> f64 {
    if values.len() < MIN_POINTS_ACCELERATION {
        return 0.0;
    }
    let (first, second) = values.split_at(values.len() / 2);
    raw_slope(second) - raw_slope(first)
}

/// Population standard deviation of `values`.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Affine map centred on the midpoint, clamped to 0-100, then rescaled to the mode.
fn trend_sub_score(raw: f64, scale: f64, mode: CompositionMode) -> f64 {
    let averaged = (TREND_MIDPOINT + raw * scale).clamp(0.0, 100.0);
    averaged * mode.max_sub_score() / 100.0
}

/// Slope sub-score. Zero for fewer than two points.
pub fn slope(values: &[f64], mode: CompositionMode) -> f64 {
    if values.len() < MIN_POINTS_SLOPE {
        return 0.0;
    }
    trend_sub_score(raw_slope(values), SLOPE_SCALE, mode)
}

/// Acceleration sub-score. Zero for fewer than four points.
pub fn acceleration(values: &[f64], mode: CompositionMode) -> f64 {
    if values.len() < MIN_POINTS_ACCELERATION {
        return 0.0;
    }
    trend_sub_score(raw_acceleration(values), ACCELERATION_SCALE, mode)
}

/// Consistency sub-score: maximal for zero dispersion, zero at the ceiling.
///
/// Series shorter than three points get the mode's neutral default.
pub fn consistency(values: &[f64], mode: CompositionMode) -> f64 {
    if values.len() < MIN_POINTS_CONSISTENCY {
        return mode.consistency_default();
    }
    let std_dev = population_std_dev(values);
    let ratio = (1.0 - std_dev / CONSISTENCY_DISPERSION_CEILING).clamp(0.0, 1.0);
    ratio * mode.max_sub_score()
}

/// Breadth sub-score from distinct regions with positive interest.
///
/// Counts regions across every sample of the query, not just the timeline.
pub fn breadth(series: &Series, mode: CompositionMode) -> f64 {
    let regions = series.regions_with_interest().len();
    let ratio = (regions as f64 / BREADTH_REGION_CEILING as f64).clamp(0.0, 1.0);
    ratio * mode.max_sub_score()
}

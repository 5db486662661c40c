//! Log-scale normalization of positive metrics into 0-100.
//!
//! Search volume and bid prices are heavy-tailed, so values are compressed
//! with `ln(1 + x)` before min-max scaling against the batch population.

use serde::{Deserialize, Serialize};

/// Min/max of the valid (finite, positive) values in a population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationBounds {
    pub min: f64,
    pub max: f64,
}

impl PopulationBounds {
    /// Compute bounds over finite, positive values.
    ///
    /// Returns `None` when the population has no valid values.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite() && *v > 0.0)
            .fold(None, |bounds, v| match bounds {
                None => Some(Self { min: v, max: v }),
                Some(b) => Some(Self {
                    min: b.min.min(v),
                    max: b.max.max(v),
                }),
            })
    }

    /// Normalize a value against these bounds.
    pub fn normalize(&self, value: f64) -> u8 {
        log_scale_normalize(value, self.min, self.max)
    }
}

/// Map `value` into 0-100 using log-compressed `[min, max]` bounds.
///
/// - Non-finite or non-positive values map to 0.
/// - A degenerate population (`max <= min`) maps every valid value to 100.
/// - Values outside the bounds are clamped.
pub fn log_scale_normalize(value: f64, min: f64, max: f64) -> u8 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    if max <= min {
        return 100;
    }

    let lo = min.ln_1p();
    let hi = max.ln_1p();
    let ratio = ((value.ln_1p() - lo) / (hi - lo)).clamp(0.0, 1.0);
    (100.0 * ratio).round() as u8
}

/// Normalize an optional value against optional bounds.
///
/// Absent values and populations without valid values both score 0.
pub fn normalize_optional(value: Option<f64>, bounds: Option<PopulationBounds>) -> u8 {
    match (value, bounds) {
        (Some(v), Some(b)) => b.normalize(v),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bounds() {
        assert_eq!(log_scale_normalize(10.0, 10.0, 1000.0), 0);
        assert_eq!(log_scale_normalize(1000.0, 10.0, 1000.0), 100);
    }

    #[test]
    fn test_normalize_is_log_scaled() {
        // ln(101) is roughly halfway between ln(1) and ln(10001)
        let mid = log_scale_normalize(100.0, 0.0001, 10_000.0);
        assert!((49..=51).contains(&mid), "got {}", mid);
    }

    #[test]
    fn test_normalize_clamps_outside_population() {
        assert_eq!(log_scale_normalize(5.0, 10.0, 1000.0), 0);
        assert_eq!(log_scale_normalize(50_000.0, 10.0, 1000.0), 100);
    }

    #[test]
    fn test_normalize_invalid_values_are_zero() {
        assert_eq!(log_scale_normalize(0.0, 1.0, 100.0), 0);
        assert_eq!(log_scale_normalize(-3.0, 1.0, 100.0), 0);
        assert_eq!(log_scale_normalize(f64::NAN, 1.0, 100.0), 0);
        assert_eq!(log_scale_normalize(f64::INFINITY, 1.0, 100.0), 0);
    }

    #[test]
    fn test_normalize_degenerate_population_is_max() {
        assert_eq!(log_scale_normalize(42.0, 42.0, 42.0), 100);
        assert_eq!(log_scale_normalize(1.0, 500.0, 10.0), 100);
        // Invalid values still score zero
        assert_eq!(log_scale_normalize(0.0, 42.0, 42.0), 0);
    }

    #[test]
    fn test_bounds_skip_invalid_values() {
        let bounds =
            PopulationBounds::from_values(vec![0.0, -1.0, f64::NAN, 30.0, 5.0, f64::INFINITY, 800.0])
                .unwrap();
        assert_eq!(bounds.min, 5.0);
        assert_eq!(bounds.max, 800.0);
    }

    #[test]
    fn test_bounds_none_without_valid_values() {
        assert!(PopulationBounds::from_values(vec![0.0, -5.0, f64::NAN]).is_none());
        assert!(PopulationBounds::from_values(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_single_value_population_is_degenerate() {
        let bounds = PopulationBounds::from_values(vec![250.0]).unwrap();
        assert_eq!(bounds.normalize(250.0), 100);
    }

    #[test]
    fn test_normalize_optional() {
        let bounds = PopulationBounds::from_values(vec![10.0, 1000.0]);
        assert_eq!(normalize_optional(None, bounds), 0);
        assert_eq!(normalize_optional(Some(1000.0), None), 0);
        assert_eq!(normalize_optional(Some(1000.0), bounds), 100);
    }

    #[test]
    fn test_bounds_serialization() {
        let bounds = PopulationBounds { min: 1.5, max: 9.0 };
        let json = serde_json::to_string(&bounds).unwrap();
        let back: PopulationBounds = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bounds);
    }
}

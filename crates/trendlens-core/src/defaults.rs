//! Centralized default constants for the trendlens system.
//!
//! **This module is the single source of truth** for the fixed design
//! constants used by scoring, blending, and clustering. Crates reference
//! these constants instead of defining their own magic numbers.
//!
//! Sub-score constants are expressed on the 0-100 ("averaged") scale.
//! Additive composition rescales them to 0-25.

// =============================================================================
// SERIES WINDOW
// =============================================================================

/// Interest-over-time window fetched for each query, in days.
pub const SERIES_WINDOW_DAYS: u32 = 90;

// =============================================================================
// SERIES STATISTICS
// =============================================================================

/// Minimum samples for a regression slope.
pub const MIN_POINTS_SLOPE: usize = 2;

/// Minimum samples for acceleration (each half needs two points).
pub const MIN_POINTS_ACCELERATION: usize = 4;

/// Minimum samples for a dispersion-based consistency score.
pub const MIN_POINTS_CONSISTENCY: usize = 3;

/// Peak of the relative interest index the trend statistics are calibrated on.
///
/// Timelines peaking above this are raw volumes and are rescaled so their
/// peak equals it.
pub const INTEREST_INDEX_MAX: f64 = 100.0;

/// Sub-score assigned to a flat slope or zero acceleration.
pub const TREND_MIDPOINT: f64 = 50.0;

/// Sub-score points per unit of raw slope (index points per sample).
pub const SLOPE_SCALE: f64 = 10.0;

/// Sub-score points per unit of raw acceleration (slope delta between halves).
pub const ACCELERATION_SCALE: f64 = 20.0;

/// Population standard deviation (on the 0-100 index) at or above which consistency is zero.
pub const CONSISTENCY_DISPERSION_CEILING: f64 = 50.0;

/// Consistency for series shorter than [`MIN_POINTS_CONSISTENCY`] in averaged mode.
pub const CONSISTENCY_DEFAULT_AVERAGED: f64 = 50.0;

/// Consistency for series shorter than [`MIN_POINTS_CONSISTENCY`] in additive mode.
pub const CONSISTENCY_DEFAULT_ADDITIVE: f64 = 0.0;

/// Number of regions that earns the full breadth sub-score.
pub const BREADTH_REGION_CEILING: usize = 20;

// =============================================================================
// MOMENTUM CLASSIFICATION
// =============================================================================

/// Lowest score classified as a breakout.
pub const BREAKOUT_THRESHOLD: u8 = 80;

/// Lowest score classified as growing.
pub const GROWING_THRESHOLD: u8 = 60;

/// Lowest score classified as stable. Anything below is declining.
pub const STABLE_THRESHOLD: u8 = 40;

// =============================================================================
// OPPORTUNITY BLENDING
// =============================================================================

/// Ad-platform bids arrive in micro-currency units.
pub const MICROS_PER_CURRENCY_UNIT: f64 = 1_000_000.0;

/// Demand weight in the opportunity score.
pub const OPPORTUNITY_DEMAND_WEIGHT: f64 = 0.45;

/// Momentum weight in the opportunity score.
pub const OPPORTUNITY_MOMENTUM_WEIGHT: f64 = 0.35;

/// CPC weight in the opportunity score (high cost signals commercial intent).
pub const OPPORTUNITY_CPC_WEIGHT: f64 = 0.20;

/// Demand weight in the efficiency score.
pub const EFFICIENCY_DEMAND_WEIGHT: f64 = 0.55;

/// Momentum weight in the efficiency score.
pub const EFFICIENCY_MOMENTUM_WEIGHT: f64 = 0.45;

/// CPC penalty in the efficiency score (subtracted).
pub const EFFICIENCY_CPC_PENALTY: f64 = 0.20;

// =============================================================================
// CLUSTERING
// =============================================================================

/// Mean similarity a query needs to join an existing cluster.
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Bonus per matching dimension tag (stage, function, pain, asset).
pub const DIMENSION_MATCH_BONUS: f64 = 0.2;

/// Common words must be longer than this to name a cluster.
pub const CLUSTER_NAME_MIN_WORD_LEN: usize = 3;

// =============================================================================
// ENGINE
// =============================================================================

/// Maximum concurrent provider fetches per batch.
pub const MAX_CONCURRENCY: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opportunity_weights_sum_to_one() {
        let sum = OPPORTUNITY_DEMAND_WEIGHT + OPPORTUNITY_MOMENTUM_WEIGHT + OPPORTUNITY_CPC_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_classification_thresholds_ordered() {
        assert!(BREAKOUT_THRESHOLD > GROWING_THRESHOLD);
        assert!(GROWING_THRESHOLD > STABLE_THRESHOLD);
    }

    #[test]
    fn test_minimum_points_ordered() {
        assert!(MIN_POINTS_SLOPE < MIN_POINTS_CONSISTENCY);
        assert!(MIN_POINTS_CONSISTENCY < MIN_POINTS_ACCELERATION);
    }
}

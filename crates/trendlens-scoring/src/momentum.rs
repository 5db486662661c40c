//! Momentum scoring.
//!
//! Combines the four series statistics into a 0-100 composite with a
//! qualitative classification. Two composition modes are supported:
//!
//! | Mode | Sub-score range | Composite |
//! |------|-----------------|-----------|
//! | Averaged | 0-100, unrounded | round(mean of four) |
//! | Additive | 0-25, each rounded | sum of four |
//!
//! Both weight the factors equally; they differ only in rounding at
//! boundary scores. Missing data never fails: an empty series scores 0
//! and classifies as declining.

use tracing::trace;
use uuid::Uuid;

use trendlens_core::{
    CompositionMode, MomentumClassification, MomentumScore, ScoreBreakdown, Series,
};

use crate::series_stats::{acceleration, breadth, consistency, slope, to_interest_index};

/// Scores series with a fixed composition mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentumScorer {
    mode: CompositionMode,
}

impl MomentumScorer {
    pub fn new(mode: CompositionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CompositionMode {
        self.mode
    }

    /// Score one query's series.
    pub fn score(&self, series: &Series) -> MomentumScore {
        score_series(series, self.mode)
    }

    /// Score a batch of series, preserving input order.
    pub fn score_batch(&self, series: &[Series]) -> Vec<MomentumScore> {
        series.iter().map(|s| self.score(s)).collect()
    }
}

/// Compute the four sub-scores for a series.
pub fn breakdown(series: &Series, mode: CompositionMode) -> ScoreBreakdown {
    let values = to_interest_index(&series.timeline());
    let raw = ScoreBreakdown {
        slope: slope(&values, mode),
        acceleration: acceleration(&values, mode),
        consistency: consistency(&values, mode),
        breadth: breadth(series, mode),
    };

    match mode {
        CompositionMode::Averaged => raw,
        CompositionMode::Additive => ScoreBreakdown {
            slope: raw.slope.round(),
            acceleration: raw.acceleration.round(),
            consistency: raw.consistency.round(),
            breadth: raw.breadth.round(),
        },
    }
}

/// Combine sub-scores into the rounded, clamped composite.
pub fn composite(breakdown: &ScoreBreakdown, mode: CompositionMode) -> u8 {
    let sum = breakdown.slope + breakdown.acceleration + breakdown.consistency + breakdown.breadth;
    let total = match mode {
        CompositionMode::Averaged => sum / 4.0,
        CompositionMode::Additive => sum,
    };
    total.round().clamp(0.0, 100.0) as u8
}

/// Score a series under the given mode.
pub fn score_series(series: &Series, mode: CompositionMode) -> MomentumScore {
    if series.is_empty() {
        return empty_score(series.query_id, mode);
    }

    let breakdown = breakdown(series, mode);
    let score = composite(&breakdown, mode);
    let classification = MomentumClassification::from_score(score);

    trace!(
        query_id = %series.query_id,
        sample_count = series.samples.len(),
        slope = breakdown.slope,
        acceleration = breakdown.acceleration,
        consistency = breakdown.consistency,
        breadth = breakdown.breadth,
        momentum_score = score,
        "Momentum scored"
    );

    MomentumScore {
        query_id: series.query_id,
        score,
        breakdown,
        classification,
        mode,
    }
}

/// The default for a query with no interest data.
pub fn empty_score(query_id: Uuid, mode: CompositionMode) -> MomentumScore {
    MomentumScore {
        query_id,
        score: 0,
        breakdown: ScoreBreakdown {
            consistency: mode.consistency_default(),
            ..Default::default()
        },
        classification: MomentumClassification::Declining,
        mode,
    }
}

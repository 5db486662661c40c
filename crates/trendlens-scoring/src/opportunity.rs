//! Opportunity blending.
//!
//! Merges a query's momentum with ad-platform demand and cost into two
//! scores:
//!
//! | Score | Demand | Momentum | CPC |
//! |-------|--------|----------|-----|
//! | Opportunity | 0.45 | 0.35 | +0.20 |
//! | Efficiency | 0.55 | 0.45 | -0.20 |
//!
//! Opportunity rewards high cost as a proxy for commercial intent.
//! Efficiency penalizes it, favouring cheap-to-capture demand. Demand and
//! cost are log-normalized against bounds computed once per batch.

use tracing::debug;
use uuid::Uuid;

use trendlens_core::defaults::{
    EFFICIENCY_CPC_PENALTY, EFFICIENCY_DEMAND_WEIGHT, EFFICIENCY_MOMENTUM_WEIGHT,
    OPPORTUNITY_CPC_WEIGHT, OPPORTUNITY_DEMAND_WEIGHT, OPPORTUNITY_MOMENTUM_WEIGHT,
};
use trendlens_core::{ExternalMarketMetrics, MomentumScore, OpportunityScore, ScoreScope};

use crate::normalize::{normalize_optional, PopulationBounds};

/// Everything known about one query before blending.
#[derive(Debug, Clone)]
pub struct OpportunityInput {
    pub query_id: Uuid,
    pub momentum: Option<MomentumScore>,
    pub metrics: Option<ExternalMarketMetrics>,
}

/// Demand and cost population bounds for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlendBounds {
    pub demand: Option<PopulationBounds>,
    pub cost: Option<PopulationBounds>,
}

impl BlendBounds {
    /// Compute bounds over every query in the batch.
    ///
    /// Must run before any per-query blending.
    pub fn from_inputs(inputs: &[OpportunityInput]) -> Self {
        let metrics = || inputs.iter().filter_map(|i| i.metrics.as_ref());
        Self {
            demand: PopulationBounds::from_values(metrics().filter_map(|m| m.demand())),
            cost: PopulationBounds::from_values(metrics().filter_map(|m| m.cost())),
        }
    }
}

/// Rounded score clamped to 0-100; negative blends floor at 0.
fn clamp100(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Opportunity score from the three normalized components.
pub fn opportunity_score(demand_score: u8, momentum_score: u8, cpc_score: u8) -> u8 {
    clamp100(
        OPPORTUNITY_DEMAND_WEIGHT * demand_score as f64
            + OPPORTUNITY_MOMENTUM_WEIGHT * momentum_score as f64
            + OPPORTUNITY_CPC_WEIGHT * cpc_score as f64,
    )
}

/// Efficiency score from the three normalized components.
pub fn efficiency_score(demand_score: u8, momentum_score: u8, cpc_score: u8) -> u8 {
    clamp100(
        EFFICIENCY_DEMAND_WEIGHT * demand_score as f64
            + EFFICIENCY_MOMENTUM_WEIGHT * momentum_score as f64
            - EFFICIENCY_CPC_PENALTY * cpc_score as f64,
    )
}

/// Blend one query against precomputed batch bounds.
pub fn blend_opportunity(
    input: &OpportunityInput,
    bounds: &BlendBounds,
    scope: &ScoreScope,
) -> OpportunityScore {
    let metrics = input.metrics.as_ref();
    let demand_score = normalize_optional(metrics.and_then(|m| m.demand()), bounds.demand);
    let cpc_score = normalize_optional(metrics.and_then(|m| m.cost()), bounds.cost);

    let (momentum_score, breakdown) = match &input.momentum {
        Some(m) => (m.score, m.breakdown),
        None => (0, Default::default()),
    };

    OpportunityScore {
        query_id: input.query_id,
        scope: scope.clone(),
        opportunity_score: opportunity_score(demand_score, momentum_score, cpc_score),
        efficiency_score: efficiency_score(demand_score, momentum_score, cpc_score),
        demand_score,
        momentum_score,
        cpc_score,
        slope: breakdown.slope,
        acceleration: breakdown.acceleration,
        consistency: breakdown.consistency,
    }
}

/// Blend a whole batch: bounds first, then each query independently.
///
/// Output preserves input order; use [`rank_opportunities`] for presentation.
pub fn blend_batch(inputs: &[OpportunityInput], scope: &ScoreScope) -> Vec<OpportunityScore> {
    let bounds = BlendBounds::from_inputs(inputs);
    debug!(
        query_count = inputs.len(),
        demand_bounds = ?bounds.demand,
        cost_bounds = ?bounds.cost,
        "Blend bounds computed"
    );

    inputs
        .iter()
        .map(|input| blend_opportunity(input, &bounds, scope))
        .collect()
}

/// Stable descending sort on opportunity score; ties keep input order.
pub fn rank_opportunities(scores: &mut [OpportunityScore]) {
    scores.sort_by(|a, b| b.opportunity_score.cmp(&a.opportunity_score));
}

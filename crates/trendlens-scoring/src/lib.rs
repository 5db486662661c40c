//! # trendlens-scoring
//!
//! Trend signal scoring for trendlens.
//!
//! This crate provides:
//! - Series statistics (slope, acceleration, consistency, breadth)
//! - Momentum scoring in averaged or additive composition
//! - Log-scale normalization of heavy-tailed market metrics
//! - Opportunity and efficiency blending of demand, momentum, and cost
//! - Intent-gated greedy clustering of related queries
//! - An async engine wiring injected providers and sinks to the above
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trendlens_scoring::{ScoreScope, ScoringConfig, TrendSignalEngine};
//!
//! let engine = TrendSignalEngine::new(
//!     ScoringConfig::load()?,
//!     Arc::new(trends_client),
//!     Arc::new(keyword_planner),
//!     Arc::new(intent_model),
//!     Arc::new(store),
//! )?;
//!
//! let momentum = engine.score_momentum(&query_ids).await?;
//! let ranked = engine
//!     .score_opportunities(&query_ids, &ScoreScope::default())
//!     .await?;
//! let outcome = engine.recluster(&queries, &stored_clusters).await?;
//! ```

pub mod cluster;
pub mod engine;
pub mod momentum;
pub mod normalize;
pub mod opportunity;
pub mod series_stats;
pub mod similarity;

// Re-export core types
pub use trendlens_core::*;

// Re-export scoring types
pub use cluster::{
    find_duplicate, rank_clusters, ClusterDraft, ClusteringOutcome, SimilarityClusterer,
};
pub use engine::TrendSignalEngine;
pub use momentum::{composite, empty_score, score_series, MomentumScorer};
pub use normalize::{log_scale_normalize, normalize_optional, PopulationBounds};
pub use opportunity::{
    blend_batch, blend_opportunity, efficiency_score, opportunity_score, rank_opportunities,
    BlendBounds, OpportunityInput,
};
pub use similarity::{jaccard, query_similarity, tokenize, QueryProfile};

//! Core data models for trendlens.
//!
//! These types are shared across trendlens crates and represent the
//! in-memory projection of tracked queries, their interest series, and the
//! scores and clusters derived from them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::defaults::{
    BREAKOUT_THRESHOLD, CONSISTENCY_DEFAULT_ADDITIVE, CONSISTENCY_DEFAULT_AVERAGED,
    GROWING_THRESHOLD, MICROS_PER_CURRENCY_UNIT, SERIES_WINDOW_DAYS, STABLE_THRESHOLD,
};

// =============================================================================
// QUERY TYPES
// =============================================================================

/// A tracked search query.
///
/// The dimension tags are free-form and only used as similarity boosters
/// during clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: Uuid,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Query {
    /// Create an untagged query with a fresh time-ordered id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            text: text.into(),
            stage: None,
            function: None,
            pain: None,
            asset: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn with_pain(mut self, pain: impl Into<String>) -> Self {
        self.pain = Some(pain.into());
        self
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// The four optional dimension tags in a fixed order.
    pub fn dimensions(&self) -> [Option<&str>; 4] {
        [
            self.stage.as_deref(),
            self.function.as_deref(),
            self.pain.as_deref(),
            self.asset.as_deref(),
        ]
    }
}

// =============================================================================
// SERIES TYPES
// =============================================================================

/// One interest observation. `value` is non-negative but not bounded to
/// 0-100; it may be a raw volume or a normalized index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestSample {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl InterestSample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value,
            region: None,
        }
    }

    pub fn regional(date: NaiveDate, value: f64, region: impl Into<String>) -> Self {
        Self {
            date,
            value,
            region: Some(region.into()),
        }
    }
}

/// Chronological interest samples for one query within one window.
///
/// Samples must already be ordered by date; duplicates are not removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub query_id: Uuid,
    pub window_days: u32,
    pub samples: Vec<InterestSample>,
}

impl Series {
    pub fn new(query_id: Uuid, samples: Vec<InterestSample>) -> Self {
        Self {
            query_id,
            window_days: SERIES_WINDOW_DAYS,
            samples,
        }
    }

    /// An empty series, used when a provider has no data for a query.
    pub fn empty(query_id: Uuid) -> Self {
        Self::new(query_id, Vec::new())
    }

    /// Values that drive slope, acceleration, and consistency.
    ///
    /// Region-less (global) samples when any exist, otherwise every sample.
    pub fn timeline(&self) -> Vec<f64> {
        let global: Vec<f64> = self
            .samples
            .iter()
            .filter(|s| s.region.is_none())
            .map(|s| s.value)
            .collect();
        if global.is_empty() {
            self.samples.iter().map(|s| s.value).collect()
        } else {
            global
        }
    }

    /// Distinct regions with positive interest anywhere in the series.
    pub fn regions_with_interest(&self) -> BTreeSet<&str> {
        self.samples
            .iter()
            .filter(|s| s.value > 0.0)
            .filter_map(|s| s.region.as_deref())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// =============================================================================
// MOMENTUM TYPES
// =============================================================================

/// How the four sub-scores combine into a composite momentum score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompositionMode {
    /// Each sub-score on 0-100, composite is their unweighted mean.
    #[default]
    Averaged,
    /// Each sub-score on 0-25 and rounded, composite is their sum.
    Additive,
}

impl CompositionMode {
    /// Upper bound of each sub-score in this mode.
    pub fn max_sub_score(&self) -> f64 {
        match self {
            Self::Averaged => 100.0,
            Self::Additive => 25.0,
        }
    }

    /// Consistency assigned when a series is too short to measure dispersion.
    pub fn consistency_default(&self) -> f64 {
        match self {
            Self::Averaged => CONSISTENCY_DEFAULT_AVERAGED,
            Self::Additive => CONSISTENCY_DEFAULT_ADDITIVE,
        }
    }
}

impl std::fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Averaged => write!(f, "averaged"),
            Self::Additive => write!(f, "additive"),
        }
    }
}

impl std::str::FromStr for CompositionMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "averaged" | "average" | "mean" => Ok(Self::Averaged),
            "additive" | "sum" => Ok(Self::Additive),
            _ => Err(format!("Invalid composition mode: {}", s)),
        }
    }
}

/// The four independent momentum sub-scores, each within the mode's range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreBreakdown {
    pub slope: f64,
    pub acceleration: f64,
    pub consistency: f64,
    pub breadth: f64,
}

/// Qualitative momentum tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumClassification {
    Declining,
    Stable,
    Growing,
    Breakout,
}

impl MomentumClassification {
    /// Pure step function of the composite score.
    pub fn from_score(score: u8) -> Self {
        if score >= BREAKOUT_THRESHOLD {
            Self::Breakout
        } else if score >= GROWING_THRESHOLD {
            Self::Growing
        } else if score >= STABLE_THRESHOLD {
            Self::Stable
        } else {
            Self::Declining
        }
    }
}

impl std::fmt::Display for MomentumClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakout => write!(f, "breakout"),
            Self::Growing => write!(f, "growing"),
            Self::Stable => write!(f, "stable"),
            Self::Declining => write!(f, "declining"),
        }
    }
}

impl std::str::FromStr for MomentumClassification {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakout" => Ok(Self::Breakout),
            "growing" => Ok(Self::Growing),
            "stable" => Ok(Self::Stable),
            "declining" => Ok(Self::Declining),
            _ => Err(format!("Invalid momentum classification: {}", s)),
        }
    }
}

/// Composite momentum for one query. Recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumScore {
    pub query_id: Uuid,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub classification: MomentumClassification,
    pub mode: CompositionMode,
}

// =============================================================================
// MARKET / OPPORTUNITY TYPES
// =============================================================================

/// Geography, language, ad network, and window an opportunity row is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreScope {
    pub geo: String,
    pub language: String,
    pub network: String,
    pub window_days: u32,
}

impl ScoreScope {
    pub fn new(
        geo: impl Into<String>,
        language: impl Into<String>,
        network: impl Into<String>,
    ) -> Self {
        Self {
            geo: geo.into(),
            language: language.into(),
            network: network.into(),
            window_days: SERIES_WINDOW_DAYS,
        }
    }
}

impl Default for ScoreScope {
    fn default() -> Self {
        Self::new("US", "en", "google_search")
    }
}

/// Ad-platform demand and cost data for one query within a scope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalMarketMetrics {
    pub query_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_monthly_searches: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_of_page_bid_low_micros: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_of_page_bid_high_micros: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition: Option<String>,
}

impl ExternalMarketMetrics {
    /// Demand indicator: average monthly searches.
    pub fn demand(&self) -> Option<f64> {
        self.avg_monthly_searches.map(|v| v as f64)
    }

    /// Cost indicator: high top-of-page bid in currency units.
    pub fn cost(&self) -> Option<f64> {
        self.top_of_page_bid_high_micros
            .map(|micros| micros as f64 / MICROS_PER_CURRENCY_UNIT)
    }
}

/// Blended opportunity row for one query within one scope.
///
/// `slope`, `acceleration`, and `consistency` pass through from the
/// momentum breakdown; every other score is in 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityScore {
    pub query_id: Uuid,
    pub scope: ScoreScope,
    pub opportunity_score: u8,
    pub efficiency_score: u8,
    pub demand_score: u8,
    pub momentum_score: u8,
    pub cpc_score: u8,
    pub slope: f64,
    pub acceleration: f64,
    pub consistency: f64,
}

// =============================================================================
// INTENT / CLUSTER TYPES
// =============================================================================

/// Classified search intent. Clustering never crosses intent buckets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Pain,
    Tool,
    Transition,
    #[default]
    Education,
}

impl IntentType {
    /// Parse a classifier label, treating unknown labels as `education`.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Suffix used when naming a cluster after a shared word.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pain => "Pain",
            Self::Tool => "Tool",
            Self::Transition => "Transition",
            Self::Education => "Education",
        }
    }

    /// Cluster name used when members share no distinctive word.
    pub fn fallback_cluster_name(&self) -> &'static str {
        match self {
            Self::Pain => "Pain Points",
            Self::Tool => "Tool Searches",
            Self::Transition => "Transition Signals",
            Self::Education => "Learning Topics",
        }
    }
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pain => write!(f, "pain"),
            Self::Tool => write!(f, "tool"),
            Self::Transition => write!(f, "transition"),
            Self::Education => write!(f, "education"),
        }
    }
}

impl std::str::FromStr for IntentType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pain" => Ok(Self::Pain),
            "tool" => Ok(Self::Tool),
            "transition" => Ok(Self::Transition),
            "education" => Ok(Self::Education),
            _ => Err(format!("Invalid intent type: {}", s)),
        }
    }
}

/// Output of the external intent classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub query_id: Uuid,
    pub intent_type: IntentType,
    pub confidence: f32,
}

/// A named group of same-intent queries.
///
/// Clusters from one pass are disjoint. `average_score` is the rounded mean
/// member momentum, recomputed whenever membership changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityCluster {
    pub id: Uuid,
    pub name: String,
    pub intent_type: IntentType,
    pub average_score: u8,
    pub member_query_ids: Vec<Uuid>,
}

impl OpportunityCluster {
    /// True when `members` is exactly this cluster's member set.
    pub fn has_same_members(&self, members: &[Uuid]) -> bool {
        self.member_query_ids.len() == members.len()
            && members.iter().all(|id| self.member_query_ids.contains(id))
            && self.member_query_ids.iter().all(|id| members.contains(id))
    }

    pub fn contains(&self, query_id: &Uuid) -> bool {
        self.member_query_ids.contains(query_id)
    }
}

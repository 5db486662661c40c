//! Collaborator traits for trendlens.
//!
//! The scoring core never fetches or persists anything itself. These traits
//! describe the external collaborators it is handed at construction time,
//! enabling pluggable backends and in-memory test doubles.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// PROVIDER TRAITS
// =============================================================================

/// Source of interest-over-time samples.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetch the ordered samples for a query within the window.
    ///
    /// A query without data should yield an empty series, not an error.
    async fn fetch_series(&self, query_id: Uuid, window_days: u32) -> Result<Series>;
}

/// Source of ad-platform demand and cost metrics.
#[async_trait]
pub trait MarketMetricsProvider: Send + Sync {
    /// Fetch metrics for a query within a scope, if the platform has any.
    async fn fetch_metrics(
        &self,
        query_id: Uuid,
        scope: &ScoreScope,
    ) -> Result<Option<ExternalMarketMetrics>>;
}

/// External intent classifier.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify a query. `None` means unclassified.
    async fn classify(&self, query_id: Uuid) -> Result<Option<IntentClassification>>;
}

// =============================================================================
// PERSISTENCE TRAITS
// =============================================================================

/// Storage collaborator for derived scores and clusters.
///
/// Score writes are keyed by `(query_id, scope)` and overwrite prior rows.
#[async_trait]
pub trait ScoreSink: Send + Sync {
    /// Upsert momentum scores, one row per query.
    async fn upsert_momentum(&self, scores: &[MomentumScore]) -> Result<()>;

    /// Upsert opportunity rows, one per query per scope.
    async fn upsert_opportunities(&self, scores: &[OpportunityScore]) -> Result<()>;

    /// Add newly created clusters alongside the existing set.
    async fn insert_clusters(&self, clusters: &[OpportunityCluster]) -> Result<()>;

    /// Discard every stored cluster and store `clusters` in their place.
    async fn replace_clusters(&self, clusters: &[OpportunityCluster]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::Error;

    struct EmptySeries;

    #[async_trait]
    impl SeriesProvider for EmptySeries {
        async fn fetch_series(&self, query_id: Uuid, _window_days: u32) -> Result<Series> {
            Ok(Series::empty(query_id))
        }
    }

    struct FailingMetrics;

    #[async_trait]
    impl MarketMetricsProvider for FailingMetrics {
        async fn fetch_metrics(
            &self,
            _query_id: Uuid,
            scope: &ScoreScope,
        ) -> Result<Option<ExternalMarketMetrics>> {
            Err(Error::Provider(format!("no metrics for {}", scope.geo)))
        }
    }

    #[tokio::test]
    async fn test_providers_are_object_safe() {
        let series: Arc<dyn SeriesProvider> = Arc::new(EmptySeries);
        let metrics: Arc<dyn MarketMetricsProvider> = Arc::new(FailingMetrics);
        let id = Uuid::new_v4();

        let fetched = series.fetch_series(id, 90).await.unwrap();
        assert_eq!(fetched.query_id, id);
        assert!(fetched.is_empty());

        let err = metrics
            .fetch_metrics(id, &ScoreScope::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("US"));
    }
}

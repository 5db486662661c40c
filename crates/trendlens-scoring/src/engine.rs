//! Async orchestration over injected collaborators.
//!
//! The engine fetches inputs from providers with bounded concurrency,
//! hands them to the pure scoring functions, and persists the results
//! through the sink. It holds no state of its own beyond configuration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use trendlens_core::{
    Error, IntentClassifier, IntentType, MarketMetricsProvider, MomentumScore, OpportunityCluster,
    OpportunityScore, Query, Result, ScoreScope, ScoreSink, ScoringConfig, Series, SeriesProvider,
};

use crate::cluster::{ClusteringOutcome, SimilarityClusterer};
use crate::momentum::MomentumScorer;
use crate::opportunity::{blend_batch, rank_opportunities, OpportunityInput};

/// Scoring and clustering engine.
pub struct TrendSignalEngine {
    config: ScoringConfig,
    series: Arc<dyn SeriesProvider>,
    metrics: Arc<dyn MarketMetricsProvider>,
    intents: Arc<dyn IntentClassifier>,
    sink: Arc<dyn ScoreSink>,
}

impl TrendSignalEngine {
    /// Build an engine, rejecting configurations that fail validation.
    pub fn new(
        config: ScoringConfig,
        series: Arc<dyn SeriesProvider>,
        metrics: Arc<dyn MarketMetricsProvider>,
        intents: Arc<dyn IntentClassifier>,
        sink: Arc<dyn ScoreSink>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::InvalidInput(e.to_string()))?;

        Ok(Self {
            config,
            series,
            metrics,
            intents,
            sink,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn scorer(&self) -> MomentumScorer {
        MomentumScorer::new(self.config.composition_mode)
    }

    fn clusterer(&self) -> SimilarityClusterer {
        SimilarityClusterer::new(self.config.similarity_threshold)
    }

    fn concurrency(&self) -> usize {
        self.config.max_concurrency.max(1)
    }

    /// Fetch series for every id, preserving input order.
    async fn fetch_series(&self, query_ids: &[Uuid], window_days: u32) -> Result<Vec<Series>> {
        stream::iter(query_ids.iter().copied())
            .map(|id| self.series.fetch_series(id, window_days))
            .buffered(self.concurrency())
            .try_collect()
            .await
    }

    /// Fetch and score series over `window_days` without persisting.
    async fn compute_momentum(
        &self,
        query_ids: &[Uuid],
        window_days: u32,
    ) -> Result<Vec<MomentumScore>> {
        let series = self.fetch_series(query_ids, window_days).await?;
        Ok(self.scorer().score_batch(&series))
    }

    /// Classify every query; unclassified queries default to education.
    async fn resolve_intents(&self, query_ids: &[Uuid]) -> Result<HashMap<Uuid, IntentType>> {
        let classifications: Vec<_> = stream::iter(query_ids.iter().copied())
            .map(|id| async move { self.intents.classify(id).await.map(|c| (id, c)) })
            .buffered(self.concurrency())
            .try_collect()
            .await?;

        Ok(classifications
            .into_iter()
            .map(|(id, classification)| {
                let intent = match classification {
                    Some(c) => c.intent_type,
                    None => {
                        debug!(query_id = %id, "No intent classification, defaulting to education");
                        IntentType::default()
                    }
                };
                (id, intent)
            })
            .collect())
    }

    /// Score momentum for each query and upsert the results.
    ///
    /// Returned scores follow input order.
    #[instrument(skip(self, query_ids), fields(
        subsystem = "scoring",
        component = "engine",
        op = "score_momentum",
        query_count = query_ids.len(),
        composition_mode = %self.config.composition_mode,
    ))]
    pub async fn score_momentum(&self, query_ids: &[Uuid]) -> Result<Vec<MomentumScore>> {
        let start = Instant::now();
        if query_ids.is_empty() {
            debug!("No queries to score");
            return Ok(Vec::new());
        }

        let scores = self
            .compute_momentum(query_ids, self.config.window_days)
            .await?;
        self.sink.upsert_momentum(&scores).await?;

        info!(
            result_count = scores.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Momentum scoring completed"
        );
        Ok(scores)
    }

    /// Blend momentum with market metrics for each query in a scope.
    ///
    /// Returned rows are ranked by opportunity score.
    #[instrument(skip(self, query_ids, scope), fields(
        subsystem = "scoring",
        component = "engine",
        op = "score_opportunities",
        query_count = query_ids.len(),
        geo = %scope.geo,
        network = %scope.network,
        window_days = scope.window_days,
    ))]
    pub async fn score_opportunities(
        &self,
        query_ids: &[Uuid],
        scope: &ScoreScope,
    ) -> Result<Vec<OpportunityScore>> {
        let start = Instant::now();
        if query_ids.is_empty() {
            debug!("No queries to blend");
            return Ok(Vec::new());
        }

        // Rows are keyed by scope, so momentum follows the scope's window
        let momentum = self.compute_momentum(query_ids, scope.window_days).await?;
        let metrics: Vec<_> = stream::iter(query_ids.iter().copied())
            .map(|id| self.metrics.fetch_metrics(id, scope))
            .buffered(self.concurrency())
            .try_collect()
            .await?;

        // All inputs are gathered before bounds are computed
        let inputs: Vec<OpportunityInput> = query_ids
            .iter()
            .zip(momentum)
            .zip(metrics)
            .map(|((id, momentum), metrics)| OpportunityInput {
                query_id: *id,
                momentum: Some(momentum),
                metrics,
            })
            .collect();
        let missing_metrics = inputs.iter().filter(|i| i.metrics.is_none()).count();

        let mut scores = blend_batch(&inputs, scope);
        self.sink.upsert_opportunities(&scores).await?;
        rank_opportunities(&mut scores);

        info!(
            result_count = scores.len(),
            missing_metrics,
            duration_ms = start.elapsed().as_millis() as u64,
            "Opportunity scoring completed"
        );
        Ok(scores)
    }

    /// Incremental clustering: group unseen queries and insert new clusters.
    #[instrument(skip(self, queries, existing), fields(
        subsystem = "scoring",
        component = "engine",
        op = "cluster",
        query_count = queries.len(),
        existing_count = existing.len(),
        similarity_threshold = self.config.similarity_threshold,
    ))]
    pub async fn cluster(
        &self,
        queries: &[Query],
        existing: &[OpportunityCluster],
    ) -> Result<ClusteringOutcome> {
        let start = Instant::now();
        let unseen: Vec<Uuid> = queries
            .iter()
            .map(|q| q.id)
            .filter(|id| !existing.iter().any(|c| c.contains(id)))
            .collect();

        if unseen.is_empty() {
            debug!("Every query already belongs to a cluster");
            return Ok(ClusteringOutcome {
                clusters: existing.to_vec(),
                ..Default::default()
            });
        }

        let intents = self.resolve_intents(&unseen).await?;
        let momentum = self.momentum_index(&unseen).await?;

        let outcome = self
            .clusterer()
            .cluster(queries, &intents, &momentum, existing);
        let created = outcome.created_clusters();
        if !created.is_empty() {
            self.sink.insert_clusters(&created).await?;
        }

        info!(
            cluster_count = outcome.clusters.len(),
            created_count = outcome.created.len(),
            reused_count = outcome.reused,
            duration_ms = start.elapsed().as_millis() as u64,
            "Clustering completed"
        );
        Ok(outcome)
    }

    /// Full rebuild of the cluster set from `queries`.
    #[instrument(skip(self, queries, previous), fields(
        subsystem = "scoring",
        component = "engine",
        op = "recluster",
        query_count = queries.len(),
        previous_count = previous.len(),
        similarity_threshold = self.config.similarity_threshold,
    ))]
    pub async fn recluster(
        &self,
        queries: &[Query],
        previous: &[OpportunityCluster],
    ) -> Result<ClusteringOutcome> {
        let start = Instant::now();
        let ids: Vec<Uuid> = queries.iter().map(|q| q.id).collect();

        let intents = self.resolve_intents(&ids).await?;
        let momentum = self.momentum_index(&ids).await?;

        let outcome = self
            .clusterer()
            .recluster(queries, &intents, &momentum, previous);
        self.sink.replace_clusters(&outcome.clusters).await?;

        info!(
            cluster_count = outcome.clusters.len(),
            created_count = outcome.created.len(),
            reused_count = outcome.reused,
            duration_ms = start.elapsed().as_millis() as u64,
            "Reclustering completed"
        );
        Ok(outcome)
    }

    async fn momentum_index(&self, query_ids: &[Uuid]) -> Result<HashMap<Uuid, MomentumScore>> {
        let scores = self
            .compute_momentum(query_ids, self.config.window_days)
            .await?;
        Ok(query_ids.iter().copied().zip(scores).collect())
    }
}

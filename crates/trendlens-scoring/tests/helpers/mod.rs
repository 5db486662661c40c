//! In-memory collaborators for engine integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use trendlens_scoring::{
    Error, ExternalMarketMetrics, IntentClassification, IntentClassifier, IntentType,
    InterestSample, MarketMetricsProvider, MomentumScore, OpportunityCluster, OpportunityScore,
    Result, ScoreScope, ScoreSink, ScoringConfig, Series, SeriesProvider, TrendSignalEngine,
};

/// Install a subscriber once so `RUST_LOG` works while debugging tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Daily global samples starting 2026-01-01.
pub fn daily_series(query_id: Uuid, values: &[f64]) -> Series {
    let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let samples = values
        .iter()
        .enumerate()
        .map(|(i, v)| InterestSample::new(start + Duration::days(i as i64), *v))
        .collect();
    Series::new(query_id, samples)
}

pub fn market_metrics(query_id: Uuid, searches: u64, bid_high_micros: u64) -> ExternalMarketMetrics {
    ExternalMarketMetrics {
        query_id,
        avg_monthly_searches: Some(searches),
        top_of_page_bid_high_micros: Some(bid_high_micros),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct InMemorySeries {
    series: HashMap<Uuid, Series>,
    pub requested_windows: Mutex<Vec<u32>>,
}

impl InMemorySeries {
    pub fn with(mut self, series: Series) -> Self {
        self.series.insert(series.query_id, series);
        self
    }
}

#[async_trait]
impl SeriesProvider for InMemorySeries {
    async fn fetch_series(&self, query_id: Uuid, window_days: u32) -> Result<Series> {
        self.requested_windows.lock().unwrap().push(window_days);
        Ok(self
            .series
            .get(&query_id)
            .cloned()
            .unwrap_or_else(|| Series::empty(query_id)))
    }
}

/// Series provider that fails for one query.
pub struct FailingSeries {
    pub fail_on: Uuid,
}

#[async_trait]
impl SeriesProvider for FailingSeries {
    async fn fetch_series(&self, query_id: Uuid, _window_days: u32) -> Result<Series> {
        if query_id == self.fail_on {
            return Err(Error::Provider("trends backend unavailable".to_string()));
        }
        Ok(Series::empty(query_id))
    }
}

/// Series provider that records how many fetches overlap.
#[derive(Default)]
pub struct ConcurrencyProbe {
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

#[async_trait]
impl SeriesProvider for ConcurrencyProbe {
    async fn fetch_series(&self, query_id: Uuid, _window_days: u32) -> Result<Series> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(Series::empty(query_id))
    }
}

#[derive(Default)]
pub struct InMemoryMetrics {
    metrics: HashMap<Uuid, ExternalMarketMetrics>,
}

impl InMemoryMetrics {
    pub fn with(mut self, metrics: ExternalMarketMetrics) -> Self {
        self.metrics.insert(metrics.query_id, metrics);
        self
    }
}

#[async_trait]
impl MarketMetricsProvider for InMemoryMetrics {
    async fn fetch_metrics(
        &self,
        query_id: Uuid,
        _scope: &ScoreScope,
    ) -> Result<Option<ExternalMarketMetrics>> {
        Ok(self.metrics.get(&query_id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryIntents {
    intents: HashMap<Uuid, IntentType>,
}

impl InMemoryIntents {
    pub fn with(mut self, query_id: Uuid, intent: IntentType) -> Self {
        self.intents.insert(query_id, intent);
        self
    }
}

#[async_trait]
impl IntentClassifier for InMemoryIntents {
    async fn classify(&self, query_id: Uuid) -> Result<Option<IntentClassification>> {
        Ok(self.intents.get(&query_id).map(|intent| IntentClassification {
            query_id,
            intent_type: *intent,
            confidence: 0.9,
        }))
    }
}

/// Sink that keeps everything it is handed.
#[derive(Default)]
pub struct RecordingSink {
    pub momentum: Mutex<Vec<MomentumScore>>,
    pub opportunities: Mutex<Vec<OpportunityScore>>,
    pub clusters: Mutex<Vec<OpportunityCluster>>,
    pub insert_calls: AtomicUsize,
    pub replace_calls: AtomicUsize,
}

impl RecordingSink {
    pub fn stored_clusters(&self) -> Vec<OpportunityCluster> {
        self.clusters.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoreSink for RecordingSink {
    async fn upsert_momentum(&self, scores: &[MomentumScore]) -> Result<()> {
        let mut stored = self.momentum.lock().unwrap();
        for score in scores {
            stored.retain(|s| s.query_id != score.query_id);
            stored.push(score.clone());
        }
        Ok(())
    }

    async fn upsert_opportunities(&self, scores: &[OpportunityScore]) -> Result<()> {
        let mut stored = self.opportunities.lock().unwrap();
        for score in scores {
            stored.retain(|s| !(s.query_id == score.query_id && s.scope == score.scope));
            stored.push(score.clone());
        }
        Ok(())
    }

    async fn insert_clusters(&self, clusters: &[OpportunityCluster]) -> Result<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.clusters.lock().unwrap().extend_from_slice(clusters);
        Ok(())
    }

    async fn replace_clusters(&self, clusters: &[OpportunityCluster]) -> Result<()> {
        self.replace_calls.fetch_add(1, Ordering::SeqCst);
        *self.clusters.lock().unwrap() = clusters.to_vec();
        Ok(())
    }
}

/// Collaborators an engine under test was built from.
pub struct Harness {
    pub engine: TrendSignalEngine,
    pub series: Arc<InMemorySeries>,
    pub sink: Arc<RecordingSink>,
}

pub fn harness(
    config: ScoringConfig,
    series: InMemorySeries,
    metrics: InMemoryMetrics,
    intents: InMemoryIntents,
) -> Harness {
    init_tracing();
    let series = Arc::new(series);
    let sink = Arc::new(RecordingSink::default());
    let engine = TrendSignalEngine::new(
        config,
        series.clone(),
        Arc::new(metrics),
        Arc::new(intents),
        sink.clone(),
    )
    .unwrap();
    Harness {
        engine,
        series,
        sink,
    }
}

//! Intent-gated greedy clustering of related queries.
//!
//! Queries are partitioned by intent; clustering never crosses buckets.
//! Within a bucket, queries are visited in input order and each joins the
//! existing cluster with the highest mean pairwise similarity if that mean
//! reaches the threshold, otherwise it starts a new cluster. The result is
//! order-dependent and not globally optimal.
//!
//! Before a cluster is created, the dedup guard looks for a prior cluster
//! with exactly the same member set and reuses its identity instead.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use trendlens_core::defaults::{CLUSTER_NAME_MIN_WORD_LEN, SIMILARITY_THRESHOLD};
use trendlens_core::{IntentType, MomentumScore, OpportunityCluster, Query};

use crate::similarity::QueryProfile;

/// Result of a clustering pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringOutcome {
    /// Every cluster after the pass
    pub clusters: Vec<OpportunityCluster>,
    /// Ids of clusters created by this pass
    pub created: Vec<Uuid>,
    /// Number of groups that matched a prior cluster exactly
    pub reused: usize,
}

impl ClusteringOutcome {
    /// Clusters created by this pass, in creation order.
    pub fn created_clusters(&self) -> Vec<OpportunityCluster> {
        self.clusters
            .iter()
            .filter(|c| self.created.contains(&c.id))
            .cloned()
            .collect()
    }
}

/// A group of same-intent queries before it is given an identity.
#[derive(Debug, Clone)]
pub struct ClusterDraft<'a> {
    pub intent: IntentType,
    pub members: Vec<QueryProfile<'a>>,
}

impl<'a> ClusterDraft<'a> {
    fn singleton(intent: IntentType, profile: QueryProfile<'a>) -> Self {
        Self {
            intent,
            members: vec![profile],
        }
    }

    /// Mean pairwise similarity between a candidate and every member.
    pub fn mean_similarity(&self, candidate: &QueryProfile<'_>) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .members
            .iter()
            .map(|m| candidate.similarity(m))
            .sum();
        total / self.members.len() as f64
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|m| m.query.id).collect()
    }

    /// First word (longer than three characters) shared by every member,
    /// capitalized and suffixed with the intent label. Falls back to the
    /// intent's fixed name.
    pub fn name(&self) -> String {
        let Some((first, rest)) = self.members.split_first() else {
            return self.intent.fallback_cluster_name().to_string();
        };

        first
            .words
            .iter()
            .filter(|w| w.chars().count() > CLUSTER_NAME_MIN_WORD_LEN)
            .find(|w| rest.iter().all(|m| m.word_set.contains(*w)))
            .map(|w| format!("{} {}", capitalize(w), self.intent.label()))
            .unwrap_or_else(|| self.intent.fallback_cluster_name().to_string())
    }

    /// Rounded mean member momentum; members without a score count as 0.
    pub fn average_score(&self, momentum: &HashMap<Uuid, MomentumScore>) -> u8 {
        if self.members.is_empty() {
            return 0;
        }
        let total: f64 = self
            .members
            .iter()
            .map(|m| momentum.get(&m.query.id).map_or(0.0, |s| s.score as f64))
            .sum();
        (total / self.members.len() as f64).round().clamp(0.0, 100.0) as u8
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Greedy intent-gated clusterer.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityClusterer {
    similarity_threshold: f64,
}

impl Default for SimilarityClusterer {
    fn default() -> Self {
        Self::new(SIMILARITY_THRESHOLD)
    }
}

impl SimilarityClusterer {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    /// Partition by intent, then greedily group each bucket.
    ///
    /// Queries without an intent fall into the default (`education`) bucket.
    /// Drafts are ordered by intent bucket, then creation order.
    pub fn group<'a, I>(
        &self,
        queries: I,
        intents: &HashMap<Uuid, IntentType>,
    ) -> Vec<ClusterDraft<'a>>
    where
        I: IntoIterator<Item = &'a Query>,
    {
        let mut buckets: BTreeMap<IntentType, Vec<QueryProfile<'a>>> = BTreeMap::new();
        for query in queries {
            let intent = intents.get(&query.id).copied().unwrap_or_default();
            buckets
                .entry(intent)
                .or_default()
                .push(QueryProfile::new(query));
        }

        let mut drafts = Vec::new();
        for (intent, profiles) in buckets {
            let mut bucket: Vec<ClusterDraft<'a>> = Vec::new();
            for profile in profiles {
                // Highest mean similarity wins; ties go to the earliest cluster
                let best = bucket
                    .iter()
                    .enumerate()
                    .map(|(idx, draft)| (idx, draft.mean_similarity(&profile)))
                    .fold(None, |best: Option<(usize, f64)>, (idx, sim)| match best {
                        Some((_, best_sim)) if best_sim >= sim => best,
                        _ => Some((idx, sim)),
                    });

                match best {
                    Some((idx, sim)) if sim >= self.similarity_threshold => {
                        bucket[idx].members.push(profile);
                    }
                    _ => bucket.push(ClusterDraft::singleton(intent, profile)),
                }
            }
            debug!(intent = %intent, cluster_count = bucket.len(), "Intent bucket grouped");
            drafts.extend(bucket);
        }
        drafts
    }

    /// Incremental clustering.
    ///
    /// Queries already in an existing cluster are skipped and existing
    /// clusters are returned untouched. Only unseen queries are grouped,
    /// and only among themselves.
    pub fn cluster(
        &self,
        queries: &[Query],
        intents: &HashMap<Uuid, IntentType>,
        momentum: &HashMap<Uuid, MomentumScore>,
        existing: &[OpportunityCluster],
    ) -> ClusteringOutcome {
        let seen: HashSet<Uuid> = existing
            .iter()
            .flat_map(|c| c.member_query_ids.iter().copied())
            .collect();
        let unseen = queries.iter().filter(|q| !seen.contains(&q.id));

        let drafts = self.group(unseen, intents);
        let mut clusters = existing.to_vec();
        let mut created = Vec::new();
        let mut reused = 0;

        for draft in drafts {
            let (cluster, is_reused) = materialize(&draft, existing, momentum);
            if is_reused {
                reused += 1;
            } else {
                created.push(cluster.id);
                clusters.push(cluster);
            }
        }

        ClusteringOutcome {
            clusters,
            created,
            reused,
        }
    }

    /// Full rebuild: every prior cluster is discarded and the batch is
    /// clustered from scratch. Groups identical to a prior cluster keep its id.
    pub fn recluster(
        &self,
        queries: &[Query],
        intents: &HashMap<Uuid, IntentType>,
        momentum: &HashMap<Uuid, MomentumScore>,
        previous: &[OpportunityCluster],
    ) -> ClusteringOutcome {
        let drafts = self.group(queries, intents);
        let mut clusters = Vec::with_capacity(drafts.len());
        let mut created = Vec::new();
        let mut reused = 0;

        for draft in drafts {
            let (cluster, is_reused) = materialize(&draft, previous, momentum);
            if is_reused {
                reused += 1;
            } else {
                created.push(cluster.id);
            }
            clusters.push(cluster);
        }

        ClusteringOutcome {
            clusters,
            created,
            reused,
        }
    }
}

/// Find a prior cluster with exactly the given member set.
pub fn find_duplicate<'c>(
    prior: &'c [OpportunityCluster],
    members: &[Uuid],
) -> Option<&'c OpportunityCluster> {
    prior.iter().find(|c| c.has_same_members(members))
}

/// Give a draft an identity, reusing a prior cluster's id when the member
/// sets match. Name and score are always recomputed.
fn materialize(
    draft: &ClusterDraft<'_>,
    prior: &[OpportunityCluster],
    momentum: &HashMap<Uuid, MomentumScore>,
) -> (OpportunityCluster, bool) {
    let member_query_ids = draft.member_ids();
    let duplicate = find_duplicate(prior, &member_query_ids);
    let id = duplicate.map_or_else(Uuid::now_v7, |c| c.id);

    let cluster = OpportunityCluster {
        id,
        name: draft.name(),
        intent_type: draft.intent,
        average_score: draft.average_score(momentum),
        member_query_ids,
    };

    debug!(
        cluster_id = %cluster.id,
        intent = %cluster.intent_type,
        member_count = cluster.member_query_ids.len(),
        reused = duplicate.is_some(),
        "Cluster materialized"
    );

    (cluster, duplicate.is_some())
}

/// Keep clusters at or above `min_score`, highest aggregate momentum first.
///
/// Ties keep their original order.
pub fn rank_clusters(clusters: &[OpportunityCluster], min_score: u8) -> Vec<OpportunityCluster> {
    let mut ranked: Vec<OpportunityCluster> = clusters
        .iter()
        .filter(|c| c.average_score >= min_score)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| b.average_score.cmp(&a.average_score));
    ranked
}

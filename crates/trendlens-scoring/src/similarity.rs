//! Lexical and dimensional similarity between queries.
//!
//! Similarity is the Jaccard index of lowercase whitespace-split words,
//! plus a fixed bonus for each dimension tag (stage, function, pain, asset)
//! both queries share, capped at 1.0. Intent gating happens in the
//! clusterer; this module assumes both queries share an intent.

use std::collections::BTreeSet;

use trendlens_core::defaults::DIMENSION_MATCH_BONUS;
use trendlens_core::Query;

/// Lowercased unique words in order of first appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Jaccard index of two word sets. Two empty sets score 0.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Pre-tokenized view of a query used during clustering.
#[derive(Debug, Clone)]
pub struct QueryProfile<'a> {
    pub query: &'a Query,
    /// Words in first-appearance order, for naming.
    pub words: Vec<String>,
    pub word_set: BTreeSet<String>,
}

impl<'a> QueryProfile<'a> {
    pub fn new(query: &'a Query) -> Self {
        let words = tokenize(&query.text);
        let word_set = words.iter().cloned().collect();
        Self {
            query,
            words,
            word_set,
        }
    }

    /// Number of dimension tags set on both queries with equal values.
    pub fn matching_dimensions(&self, other: &QueryProfile<'_>) -> usize {
        self.query
            .dimensions()
            .iter()
            .zip(other.query.dimensions().iter())
            .filter(|(a, b)| a.is_some() && a == b)
            .count()
    }

    /// Similarity in [0, 1].
    pub fn similarity(&self, other: &QueryProfile<'_>) -> f64 {
        let lexical = jaccard(&self.word_set, &other.word_set);
        let bonus = DIMENSION_MATCH_BONUS * self.matching_dimensions(other) as f64;
        (lexical + bonus).min(1.0)
    }
}

/// Similarity between two same-intent queries.
pub fn query_similarity(a: &Query, b: &Query) -> f64 {
    QueryProfile::new(a).similarity(&QueryProfile::new(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_tokenize_lowercases_and_dedupes() {
        assert_eq!(
            tokenize("  Cash FLOW cash\tproblems "),
            vec!["cash", "flow", "problems"]
        );
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["a", "b"])), 1.0);
        assert_eq!(jaccard(&set(&["a"]), &set(&["b"])), 0.0);
        assert_eq!(jaccard(&set(&["a", "b", "c"]), &set(&["b", "c", "d"])), 0.5);
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
    }

    #[test]
    fn test_reference_similarity() {
        let a = Query::new("cash flow problems");
        let b = Query::new("cash flow issues");
        assert_eq!(query_similarity(&a, &b), 0.5);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        let a = Query::new("Invoice Software");
        let b = Query::new("invoice software");
        assert_eq!(query_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_dimension_bonus() {
        let a = Query::new("hire first employee")
            .with_stage("early")
            .with_function("hr");
        let b = Query::new("payroll setup")
            .with_stage("early")
            .with_function("hr");
        // No shared words, two matching tags
        assert!((query_similarity(&a, &b) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_bonus_requires_both_set_and_equal() {
        let a = Query::new("alpha").with_stage("early").with_pain("cash");
        let b = Query::new("beta").with_stage("late");
        let pa = QueryProfile::new(&a);
        let pb = QueryProfile::new(&b);
        assert_eq!(pa.matching_dimensions(&pb), 0);
        assert_eq!(pa.similarity(&pb), 0.0);
    }

    #[test]
    fn test_similarity_capped_at_one() {
        let a = Query::new("cash flow")
            .with_stage("s")
            .with_function("f")
            .with_pain("p")
            .with_asset("a");
        let b = a.clone();
        assert_eq!(query_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = Query::new("best crm for startups").with_asset("crm");
        let b = Query::new("crm pricing").with_asset("crm");
        assert_eq!(query_similarity(&a, &b), query_similarity(&b, &a));
    }
}

//! String similarity capability
//!
//! Ranking only depends on [`StringSimilarity`]; the metric behind it is
//! chosen by configuration.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Highest score a pair of different strings may receive
const MAX_NON_IDENTICAL: f64 = 99.99;

/// Character-level similarity between two normalized strings.
///
/// Implementations return a score in `0.0..=100.0`, are symmetric, and give
/// `100.0` only for identical inputs.
pub trait StringSimilarity: Send + Sync {
    fn name(&self) -> &'static str;

    fn similarity(&self, a: &str, b: &str) -> f64;
}

fn bounded(a: &str, b: &str, ratio: f64) -> f64 {
    if a == b {
        100.0
    } else {
        (ratio * 100.0).clamp(0.0, MAX_NON_IDENTICAL)
    }
}

/// Normalized Damerau-Levenshtein similarity
#[derive(Debug, Clone, Copy, Default)]
pub struct DamerauLevenshtein;

impl StringSimilarity for DamerauLevenshtein {
    fn name(&self) -> &'static str {
        "damerau-levenshtein"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        bounded(a, b, strsim::normalized_damerau_levenshtein(a, b))
    }
}

/// Jaro-Winkler similarity, favouring shared prefixes
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl StringSimilarity for JaroWinkler {
    fn name(&self) -> &'static str {
        "jaro-winkler"
    }

    fn similarity(&self, a: &str, b: &str) -> f64 {
        // jaro_winkler's prefix bonus is order sensitive on ties; take the max
        let forward = strsim::jaro_winkler(a, b);
        let backward = strsim::jaro_winkler(b, a);
        bounded(a, b, forward.max(backward))
    }
}

/// Configurable metric selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityKind {
    #[default]
    DamerauLevenshtein,
    JaroWinkler,
}

impl SimilarityKind {
    pub fn build(&self) -> Arc<dyn StringSimilarity> {
        match self {
            Self::DamerauLevenshtein => Arc::new(DamerauLevenshtein),
            Self::JaroWinkler => Arc::new(JaroWinkler),
        }
    }
}

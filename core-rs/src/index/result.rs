/**
 * result.rs
 * Read view over a concept plus per-query scoring metadata
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::text_index::FieldRole;
use crate::ontology::ConceptGraph;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub iri: String,
    /// First preferred label
    pub label: Option<String>,
    pub labels: Vec<String>,
    pub alt_labels: BTreeSet<String>,
    pub hidden_labels: BTreeSet<String>,
    pub definitions: Vec<String>,
    pub parents: BTreeSet<String>,
    pub children: Vec<String>,
    /// 0-100, 100 is best
    pub distance: f64,
    pub exact: bool,
    pub substring: bool,
    /// Which field produced the best score
    pub matched_field: FieldRole,
}

impl SearchResult {
    pub(crate) fn build(graph: &ConceptGraph, slot: usize, score: MatchScore, matched_field: FieldRole) -> Self {
        let concept = graph.concept_at(slot);
        Self {
            iri: concept.iri.clone(),
            label: concept.label().map(str::to_string),
            labels: concept.labels.clone(),
            alt_labels: concept.alt_labels.clone(),
            hidden_labels: concept.hidden_labels.clone(),
            definitions: concept.definitions.clone(),
            parents: concept.parents.clone(),
            children: graph.child_iris(slot).into_iter().map(str::to_string).collect(),
            distance: score.distance,
            exact: score.exact,
            substring: score.substring,
            matched_field,
        }
    }
}

/// Outcome of comparing a query with one indexed string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub exact: bool,
    pub substring: bool,
    pub distance: f64,
}

impl MatchScore {
    /// Rank order: exact, then substring, then distance (all descending)
    pub fn rank_cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .exact
            .cmp(&self.exact)
            .then(other.substring.cmp(&self.substring))
            .then(other.distance.total_cmp(&self.distance))
    }
}

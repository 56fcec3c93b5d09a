//! Text index over concept labels or definitions
//!
//! Scoring, per query entry:
//!
//! - exact: normalized texts are equal, distance 100
//! - substring: one normalized text contains the other, distance
//!   `85 + 14 * shorter/longer` (character counts), rounded, in `[85, 99]`
//! - fuzzy: `similarity * 0.84`, rounded to two decimals, in `[0, 84]`
//!
//! Each concept keeps its best entry. Results are ordered by exact, then
//! substring, then distance (all descending), then IRI ascending.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use super::normalize::normalize;
use super::result::{MatchScore, SearchResult};
use super::similarity::StringSimilarity;
use crate::errors::{LmssError, Result};
use crate::ontology::ConceptGraph;

pub const DEFAULT_NUM_RESULTS: usize = 20;

const SUBSTRING_FLOOR: f64 = 85.0;
const SUBSTRING_SPAN: f64 = 14.0;
const SUBSTRING_CEILING: f64 = 99.0;
const FUZZY_SCALE: f64 = 0.84;

/// Field an index entry was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Label,
    AltLabel,
    HiddenLabel,
    Definition,
}

/// Which concept fields an index covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Labels,
    Definitions,
}

#[derive(Debug, Clone)]
struct IndexEntry {
    slot: usize,
    text: String,
    role: FieldRole,
}

/// Query parameters shared by label and definition searches
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Restrict to this IRI and its descendants
    pub concept_type: Option<String>,
    /// Levels below `concept_type` to include; `None` is the whole subtree
    pub max_depth: Option<usize>,
    pub num_results: usize,
    pub include_alt_labels: bool,
    pub include_hidden_labels: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            concept_type: None,
            max_depth: None,
            num_results: DEFAULT_NUM_RESULTS,
            include_alt_labels: true,
            include_hidden_labels: true,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concept_type(mut self, concept_type: impl Into<String>) -> Self {
        self.concept_type = Some(concept_type.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = num_results;
        self
    }

    pub fn without_alt_labels(mut self) -> Self {
        self.include_alt_labels = false;
        self
    }

    pub fn without_hidden_labels(mut self) -> Self {
        self.include_hidden_labels = false;
        self
    }

    fn includes(&self, role: FieldRole) -> bool {
        match role {
            FieldRole::AltLabel => self.include_alt_labels,
            FieldRole::HiddenLabel => self.include_hidden_labels,
            FieldRole::Label | FieldRole::Definition => true,
        }
    }
}

pub struct TextIndex {
    kind: IndexKind,
    graph: Arc<ConceptGraph>,
    similarity: Arc<dyn StringSimilarity>,
    entries: Vec<IndexEntry>,
}

impl std::fmt::Debug for TextIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextIndex")
            .field("kind", &self.kind)
            .field("similarity", &self.similarity.name())
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl TextIndex {
    /// Index preferred, alternate and hidden labels
    pub fn labels(graph: Arc<ConceptGraph>, similarity: Arc<dyn StringSimilarity>) -> Self {
        Self::build(IndexKind::Labels, graph, similarity)
    }

    /// Index definition texts
    pub fn definitions(graph: Arc<ConceptGraph>, similarity: Arc<dyn StringSimilarity>) -> Self {
        Self::build(IndexKind::Definitions, graph, similarity)
    }

    pub fn build(kind: IndexKind, graph: Arc<ConceptGraph>, similarity: Arc<dyn StringSimilarity>) -> Self {
        let mut entries = Vec::new();

        for (slot, concept) in graph.iter().enumerate() {
            let fields: Vec<(FieldRole, &String)> = match kind {
                IndexKind::Labels => concept
                    .labels
                    .iter()
                    .map(|t| (FieldRole::Label, t))
                    .chain(concept.alt_labels.iter().map(|t| (FieldRole::AltLabel, t)))
                    .chain(concept.hidden_labels.iter().map(|t| (FieldRole::HiddenLabel, t)))
                    .collect(),
                IndexKind::Definitions => concept
                    .definitions
                    .iter()
                    .map(|t| (FieldRole::Definition, t))
                    .collect(),
            };

            for (role, text) in fields {
                let text = normalize(text);
                if !text.is_empty() {
                    entries.push(IndexEntry { slot, text, role });
                }
            }
        }

        debug!(kind = ?kind, entries = entries.len(), "built text index");
        Self {
            kind,
            graph,
            similarity,
            entries,
        }
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranked search. `options.concept_type` must be a graph IRI.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let needle = normalize(query);
        if needle.is_empty() {
            return Err(LmssError::InvalidQuery("query is empty".to_string()));
        }
        if options.num_results == 0 {
            return Err(LmssError::InvalidQuery("num_results must be at least 1".to_string()));
        }

        let scope = match &options.concept_type {
            Some(iri) => {
                let root = self
                    .graph
                    .slot(iri)
                    .ok_or_else(|| LmssError::UnknownConceptType(iri.clone()))?;
                Some(self.graph.scope_mask(root, options.max_depth))
            }
            None => None,
        };

        let mut best: Vec<Option<(MatchScore, FieldRole)>> = vec![None; self.graph.len()];
        for entry in &self.entries {
            if scope.as_ref().is_some_and(|mask| !mask[entry.slot]) || !options.includes(entry.role) {
                continue;
            }

            let score = score_match(&needle, &entry.text, self.similarity.as_ref());
            let current = &mut best[entry.slot];
            let better = match current {
                Some((held, _)) => score.rank_cmp(held) == Ordering::Less,
                None => true,
            };
            if better {
                *current = Some((score, entry.role));
            }
        }

        let mut ranked: Vec<(usize, MatchScore, FieldRole)> = best
            .into_iter()
            .enumerate()
            .filter_map(|(slot, hit)| hit.map(|(score, role)| (slot, score, role)))
            .collect();

        // slot order is IRI order
        ranked.sort_by(|a, b| a.1.rank_cmp(&b.1).then(a.0.cmp(&b.0)));
        ranked.truncate(options.num_results);

        Ok(ranked
            .into_iter()
            .map(|(slot, score, role)| SearchResult::build(&self.graph, slot, score, role))
            .collect())
    }
}

/// Score one normalized query against one normalized entry
pub fn score_match(query: &str, text: &str, similarity: &dyn StringSimilarity) -> MatchScore {
    if query == text {
        return MatchScore {
            exact: true,
            substring: false,
            distance: 100.0,
        };
    }

    if text.contains(query) || query.contains(text) {
        let query_len = query.chars().count() as f64;
        let text_len = text.chars().count() as f64;
        let ratio = query_len.min(text_len) / query_len.max(text_len);
        let distance = (SUBSTRING_FLOOR + SUBSTRING_SPAN * ratio)
            .round()
            .clamp(SUBSTRING_FLOOR, SUBSTRING_CEILING);
        return MatchScore {
            exact: false,
            substring: true,
            distance,
        };
    }

    let distance = (similarity.similarity(query, text) * FUZZY_SCALE * 100.0).round() / 100.0;
    MatchScore {
        exact: false,
        substring: false,
        distance,
    }
}

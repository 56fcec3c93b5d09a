//! Key concept registry
//!
//! Maps a configured allow-list of category names to the IRIs of the
//! top-level concepts rooting each category. Categories the ontology lacks
//! are left out.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::config::KeyConceptEntry;
use crate::errors::{LmssError, Result};
use crate::ontology::ConceptGraph;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyConceptRegistry {
    by_name: BTreeMap<String, String>,
}

impl KeyConceptRegistry {
    /// Resolve each configured entry against the graph.
    ///
    /// A configured IRI present in the graph is taken as is; otherwise the
    /// name is matched against the labels of top-level concepts.
    pub fn build(graph: &ConceptGraph, entries: &[KeyConceptEntry]) -> Self {
        let mut by_name = BTreeMap::new();

        for entry in entries {
            match resolve(graph, entry) {
                Some(iri) => {
                    debug!(name = %entry.name, iri = %iri, "resolved key concept");
                    by_name.insert(entry.name.clone(), iri);
                }
                None => warn!(name = %entry.name, "key concept not present in ontology"),
            }
        }

        Self { by_name }
    }

    /// IRI for a category name
    pub fn get(&self, name: &str) -> Result<&str> {
        self.by_name
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| LmssError::UnknownKeyConcept(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Category name for an IRI, if it roots one
    pub fn name_of(&self, iri: &str) -> Option<&str> {
        self.by_name
            .iter()
            .find(|(_, v)| v.as_str() == iri)
            .map(|(k, _)| k.as_str())
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.by_name.clone()
    }

    pub fn iris(&self) -> BTreeSet<&str> {
        self.by_name.values().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn resolve(graph: &ConceptGraph, entry: &KeyConceptEntry) -> Option<String> {
    if let Some(iri) = entry.iri.as_deref() {
        if graph.contains(iri) {
            return Some(iri.to_string());
        }
        debug!(name = %entry.name, iri = %iri, "configured IRI missing, trying label");
    }

    // find_by_label walks in IRI order, so the first candidate is the smallest
    let candidates: Vec<&str> = graph
        .find_by_label(&entry.name)
        .into_iter()
        .filter(|c| graph.is_top_level(&c.iri))
        .map(|c| c.iri.as_str())
        .collect();

    if candidates.len() > 1 {
        warn!(name = %entry.name, matches = candidates.len(), "ambiguous key concept label, using {}", candidates[0]);
    }

    candidates.first().map(|iri| iri.to_string())
}

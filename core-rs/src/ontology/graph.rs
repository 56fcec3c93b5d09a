//! Concept graph
//!
//! Arena of concepts addressed by IRI, with the subclass edge set stored on
//! each concept (`parents`) and an inverted children index built alongside.
//! The structure is immutable once built; traversals are iterative and keep
//! a visited set, so a cyclic hierarchy cannot recurse or loop forever.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};

use super::vocabulary::{Predicate, OWL_THING};
use crate::errors::{LmssError, Result};
use crate::index::normalize;

/// One ontology class
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Concept {
    pub iri: String,
    /// Preferred labels in arrival order, normally exactly one
    pub labels: Vec<String>,
    pub alt_labels: BTreeSet<String>,
    pub hidden_labels: BTreeSet<String>,
    pub definitions: Vec<String>,
    /// Direct superclasses; every entry resolves inside the owning graph
    pub parents: BTreeSet<String>,
    /// Predicates that contributed to `labels` (rdfs:label, skos:prefLabel)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub label_predicates: BTreeSet<Predicate>,
}

impl Concept {
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            ..Default::default()
        }
    }

    /// First preferred label
    pub fn label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConceptGraph {
    /// Sorted by IRI, so slot order is IRI order
    concepts: Vec<Concept>,
    slots: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
}

impl ConceptGraph {
    /// Assemble a graph from concepts whose parent sets are already resolved.
    ///
    /// Callers go through [`ConceptGraphBuilder`](super::ConceptGraphBuilder),
    /// which guarantees unique IRIs and no dangling parents.
    pub(crate) fn from_concepts(mut concepts: Vec<Concept>) -> Self {
        concepts.sort_by(|a, b| a.iri.cmp(&b.iri));

        let slots: HashMap<String, usize> = concepts
            .iter()
            .enumerate()
            .map(|(slot, concept)| (concept.iri.clone(), slot))
            .collect();

        let mut children = vec![Vec::new(); concepts.len()];
        for (slot, concept) in concepts.iter().enumerate() {
            for parent in &concept.parents {
                if let Some(&parent_slot) = slots.get(parent) {
                    children[parent_slot].push(slot);
                }
            }
        }
        // slots are visited in IRI order, so each list is already sorted

        Self {
            concepts,
            slots,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Number of parent/child edges
    pub fn edge_count(&self) -> usize {
        self.concepts.iter().map(|c| c.parents.len()).sum()
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.slots.contains_key(iri)
    }

    /// Look up a concept by IRI
    pub fn get(&self, iri: &str) -> Result<&Concept> {
        self.find(iri)
            .ok_or_else(|| LmssError::NotFound(iri.to_string()))
    }

    pub fn find(&self, iri: &str) -> Option<&Concept> {
        self.slots.get(iri).map(|&slot| &self.concepts[slot])
    }

    /// All concepts in IRI order
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    /// Direct children of `iri`, in IRI order
    pub fn children(&self, iri: &str) -> Result<Vec<&str>> {
        let slot = self.slot_or_not_found(iri)?;
        Ok(self.child_iris(slot))
    }

    /// Every concept reachable through child edges, excluding `iri` itself.
    ///
    /// `max_depth` of `Some(1)` returns direct children only; `None` walks the
    /// whole subtree.
    pub fn descendants(&self, iri: &str, max_depth: Option<usize>) -> Result<BTreeSet<String>> {
        let root = self.slot_or_not_found(iri)?;
        Ok(self
            .reachable(root, max_depth)
            .into_iter()
            .filter(|&slot| slot != root)
            .map(|slot| self.concepts[slot].iri.clone())
            .collect())
    }

    /// True when `candidate` is `root` or lies below it within `max_depth`
    pub fn is_descendant_or_self(&self, candidate: &str, root: &str, max_depth: Option<usize>) -> bool {
        match (self.slots.get(candidate), self.slots.get(root)) {
            (Some(&candidate), Some(&root)) => self.scope_mask(root, max_depth)[candidate],
            _ => false,
        }
    }

    /// Concepts without parents
    pub fn roots(&self) -> Vec<&Concept> {
        self.concepts.iter().filter(|c| c.parents.is_empty()).collect()
    }

    /// Top of the hierarchy: no parents, or `owl:Thing` as the only parent
    pub fn is_top_level(&self, iri: &str) -> bool {
        self.find(iri)
            .map(|c| c.parents.iter().all(|p| p == OWL_THING))
            .unwrap_or(false)
    }

    pub fn top_level(&self) -> Vec<&Concept> {
        self.concepts
            .iter()
            .filter(|c| c.iri != OWL_THING && c.parents.iter().all(|p| p == OWL_THING))
            .collect()
    }

    /// Concepts whose preferred label matches `label` after normalization
    pub fn find_by_label(&self, label: &str) -> Vec<&Concept> {
        let wanted = normalize(label);
        if wanted.is_empty() {
            return Vec::new();
        }

        self.concepts
            .iter()
            .filter(|c| c.labels.iter().any(|l| normalize(l) == wanted))
            .collect()
    }

    pub(crate) fn slot(&self, iri: &str) -> Option<usize> {
        self.slots.get(iri).copied()
    }

    pub(crate) fn concept_at(&self, slot: usize) -> &Concept {
        &self.concepts[slot]
    }

    pub(crate) fn child_iris(&self, slot: usize) -> Vec<&str> {
        self.children[slot]
            .iter()
            .map(|&child| self.concepts[child].iri.as_str())
            .collect()
    }

    pub(crate) fn child_slots(&self, slot: usize) -> &[usize] {
        &self.children[slot]
    }

    /// Membership mask of `root` plus everything below it within `max_depth`
    pub(crate) fn scope_mask(&self, root: usize, max_depth: Option<usize>) -> Vec<bool> {
        let mut mask = vec![false; self.concepts.len()];
        for slot in self.reachable(root, max_depth) {
            mask[slot] = true;
        }
        mask
    }

    /// Breadth-first walk over child edges, root included
    fn reachable(&self, root: usize, max_depth: Option<usize>) -> Vec<usize> {
        let mut visited = vec![false; self.concepts.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        visited[root] = true;
        queue.push_back((root, 0usize));

        while let Some((slot, depth)) = queue.pop_front() {
            order.push(slot);

            if max_depth.is_some_and(|max| depth >= max) {
                continue;
            }

            for &child in &self.children[slot] {
                if !visited[child] {
                    visited[child] = true;
                    queue.push_back((child, depth + 1));
                }
            }
        }

        order
    }

    fn slot_or_not_found(&self, iri: &str) -> Result<usize> {
        self.slot(iri)
            .ok_or_else(|| LmssError::NotFound(iri.to_string()))
    }
}

//! Differences between two ontology versions
//!
//! Reports IRIs present in only one graph, and for shared IRIs every field
//! whose values differ. Output is sorted by IRI, then field.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ontology::{Concept, ConceptGraph};

/// Concept field compared by [`diff_graphs`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffField {
    Labels,
    AltLabels,
    HiddenLabels,
    Definitions,
    Parents,
}

impl DiffField {
    pub const ALL: [DiffField; 5] = [
        DiffField::Labels,
        DiffField::AltLabels,
        DiffField::HiddenLabels,
        DiffField::Definitions,
        DiffField::Parents,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DiffField::Labels => "labels",
            DiffField::AltLabels => "alt_labels",
            DiffField::HiddenLabels => "hidden_labels",
            DiffField::Definitions => "definitions",
            DiffField::Parents => "parents",
        }
    }

    fn values(&self, concept: &Concept) -> Vec<String> {
        match self {
            DiffField::Labels => concept.labels.clone(),
            DiffField::AltLabels => concept.alt_labels.iter().cloned().collect(),
            DiffField::HiddenLabels => concept.hidden_labels.iter().cloned().collect(),
            DiffField::Definitions => concept.definitions.clone(),
            DiffField::Parents => concept.parents.iter().cloned().collect(),
        }
    }
}

/// Which graph holds an IRI the other lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "diff_type", rename_all = "snake_case")]
pub enum GraphDiff {
    Iri {
        iri: String,
        only_in: Side,
    },
    Field {
        iri: String,
        field: DiffField,
        left: Vec<String>,
        right: Vec<String>,
    },
}

impl GraphDiff {
    pub fn iri(&self) -> &str {
        match self {
            GraphDiff::Iri { iri, .. } | GraphDiff::Field { iri, .. } => iri,
        }
    }
}

impl std::fmt::Display for GraphDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphDiff::Iri { iri, only_in } => {
                let side = match only_in {
                    Side::Left => "left",
                    Side::Right => "right",
                };
                write!(f, "IRI={}: only in {}", iri, side)
            }
            GraphDiff::Field { iri, field, left, right } => write!(
                f,
                "IRI={}, field={}: left={:?}, right={:?}",
                iri,
                field.name(),
                left,
                right
            ),
        }
    }
}

/// Compare `left` against `right`
pub fn diff_graphs(left: &ConceptGraph, right: &ConceptGraph) -> Vec<GraphDiff> {
    let mut diffs = Vec::new();

    for concept in left.iter() {
        match right.find(&concept.iri) {
            None => diffs.push(GraphDiff::Iri {
                iri: concept.iri.clone(),
                only_in: Side::Left,
            }),
            Some(other) => {
                for field in DiffField::ALL {
                    let (a, b) = (field.values(concept), field.values(other));
                    if a != b {
                        diffs.push(GraphDiff::Field {
                            iri: concept.iri.clone(),
                            field,
                            left: a,
                            right: b,
                        });
                    }
                }
            }
        }
    }

    for concept in right.iter().filter(|c| !left.contains(&c.iri)) {
        diffs.push(GraphDiff::Iri {
            iri: concept.iri.clone(),
            only_in: Side::Right,
        });
    }

    // both walks are in IRI order; merge them
    diffs.sort_by(|a, b| a.iri().cmp(b.iri()));

    info!(
        left = left.len(),
        right = right.len(),
        differences = diffs.len(),
        "diffed concept graphs"
    );
    diffs
}

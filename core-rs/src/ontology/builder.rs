//! Concept graph builder
//!
//! Consumes an unordered statement stream in one pass. Statements about a
//! subject are collected whether or not its class declaration has been seen
//! yet; only declared classes become concepts when the graph is built.

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

use super::graph::{Concept, ConceptGraph};
use super::source::StatementSource;
use super::statement::Statement;
use super::vocabulary::{ConceptField, Predicate, OWL_THING};
use crate::errors::Result;

#[derive(Debug, Default)]
struct PendingConcept {
    declared: bool,
    labels: Vec<String>,
    alt_labels: BTreeSet<String>,
    hidden_labels: BTreeSet<String>,
    definitions: Vec<String>,
    parents: BTreeSet<String>,
    label_predicates: BTreeSet<Predicate>,
}

impl PendingConcept {
    fn push_value(&mut self, field: ConceptField, value: &str) {
        match field {
            ConceptField::Labels => push_unique(&mut self.labels, value),
            ConceptField::AltLabels => {
                self.alt_labels.insert(value.to_string());
            }
            ConceptField::HiddenLabels => {
                self.hidden_labels.insert(value.to_string());
            }
            ConceptField::Definitions => push_unique(&mut self.definitions, value),
        }
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// Counters reported once the graph is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub statements: usize,
    pub ignored: usize,
    pub concepts: usize,
    pub edges: usize,
    pub dangling_edges: usize,
    pub undeclared_subjects: usize,
}

#[derive(Debug, Default)]
pub struct ConceptGraphBuilder {
    pending: HashMap<String, PendingConcept>,
    stats: IngestStats,
}

impl ConceptGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a statement source.
    ///
    /// The first unreadable statement aborts construction with
    /// [`LmssError::Ingest`](crate::LmssError::Ingest); no partial graph is
    /// returned.
    pub fn from_source<S: StatementSource + ?Sized>(source: &S) -> Result<ConceptGraph> {
        Self::from_statements(source.statements())
    }

    pub fn from_statements<I>(statements: I) -> Result<ConceptGraph>
    where
        I: IntoIterator<Item = Result<Statement>>,
    {
        let mut builder = Self::new();
        for statement in statements {
            builder.ingest(statement?);
        }
        Ok(builder.build().0)
    }

    /// Record one statement
    pub fn ingest(&mut self, statement: Statement) {
        self.stats.statements += 1;

        let Some(predicate) = statement.recognized_predicate() else {
            self.stats.ignored += 1;
            return;
        };

        match predicate {
            Predicate::Type => {
                if statement.is_class_declaration() {
                    self.entry(statement.subject).declared = true;
                } else {
                    self.stats.ignored += 1;
                }
            }
            Predicate::SubClassOf => match statement.object.as_iri() {
                Some(parent) => {
                    let parent = parent.to_string();
                    self.entry(statement.subject).parents.insert(parent);
                }
                None => self.stats.ignored += 1,
            },
            _ => {
                // field() is Some for every literal-bearing predicate
                if let Some(field) = predicate.field() {
                    let value = statement.object.as_str().to_string();
                    let pending = self.entry(statement.subject);
                    pending.push_value(field, &value);
                    if field == ConceptField::Labels {
                        pending.label_predicates.insert(predicate);
                    }
                }
            }
        }
    }

    /// Resolve pending records into an immutable graph
    pub fn build(self) -> (ConceptGraph, IngestStats) {
        let mut stats = self.stats;
        let declared: BTreeSet<&str> = self
            .pending
            .iter()
            .filter(|(_, p)| p.declared)
            .map(|(iri, _)| iri.as_str())
            .collect();

        let mut concepts = Vec::with_capacity(declared.len());
        for (iri, pending) in &self.pending {
            if !pending.declared {
                stats.undeclared_subjects += 1;
                debug!(subject = %iri, "skipping statements about undeclared class");
                continue;
            }

            let mut parents = BTreeSet::new();
            for parent in &pending.parents {
                if declared.contains(parent.as_str()) {
                    parents.insert(parent.clone());
                } else {
                    stats.dangling_edges += 1;
                    if parent == OWL_THING {
                        debug!(concept = %iri, "dropping owl:Thing parent");
                    } else {
                        warn!(concept = %iri, parent = %parent, "dropping dangling parent reference");
                    }
                }
            }

            stats.edges += parents.len();
            concepts.push(Concept {
                iri: iri.clone(),
                labels: pending.labels.clone(),
                alt_labels: pending.alt_labels.clone(),
                hidden_labels: pending.hidden_labels.clone(),
                definitions: pending.definitions.clone(),
                parents,
                label_predicates: pending.label_predicates.clone(),
            });
        }

        stats.concepts = concepts.len();
        info!(
            statements = stats.statements,
            concepts = stats.concepts,
            edges = stats.edges,
            dangling = stats.dangling_edges,
            "built concept graph"
        );

        (ConceptGraph::from_concepts(concepts), stats)
    }

    fn entry(&mut self, subject: String) -> &mut PendingConcept {
        self.pending.entry(subject).or_default()
    }
}

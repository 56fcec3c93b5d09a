/**
 * qa.rs
 * Quality checks over a built concept graph
 *
 * Checks:
 * - labels: concepts with no preferred label, or only blank ones
 * - label sources: labelled concepts missing an rdfs:label or a skos:prefLabel
 * - definitions: concepts with no non-blank definition
 * - label punctuation: parentheses, spaced hyphens, slashes, colons or
 *   semicolons in a preferred label (usually an alt label folded in)
 * - duplicate labels: one label string shared by several concepts across
 *   preferred, alternate and hidden labels
 * - cycles: subclass loops
 */

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

use crate::errors::Result;
use crate::ontology::vocabulary::OWL_THING;
use crate::ontology::{Concept, ConceptGraph, Predicate};

pub const LMSS_NAMESPACE: &str = "http://lmss.sali.org/";

static PUNCTUATION_RULES: OnceCell<Vec<(Regex, &'static str)>> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    Labels,
    LabelSources,
    Definitions,
    LabelPunctuation,
    DuplicateLabels,
    Cycles,
}

impl Check {
    pub const ALL: [Check; 6] = [
        Check::Labels,
        Check::LabelSources,
        Check::Definitions,
        Check::LabelPunctuation,
        Check::DuplicateLabels,
        Check::Cycles,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Check::Labels => "labels",
            Check::LabelSources => "label_sources",
            Check::Definitions => "definitions",
            Check::LabelPunctuation => "label_punctuation",
            Check::DuplicateLabels => "duplicate_labels",
            Check::Cycles => "cycles",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub iri: String,
    pub label: Option<String>,
    pub description: String,
    pub check: Check,
}

impl Finding {
    fn new(concept: &Concept, check: Check, description: impl Into<String>) -> Self {
        Self {
            iri: concept.iri.clone(),
            label: concept.label().map(str::to_string),
            description: description.into(),
            check,
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} : ({}) : {} : {}",
            self.iri,
            self.label.as_deref().unwrap_or("None"),
            self.check.name(),
            self.description
        )
    }
}

pub struct GraphQa<'a> {
    graph: &'a ConceptGraph,
    namespace: Option<String>,
}

impl<'a> GraphQa<'a> {
    /// Checks limited to the LMSS namespace
    pub fn new(graph: &'a ConceptGraph) -> Self {
        Self {
            graph,
            namespace: Some(LMSS_NAMESPACE.to_string()),
        }
    }

    /// Restrict checks to IRIs under `namespace`; `None` checks every concept
    pub fn with_namespace(mut self, namespace: Option<&str>) -> Self {
        self.namespace = namespace.map(str::to_string);
        self
    }

    /// Run `checks` and return findings sorted by IRI
    pub fn run(&self, checks: &[Check]) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for check in checks {
            let found = match check {
                Check::Labels => self.check_labels(),
                Check::LabelSources => self.check_label_sources(),
                Check::Definitions => self.check_definitions(),
                Check::LabelPunctuation => self.check_label_punctuation()?,
                Check::DuplicateLabels => self.check_duplicate_labels(),
                Check::Cycles => self.check_cycles(),
            };
            debug!(check = check.name(), findings = found.len(), "qa check done");
            findings.extend(found);
        }

        findings.sort_by(|a, b| a.iri.cmp(&b.iri).then(a.check.cmp(&b.check)));
        info!(findings = findings.len(), "qa complete");
        Ok(findings)
    }

    pub fn run_all(&self) -> Result<Vec<Finding>> {
        self.run(&Check::ALL)
    }

    pub fn check_labels(&self) -> Vec<Finding> {
        self.in_scope()
            .filter_map(|concept| {
                if concept.labels.is_empty() {
                    Some(Finding::new(concept, Check::Labels, "Missing label"))
                } else if concept.labels.iter().all(|l| l.trim().is_empty()) {
                    Some(Finding::new(concept, Check::Labels, "Empty label"))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Concepts that have a preferred label but lack one of the two label predicates
    pub fn check_label_sources(&self) -> Vec<Finding> {
        let mut findings = Vec::new();

        for concept in self.in_scope().filter(|c| !c.labels.is_empty()) {
            if !concept.label_predicates.contains(&Predicate::Label) {
                findings.push(Finding::new(concept, Check::LabelSources, "Missing rdfs:label"));
            }
            if !concept.label_predicates.contains(&Predicate::PrefLabel) {
                findings.push(Finding::new(concept, Check::LabelSources, "Missing skos:prefLabel"));
            }
        }

        findings
    }

    pub fn check_definitions(&self) -> Vec<Finding> {
        self.in_scope()
            .filter_map(|concept| {
                if concept.definitions.is_empty() {
                    Some(Finding::new(concept, Check::Definitions, "Missing definition"))
                } else if concept.definitions.iter().all(|d| d.trim().is_empty()) {
                    Some(Finding::new(concept, Check::Definitions, "Empty definition"))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn check_label_punctuation(&self) -> Result<Vec<Finding>> {
        let rules = punctuation_rules()?;
        let mut findings = Vec::new();

        for concept in self.in_scope() {
            let Some(label) = concept.label() else {
                continue;
            };
            for (pattern, description) in rules {
                if pattern.is_match(label) {
                    findings.push(Finding::new(concept, Check::LabelPunctuation, *description));
                }
            }
        }

        Ok(findings)
    }

    pub fn check_duplicate_labels(&self) -> Vec<Finding> {
        // label text -> label kind -> IRIs
        let mut by_label: BTreeMap<&str, BTreeMap<&'static str, BTreeSet<&str>>> = BTreeMap::new();

        for concept in self.graph.iter() {
            let tagged = concept
                .labels
                .iter()
                .map(|l| ("label", l))
                .chain(concept.alt_labels.iter().map(|l| ("alt_label", l)))
                .chain(concept.hidden_labels.iter().map(|l| ("hidden_label", l)));

            for (kind, text) in tagged {
                if text.trim().is_empty() {
                    continue;
                }
                by_label
                    .entry(text.as_str())
                    .or_default()
                    .entry(kind)
                    .or_default()
                    .insert(concept.iri.as_str());
            }
        }

        let mut findings = Vec::new();
        for (text, kinds) in by_label {
            let iris: BTreeSet<&str> = kinds.values().flatten().copied().collect();
            if iris.len() < 2 {
                continue;
            }

            let kind_list = kinds.keys().copied().collect::<Vec<_>>().join(",");
            for iri in iris {
                if let Some(concept) = self.graph.find(iri) {
                    findings.push(Finding::new(
                        concept,
                        Check::DuplicateLabels,
                        format!("Duplicate label: {} (label types: {})", text, kind_list),
                    ));
                }
            }
        }

        findings
    }

    /// One finding per subclass loop, on the first concept the walk enters it by
    pub fn check_cycles(&self) -> Vec<Finding> {
        find_cycles(self.graph)
            .into_iter()
            .filter_map(|cycle| {
                let head = self.graph.find(cycle.first()?)?;
                Some(Finding::new(
                    head,
                    Check::Cycles,
                    format!("Cycle in graph: {}", cycle.join(" -> ")),
                ))
            })
            .collect()
    }

    fn in_scope(&self) -> impl Iterator<Item = &'a Concept> + '_ {
        self.graph.iter().filter(move |c| {
            c.iri != OWL_THING
                && self
                    .namespace
                    .as_deref()
                    .map_or(true, |ns| c.iri.starts_with(ns))
        })
    }
}

fn punctuation_rules() -> Result<&'static Vec<(Regex, &'static str)>> {
    PUNCTUATION_RULES.get_or_try_init(|| -> Result<Vec<(Regex, &'static str)>> {
        Ok(vec![
            (Regex::new(r"[()]")?, "Label contains parentheses"),
            (Regex::new(r" - ")?, "Label contains hyphens"),
            (Regex::new(r"/")?, "Label contains slashes"),
            (Regex::new(r"[:;]")?, "Label contains colons or semi-colons"),
        ])
    })
}

/// Iterative depth-first search over child edges; every back edge closes one
/// cycle, reported as IRIs from the re-entered concept down to the closing one.
fn find_cycles(graph: &ConceptGraph) -> Vec<Vec<String>> {
    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;

    let mut color = vec![WHITE; graph.len()];
    let mut cycles = Vec::new();

    for start in 0..graph.len() {
        if color[start] != WHITE {
            continue;
        }

        // (slot, next child index)
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        color[start] = GRAY;

        while let Some(top) = stack.last_mut() {
            let slot = top.0;
            let children = graph.child_slots(slot);
            if top.1 < children.len() {
                let child = children[top.1];
                top.1 += 1;

                match color[child] {
                    WHITE => {
                        color[child] = GRAY;
                        stack.push((child, 0));
                    }
                    GRAY => {
                        let from = stack.iter().position(|&(s, _)| s == child).unwrap_or(0);
                        cycles.push(
                            stack[from..]
                                .iter()
                                .map(|&(s, _)| graph.concept_at(s).iri.clone())
                                .collect(),
                        );
                    }
                    _ => {}
                }
            } else {
                color[slot] = BLACK;
                stack.pop();
            }
        }
    }

    cycles
}

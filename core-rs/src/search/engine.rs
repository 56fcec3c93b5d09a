//! Search engine
//!
//! Public query surface over one loaded ontology snapshot. An engine is
//! immutable once built; loading another ontology version means building a
//! new engine, and existing handles keep answering from the old one.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info};

use super::registry::KeyConceptRegistry;
use crate::config::{KeyConceptEntry, LmssConfig, SearchSettings};
use crate::errors::{LmssError, Result};
use crate::index::{SearchOptions, SearchResult, TextIndex};
use crate::ontology::{Concept, ConceptGraph, ConceptGraphBuilder, StatementSource};

#[derive(Debug)]
pub struct SearchEngine {
    graph: Arc<ConceptGraph>,
    labels: TextIndex,
    definitions: TextIndex,
    key_concepts: KeyConceptRegistry,
    settings: SearchSettings,
}

impl SearchEngine {
    /// Ingest a statement source and build both indices and the registry.
    ///
    /// # Example
    ///
    /// ```
    /// use lmss_core::{SearchEngine, SearchSettings, Statement, Predicate};
    ///
    /// let statements = vec![
    ///     Statement::class("http://lmss.sali.org/A"),
    ///     Statement::literal("http://lmss.sali.org/A", Predicate::Label, "Area of Law"),
    /// ];
    /// let engine = SearchEngine::build(&statements, &SearchSettings::default(), &[]).unwrap();
    /// let results = engine.search_labels("area of law", None, 5).unwrap();
    /// assert!(results[0].exact);
    /// ```
    pub fn build<S: StatementSource + ?Sized>(
        source: &S,
        settings: &SearchSettings,
        key_concepts: &[KeyConceptEntry],
    ) -> Result<Self> {
        let graph = ConceptGraphBuilder::from_source(source)?;
        Ok(Self::from_graph(graph, settings, key_concepts))
    }

    /// Build with the settings and key concepts of a configuration document
    pub fn from_config<S: StatementSource + ?Sized>(source: &S, config: &LmssConfig) -> Result<Self> {
        Self::build(source, &config.spec.search, &config.spec.key_concepts)
    }

    pub fn from_graph(graph: ConceptGraph, settings: &SearchSettings, key_concepts: &[KeyConceptEntry]) -> Self {
        let graph = Arc::new(graph);
        let similarity = settings.similarity.build();

        let labels = TextIndex::labels(Arc::clone(&graph), Arc::clone(&similarity));
        let definitions = TextIndex::definitions(Arc::clone(&graph), similarity);
        let key_concepts = KeyConceptRegistry::build(&graph, key_concepts);

        info!(
            concepts = graph.len(),
            label_entries = labels.len(),
            definition_entries = definitions.len(),
            key_concepts = key_concepts.len(),
            "search engine ready"
        );

        Self {
            graph,
            labels,
            definitions,
            key_concepts,
            settings: settings.clone(),
        }
    }

    /// Search labels, alternate labels and hidden labels.
    ///
    /// `concept_type` is a concept IRI or a key concept name; results are
    /// limited to it and its descendants.
    pub fn search_labels(&self, query: &str, concept_type: Option<&str>, num_results: usize) -> Result<Vec<SearchResult>> {
        let options = self.options_for(concept_type, num_results);
        self.search_labels_with(query, &options)
    }

    /// Search definition texts; same filtering rules as [`Self::search_labels`]
    pub fn search_definitions(&self, query: &str, concept_type: Option<&str>, num_results: usize) -> Result<Vec<SearchResult>> {
        let options = self.options_for(concept_type, num_results);
        self.search_definitions_with(query, &options)
    }

    pub fn search_labels_with(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let options = self.resolve_options(options)?;
        debug!(query = %query, concept_type = ?options.concept_type, "label search");
        self.labels.search(query, &options)
    }

    pub fn search_definitions_with(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let options = self.resolve_options(options)?;
        debug!(query = %query, concept_type = ?options.concept_type, "definition search");
        self.definitions.search(query, &options)
    }

    /// Options carrying the configured defaults
    pub fn default_options(&self) -> SearchOptions {
        SearchOptions {
            num_results: self.settings.default_num_results,
            max_depth: self.settings.default_max_depth,
            ..SearchOptions::default()
        }
    }

    /// Turn an IRI or key concept name into a graph IRI
    pub fn resolve_concept_type(&self, concept_type: &str) -> Result<String> {
        if self.graph.contains(concept_type) {
            return Ok(concept_type.to_string());
        }

        self.key_concepts
            .get(concept_type)
            .map(str::to_string)
            .map_err(|_| LmssError::UnknownConceptType(concept_type.to_string()))
    }

    /// Category name → IRI for every resolved key concept
    pub fn key_concepts(&self) -> BTreeMap<String, String> {
        self.key_concepts.snapshot()
    }

    pub fn key_concept(&self, name: &str) -> Result<&str> {
        self.key_concepts.get(name)
    }

    pub fn registry(&self) -> &KeyConceptRegistry {
        &self.key_concepts
    }

    pub fn concept(&self, iri: &str) -> Result<&Concept> {
        self.graph.get(iri)
    }

    pub fn children(&self, iri: &str) -> Result<Vec<&str>> {
        self.graph.children(iri)
    }

    /// Descendants of a key concept (by name or IRI), e.g. every Area of Law
    pub fn members(&self, concept_type: &str, max_depth: Option<usize>) -> Result<BTreeSet<String>> {
        let iri = self.resolve_concept_type(concept_type)?;
        self.graph.descendants(&iri, max_depth)
    }

    pub fn graph(&self) -> Arc<ConceptGraph> {
        Arc::clone(&self.graph)
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    fn options_for(&self, concept_type: Option<&str>, num_results: usize) -> SearchOptions {
        SearchOptions {
            concept_type: concept_type.map(str::to_string),
            num_results,
            ..self.default_options()
        }
    }

    fn resolve_options(&self, options: &SearchOptions) -> Result<SearchOptions> {
        let mut resolved = options.clone();
        if let Some(concept_type) = &options.concept_type {
            resolved.concept_type = Some(self.resolve_concept_type(concept_type)?);
        }
        Ok(resolved)
    }
}

//! Integration tests for ontology loading and search
//!
//! Runs the full pipeline over a small RDF/XML extract shaped like the
//! published LMSS artifact:
//! - RDF/XML parsing through Oxigraph
//! - graph construction (owl:Thing parents, restrictions, dangling edges)
//! - label and definition search, scoped and unscoped
//! - key concept resolution from the default configuration
//! - loader and configuration file round trip
//! - QA and diff over the loaded graph

use lmss_core::config::KIND;
use lmss_core::export::concepts_to_csv;
use lmss_core::{
    diff_graphs, Check, ConceptGraph, Finding, ConceptGraphBuilder, FieldRole, GraphQa, LmssConfig, LmssError,
    OntologyLoader, OxigraphSource, SearchEngine, SearchOptions,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ACTOR: &str = "http://lmss.sali.org/R8CdMpOM0RmyrgCCvbpiLS0";
const BANKER: &str = "http://lmss.sali.org/R7mVbA3a2gq5qGkQwP8m1bB";
const AREA: &str = "http://lmss.sali.org/RSYBzf149Mi5KE0YtmpUmr";
const ADMR: &str = "http://lmss.sali.org/R9Qx4zW5n1xnv6yQk2Gm3aT";
const BANKING_LAW: &str = "http://lmss.sali.org/RB4aP1sNw2e9Kd0jFh7yZtc";
const BANKRUPTCY: &str = "http://lmss.sali.org/RDm3Hq8Lx5c0Ve2bNs6kTpu";
const CONSUMER_BANKRUPTCY: &str = "http://lmss.sali.org/RE1wYt7Gk4n2Ra9cLm5dXsv";
const INDUSTRY: &str = "http://lmss.sali.org/RDIwFaFcH4KY0gwEY0QlMTp";
const BANKING_FINANCE: &str = "http://lmss.sali.org/RF5nMz2Qb8t1Wc6hJk3vYre";
const LOCATION: &str = "http://lmss.sali.org/R9aSzp9cEiBCzObnP92jYFX";
const POSTAL_ADDRESS: &str = "http://lmss.sali.org/RGt6Kp1Nc9w3Xz5vBd2mQhs";

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("core-rs/tests/fixtures/mini_lmss.owl")
}

fn load_source() -> OxigraphSource {
    OxigraphSource::from_path(&fixture_path()).unwrap()
}

fn load_graph() -> ConceptGraph {
    ConceptGraphBuilder::from_source(&load_source()).unwrap()
}

fn load_engine() -> SearchEngine {
    SearchEngine::from_config(&load_source(), &LmssConfig::default()).unwrap()
}

#[test]
fn test_graph_shape() {
    let graph = load_graph();

    // property, ontology header and the undeclared subject are not classes
    assert_eq!(graph.len(), 14);
    assert!(!graph.contains("http://lmss.sali.org/RUndeclaredSubject"));
    assert!(!graph.contains("http://lmss.sali.org/RgoverningLaw"));

    // owl:Thing parents and the dangling parent are dropped
    assert_eq!(graph.edge_count(), 9);
    let postal = graph.get(POSTAL_ADDRESS).unwrap();
    assert_eq!(postal.parents.iter().collect::<Vec<_>>(), vec![LOCATION]);

    // restriction superclass is a blank node, not a parent
    let finance = graph.get(BANKING_FINANCE).unwrap();
    assert_eq!(finance.parents.len(), 1);
    assert!(finance.parents.contains(INDUSTRY));

    let top: Vec<&str> = graph.top_level().into_iter().map(|c| c.iri.as_str()).collect();
    assert_eq!(top.len(), 5);
    assert!(top.contains(&AREA));
    assert!(graph.is_top_level(ACTOR));
    assert!(!graph.is_top_level(BANKER));
}

#[test]
fn test_label_sources_merge() {
    let graph = load_graph();

    // rdfs:label and skos:prefLabel with the same text collapse to one
    let location = graph.get(LOCATION).unwrap();
    assert_eq!(location.labels, vec!["Location".to_string()]);

    let admr = graph.get(ADMR).unwrap();
    assert!(admr.hidden_labels.contains("ADMR"));
    assert_eq!(admr.definitions.len(), 1);
}

#[test]
fn test_exact_label_search() {
    let engine = load_engine();
    let results = engine.search_labels("Banking Law", None, 5).unwrap();

    assert_eq!(results[0].iri, BANKING_LAW);
    assert!(results[0].exact);
    assert_eq!(results[0].distance, 100.0);
    assert_eq!(results[0].label.as_deref(), Some("Banking Law"));
    assert!(results[0].alt_labels.contains("Bank Regulation"));
    assert!(results.len() <= 5);
}

#[test]
fn test_scoped_substring_ranking() {
    let engine = load_engine();
    let results = engine.search_labels("bank", Some("Area of Law"), 10).unwrap();

    let iris: Vec<&str> = results.iter().map(|r| r.iri.as_str()).collect();
    assert_eq!(&iris[..3], &[BANKING_LAW, BANKRUPTCY, CONSUMER_BANKRUPTCY]);
    assert!(results[..3].iter().all(|r| r.substring && !r.exact));
    assert!(results[0].distance > results[1].distance);
    assert!(results[1].distance > results[2].distance);

    // Banker and Banking and Finance live outside Area of Law
    assert!(!iris.contains(&BANKER));
    assert!(!iris.contains(&BANKING_FINANCE));
    assert_eq!(results.len(), 5);
}

#[test]
fn test_hidden_and_alt_labels() {
    let engine = load_engine();

    let results = engine.search_labels("admr", None, 3).unwrap();
    assert_eq!(results[0].iri, ADMR);
    assert!(results[0].exact);
    assert_eq!(results[0].matched_field, FieldRole::HiddenLabel);

    let results = engine.search_labels("usps", None, 3).unwrap();
    assert_eq!(results[0].iri, POSTAL_ADDRESS);
    assert!(results[0].substring);
    assert_eq!(results[0].matched_field, FieldRole::AltLabel);

    let options = SearchOptions::new().without_hidden_labels().with_num_results(3);
    let results = engine.search_labels_with("admr", &options).unwrap();
    assert!(results.iter().all(|r| !r.exact));
}

#[test]
fn test_definition_search() {
    let engine = load_engine();
    let results = engine.search_definitions("nautical", None, 3).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].iri, ADMR);
    assert!(results[0].substring);
    assert!(!results[0].exact);
    assert!(results[0].parents.contains(AREA));
    assert!(results[1..].iter().all(|r| !r.substring));
}

#[test]
fn test_key_concepts_from_default_config() {
    let engine = load_engine();
    let key_concepts = engine.key_concepts();

    // 5 of the 23 categories exist in the extract
    assert_eq!(key_concepts.len(), 5);
    assert_eq!(key_concepts["Area of Law"], AREA);
    assert_eq!(key_concepts["Location"], LOCATION);
    assert!(matches!(engine.key_concept("Currency"), Err(LmssError::UnknownKeyConcept(_))));

    assert_eq!(engine.members("Area of Law", Some(1)).unwrap().len(), 3);
    let all = engine.members("Area of Law", None).unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.contains(CONSUMER_BANKRUPTCY));
}

#[test]
fn test_unknown_concept_type() {
    let engine = load_engine();
    let err = engine.search_labels("bank", Some("Currency"), 5).unwrap_err();
    assert!(matches!(err, LmssError::UnknownConceptType(_)));
}

#[tokio::test]
async fn test_config_and_loader_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(".lmss.yaml");

    let yaml = format!(
        r#"
apiVersion: lmss/v1
kind: {}
spec:
  source:
    path: {}
  search:
    defaultNumResults: 2
    similarity: jaro-winkler
  keyConcepts:
    - name: Actor / Player
    - name: Industry
      iri: http://lmss.sali.org/RDIwFaFcH4KY0gwEY0QlMTp
"#,
        KIND,
        fixture_path().display()
    );
    std::fs::write(&config_path, yaml).unwrap();

    let config = LmssConfig::discover(None, temp_dir.path()).unwrap();
    let source = OntologyLoader::new(config.spec.source.clone())
        .unwrap()
        .load()
        .await
        .unwrap();
    let engine = SearchEngine::from_config(&source, &config).unwrap();

    assert_eq!(engine.key_concepts().len(), 2);
    assert_eq!(engine.key_concept("Actor / Player").unwrap(), ACTOR);

    let results = engine
        .search_labels_with("law", &engine.default_options())
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn test_malformed_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.owl");
    std::fs::write(&path, "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"><owl:Class").unwrap();

    let result = OxigraphSource::from_path(&path);
    assert!(matches!(result, Err(LmssError::Ingest(_))));
}

#[test]
fn test_qa_over_fixture() {
    let graph = load_graph();
    let findings = GraphQa::new(&graph).run_all().unwrap();

    assert!(!findings.iter().any(|f| f.check == Check::Labels));
    assert!(!findings.iter().any(|f| f.check == Check::Cycles));
    assert!(findings
        .iter()
        .any(|f| f.iri == ACTOR && f.description == "Label contains slashes"));

    let undefined: Vec<&str> = findings
        .iter()
        .filter(|f| f.check == Check::Definitions)
        .map(|f| f.iri.as_str())
        .collect();
    assert_eq!(undefined.len(), 4);
    assert!(undefined.contains(&INDUSTRY));
    assert!(undefined.contains(&POSTAL_ADDRESS));

    // only Location carries both rdfs:label and skos:prefLabel
    let sources: Vec<&Finding> = findings.iter().filter(|f| f.check == Check::LabelSources).collect();
    assert_eq!(sources.len(), 13);
    assert!(sources.iter().all(|f| f.description == "Missing skos:prefLabel"));
    assert!(!sources.iter().any(|f| f.iri == LOCATION));
}

#[test]
fn test_csv_export_of_fixture() {
    let graph = load_graph();
    let csv = concepts_to_csv(&graph);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), graph.len() + 1);
    assert!(lines[0].starts_with("iri,label,"));
    assert!(lines
        .iter()
        .any(|l| l.starts_with(POSTAL_ADDRESS) && l.contains("USPS Address") && l.contains(LOCATION)));
}

#[test]
fn test_diff_against_itself_and_a_trimmed_copy() {
    let graph = load_graph();
    assert!(diff_graphs(&graph, &load_graph()).is_empty());

    let mut builder = ConceptGraphBuilder::new();
    for concept in graph.iter().filter(|c| c.iri != BANKER) {
        builder.ingest(lmss_core::Statement::class(concept.iri.as_str()));
    }
    let (bare, stats) = builder.build();
    assert_eq!(stats.concepts, 13);

    let diffs = diff_graphs(&graph, &bare);
    assert!(diffs.iter().any(|d| d.iri() == BANKER));
    assert!(diffs.windows(2).all(|w| w[0].iri() <= w[1].iri()));
}

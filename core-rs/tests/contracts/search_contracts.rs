// Search Contract Tests
//
// Invariants of the concept graph and the search engine that hold for every
// ontology snapshot, independent of how indices or traversal are implemented.

use lmss_core::index::{DamerauLevenshtein, TextIndex};
use lmss_core::{
    ConceptGraph, ConceptGraphBuilder, KeyConceptEntry, LmssError, Predicate, SearchEngine, SearchOptions,
    SearchSettings, Statement,
};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

const LMSS: &str = "http://lmss.sali.org/";

fn iri(local: &str) -> String {
    format!("{}{}", LMSS, local)
}

/// Area of Law subtree, an Actor subtree, a cycle and a dangling parent
fn corpus() -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut class = |local: &str, label: &str, parents: &[&str], definition: Option<&str>| {
        statements.push(Statement::class(iri(local)));
        statements.push(Statement::literal(iri(local), Predicate::Label, label));
        for parent in parents {
            statements.push(Statement::subclass_of(iri(local), iri(parent)));
        }
        if let Some(text) = definition {
            statements.push(Statement::literal(iri(local), Predicate::Definition, text));
        }
    };

    class("area", "Area of Law", &[], Some("The fields of law in which legal services are rendered."));
    class("admr", "Admiralty and Maritime Law", &["area"], Some("Law that governs nautical issues and private maritime disputes."));
    class("bank", "Banking Law", &["area"], Some("Law governing banks."));
    class("bkrp", "Bankruptcy Law", &["area"], Some("Law governing insolvent debtors."));
    class("cbkr", "Consumer Bankruptcy Law", &["bkrp"], None);
    class("actor", "Actor / Player", &[], None);
    class("banker", "Banker", &["actor"], None);
    class("lawyer", "Lawyer", &["actor", "missing"], None);
    // loop: loop_a -> loop_b -> loop_a
    class("loop_a", "Loop Law A", &["loop_b"], None);
    class("loop_b", "Loop Law B", &["loop_a", "area"], None);

    statements.push(Statement::literal(iri("bank"), Predicate::AltLabel, "Bank Regulation"));
    statements.push(Statement::literal(iri("admr"), Predicate::HiddenLabel, "ADMR"));
    statements
}

fn graph() -> ConceptGraph {
    ConceptGraphBuilder::from_source(&corpus()).unwrap()
}

fn engine() -> SearchEngine {
    let key_concepts = vec![
        KeyConceptEntry::new("Area of Law", None),
        KeyConceptEntry::new("Actor / Player", None),
    ];
    SearchEngine::build(&corpus(), &SearchSettings::default(), &key_concepts).unwrap()
}

/// Descendant-or-self set computed by a plain walk over `parents`
fn subtree_by_parents(graph: &ConceptGraph, root: &str) -> HashSet<String> {
    let mut members = HashSet::from([root.to_string()]);
    let mut queue = VecDeque::from([root.to_string()]);

    while let Some(current) = queue.pop_front() {
        for concept in graph.iter() {
            if concept.parents.contains(&current) && members.insert(concept.iri.clone()) {
                queue.push_back(concept.iri.clone());
            }
        }
    }

    members
}

/// INVARIANT: no two concepts share an IRI
/// BREAKS: lookup by IRI returns an arbitrary one of several records
#[test]
fn concept_iris_are_unique() {
    let mut statements = corpus();
    // redeclare and relabel an existing class
    statements.push(Statement::class(iri("bank")));
    statements.push(Statement::literal(iri("bank"), Predicate::Label, "Banking Law"));
    let graph = ConceptGraphBuilder::from_source(&statements).unwrap();

    let mut seen = HashSet::new();
    for concept in graph.iter() {
        assert!(seen.insert(concept.iri.clone()), "duplicate IRI {}", concept.iri);
    }
    assert_eq!(seen.len(), graph.len());
    assert_eq!(graph.get(&iri("bank")).unwrap().labels.len(), 1);
}

/// INVARIANT: every recorded parent IRI resolves to a concept in the graph
/// BREAKS: children/descendant walks follow references into nothing
#[test]
fn parents_always_resolve() {
    let graph = graph();
    for concept in graph.iter() {
        for parent in &concept.parents {
            assert!(graph.contains(parent), "{} has dangling parent {}", concept.iri, parent);
        }
    }

    let lawyer = graph.get(&iri("lawyer")).unwrap();
    assert_eq!(lawyer.parents, BTreeSet::from([iri("actor")]));
}

/// INVARIANT: an exact preferred label comes back first, exact, at 100
#[test]
fn exact_label_ranks_first() {
    let engine = engine();
    for concept in engine.graph().iter() {
        let label = concept.label().unwrap();
        let results = engine.search_labels(label, None, 5).unwrap();
        assert_eq!(results[0].iri, concept.iri, "query {:?}", label);
        assert!(results[0].exact);
        assert_eq!(results[0].distance, 100.0);
    }
}

/// INVARIANT: all exact results precede all non-exact results
#[test]
fn exact_results_precede_the_rest() {
    let engine = engine();
    for query in ["Bankruptcy Law", "banking law", "bank regulation", "law", "admr"] {
        let results = engine.search_labels(query, None, 50).unwrap();
        let first_inexact = results.iter().position(|r| !r.exact).unwrap_or(results.len());
        assert!(
            results[first_inexact..].iter().all(|r| !r.exact),
            "exact result after an inexact one for {:?}",
            query
        );
        // substring results likewise precede fuzzy ones
        let tail = &results[first_inexact..];
        let first_fuzzy = tail.iter().position(|r| !r.substring).unwrap_or(tail.len());
        assert!(tail[first_fuzzy..].iter().all(|r| !r.substring));
    }
}

/// INVARIANT: a concept_type scope never leaks concepts outside its subtree
/// BREAKS: "Area of Law" searches return actors, services, ...
#[test]
fn scope_is_descendant_or_self() {
    let engine = engine();
    let graph = engine.graph();

    for root in ["area", "bkrp", "actor", "loop_a"] {
        let allowed = subtree_by_parents(&graph, &iri(root));
        for query in ["law", "bank", "banker", "loop"] {
            let labels = engine.search_labels(query, Some(&iri(root)), 50).unwrap();
            let definitions = engine.search_definitions(query, Some(&iri(root)), 50).unwrap();
            for result in labels.iter().chain(definitions.iter()) {
                assert!(
                    allowed.contains(&result.iri),
                    "{} is outside {}",
                    result.iri,
                    root
                );
            }
        }
    }

    // key concept names scope the same way as their IRIs
    let by_name = engine.search_labels("law", Some("Area of Law"), 50).unwrap();
    let by_iri = engine.search_labels("law", Some(&iri("area")), 50).unwrap();
    assert_eq!(by_name, by_iri);
}

/// INVARIANT: cyclic hierarchies terminate and include every concept on the loop
#[test]
fn cycles_terminate() {
    let graph = graph();
    let below_a = graph.descendants(&iri("loop_a"), None).unwrap();
    assert_eq!(below_a, BTreeSet::from([iri("loop_b")]));

    // loop_a and loop_b both sit under area through loop_b
    let area = graph.descendants(&iri("area"), None).unwrap();
    assert!(area.contains(&iri("loop_a")));
    assert!(area.contains(&iri("loop_b")));
}

/// INVARIANT: identical searches return identical ordered output
#[test]
fn searches_are_idempotent() {
    let engine = engine();
    for query in ["law", "bank", "nautical", "xyz"] {
        assert_eq!(
            engine.search_labels(query, None, 7).unwrap(),
            engine.search_labels(query, None, 7).unwrap()
        );
        assert_eq!(
            engine.search_definitions(query, Some("Area of Law"), 7).unwrap(),
            engine.search_definitions(query, Some("Area of Law"), 7).unwrap()
        );
    }
}

/// INVARIANT: one class, one parent, one label/alt/definition builds two
/// concepts and one edge, and the label finds the class with its parent
#[test]
fn two_class_round_trip() {
    let child = iri("child");
    let parent = iri("parent");
    let statements = vec![
        Statement::class(&child),
        Statement::literal(&child, Predicate::Label, "Maritime Liens"),
        Statement::literal(&child, Predicate::AltLabel, "Ship Liens"),
        Statement::literal(&child, Predicate::Definition, "Claims against a vessel."),
        Statement::subclass_of(&child, &parent),
        Statement::class(&parent),
    ];

    let engine = SearchEngine::build(&statements, &SearchSettings::default(), &[]).unwrap();
    let graph = engine.graph();
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.edge_count(), 1);

    let results = engine.search_labels("Maritime Liens", None, 10).unwrap();
    assert_eq!(results[0].iri, child);
    assert!(results[0].parents.contains(&parent));
    assert_eq!(graph.children(&parent).unwrap(), vec![child.as_str()]);
}

/// INVARIANT: a query inside a definition is a substring hit, not exact
#[test]
fn nautical_is_a_substring_match() {
    let engine = engine();
    let results = engine.search_definitions("nautical", None, 5).unwrap();
    assert_eq!(results[0].iri, iri("admr"));
    assert!(results[0].substring);
    assert!(!results[0].exact);
    assert!((85.0..=99.0).contains(&results[0].distance));
}

/// INVARIANT: num_results truncates a strictly ranked list, deterministically
#[test]
fn num_results_truncates_in_rank_order() {
    let labels: Vec<(String, &str)> = vec![
        (iri("t1"), "Tax"),
        (iri("t2"), "Tax Law"),
        (iri("t3"), "Tax Law Reform"),
        (iri("t4"), "Tax Law Reform Act"),
        (iri("t5"), "Tax Law Reform Act Compliance"),
    ];
    let mut statements = Vec::new();
    for (id, label) in &labels {
        statements.push(Statement::class(id));
        statements.push(Statement::literal(id, Predicate::Label, *label));
    }

    let graph = Arc::new(ConceptGraphBuilder::from_source(&statements).unwrap());
    let index = TextIndex::labels(graph, Arc::new(DamerauLevenshtein));
    let options = SearchOptions::new().with_num_results(3);

    // "tax" is exact for t1 and a shrinking substring of t2..t5
    let full = index.search("tax", &SearchOptions::new()).unwrap();
    assert_eq!(full.len(), 5);
    assert!(full.windows(2).all(|w| w[0].distance > w[1].distance || (w[0].exact && !w[1].exact)));

    let first = index.search("tax", &options).unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(first, full[..3].to_vec());
    for _ in 0..5 {
        assert_eq!(index.search("tax", &options).unwrap(), first);
    }
}

/// INVARIANT: empty queries are rejected and leave the engine usable
#[test]
fn empty_query_is_rejected() {
    let engine = engine();
    let before = engine.search_labels("law", None, 10).unwrap();

    for query in ["", "   ", "\t\n"] {
        assert!(matches!(engine.search_labels(query, None, 10), Err(LmssError::InvalidQuery(_))));
        assert!(matches!(engine.search_definitions(query, None, 10), Err(LmssError::InvalidQuery(_))));
    }
    assert!(matches!(engine.search_labels("law", None, 0), Err(LmssError::InvalidQuery(_))));

    assert_eq!(engine.search_labels("law", None, 10).unwrap(), before);
}

/// INVARIANT: an unreadable statement aborts the build; no partial graph
#[test]
fn ingest_error_aborts_build() {
    let statements: Vec<lmss_core::errors::Result<Statement>> = vec![
        Ok(Statement::class(iri("a"))),
        Err(LmssError::Ingest("truncated document".to_string())),
        Ok(Statement::class(iri("b"))),
    ];
    let result = ConceptGraphBuilder::from_statements(statements);
    assert!(matches!(result, Err(LmssError::Ingest(_))));
}

/// INVARIANT: built engines are shareable across threads
#[test]
fn engine_is_shareable() {
    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.search_labels("bank", Some("Area of Law"), 3).unwrap())
        })
        .collect();

    let outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

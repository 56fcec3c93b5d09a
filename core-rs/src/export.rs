//! Flattened concept export
//!
//! One CSV row per concept, multi-valued fields joined with `; `. Fields are
//! quoted when they contain a comma, quote or line break.

use crate::ontology::{Concept, ConceptGraph};

pub const CSV_HEADER: [&str; 6] = ["iri", "label", "alt_labels", "hidden_labels", "parents", "definitions"];

const LIST_SEPARATOR: &str = "; ";

/// Render every concept in IRI order as CSV with a header row
///
/// ```
/// use lmss_core::export::concepts_to_csv;
/// use lmss_core::{ConceptGraphBuilder, Predicate, Statement};
///
/// let statements = vec![
///     Statement::class("http://lmss.sali.org/A"),
///     Statement::literal("http://lmss.sali.org/A", Predicate::Label, "Area of Law"),
/// ];
/// let graph = ConceptGraphBuilder::from_source(&statements).unwrap();
///
/// assert_eq!(
///     concepts_to_csv(&graph),
///     "iri,label,alt_labels,hidden_labels,parents,definitions\nhttp://lmss.sali.org/A,Area of Law,,,,\n"
/// );
/// ```
pub fn concepts_to_csv(graph: &ConceptGraph) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');

    for concept in graph.iter() {
        let row = csv_row(concept);
        out.push_str(&row.iter().map(|field| quote(field)).collect::<Vec<_>>().join(","));
        out.push('\n');
    }

    out
}

fn csv_row(concept: &Concept) -> [String; 6] {
    [
        concept.iri.clone(),
        concept.label().unwrap_or_default().to_string(),
        join(concept.alt_labels.iter()),
        join(concept.hidden_labels.iter()),
        join(concept.parents.iter()),
        join(concept.definitions.iter()),
    ]
}

fn join<'a>(values: impl Iterator<Item = &'a String>) -> String {
    values.map(String::as_str).collect::<Vec<_>>().join(LIST_SEPARATOR)
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

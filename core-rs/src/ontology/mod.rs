/**
 * ontology module
 *
 * - vocabulary: recognized predicate IRIs and the concept fields they feed
 * - statement: subject/predicate/object statements
 * - source: statement sources (in-memory, RDF documents via Oxigraph)
 * - builder: single-pass statement ingestion into a concept graph
 * - graph: immutable concept arena with cycle-safe hierarchy traversal
 */

pub mod builder;
pub mod graph;
pub mod source;
pub mod statement;
pub mod vocabulary;

pub use builder::{ConceptGraphBuilder, IngestStats};
pub use graph::{Concept, ConceptGraph};
pub use source::{format_for_path, OxigraphSource, StatementSource};
pub use statement::{Object, Statement};
pub use vocabulary::{ConceptField, Predicate};

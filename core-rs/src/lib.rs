//! # LMSS Core - Legal ontology concept search
//!
//! Loads the SALI Legal Matter Standard Specification (LMSS) ontology into an
//! immutable concept graph and answers ranked label and definition searches
//! over it, optionally scoped to one of the ontology's key concepts (Area of
//! Law, Industry, Service, ...).
//!
//! ## Pipeline
//!
//! ```text
//! RDF document ──▶ StatementSource ──▶ ConceptGraphBuilder ──▶ ConceptGraph
//!                                                                  │
//!                          ┌───────────────────────┬───────────────┤
//!                          ▼                       ▼               ▼
//!                   TextIndex (labels)   TextIndex (definitions)  KeyConceptRegistry
//!                          └───────────────────────┴───────────────┘
//!                                          ▼
//!                                    SearchEngine
//! ```
//!
//! Everything after construction is read-only and `Send + Sync`; share an
//! engine through `Arc` and build a new one to pick up a new ontology version.
//!
//! ## Example
//!
//! ```no_run
//! use lmss_core::{LmssConfig, OntologyLoader, SearchEngine};
//!
//! # async fn run() -> lmss_core::errors::Result<()> {
//! let config = LmssConfig::default();
//! let source = OntologyLoader::new(config.spec.source.clone())?.load().await?;
//! let engine = SearchEngine::from_config(&source, &config)?;
//!
//! for result in engine.search_labels("maritime", Some("Area of Law"), 5)? {
//!     println!("{:>6.2} {}", result.distance, result.label.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diff;
pub mod errors;
pub mod export;
pub mod index;
pub mod loader;
pub mod ontology;
pub mod qa;
pub mod search;

pub use config::{KeyConceptEntry, LmssConfig, SearchSettings, SourceConfig};
pub use diff::{diff_graphs, DiffField, GraphDiff, Side};
pub use errors::LmssError;
pub use index::{FieldRole, SearchOptions, SearchResult, SimilarityKind, StringSimilarity, TextIndex};
pub use loader::{OntologyLoader, Origin};
pub use ontology::{
    Concept, ConceptGraph, ConceptGraphBuilder, IngestStats, Object, OxigraphSource, Predicate, Statement,
    StatementSource,
};
pub use qa::{Check, Finding, GraphQa};
pub use search::{KeyConceptRegistry, SearchEngine};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

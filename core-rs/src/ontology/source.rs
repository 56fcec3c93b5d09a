/**
 * source.rs
 * Statement sources: in-memory lists and RDF documents parsed with Oxigraph
 */

use oxigraph::io::RdfFormat;
use oxigraph::model::{Quad, Subject, Term};
use oxigraph::store::Store;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::statement::{Object, Statement};
use crate::errors::{LmssError, Result};

/// Anything that can yield a (possibly unordered) stream of statements
///
/// An `Err` item means the underlying document is unreadable; the graph
/// builder aborts on the first one.
pub trait StatementSource {
    fn statements(&self) -> Box<dyn Iterator<Item = Result<Statement>> + '_>;
}

impl StatementSource for Vec<Statement> {
    fn statements(&self) -> Box<dyn Iterator<Item = Result<Statement>> + '_> {
        Box::new(self.iter().cloned().map(Ok))
    }
}

impl StatementSource for [Statement] {
    fn statements(&self) -> Box<dyn Iterator<Item = Result<Statement>> + '_> {
        Box::new(self.iter().cloned().map(Ok))
    }
}

/// RDF document loaded into an in-memory Oxigraph store
pub struct OxigraphSource {
    store: Store,
}

impl OxigraphSource {
    /// Parse an RDF document (RDF/XML for the published LMSS artifact)
    pub fn from_bytes(data: &[u8], format: RdfFormat) -> Result<Self> {
        let store = Store::new()
            .map_err(|e| LmssError::Ingest(e.to_string()))?;

        store
            .load_from_reader(format, data)
            .map_err(|e| LmssError::Ingest(e.to_string()))?;

        debug!(format = ?format, bytes = data.len(), "loaded RDF document");
        Ok(Self { store })
    }

    /// Parse an RDF file, picking the format from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LmssError::Ingest(format!("File not found: {}", path.display())));
        }

        let format = format_for_path(path);
        let content = fs::read(path)?;
        Self::from_bytes(&content, format)
    }

    /// Number of quads held by the store
    pub fn len(&self) -> Result<usize> {
        self.store
            .len()
            .map_err(|e| LmssError::Ingest(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl StatementSource for OxigraphSource {
    fn statements(&self) -> Box<dyn Iterator<Item = Result<Statement>> + '_> {
        Box::new(self.store.iter().filter_map(|quad| match quad {
            Ok(quad) => statement_from_quad(&quad).map(Ok),
            Err(e) => Some(Err(LmssError::Ingest(e.to_string()))),
        }))
    }
}

/// Blank-node subjects and objects (OWL restrictions, axioms) carry nothing
/// the index needs, so they are skipped rather than reported.
fn statement_from_quad(quad: &Quad) -> Option<Statement> {
    let subject = match &quad.subject {
        Subject::NamedNode(node) => node.as_str().to_string(),
        _ => return None,
    };

    let object = match &quad.object {
        Term::NamedNode(node) => Object::Iri(node.as_str().to_string()),
        Term::Literal(literal) => Object::Literal(literal.value().to_string()),
        _ => return None,
    };

    Some(Statement::new(subject, quad.predicate.as_str(), object))
}

/// RDF serialization for a file extension; RDF/XML when unknown
pub fn format_for_path(path: &Path) -> RdfFormat {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "ttl" => RdfFormat::Turtle,
        "nt" => RdfFormat::NTriples,
        "nq" => RdfFormat::NQuads,
        "trig" => RdfFormat::TriG,
        "n3" => RdfFormat::N3,
        _ => RdfFormat::RdfXml,
    }
}

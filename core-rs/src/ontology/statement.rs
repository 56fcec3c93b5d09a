/**
 * statement.rs
 * Subject/predicate/object statements consumed by the graph builder
 */

use serde::{Deserialize, Serialize};

use super::vocabulary::{self, Predicate};

/// Object position of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Object {
    Iri(String),
    Literal(String),
}

impl Object {
    pub fn as_str(&self) -> &str {
        match self {
            Object::Iri(value) | Object::Literal(value) => value,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Object::Iri(iri) => Some(iri),
            Object::Literal(_) => None,
        }
    }
}

/// One ontology statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

impl Statement {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Object) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// `subject rdf:type owl:Class`
    pub fn class(subject: impl Into<String>) -> Self {
        Self::new(subject, vocabulary::RDF_TYPE, Object::Iri(vocabulary::OWL_CLASS.to_string()))
    }

    /// Literal-valued statement for a recognized predicate
    pub fn literal(subject: impl Into<String>, predicate: Predicate, value: impl Into<String>) -> Self {
        Self::new(subject, predicate.iri(), Object::Literal(value.into()))
    }

    /// `subject rdfs:subClassOf parent`
    pub fn subclass_of(subject: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(subject, vocabulary::RDFS_SUBCLASS_OF, Object::Iri(parent.into()))
    }

    pub fn recognized_predicate(&self) -> Option<Predicate> {
        Predicate::from_iri(&self.predicate)
    }

    pub fn is_class_declaration(&self) -> bool {
        self.predicate == vocabulary::RDF_TYPE && self.object.as_iri() == Some(vocabulary::OWL_CLASS)
    }
}

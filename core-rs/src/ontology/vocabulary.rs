//! Recognized ontology vocabulary
//!
//! Fixed mapping from predicate IRIs to the concept fields they populate.
//! Anything outside this table is ignored during ingestion.

use serde::{Deserialize, Serialize};

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
pub const SKOS_HIDDEN_LABEL: &str = "http://www.w3.org/2004/02/skos/core#hiddenLabel";
pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";

/// Predicates the graph builder understands
///
/// # Examples
///
/// ```
/// use lmss_core::ontology::Predicate;
///
/// assert_eq!(
///     Predicate::from_iri("http://www.w3.org/2004/02/skos/core#altLabel"),
///     Some(Predicate::AltLabel)
/// );
/// assert_eq!(Predicate::from_iri("http://purl.org/dc/elements/1.1/creator"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Predicate {
    /// rdf:type (a class declaration when the object is owl:Class)
    Type,

    /// rdfs:label
    Label,

    /// skos:prefLabel, folded into the same field as rdfs:label
    PrefLabel,

    /// skos:altLabel
    AltLabel,

    /// skos:hiddenLabel
    HiddenLabel,

    /// skos:definition
    Definition,

    /// rdfs:subClassOf
    SubClassOf,
}

impl Predicate {
    pub const ALL: [Predicate; 7] = [
        Self::Type,
        Self::Label,
        Self::PrefLabel,
        Self::AltLabel,
        Self::HiddenLabel,
        Self::Definition,
        Self::SubClassOf,
    ];

    #[must_use]
    pub const fn iri(&self) -> &'static str {
        match self {
            Self::Type => RDF_TYPE,
            Self::Label => RDFS_LABEL,
            Self::PrefLabel => SKOS_PREF_LABEL,
            Self::AltLabel => SKOS_ALT_LABEL,
            Self::HiddenLabel => SKOS_HIDDEN_LABEL,
            Self::Definition => SKOS_DEFINITION,
            Self::SubClassOf => RDFS_SUBCLASS_OF,
        }
    }

    #[must_use]
    pub fn from_iri(iri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.iri() == iri)
    }

    /// Concept field populated by this predicate, if it carries a literal
    #[must_use]
    pub const fn field(&self) -> Option<ConceptField> {
        match self {
            Self::Label | Self::PrefLabel => Some(ConceptField::Labels),
            Self::AltLabel => Some(ConceptField::AltLabels),
            Self::HiddenLabel => Some(ConceptField::HiddenLabels),
            Self::Definition => Some(ConceptField::Definitions),
            Self::Type | Self::SubClassOf => None,
        }
    }
}

/// Text-bearing fields of a concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptField {
    Labels,
    AltLabels,
    HiddenLabels,
    Definitions,
}

impl ConceptField {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Labels => "labels",
            Self::AltLabels => "alt_labels",
            Self::HiddenLabels => "hidden_labels",
            Self::Definitions => "definitions",
        }
    }
}

//! Search facade and key concept registry

pub mod engine;
pub mod registry;

pub use engine::SearchEngine;
pub use registry::KeyConceptRegistry;

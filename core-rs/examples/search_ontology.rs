/// Example: Search an LMSS ontology file
///
/// Loads a local OWL file, then runs a label search and a definition search,
/// optionally scoped to a key concept.
///
/// Usage:
///   cargo run --example search_ontology core-rs/tests/fixtures/mini_lmss.owl bank
///   cargo run --example search_ontology LMSS.owl "maritime" "Area of Law"

use lmss_core::{LmssConfig, OxigraphSource, SearchEngine};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: cargo run --example search_ontology <file.owl> <query> [key concept]");
        std::process::exit(1);
    }

    let source = OxigraphSource::from_path(&PathBuf::from(&args[1]))?;
    let engine = SearchEngine::from_config(&source, &LmssConfig::default())?;
    let concept_type = args.get(3).map(String::as_str);

    println!("Key concepts found: {}", engine.key_concepts().len());

    println!("\n── labels ──");
    for result in engine.search_labels(&args[2], concept_type, 10)? {
        println!("{:>7.2}  {}  <{}>", result.distance, result.label.unwrap_or_default(), result.iri);
    }

    println!("\n── definitions ──");
    for result in engine.search_definitions(&args[2], concept_type, 5)? {
        let definition = result.definitions.first().cloned().unwrap_or_default();
        println!("{:>7.2}  {}", result.distance, result.label.unwrap_or_default());
        println!("         {}", definition);
    }

    Ok(())
}

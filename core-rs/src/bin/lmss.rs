//! LMSS - legal ontology search CLI
//!
//! Command-line front end over the concept graph, search engine, QA checks
//! and version diff.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use lmss_core::config::DEFAULT_CONFIG_FILE;
use lmss_core::export::concepts_to_csv;
use lmss_core::{
    diff_graphs, Check, ConceptGraph, ConceptGraphBuilder, GraphQa, LmssConfig, OntologyLoader, SearchEngine,
    SearchOptions, SearchResult, SourceConfig,
};

#[derive(Parser)]
#[command(name = "lmss")]
#[command(version)]
#[command(about = "Search the SALI LMSS legal ontology", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./.lmss.yaml when present)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Local ontology file, overrides the configured source
    #[arg(long, global = true)]
    owl: Option<PathBuf>,

    /// Repository branch to fetch
    #[arg(long, global = true)]
    branch: Option<String>,

    /// Neither read nor write the ontology cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search concept labels (or definitions with --definitions)
    Search {
        query: String,
        /// Search definition texts instead of labels
        #[arg(long, short)]
        definitions: bool,
        /// Limit to a concept IRI or key concept name and its descendants
        #[arg(long = "type", short = 't')]
        concept_type: Option<String>,
        /// Levels below --type to include
        #[arg(long)]
        depth: Option<usize>,
        #[arg(long, short = 'n')]
        num_results: Option<usize>,
        /// Skip alternate labels
        #[arg(long)]
        no_alt: bool,
        /// Skip hidden labels
        #[arg(long)]
        no_hidden: bool,
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// List resolved key concepts
    KeyConcepts {
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// Show one concept
    Concept {
        iri: String,
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// List direct children of a concept
    Children { iri: String },
    /// List every concept under a key concept (name or IRI)
    Members {
        concept_type: String,
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Run quality checks
    Qa {
        /// Checks to skip
        #[arg(long, value_enum)]
        skip: Vec<QaCheck>,
        /// Check every concept, not only the LMSS namespace
        #[arg(long)]
        all_namespaces: bool,
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// Compare two ontology versions (branch=NAME[&url=URL] or file=PATH)
    Diff {
        left: String,
        right: String,
        #[arg(long, value_enum, default_value = "table")]
        format: Format,
    },
    /// Dump every concept
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write a default configuration file
    Init {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
    Yaml,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum QaCheck {
    Labels,
    LabelSources,
    Definitions,
    Punctuation,
    Duplicates,
    Cycles,
}

impl From<QaCheck> for Check {
    fn from(check: QaCheck) -> Self {
        match check {
            QaCheck::Labels => Check::Labels,
            QaCheck::LabelSources => Check::LabelSources,
            QaCheck::Definitions => Check::Definitions,
            QaCheck::Punctuation => Check::LabelPunctuation,
            QaCheck::Duplicates => Check::DuplicateLabels,
            QaCheck::Cycles => Check::Cycles,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init { path } = &cli.command {
        LmssConfig::default().save(path)?;
        println!("{} Wrote {}", "✓".green(), path.display());
        return Ok(());
    }

    let mut config = LmssConfig::discover(cli.config.as_deref(), &std::env::current_dir()?)?;
    if let Some(owl) = &cli.owl {
        config.spec.source.path = Some(owl.clone());
    }
    if let Some(branch) = &cli.branch {
        config.spec.source.branch = branch.clone();
    }
    if cli.no_cache {
        config.spec.source.use_cache = false;
    }

    match cli.command {
        Commands::Search {
            query,
            definitions,
            concept_type,
            depth,
            num_results,
            no_alt,
            no_hidden,
            format,
        } => {
            let engine = load_engine(&config).await?;

            let mut options = engine.default_options();
            options.concept_type = concept_type;
            if depth.is_some() {
                options.max_depth = depth;
            }
            if let Some(n) = num_results {
                options.num_results = n;
            }
            options.include_alt_labels = !no_alt;
            options.include_hidden_labels = !no_hidden;

            let results = search(&engine, &query, definitions, &options)?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&results)?),
                Format::Yaml => println!("{}", serde_yaml::to_string(&results)?),
                Format::Table => print_results(&results),
            }
        }

        Commands::KeyConcepts { format } => {
            let engine = load_engine(&config).await?;
            let key_concepts = engine.key_concepts();
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&key_concepts)?),
                Format::Yaml => println!("{}", serde_yaml::to_string(&key_concepts)?),
                Format::Table => {
                    println!("\n{:<28} {:<50}", "NAME".bold(), "IRI".bold());
                    println!("{}", "-".repeat(80));
                    for (name, iri) in &key_concepts {
                        println!("{:<28} {:<50}", name, iri);
                    }
                    println!("\nTotal: {} key concept(s)", key_concepts.len());
                }
            }
        }

        Commands::Concept { iri, format } => {
            let graph = load_graph(&config.spec.source).await?;
            let concept = graph.get(&iri)?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(concept)?),
                Format::Yaml => println!("{}", serde_yaml::to_string(concept)?),
                Format::Table => {
                    println!("\nConcept:     {}", concept.iri);
                    println!("Label:       {}", concept.label().unwrap_or("-"));
                    print_list("Alt labels", concept.alt_labels.iter());
                    print_list("Hidden", concept.hidden_labels.iter());
                    print_list("Parents", concept.parents.iter());
                    print_list("Children", graph.children(&iri)?.iter());
                    for definition in &concept.definitions {
                        println!("\n{}", definition);
                    }
                    println!();
                }
            }
        }

        Commands::Children { iri } => {
            let graph = load_graph(&config.spec.source).await?;
            print_concept_rows(&graph, graph.children(&iri)?.into_iter());
        }

        Commands::Members { concept_type, depth } => {
            let engine = load_engine(&config).await?;
            let members = engine.members(&concept_type, depth)?;
            let graph = engine.graph();
            print_concept_rows(&graph, members.iter().map(String::as_str));
        }

        Commands::Qa {
            skip,
            all_namespaces,
            format,
        } => {
            let graph = load_graph(&config.spec.source).await?;
            let skipped: Vec<Check> = skip.into_iter().map(Check::from).collect();
            let checks: Vec<Check> = Check::ALL.into_iter().filter(|c| !skipped.contains(c)).collect();

            let mut qa = GraphQa::new(&graph);
            if all_namespaces {
                qa = qa.with_namespace(None);
            }
            let findings = qa.run(&checks)?;

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&findings)?),
                Format::Yaml => println!("{}", serde_yaml::to_string(&findings)?),
                Format::Table => {
                    for finding in &findings {
                        println!("{}", finding);
                    }
                    println!("\nTotal: {} finding(s)", findings.len());
                }
            }
        }

        Commands::Diff { left, right, format } => {
            let left_source = parse_source_arg(&left, &config.spec.source)?;
            let right_source = parse_source_arg(&right, &config.spec.source)?;
            let left_graph = load_graph(&left_source).await?;
            let right_graph = load_graph(&right_source).await?;

            let diffs = diff_graphs(&left_graph, &right_graph);
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&diffs)?),
                Format::Yaml => println!("{}", serde_yaml::to_string(&diffs)?),
                Format::Table => {
                    for diff in &diffs {
                        println!("{}", diff);
                    }
                    println!("\nTotal: {} difference(s)", diffs.len());
                }
            }
        }

        Commands::Export { format, output } => {
            let graph = load_graph(&config.spec.source).await?;
            let concepts: Vec<_> = graph.iter().collect();
            let text = match format {
                ExportFormat::Csv => concepts_to_csv(&graph),
                ExportFormat::Json => serde_json::to_string_pretty(&concepts)?,
                ExportFormat::Yaml => serde_yaml::to_string(&concepts)?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    eprintln!("{} Exported {} concepts to {}", "✓".green(), concepts.len(), path.display());
                }
                None => println!("{}", text.trim_end()),
            }
        }

        Commands::Init { .. } => {}
    }

    Ok(())
}

async fn load_graph(source: &SourceConfig) -> Result<ConceptGraph, Box<dyn std::error::Error>> {
    let statements = OntologyLoader::new(source.clone())?.load().await?;
    Ok(ConceptGraphBuilder::from_source(&statements)?)
}

async fn load_engine(config: &LmssConfig) -> Result<SearchEngine, Box<dyn std::error::Error>> {
    let statements = OntologyLoader::new(config.spec.source.clone())?.load().await?;
    Ok(SearchEngine::from_config(&statements, config)?)
}

fn search(
    engine: &SearchEngine,
    query: &str,
    definitions: bool,
    options: &SearchOptions,
) -> lmss_core::errors::Result<Vec<SearchResult>> {
    if definitions {
        engine.search_definitions_with(query, options)
    } else {
        engine.search_labels_with(query, options)
    }
}

/// Parse `branch=NAME`, `branch=NAME&url=URL` or `file=PATH`
fn parse_source_arg(arg: &str, base: &SourceConfig) -> Result<SourceConfig, Box<dyn std::error::Error>> {
    let mut source = SourceConfig {
        path: None,
        ..base.clone()
    };
    let mut branch = false;

    for token in arg.split('&') {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| format!("Invalid source '{}': expected key=value", token))?;
        match key {
            "branch" => {
                source.branch = value.to_string();
                branch = true;
            }
            "url" => source.repo_url = value.to_string(),
            "file" => source.path = Some(PathBuf::from(value)),
            _ => return Err(format!("Unknown source key '{}' in '{}'", key, arg).into()),
        }
    }

    if branch && source.path.is_some() {
        return Err(format!("Cannot pass both branch and file: {}", arg).into());
    }
    if !branch && source.path.is_none() {
        return Err(format!("Invalid source '{}': need branch= or file=", arg).into());
    }
    // different branches must not share one cache file
    if branch {
        source.cache_path = None;
    }

    Ok(source)
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No matching concepts.");
        return;
    }

    println!(
        "\n{:>7} {:<5} {:<40} {:<50}",
        "SCORE".bold(),
        "KIND".bold(),
        "LABEL".bold(),
        "IRI".bold()
    );
    println!("{}", "-".repeat(104));

    for result in results {
        let kind = if result.exact {
            "exact"
        } else if result.substring {
            "sub"
        } else {
            "fuzzy"
        };
        println!(
            "{:>7.2} {:<5} {:<40} {:<50}",
            result.distance,
            kind,
            truncate(result.label.as_deref().unwrap_or("-"), 40),
            result.iri
        );
    }

    println!("\nTotal: {} result(s)", results.len());
}

fn print_concept_rows<'a>(graph: &ConceptGraph, iris: impl Iterator<Item = &'a str>) {
    println!("\n{:<50} {:<40}", "IRI".bold(), "LABEL".bold());
    println!("{}", "-".repeat(90));

    let mut count = 0;
    for iri in iris {
        let label = graph.find(iri).and_then(|c| c.label()).unwrap_or("-");
        println!("{:<50} {:<40}", iri, label);
        count += 1;
    }

    println!("\nTotal: {} concept(s)", count);
}

fn print_list<I, S>(title: &str, items: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    if !items.is_empty() {
        println!("{:<12} {}", format!("{}:", title), items.join(", "));
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

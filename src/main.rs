use anyhow::Context;
use clap::Parser;
use codesearch::ui::cli::{Cli, Commands, StrategyArg};
use codesearch::{CodeIndex, CodeSearch, Config, SearchResult};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let index_path = match cli.index {
        Some(path) => path,
        None => default_index_path()?,
    };
    let index = CodeIndex::from_json_file(&index_path)
        .with_context(|| format!("Failed to load index from {}", index_path.display()))?;

    let search = CodeSearch::new(index, &config);

    match cli.command {
        Commands::Search {
            query,
            strategy,
            limit,
        } => {
            let results = match strategy {
                StrategyArg::Hybrid => search.hybrid_search(&query, limit),
                StrategyArg::Semantic => search.semantic_search(&query, limit),
                StrategyArg::Keyword => search.keyword_search(&query, limit),
            };
            print_results(&results);
        }
        Commands::Name { name, exact } => {
            print_results(&search.search_by_name(&name, exact));
        }
        Commands::Type {
            element_type,
            query,
            limit,
        } => {
            print_results(&search.search_by_type(&element_type, query.as_deref(), limit));
        }
        Commands::Codebase {
            codebase,
            query,
            limit,
        } => {
            print_results(&search.search_by_codebase(&codebase, query.as_deref(), limit));
        }
        Commands::Stats => print_stats(&search),
    }

    Ok(())
}

fn default_index_path() -> anyhow::Result<PathBuf> {
    let base = Config::default_base_dir().context("No --index given")?;
    Ok(base.join("index.json"))
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    println!("Found {} results:", results.len());
    for (i, result) in results.iter().enumerate() {
        let element = &result.element;
        println!(
            "\n{}. {} [{}] in {} (score: {:.3}, {})",
            i + 1,
            element.name,
            element.element_type,
            element.codebase,
            result.score,
            result.match_type
        );
        println!("   {}", element.signature);
        if let Some(doc) = element.doc() {
            let preview: String = doc.chars().take(120).collect();
            println!("   {}", preview);
        }
        if !result.matched_terms.is_empty() {
            let terms: Vec<&str> = result.matched_terms.iter().map(String::as_str).collect();
            println!("   Matched: {}", terms.join(", "));
        }
    }
}

fn print_stats(search: &CodeSearch) {
    let index = search.index();
    println!("Elements: {}", index.len());
    for codebase in index.codebases() {
        let count = index.iter().filter(|e| e.codebase == codebase).count();
        println!("  {}: {}", codebase, count);
    }
    println!(
        "Semantic search: {}",
        if search.is_semantic_available() {
            "TF-IDF"
        } else {
            "unavailable (keyword fallback)"
        }
    );
}

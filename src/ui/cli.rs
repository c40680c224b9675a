use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// codesearch - Ranked retrieval over an indexed codebase
#[derive(Parser, Debug)]
#[command(name = "codesearch")]
#[command(about = "Search functions, classes and methods of an indexed codebase", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Code index JSON file (default: ~/.codesearch/index.json)
    #[arg(long, global = true)]
    pub index: Option<PathBuf>,

    /// Config file (default: ~/.codesearch/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Free-text search
    Search {
        query: String,
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Hybrid)]
        strategy: StrategyArg,
        /// Maximum number of results to return
        #[arg(short, long, default_value_t = 10, value_parser = parse_limit)]
        limit: usize,
    },
    /// Look up elements by name
    Name {
        name: String,
        /// Require the whole name to match
        #[arg(short, long)]
        exact: bool,
    },
    /// List elements of one type, optionally ranked by a query
    Type {
        element_type: String,
        query: Option<String>,
        #[arg(short, long, default_value_t = 10, value_parser = parse_limit)]
        limit: usize,
    },
    /// List elements of one codebase, optionally ranked by a query
    Codebase {
        codebase: String,
        query: Option<String>,
        #[arg(short, long, default_value_t = 10, value_parser = parse_limit)]
        limit: usize,
    },
    /// Show index statistics
    Stats,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    Hybrid,
    Semantic,
    Keyword,
}

fn parse_limit(s: &str) -> std::result::Result<usize, String> {
    let limit: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if limit == 0 {
        return Err("limit must be at least 1".to_string());
    }
    Ok(limit)
}

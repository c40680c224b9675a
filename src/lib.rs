// Core functionality
pub mod core {
    pub mod config;
    pub mod error;
}

// Code index handed over by the indexing collaborator
pub mod indexing {
    pub mod element;
    pub mod loader;
}

// Retrieval
pub mod search {
    pub mod backend;
    pub mod cache;
    pub mod combine;
    pub mod engine;
    pub mod keywords;
    pub mod tfidf;
    pub mod types;
}

// User interfaces
pub mod ui {
    pub mod cli;
}

// Re-export commonly used types
pub use core::config::{Config, RankingConfig, VectorizerConfig};
pub use core::error::{Error, Result};
pub use indexing::element::{CodeElement, CodeIndex};
pub use search::backend::{SemanticBackend, VectorSpace};
pub use search::cache::{CacheKey, QueryCache, Strategy};
pub use search::combine::{combine_results, rank_results};
pub use search::engine::CodeSearch;
pub use search::keywords::extract_keywords;
pub use search::tfidf::{TfidfIndex, TfidfVectorizer};
pub use search::types::{MatchType, SearchResult};
pub use ui::cli::Cli;

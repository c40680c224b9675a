use super::types::SearchResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use tracing::debug;

/// Search strategy a cached entry was produced by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Semantic,
    Keyword,
    Hybrid,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Semantic => "semantic",
            Strategy::Keyword => "keyword",
            Strategy::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Raw query text, strategy and requested count identify an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub strategy: Strategy,
    pub query: String,
    pub top_k: usize,
}

impl CacheKey {
    pub fn new(strategy: Strategy, query: &str, top_k: usize) -> Self {
        Self {
            strategy,
            query: query.to_string(),
            top_k,
        }
    }
}

/// Unbounded query-result cache.
///
/// Entries never expire. Whoever rebuilds the index must call `clear`.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<CacheKey, Vec<SearchResult>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let hit = entries.get(key).cloned();
        if hit.is_some() {
            debug!("Cache hit for {} query '{}' (top_k={})", key.strategy, key.query, key.top_k);
        }
        hit
    }

    pub fn insert(&self, key: CacheKey, results: Vec<SearchResult>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, results);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        debug!("Clearing {} cached queries", entries.len());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::element::CodeElement;
    use crate::search::types::MatchType;
    use std::sync::Arc;

    fn results() -> Vec<SearchResult> {
        let element = Arc::new(CodeElement::new("parse", "function", "core", "", None, ""));
        vec![SearchResult::new(element, 1.5, MatchType::Keyword, Default::default())]
    }

    #[test]
    fn test_insert_lookup_clear() {
        let cache = QueryCache::new();
        let key = CacheKey::new(Strategy::Hybrid, "parse", 5);
        assert!(cache.lookup(&key).is_none());

        cache.insert(key.clone(), results());
        assert_eq!(cache.lookup(&key), Some(results()));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.lookup(&key).is_none());
    }

    #[test]
    fn test_key_components_are_distinct() {
        let cache = QueryCache::new();
        cache.insert(CacheKey::new(Strategy::Hybrid, "parse", 5), results());

        assert!(cache.lookup(&CacheKey::new(Strategy::Hybrid, "parse", 10)).is_none());
        assert!(cache.lookup(&CacheKey::new(Strategy::Keyword, "parse", 5)).is_none());
        assert!(cache.lookup(&CacheKey::new(Strategy::Hybrid, "Parse", 5)).is_none());
    }
}

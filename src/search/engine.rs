use super::backend::{top_hits, VectorSpace};
use super::cache::{CacheKey, QueryCache, Strategy};
use super::combine;
use super::keywords::{extract_keywords, matched_terms, rank_elements};
use super::types::{sort_by_score, MatchType, SearchResult};
use crate::core::config::{Config, RankingConfig};
use crate::core::error::{Error, Result};
use crate::indexing::element::{CodeElement, CodeIndex};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Search orchestrator over a read-only code index
pub struct CodeSearch {
    index: CodeIndex,
    vector_space: VectorSpace,
    cache: QueryCache,
    ranking: RankingConfig,
}

impl CodeSearch {
    /// Build the vector space eagerly and start with an empty cache
    pub fn new(index: CodeIndex, config: &Config) -> Self {
        let vector_space = VectorSpace::build(&index, config);
        Self::with_vector_space(index, vector_space, config.ranking.clone())
    }

    pub fn with_vector_space(
        index: CodeIndex,
        vector_space: VectorSpace,
        ranking: RankingConfig,
    ) -> Self {
        info!(
            "Search initialized with {} elements (TF-IDF: {})",
            index.len(),
            vector_space.is_available()
        );
        Self {
            index,
            vector_space,
            cache: QueryCache::new(),
            ranking,
        }
    }

    pub fn index(&self) -> &CodeIndex {
        &self.index
    }

    pub fn is_semantic_available(&self) -> bool {
        self.vector_space.is_available()
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    /// Vector-space search; falls back to keyword search when the space is
    /// unavailable or the query fails.
    pub fn semantic_search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        if top_k == 0 {
            return Vec::new();
        }

        match self.try_semantic(query, top_k) {
            Some(Ok(results)) => results,
            Some(Err(e)) => {
                warn!("Semantic search failed, using keyword search: {}", e);
                self.keyword_search(query, top_k)
            }
            None => self.keyword_search(query, top_k),
        }
    }

    fn try_semantic(&self, query: &str, top_k: usize) -> Option<Result<Vec<SearchResult>>> {
        let backend = self.vector_space.backend()?;
        Some(backend.similarities(query).and_then(|similarities| {
            if similarities.len() != self.index.len() {
                return Err(Error::Vector(format!(
                    "{} returned {} similarities for {} elements",
                    backend.name(),
                    similarities.len(),
                    self.index.len()
                )));
            }
            if let Some(position) = similarities.iter().position(|s| !s.is_finite()) {
                return Err(Error::Vector(format!(
                    "{} returned a non-finite similarity for element {}",
                    backend.name(),
                    position
                )));
            }

            let keywords = extract_keywords(query);
            let results = top_hits(&similarities, top_k)
                .into_iter()
                .filter_map(|(position, score)| {
                    let element = self.index.get(position)?;
                    let terms = match backend.document(position) {
                        Some(text) => matched_terms(&keywords, text),
                        None => matched_terms(&keywords, &element.search_text()),
                    };
                    Some(SearchResult::new(
                        Arc::clone(element),
                        score,
                        MatchType::Semantic,
                        terms,
                    ))
                })
                .collect();
            Ok(results)
        }))
    }

    /// Field-weighted keyword search over the whole index
    pub fn keyword_search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        let keywords = extract_keywords(query);
        rank_elements(self.index.iter(), &keywords, MatchType::Keyword, top_k)
    }

    /// Semantic and keyword candidates merged, re-ranked and cached
    pub fn hybrid_search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        let key = CacheKey::new(Strategy::Hybrid, query, top_k);
        if let Some(cached) = self.cache.lookup(&key) {
            return cached;
        }

        let results = if self.vector_space.is_available() {
            let candidates = top_k.saturating_mul(2);
            let semantic = self.semantic_search(query, candidates);
            let keyword = self.keyword_search(query, candidates);
            debug!(
                "Hybrid candidates for '{}': {} semantic, {} keyword",
                query,
                semantic.len(),
                keyword.len()
            );

            let combined = combine::combine_results(&semantic, &keyword);
            let mut ranked = combine::rank_results(combined, query, &self.ranking);
            ranked.truncate(top_k);
            ranked
        } else {
            self.keyword_search(query, top_k)
        };

        self.cache.insert(key, results.clone());
        results
    }

    /// Case-insensitive name lookup, exact or substring
    pub fn search_by_name(&self, name: &str, exact: bool) -> Vec<SearchResult> {
        let needle = name.to_lowercase();
        let terms: BTreeSet<String> = std::iter::once(name.to_string()).collect();

        let mut results: Vec<SearchResult> = self
            .index
            .iter()
            .filter_map(|element| {
                let candidate = element.name.to_lowercase();
                let (score, match_type) = if exact {
                    if candidate != needle {
                        return None;
                    }
                    (1.0, MatchType::Exact)
                } else {
                    if !candidate.contains(&needle) {
                        return None;
                    }
                    (name_specificity(name, &element.name), MatchType::Name)
                };
                Some(SearchResult::new(
                    Arc::clone(element),
                    score,
                    match_type,
                    terms.clone(),
                ))
            })
            .collect();

        sort_by_score(&mut results);
        results
    }

    /// Elements of one type, optionally keyword-ranked by `query`
    pub fn search_by_type(
        &self,
        element_type: &str,
        query: Option<&str>,
        top_k: usize,
    ) -> Vec<SearchResult> {
        self.filtered_search(
            |e| e.element_type == element_type,
            query,
            top_k,
            MatchType::Type,
        )
    }

    /// Elements of one codebase, optionally keyword-ranked by `query`
    pub fn search_by_codebase(
        &self,
        codebase: &str,
        query: Option<&str>,
        top_k: usize,
    ) -> Vec<SearchResult> {
        self.filtered_search(
            |e| e.codebase == codebase,
            query,
            top_k,
            MatchType::Codebase,
        )
    }

    fn filtered_search<F>(
        &self,
        predicate: F,
        query: Option<&str>,
        top_k: usize,
        match_type: MatchType,
    ) -> Vec<SearchResult>
    where
        F: Fn(&Arc<CodeElement>) -> bool,
    {
        let filtered = self.index.iter().filter(|e| predicate(*e));

        match query.filter(|q| !q.is_empty()) {
            Some(query) => {
                let keywords = extract_keywords(query);
                rank_elements(filtered, &keywords, match_type, top_k)
            }
            None => filtered
                .take(top_k)
                .map(|e| SearchResult::new(Arc::clone(e), 1.0, match_type, BTreeSet::new()))
                .collect(),
        }
    }

    /// Apply the re-ranking boosts to an arbitrary result list
    pub fn rank_results(&self, results: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
        combine::rank_results(results, query, &self.ranking)
    }

    /// Drop every cached result; call after the index changes
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Query length over name length, in characters
fn name_specificity(query: &str, name: &str) -> f64 {
    let name_len = name.chars().count();
    if name_len == 0 {
        return 1.0;
    }
    query.chars().count() as f64 / name_len as f64
}

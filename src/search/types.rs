use crate::indexing::element::CodeElement;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Which strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Name,
    Type,
    Codebase,
    Keyword,
    Semantic,
    Hybrid,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Name => "name",
            MatchType::Type => "type",
            MatchType::Codebase => "codebase",
            MatchType::Keyword => "keyword",
            MatchType::Semantic => "semantic",
            MatchType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ranked hit. `element` is shared with the index, never copied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub element: Arc<CodeElement>,
    /// Strategy-dependent scale, not normalized across strategies
    pub score: f64,
    pub match_type: MatchType,
    pub matched_terms: BTreeSet<String>,
}

impl SearchResult {
    pub fn new(
        element: Arc<CodeElement>,
        score: f64,
        match_type: MatchType,
        matched_terms: BTreeSet<String>,
    ) -> Self {
        Self {
            element,
            score,
            match_type,
            matched_terms,
        }
    }

    /// Merge two hits for the same element found by different strategies.
    ///
    /// The boosted average rewards agreement between strategies.
    pub fn merged_with(&self, other: &SearchResult) -> SearchResult {
        SearchResult {
            element: Arc::clone(&self.element),
            score: (self.score + other.score) / 2.0 * 1.5,
            match_type: MatchType::Hybrid,
            matched_terms: self
                .matched_terms
                .union(&other.matched_terms)
                .cloned()
                .collect(),
        }
    }

    /// Same result with its score multiplied by `boost`
    pub fn boosted(&self, boost: f64) -> SearchResult {
        SearchResult {
            score: self.score * boost,
            ..self.clone()
        }
    }
}

/// Sort descending by score; equal scores keep their prior order.
pub(crate) fn sort_by_score(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: f64, terms: &[&str], match_type: MatchType) -> SearchResult {
        let element = Arc::new(CodeElement::new(
            "parse",
            "function",
            "core",
            "def parse()",
            None,
            "",
        ));
        SearchResult::new(
            element,
            score,
            match_type,
            terms.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn test_merge_boosted_average() {
        let semantic = result(0.4, &["parse"], MatchType::Semantic);
        let keyword = result(0.6, &["parse", "config"], MatchType::Keyword);

        let merged = semantic.merged_with(&keyword);
        assert!((merged.score - 0.75).abs() < 1e-12);
        assert_eq!(merged.match_type, MatchType::Hybrid);
        assert_eq!(merged.matched_terms.len(), 2);

        // inputs are left untouched
        assert_eq!(semantic.score, 0.4);
        assert_eq!(semantic.match_type, MatchType::Semantic);
        assert!(Arc::ptr_eq(&merged.element, &semantic.element));
    }

    #[test]
    fn test_match_type_serializes_lowercase() {
        let json = serde_json::to_string(&MatchType::Hybrid).unwrap();
        assert_eq!(json, "\"hybrid\"");
        assert_eq!(MatchType::Codebase.to_string(), "codebase");
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut results = vec![
            result(1.0, &["a"], MatchType::Keyword),
            result(2.0, &["b"], MatchType::Keyword),
            result(1.0, &["c"], MatchType::Keyword),
        ];
        sort_by_score(&mut results);
        let order: Vec<&str> = results
            .iter()
            .map(|r| r.matched_terms.iter().next().unwrap().as_str())
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }
}

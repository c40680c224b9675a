//! Merging result sets from different strategies and the heuristic re-rank.

use super::types::{sort_by_score, SearchResult};
use crate::core::config::RankingConfig;
use std::collections::HashMap;

/// Merge semantic and keyword hits, deduplicating by `(codebase, name)`.
///
/// Semantic results seed the output in their order, then keyword results
/// follow. A hit whose identity is already present merges into that entry;
/// otherwise it is appended.
pub fn combine_results(semantic: &[SearchResult], keyword: &[SearchResult]) -> Vec<SearchResult> {
    let mut combined: Vec<SearchResult> = Vec::with_capacity(semantic.len() + keyword.len());
    let mut positions: HashMap<(String, String), usize> = HashMap::new();

    for result in semantic.iter().chain(keyword) {
        let (codebase, name) = result.element.identity();
        let key = (codebase.to_string(), name.to_string());

        match positions.get(&key) {
            Some(&pos) => {
                let merged = combined[pos].merged_with(result);
                combined[pos] = merged;
            }
            None => {
                positions.insert(key, combined.len());
                combined.push(result.clone());
            }
        }
    }

    combined
}

/// Multiplicative boost for one result against `query`
pub fn boost_for(result: &SearchResult, query: &str, ranking: &RankingConfig) -> f64 {
    let query = query.to_lowercase();
    let element = &result.element;
    let name = element.name.to_lowercase();
    let mut boost = 1.0;

    if name == query {
        boost *= 2.0;
    } else if name.contains(&query) {
        boost *= 1.5;
    }

    if let Some(doc) = element.doc() {
        if doc.to_lowercase().contains(&query) {
            boost *= 1.3;
        }
    }

    if matches!(element.element_type.as_str(), "class" | "function") {
        boost *= 1.2;
    }

    if ranking.is_preferred(&element.codebase) {
        boost *= 1.1;
    }

    boost
}

/// Apply heuristic boosts and sort descending (stable)
pub fn rank_results(
    results: Vec<SearchResult>,
    query: &str,
    ranking: &RankingConfig,
) -> Vec<SearchResult> {
    let mut ranked: Vec<SearchResult> = results
        .into_iter()
        .map(|r| {
            let boost = boost_for(&r, query, ranking);
            r.boosted(boost)
        })
        .collect();

    sort_by_score(&mut ranked);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::element::CodeElement;
    use crate::search::types::MatchType;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn result(
        name: &str,
        element_type: &str,
        codebase: &str,
        docstring: Option<&str>,
        score: f64,
        match_type: MatchType,
        terms: &[&str],
    ) -> SearchResult {
        let element = Arc::new(CodeElement::new(
            name,
            element_type,
            codebase,
            "",
            docstring.map(str::to_string),
            "",
        ));
        let terms: BTreeSet<String> = terms.iter().map(|t| t.to_string()).collect();
        SearchResult::new(element, score, match_type, terms)
    }

    fn no_preference() -> RankingConfig {
        RankingConfig {
            preferred_codebases: Vec::new(),
        }
    }

    #[test]
    fn test_combine_merges_duplicates() {
        let semantic = vec![
            result("parse", "function", "core", None, 0.4, MatchType::Semantic, &["parse"]),
            result("load", "function", "core", None, 0.3, MatchType::Semantic, &[]),
        ];
        let keyword = vec![
            result("parse", "function", "core", None, 0.6, MatchType::Keyword, &["config"]),
            result("dump", "function", "core", None, 2.0, MatchType::Keyword, &["dump"]),
        ];

        let combined = combine_results(&semantic, &keyword);
        assert_eq!(combined.len(), 3);

        let parse = &combined[0];
        assert!((parse.score - 0.75).abs() < 1e-12);
        assert_eq!(parse.match_type, MatchType::Hybrid);
        assert_eq!(parse.matched_terms.len(), 2);

        assert_eq!(combined[1].match_type, MatchType::Semantic);
        assert_eq!(combined[2].element.name, "dump");
        assert_eq!(combined[2].match_type, MatchType::Keyword);
    }

    #[test]
    fn test_combine_merges_semantic_collisions() {
        let semantic = vec![
            result("run", "function", "core", None, 0.4, MatchType::Semantic, &["run"]),
            result("run", "method", "core", None, 0.3, MatchType::Semantic, &["task"]),
        ];

        let combined = combine_results(&semantic, &[]);
        assert_eq!(combined.len(), 1);
        assert!((combined[0].score - (0.4 + 0.3) / 2.0 * 1.5).abs() < 1e-12);
        assert_eq!(combined[0].match_type, MatchType::Hybrid);
        assert_eq!(combined[0].matched_terms.len(), 2);
    }

    #[test]
    fn test_combine_identity_includes_codebase() {
        let semantic = vec![result("run", "function", "core", None, 0.5, MatchType::Semantic, &[])];
        let keyword = vec![result("run", "function", "cli", None, 1.0, MatchType::Keyword, &[])];
        assert_eq!(combine_results(&semantic, &keyword).len(), 2);
    }

    #[test]
    fn test_boost_factors() {
        let ranking = no_preference();

        let exact = result("Parse", "method", "x", None, 1.0, MatchType::Keyword, &[]);
        assert!((boost_for(&exact, "parse", &ranking) - 2.0).abs() < 1e-12);

        let contains = result("parse_all", "method", "x", None, 1.0, MatchType::Keyword, &[]);
        assert!((boost_for(&contains, "parse", &ranking) - 1.5).abs() < 1e-12);

        let doc = result("run", "method", "x", Some("Will PARSE input"), 1.0, MatchType::Keyword, &[]);
        assert!((boost_for(&doc, "parse", &ranking) - 1.3).abs() < 1e-12);

        let class = result("Runner", "class", "x", None, 1.0, MatchType::Keyword, &[]);
        assert!((boost_for(&class, "parse", &ranking) - 1.2).abs() < 1e-12);

        let preferred = result("run", "method", "dspy", None, 1.0, MatchType::Keyword, &[]);
        let boost = boost_for(&preferred, "parse", &RankingConfig::default());
        assert!((boost - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_boosts_compound() {
        let all = result(
            "parse",
            "function",
            "dspy",
            Some("parse things"),
            1.0,
            MatchType::Keyword,
            &[],
        );
        let boost = boost_for(&all, "parse", &RankingConfig::default());
        assert!((boost - 2.0 * 1.3 * 1.2 * 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_rank_sorts_and_keeps_ties_stable() {
        let results = vec![
            result("alpha", "method", "x", None, 1.0, MatchType::Keyword, &[]),
            result("beta", "method", "x", None, 1.0, MatchType::Keyword, &[]),
            result("gamma", "function", "x", None, 1.0, MatchType::Keyword, &[]),
        ];
        let ranked = rank_results(results, "zzz", &no_preference());
        let names: Vec<&str> = ranked.iter().map(|r| r.element.name.as_str()).collect();
        assert_eq!(names, vec!["gamma", "alpha", "beta"]);
        assert!((ranked[0].score - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_results(Vec::new(), "query", &no_preference()).is_empty());
    }
}

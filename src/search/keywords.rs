//! Field-weighted keyword matching.
//!
//! Used directly by keyword search, by the type/codebase filters, and as the
//! fallback whenever the vector space cannot answer a query.

use super::types::{sort_by_score, MatchType, SearchResult};
use crate::indexing::element::CodeElement;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

pub const NAME_WEIGHT: f64 = 3.0;
pub const DOCSTRING_WEIGHT: f64 = 2.0;
pub const SIGNATURE_WEIGHT: f64 = 1.5;
pub const CODE_WEIGHT: f64 = 0.5;

/// Query words that carry no search signal
const QUERY_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "be", "how", "do", "does", "i", "you", "use",
    "using", "create", "make",
];

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w+").expect("static regex"))
}

/// Lowercased query words longer than two characters, minus stop words.
/// Duplicates are dropped; first occurrence wins.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for word in word_pattern().find_iter(&lowered).map(|m| m.as_str()) {
        if word.chars().count() <= 2 || QUERY_STOP_WORDS.contains(&word) {
            continue;
        }
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }

    keywords
}

/// Keywords occurring (as substrings) in `text`, compared case-insensitively
pub fn matched_terms(keywords: &[String], text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .filter(|kw| lowered.contains(kw.as_str()))
        .cloned()
        .collect()
}

/// Score of one element and the keywords that hit at least one field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeywordScore {
    pub score: f64,
    pub hits: BTreeSet<String>,
}

/// Add a field weight once per keyword present in that field.
///
/// Matching is plain substring containment, so "art" also hits "start".
pub fn score_element(element: &CodeElement, keywords: &[String]) -> KeywordScore {
    let mut result = KeywordScore::default();

    let name = element.name.to_lowercase();
    let docstring = element.doc().map(str::to_lowercase);
    let signature = element.signature.to_lowercase();
    let code = element.code.to_lowercase();

    let fields: [(Option<&str>, f64); 4] = [
        (Some(name.as_str()), NAME_WEIGHT),
        (docstring.as_deref(), DOCSTRING_WEIGHT),
        (Some(signature.as_str()), SIGNATURE_WEIGHT),
        (Some(code.as_str()), CODE_WEIGHT),
    ];

    for keyword in keywords {
        for &(field, weight) in fields.iter() {
            if let Some(text) = field {
                if text.contains(keyword.as_str()) {
                    result.score += weight;
                    result.hits.insert(keyword.clone());
                }
            }
        }
    }

    result
}

/// Score `elements`, drop zero scores, sort descending (ties keep input
/// order) and keep the first `top_k`.
pub fn rank_elements<'a, I>(
    elements: I,
    keywords: &[String],
    match_type: MatchType,
    top_k: usize,
) -> Vec<SearchResult>
where
    I: IntoIterator<Item = &'a Arc<CodeElement>>,
{
    if keywords.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = elements
        .into_iter()
        .filter_map(|element| {
            let scored = score_element(element, keywords);
            (scored.score > 0.0).then(|| {
                SearchResult::new(Arc::clone(element), scored.score, match_type, scored.hits)
            })
        })
        .collect();

    sort_by_score(&mut results);
    results.truncate(top_k);
    results
}

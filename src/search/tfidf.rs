//! TF-IDF vector space over the search text of every element.
//!
//! Term weighting follows the usual smoothed formulation: raw term counts
//! times `ln((1 + n) / (1 + df)) + 1`, each row L2-normalized, similarity is
//! the dot product of normalized rows.

use super::backend::SemanticBackend;
use crate::core::config::VectorizerConfig;
use crate::core::error::{Error, Result};
use crate::indexing::element::CodeIndex;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;
use tracing::info;

/// Sparse row: (term id, weight) sorted by term id
pub type SparseVector = Vec<(usize, f64)>;

/// English stop words removed before n-grams are built
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg", "eight",
    "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty",
    "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found",
    "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt",
    "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if",
    "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep", "last",
    "latter", "latterly", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile",
    "might", "mill", "mine", "more", "moreover", "most", "mostly", "move", "much", "must",
    "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next", "nine",
    "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off",
    "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
    "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please",
    "put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious",
    "several", "she", "should", "show", "side", "since", "sincere", "six", "sixty", "so",
    "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "system", "take", "ten", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
    "therein", "thereupon", "these", "they", "thick", "thin", "third", "this", "those",
    "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
    "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
    "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static regex"))
}

fn stop_words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| ENGLISH_STOP_WORDS.iter().copied().collect())
}

/// Lowercase, tokenize, drop stop words, then emit n-grams of every length
/// in `ngram_range` (joined by a single space).
pub fn analyze(text: &str, ngram_range: (usize, usize)) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !stop_words().contains(t))
        .collect();

    let (min_n, max_n) = ngram_range;
    let mut terms = Vec::new();
    for n in min_n.max(1)..=max_n {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

fn term_counts(terms: Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

fn normalize(vector: &mut SparseVector) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in vector.iter_mut() {
            *w /= norm;
        }
    }
}

/// Fitted vocabulary and idf weights
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary from `documents` and return their weighted rows.
    pub fn fit_transform(
        documents: &[String],
        config: &VectorizerConfig,
    ) -> Result<(Self, Vec<SparseVector>)> {
        if documents.is_empty() {
            return Err(Error::Vector("Cannot fit TF-IDF on an empty corpus".to_string()));
        }

        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| term_counts(analyze(doc, config.ngram_range)))
            .collect();

        // term -> (document frequency, corpus frequency)
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for doc in &counts {
            for (term, &count) in doc {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += count;
            }
        }

        let mut kept: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .filter(|(_, (df, _))| *df >= config.min_df)
            .map(|(term, (df, tf))| (term, df, tf))
            .collect();

        if kept.len() > config.max_features {
            // Highest corpus frequency first; the BTreeMap order breaks ties alphabetically
            kept.sort_by(|a, b| b.2.cmp(&a.2));
            kept.truncate(config.max_features);
            kept.sort_by(|a, b| a.0.cmp(&b.0));
        }

        if kept.is_empty() {
            return Err(Error::Vector(
                "Empty vocabulary; documents may only contain stop words".to_string(),
            ));
        }

        let n_docs = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (id, (term, df, _)) in kept.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), id);
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
        }

        let vectorizer = Self {
            ngram_range: config.ngram_range,
            vocabulary,
            idf,
        };
        let rows = counts.into_iter().map(|c| vectorizer.weigh(c)).collect();

        Ok((vectorizer, rows))
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Weighted, normalized vector for unseen text. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(term_counts(analyze(text, self.ngram_range)))
    }

    fn weigh(&self, counts: HashMap<String, usize>) -> SparseVector {
        let mut vector: SparseVector = counts
            .into_iter()
            .filter_map(|(term, count)| {
                let id = *self.vocabulary.get(&term)?;
                Some((id, count as f64 * self.idf[id]))
            })
            .collect();
        vector.sort_by_key(|(id, _)| *id);
        normalize(&mut vector);
        vector
    }
}

/// Dot product of two id-sorted sparse vectors
pub fn dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// TF-IDF matrix over an index, one row per element in index order
pub struct TfidfIndex {
    vectorizer: TfidfVectorizer,
    rows: Vec<SparseVector>,
    documents: Vec<String>,
}

impl TfidfIndex {
    pub fn build(index: &CodeIndex, config: &VectorizerConfig) -> Result<Self> {
        let documents: Vec<String> = index.iter().map(|e| e.search_text()).collect();
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(&documents, config)?;

        info!(
            "TF-IDF index built: ({} documents, {} features)",
            rows.len(),
            vectorizer.vocabulary_size()
        );

        Ok(Self {
            vectorizer,
            rows,
            documents,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }
}

impl SemanticBackend for TfidfIndex {
    fn name(&self) -> &str {
        "tfidf"
    }

    fn similarities(&self, query: &str) -> Result<Vec<f64>> {
        let query_vector = self.vectorizer.transform(query);
        Ok(self.rows.iter().map(|row| dot(row, &query_vector)).collect())
    }

    fn document(&self, position: usize) -> Option<&str> {
        self.documents.get(position).map(String::as_str)
    }
}

use super::tfidf::TfidfIndex;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::indexing::element::CodeIndex;
use tracing::warn;

/// Scores every indexed element against a query.
///
/// Implementations must return exactly one similarity per element, in
/// index order.
pub trait SemanticBackend: Send + Sync {
    fn name(&self) -> &str;

    fn similarities(&self, query: &str) -> Result<Vec<f64>>;

    /// Text the backend indexed for the element at `position`
    fn document(&self, position: usize) -> Option<&str>;
}

/// Whether semantic scoring is available for an index
pub enum VectorSpace {
    Available(Box<dyn SemanticBackend>),
    Unavailable { reason: String },
}

impl VectorSpace {
    /// Build the TF-IDF space, or record why it could not be built
    pub fn build(index: &CodeIndex, config: &Config) -> Self {
        if !config.use_tfidf {
            return VectorSpace::Unavailable {
                reason: "TF-IDF disabled by configuration".to_string(),
            };
        }

        match TfidfIndex::build(index, &config.vectorizer) {
            Ok(tfidf) => VectorSpace::Available(Box::new(tfidf)),
            Err(e) => {
                warn!("Could not build TF-IDF index, using keyword search: {}", e);
                VectorSpace::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, VectorSpace::Available(_))
    }

    pub fn backend(&self) -> Option<&dyn SemanticBackend> {
        match self {
            VectorSpace::Available(backend) => Some(backend.as_ref()),
            VectorSpace::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for VectorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorSpace::Available(backend) => {
                f.debug_tuple("Available").field(&backend.name()).finish()
            }
            VectorSpace::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Positions of the `top_k` highest positive similarities, best first.
/// Equal scores keep the lower position first.
pub fn top_hits(similarities: &[f64], top_k: usize) -> Vec<(usize, f64)> {
    let mut hits: Vec<(usize, f64)> = similarities
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| *score > 0.0)
        .collect();

    hits.sort_by(|a, b| b.1.total_cmp(&a.1));
    hits.truncate(top_k);
    hits
}

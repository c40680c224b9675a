use super::element::{CodeElement, CodeIndex};
use crate::core::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Accepted on-disk shapes: a bare array or `{"elements": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum IndexFile {
    Elements(Vec<CodeElement>),
    Wrapped { elements: Vec<CodeElement> },
}

impl CodeIndex {
    /// Parse an index produced by the indexing collaborator
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: IndexFile = serde_json::from_str(json)
            .map_err(|e| Error::Index(format!("Failed to parse code index: {}", e)))?;

        let elements = match file {
            IndexFile::Elements(elements) => elements,
            IndexFile::Wrapped { elements } => elements,
        };

        Ok(CodeIndex::new(elements))
    }

    /// Read and parse an index file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Index(format!(
                "Index file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One indexed unit of code (function, class, method, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeElement {
    pub name: String,
    /// Open set of kinds; only compared as an opaque string
    #[serde(rename = "type")]
    pub element_type: String,
    /// Source group the element was indexed from
    pub codebase: String,
    pub signature: String,
    #[serde(default)]
    pub docstring: Option<String>,
    pub code: String,
}

impl CodeElement {
    pub fn new(
        name: impl Into<String>,
        element_type: impl Into<String>,
        codebase: impl Into<String>,
        signature: impl Into<String>,
        docstring: Option<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            element_type: element_type.into(),
            codebase: codebase.into(),
            signature: signature.into(),
            docstring,
            code: code.into(),
        }
    }

    /// Identity used when merging results from different strategies
    pub fn identity(&self) -> (&str, &str) {
        (&self.codebase, &self.name)
    }

    /// Docstring if present and non-empty
    pub fn doc(&self) -> Option<&str> {
        self.docstring.as_deref().filter(|d| !d.is_empty())
    }

    /// Text fed to the vector space: name, docstring, signature and the first
    /// five lines of code, space-joined.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.name];
        if let Some(doc) = self.doc() {
            parts.push(doc);
        }
        parts.push(&self.signature);
        parts.extend(self.code.split('\n').take(5));
        parts.join(" ")
    }
}

/// Ordered, read-only collection of code elements.
///
/// Position in the collection is the element id used by the vector space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeIndex {
    elements: Vec<Arc<CodeElement>>,
}

impl CodeIndex {
    pub fn new(elements: Vec<CodeElement>) -> Self {
        Self {
            elements: elements.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn elements(&self) -> &[Arc<CodeElement>] {
        &self.elements
    }

    pub fn get(&self, position: usize) -> Option<&Arc<CodeElement>> {
        self.elements.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CodeElement>> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Distinct codebases in first-seen order
    pub fn codebases(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for element in &self.elements {
            if !seen.contains(&element.codebase.as_str()) {
                seen.push(&element.codebase);
            }
        }
        seen
    }
}

impl FromIterator<CodeElement> for CodeIndex {
    fn from_iter<I: IntoIterator<Item = CodeElement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(code: &str, docstring: Option<&str>) -> CodeElement {
        CodeElement::new(
            "load",
            "function",
            "core",
            "def load(path)",
            docstring.map(str::to_string),
            code,
        )
    }

    #[test]
    fn test_search_text_includes_docstring() {
        let elem = element("def load(path):\n    pass", Some("Load a file"));
        assert_eq!(
            elem.search_text(),
            "load Load a file def load(path) def load(path):     pass"
        );
    }

    #[test]
    fn test_search_text_skips_missing_docstring() {
        let elem = element("x = 1", None);
        assert_eq!(elem.search_text(), "load def load(path) x = 1");

        let elem = element("x = 1", Some(""));
        assert_eq!(elem.search_text(), "load def load(path) x = 1");
    }

    #[test]
    fn test_search_text_keeps_first_five_lines() {
        let code = "l1\nl2\nl3\nl4\nl5\nl6\nl7";
        let elem = element(code, None);
        let text = elem.search_text();
        assert!(text.ends_with("l1 l2 l3 l4 l5"));
        assert!(!text.contains("l6"));
    }

    #[test]
    fn test_index_preserves_order_and_codebases() {
        let index: CodeIndex = vec![
            CodeElement::new("a", "function", "core", "a()", None, ""),
            CodeElement::new("b", "class", "cli", "b", None, ""),
            CodeElement::new("c", "method", "core", "c()", None, ""),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(1).map(|e| e.name.as_str()), Some("b"));
        assert_eq!(index.codebases(), vec!["core", "cli"]);
        assert!(index.get(3).is_none());
    }
}

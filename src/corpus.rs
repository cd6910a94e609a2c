// Documents and the ordered corpus they form.
//
// Corpus order is significant: the i-th document becomes row and column i
// of every matrix built from it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single submission: its display label and the text pulled out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub label: String,
    pub text: String,
}

impl Document {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Ordered collection of documents compared against each other in one run.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document. Duplicate labels are kept but logged, since they
    /// make the matrix headers ambiguous.
    pub fn push(&mut self, document: Document) {
        if self.documents.iter().any(|d| d.label == document.label) {
            warn!(label = %document.label, "Duplicate document label in corpus");
        }
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn labels(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.label.clone()).collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.text.as_str()).collect()
    }

    /// Labels that occur more than once, in first-seen order.
    pub fn duplicate_labels(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for doc in &self.documents {
            if !seen.insert(doc.label.as_str()) && !dupes.contains(&doc.label) {
                dupes.push(doc.label.clone());
            }
        }
        dupes
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for doc in iter {
            corpus.push(doc);
        }
        corpus
    }
}

/// Derive a document label from a file name: directories and the final
/// extension are stripped (`"batch/alice_hw1.pdf"` -> `"alice_hw1"`).
pub fn label_from_filename(name: &str) -> String {
    // Archive entries always use '/', but local paths on Windows may not.
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| base.to_string())
}

// TF-IDF vectorization over a shared corpus vocabulary.
//
// Weighting follows the common smoothed formulation:
//
//   tf(t, d)  = raw count of term t in document d
//   idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//   w(t, d)   = tf(t, d) * idf(t), then L2-normalized per document
//
// The "+1" smoothing keeps terms that occur in every document from
// vanishing entirely, so two identical documents still score 100% even
// when they are the whole corpus.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tokenize::Tokenizer;
use super::traits::Vectorizer;
use crate::error::{CopyCatchError, Result};

/// Sparse document vector: `(term index, weight)` pairs sorted by term index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from arbitrary entries. Entries are sorted by index and
    /// zero weights dropped.
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(_, w)| w != 0.0);
        entries.sort_by_key(|&(i, _)| i);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
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

    /// Scale to unit length. Zero vectors are left untouched.
    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

/// An `n_docs x vocabulary.len()` TF-IDF matrix, one sparse row per document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfMatrix {
    /// Vocabulary terms, sorted; a term's position is its column index.
    pub vocabulary: Vec<String>,
    /// Smoothed IDF per vocabulary term.
    pub idf: Vec<f64>,
    /// One L2-normalized row per document, in corpus order.
    pub rows: Vec<SparseVector>,
}

impl TfIdfMatrix {
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of a term, if it made it into the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|t| t.as_str().cmp(term))
            .ok()
    }

    /// Indices of documents whose row is the zero vector.
    pub fn zero_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_zero())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Corpus-level TF-IDF vectorizer with English stop-word removal.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    pub tokenizer: Tokenizer,
}

impl TfIdfVectorizer {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn fit_transform(&self, texts: &[&str]) -> Result<TfIdfMatrix> {
        if texts.len() < 2 {
            return Err(CopyCatchError::EmptyInput { found: texts.len() });
        }

        // Term counts per document
        let counts: Vec<HashMap<String, usize>> = texts
            .iter()
            .map(|text| {
                let mut tf: HashMap<String, usize> = HashMap::new();
                for term in self.tokenizer.tokenize(text) {
                    *tf.entry(term).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        // Sorted vocabulary; BTreeSet gives us lexicographic column order
        let vocabulary: Vec<String> = counts
            .iter()
            .flat_map(|tf| tf.keys().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        // Document frequency per term
        let mut df = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for term in tf.keys() {
                df[index[term.as_str()]] += 1;
            }
        }

        let n = texts.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let rows: Vec<SparseVector> = counts
            .iter()
            .enumerate()
            .map(|(doc, tf)| {
                let entries = tf
                    .iter()
                    .map(|(term, &count)| {
                        let col = index[term.as_str()];
                        (col, count as f64 * idf[col])
                    })
                    .collect();
                let mut row = SparseVector::from_entries(entries);
                row.normalize();
                if row.is_zero() {
                    debug!(
                        document = doc,
                        "Document has no vocabulary terms; it will score 0 against everything"
                    );
                }
                row
            })
            .collect();

        debug!(
            documents = rows.len(),
            terms = vocabulary.len(),
            "Built TF-IDF matrix"
        );

        Ok(TfIdfMatrix {
            vocabulary,
            idf,
            rows,
        })
    }
}

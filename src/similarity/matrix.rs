// Pairwise cosine similarity, scaled to percent.
//
// Only the upper triangle is computed; the lower triangle is a mirror, so
// matrix[i][j] and matrix[j][i] are the same f64, not just close.

use serde::{Deserialize, Serialize};

use super::tfidf::{SparseVector, TfIdfMatrix};

/// Square N x N matrix of similarity percentages in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    /// Row-major values, `size * size` long.
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute the full similarity matrix for a set of document vectors.
    pub fn from_vectors(rows: &[SparseVector]) -> Self {
        let size = rows.len();
        let norms: Vec<f64> = rows.iter().map(SparseVector::norm).collect();
        let mut values = vec![0.0; size * size];

        for i in 0..size {
            // Self-similarity is exactly 100 for any document with content
            values[i * size + i] = if norms[i] > 0.0 { 100.0 } else { 0.0 };
            for j in (i + 1)..size {
                let sim = cosine_percent(&rows[i], norms[i], &rows[j], norms[j]);
                values[i * size + j] = sim;
                values[j * size + i] = sim;
            }
        }

        Self { size, values }
    }

    pub fn from_tfidf(matrix: &TfIdfMatrix) -> Self {
        Self::from_vectors(&matrix.rows)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Similarity between documents `i` and `j`. Panics if out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index ({i}, {j}) out of range");
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }
}

/// Cosine similarity of two vectors as a percentage.
///
/// Defined as 0 when either vector has zero magnitude, and clamped into
/// [0, 100] to absorb floating-point overshoot.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    cosine_percent(a, a.norm(), b, b.norm())
}

fn cosine_percent(a: &SparseVector, norm_a: f64, b: &SparseVector, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let cos = a.dot(b) / (norm_a * norm_b);
    (cos * 100.0).clamp(0.0, 100.0)
}

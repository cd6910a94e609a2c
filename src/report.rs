// Report building: labeled matrix plus thresholded pair list.
//
// The diagonal is masked (a document against itself says nothing), and
// every unordered pair is visited exactly once as (i, j) with i < j, so a
// pair can never be reported twice or against itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CopyCatchError, Result};
use crate::similarity::matrix::SimilarityMatrix;

/// Threshold used when none is configured, matching the original UI.
pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// A similarity cutoff in percent. Pairs must score strictly above it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(percent: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&percent) {
            // NaN fails the range check too
            return Err(CopyCatchError::InvalidThreshold(percent));
        }
        Ok(Self(percent))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_exceeded_by(self, similarity: f64) -> bool {
        similarity > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = CopyCatchError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> f64 {
        t.0
    }
}

/// Similarity matrix with document labels on both axes. Diagonal cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMatrix {
    pub labels: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl LabeledMatrix {
    /// Attach labels to a similarity matrix and mask its diagonal.
    pub fn new(similarity: &SimilarityMatrix, labels: &[String]) -> Result<Self> {
        let size = similarity.size();
        if labels.len() != size {
            return Err(CopyCatchError::LabelMismatch {
                labels: labels.len(),
                size,
            });
        }

        let cells = (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| (i != j).then(|| similarity.get(i, j)))
                    .collect()
            })
            .collect();

        Ok(Self {
            labels: labels.to_vec(),
            cells,
        })
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get(i).and_then(|row| row.get(j)).copied().flatten()
    }

    /// Look a cell up by label. With duplicate labels the first match wins.
    pub fn value(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.get(i, j)
    }
}

/// Two distinct documents whose similarity exceeded the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedPair {
    pub first: String,
    pub second: String,
    pub similarity: f64,
}

/// A document dropped from the run because its text could not be extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub label: String,
    pub reason: String,
}

/// Full outcome of one comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub threshold: Threshold,
    pub matrix: LabeledMatrix,
    /// Pairs above the threshold, in index order (i ascending, then j).
    pub pairs: Vec<ReportedPair>,
    /// Documents with no usable vocabulary; they score 0 against everything.
    pub degenerate: Vec<String>,
    /// Documents skipped under the skip-unreadable policy.
    pub skipped: Vec<SkippedDocument>,
}

impl Report {
    pub fn build(
        similarity: &SimilarityMatrix,
        labels: &[String],
        threshold: Threshold,
    ) -> Result<Self> {
        let matrix = LabeledMatrix::new(similarity, labels)?;
        let pairs = reported_pairs(similarity, labels, threshold)?;

        // A zero diagonal only happens for zero vectors
        let degenerate = (0..similarity.size())
            .filter(|&i| similarity.get(i, i) == 0.0)
            .map(|i| labels[i].clone())
            .collect();

        Ok(Self {
            generated_at: Utc::now(),
            threshold,
            matrix,
            pairs,
            degenerate,
            skipped: Vec::new(),
        })
    }

    /// Reported pairs ordered by similarity, highest first. Ties keep index order.
    pub fn top_pairs(&self) -> Vec<&ReportedPair> {
        let mut sorted: Vec<&ReportedPair> = self.pairs.iter().collect();
        sorted.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        sorted
    }
}

/// Every unordered pair (i < j) scoring strictly above `threshold`.
pub fn reported_pairs(
    similarity: &SimilarityMatrix,
    labels: &[String],
    threshold: Threshold,
) -> Result<Vec<ReportedPair>> {
    let n = similarity.size();
    if labels.len() != n {
        return Err(CopyCatchError::LabelMismatch {
            labels: labels.len(),
            size: n,
        });
    }

    let mut pairs = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let sim = similarity.get(i, j);
            if threshold.is_exceeded_by(sim) {
                pairs.push(ReportedPair {
                    first: labels[i].clone(),
                    second: labels[j].clone(),
                    similarity: sim,
                });
            }
        }
    }
    Ok(pairs)
}

// Two-document comparison: one original against one student submission.
//
// Produces the similarity percentage, a coarse verdict tier, and a line
// diff so the reader can see where the overlap actually is.

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

use crate::corpus::Document;
use crate::error::Result;
use crate::similarity::matrix::SimilarityMatrix;
use crate::similarity::traits::Vectorizer;

/// Lines of unchanged context kept around each diff hunk.
pub const DIFF_CONTEXT_LINES: usize = 3;

/// Similarity above this is treated as a likely copy.
pub const HIGH_SIMILARITY: f64 = 85.0;
/// Similarity above this (and up to HIGH_SIMILARITY) is partial overlap.
pub const PARTIAL_SIMILARITY: f64 = 60.0;

/// Coarse reading of a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    High,
    Partial,
    Low,
}

impl Verdict {
    /// Both cutoffs are strict: exactly 85 is Partial, exactly 60 is Low.
    pub fn from_similarity(percent: f64) -> Self {
        if percent > HIGH_SIMILARITY {
            Verdict::High
        } else if percent > PARTIAL_SIMILARITY {
            Verdict::Partial
        } else {
            Verdict::Low
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::High => "Highly similar! Possible copy.",
            Verdict::Partial => "Partial similarity detected.",
            Verdict::Low => "Low similarity. Looks original.",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::High => write!(f, "High"),
            Verdict::Partial => write!(f, "Partial"),
            Verdict::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffLineKind {
    Context,
    Removed,
    Added,
}

/// One line of a diff hunk. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub old_line: Option<usize>,
    pub new_line: Option<usize>,
    pub text: String,
}

/// A run of changes plus the surrounding context lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub lines: Vec<DiffLine>,
}

impl DiffHunk {
    pub fn changed_lines(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind != DiffLineKind::Context)
            .count()
    }
}

/// Result of comparing an original against a single candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairComparison {
    pub original: String,
    pub candidate: String,
    pub similarity: f64,
    pub verdict: Verdict,
    pub hunks: Vec<DiffHunk>,
}

/// Compare two documents: TF-IDF is fitted on just these two texts, as in
/// the two-upload workflow.
pub fn compare_pair(
    original: &Document,
    candidate: &Document,
    vectorizer: &dyn Vectorizer,
) -> Result<PairComparison> {
    let tfidf = vectorizer.fit_transform(&[&original.text, &candidate.text])?;
    let similarity = SimilarityMatrix::from_tfidf(&tfidf).get(0, 1);

    Ok(PairComparison {
        original: original.label.clone(),
        candidate: candidate.label.clone(),
        similarity,
        verdict: Verdict::from_similarity(similarity),
        hunks: line_diff(&original.text, &candidate.text, DIFF_CONTEXT_LINES),
    })
}

/// Line-level diff of two texts, grouped into hunks with `context` lines of
/// unchanged text around each change. Identical texts produce no hunks.
pub fn line_diff(original: &str, candidate: &str, context: usize) -> Vec<DiffHunk> {
    let diff = TextDiff::from_lines(original, candidate);

    diff.grouped_ops(context)
        .iter()
        .map(|group| {
            let lines = group
                .iter()
                .flat_map(|op| diff.iter_changes(op))
                .map(|change| DiffLine {
                    kind: match change.tag() {
                        ChangeTag::Equal => DiffLineKind::Context,
                        ChangeTag::Delete => DiffLineKind::Removed,
                        ChangeTag::Insert => DiffLineKind::Added,
                    },
                    old_line: change.old_index().map(|i| i + 1),
                    new_line: change.new_index().map(|i| i + 1),
                    text: change.value().trim_end_matches(['\n', '\r']).to_string(),
                })
                .collect();
            DiffHunk { lines }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::tfidf::TfIdfVectorizer;

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(Verdict::from_similarity(100.0), Verdict::High);
        assert_eq!(Verdict::from_similarity(85.01), Verdict::High);
        assert_eq!(Verdict::from_similarity(85.0), Verdict::Partial);
        assert_eq!(Verdict::from_similarity(60.01), Verdict::Partial);
        assert_eq!(Verdict::from_similarity(60.0), Verdict::Low);
        assert_eq!(Verdict::from_similarity(0.0), Verdict::Low);
    }

    #[test]
    fn test_identical_texts_have_no_hunks() {
        assert!(line_diff("a\nb\nc\n", "a\nb\nc\n", 3).is_empty());
    }

    #[test]
    fn test_hunk_keeps_three_lines_of_context() {
        let original = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n";
        let candidate = "1\n2\n3\n4\n5\nSIX\n7\n8\n9\n10\n";
        let hunks = line_diff(original, candidate, 3);
        assert_eq!(hunks.len(), 1);

        let hunk = &hunks[0];
        assert_eq!(hunk.changed_lines(), 2);
        let texts: Vec<&str> = hunk.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["3", "4", "5", "6", "SIX", "7", "8", "9"]);
        assert_eq!(hunk.lines[3].kind, DiffLineKind::Removed);
        assert_eq!(hunk.lines[3].old_line, Some(6));
        assert_eq!(hunk.lines[4].kind, DiffLineKind::Added);
        assert_eq!(hunk.lines[4].new_line, Some(6));
    }

    #[test]
    fn test_distant_changes_form_separate_hunks() {
        let original: String = (1..=20).map(|i| format!("line {i}\n")).collect();
        let candidate = original
            .replace("line 2\n", "changed 2\n")
            .replace("line 19\n", "changed 19\n");
        assert_eq!(line_diff(&original, &candidate, 3).len(), 2);
    }

    #[test]
    fn test_compare_pair_identical_documents() {
        let text = "photosynthesis converts sunlight into chemical energy";
        let result = compare_pair(
            &Document::new("original", text),
            &Document::new("student", text),
            &TfIdfVectorizer::default(),
        )
        .unwrap();
        assert!((result.similarity - 100.0).abs() < 1e-9);
        assert_eq!(result.verdict, Verdict::High);
        assert!(result.hunks.is_empty());
    }
}

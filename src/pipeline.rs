// Batch similarity pipeline.
//
// One synchronous pass: expand archives, extract text from every document,
// vectorize the corpus, compute pairwise similarity, build the report.
// Everything the run needs arrives in `PipelineInput`; nothing is global.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::corpus::{label_from_filename, Corpus, Document};
use crate::error::{CopyCatchError, Result};
use crate::extract::archive::{expand_archive, is_archive};
use crate::extract::traits::TextExtractor;
use crate::report::{Report, SkippedDocument, Threshold};
use crate::similarity::matrix::SimilarityMatrix;
use crate::similarity::traits::Vectorizer;

/// A raw uploaded file: a PDF or a ZIP of PDFs.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping its file name for labelling.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// What to do when one document's text cannot be extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the whole batch on the first unreadable document.
    #[default]
    Abort,
    /// Record the document as skipped and carry on with the rest.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(format!("unknown failure policy '{other}' (expected abort or skip)")),
        }
    }
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub sources: Vec<SourceFile>,
    pub threshold: Threshold,
    pub on_unreadable: FailurePolicy,
}

/// A document payload after archive expansion, before extraction.
struct Pending {
    label: String,
    bytes: Vec<u8>,
}

/// Run the full pipeline and produce a report.
pub fn run(
    input: &PipelineInput,
    extractor: &dyn TextExtractor,
    vectorizer: &dyn Vectorizer,
) -> Result<Report> {
    let pending = expand_sources(&input.sources)?;
    info!(documents = pending.len(), "Collected documents");

    let (corpus, skipped) = extract_all(&pending, extractor, input.on_unreadable)?;
    if corpus.len() < 2 {
        return Err(CopyCatchError::EmptyInput {
            found: corpus.len(),
        });
    }

    let tfidf = vectorizer.fit_transform(&corpus.texts())?;
    info!(
        documents = tfidf.n_docs(),
        vocabulary = tfidf.n_terms(),
        "Vectorized corpus"
    );

    let similarity = SimilarityMatrix::from_tfidf(&tfidf);
    let mut report = Report::build(&similarity, &corpus.labels(), input.threshold)?;
    report.skipped = skipped;

    for label in &report.degenerate {
        warn!(label = %label, "Document has no comparable text; scored 0 against all others");
    }
    info!(
        pairs = report.pairs.len(),
        threshold = input.threshold.value(),
        "Report built"
    );

    Ok(report)
}

/// Turn sources into individual documents, expanding ZIP archives in place.
fn expand_sources(sources: &[SourceFile]) -> Result<Vec<Pending>> {
    let mut pending = Vec::new();
    for source in sources {
        if is_archive(&source.name, &source.bytes) {
            for entry in expand_archive(&source.name, &source.bytes)? {
                pending.push(Pending {
                    label: entry.label,
                    bytes: entry.bytes,
                });
            }
        } else {
            pending.push(Pending {
                label: label_from_filename(&source.name),
                bytes: source.bytes.clone(),
            });
        }
    }
    Ok(pending)
}

fn extract_all(
    pending: &[Pending],
    extractor: &dyn TextExtractor,
    policy: FailurePolicy,
) -> Result<(Corpus, Vec<SkippedDocument>)> {
    let pb = ProgressBar::new(pending.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("  Extracting [{bar:30}] {pos}/{len} ({eta})")
    {
        pb.set_style(style);
    }

    let mut corpus = Corpus::new();
    let mut skipped = Vec::new();

    for doc in pending {
        match extractor.extract(&doc.label, &doc.bytes) {
            Ok(text) => corpus.push(Document::new(doc.label.clone(), text)),
            Err(e) => match policy {
                FailurePolicy::Abort => {
                    pb.finish_and_clear();
                    return Err(e);
                }
                FailurePolicy::Skip => {
                    warn!(label = %doc.label, error = %e, "Skipping unreadable document");
                    skipped.push(SkippedDocument {
                        label: doc.label.clone(),
                        reason: e.to_string(),
                    });
                }
            },
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok((corpus, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!("abort".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
        assert_eq!(" SKIP ".parse::<FailurePolicy>(), Ok(FailurePolicy::Skip));
        assert!("retry".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::Abort);
    }

    #[test]
    fn test_source_from_path_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("erin_essay.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();
        let source = SourceFile::from_path(&path).unwrap();
        assert_eq!(source.name, "erin_essay.pdf");
        assert_eq!(source.bytes, b"%PDF-1.4");
    }
}

// Error taxonomy for the similarity pipeline.
//
// Every fatal condition aborts the batch and is surfaced verbatim to the
// user. Documents with no usable vocabulary are not errors: they are
// reported as degenerate and score 0 against everything.

use thiserror::Error;

/// Errors produced by the library. The binary wraps these in `anyhow`.
#[derive(Debug, Error)]
pub enum CopyCatchError {
    /// The payload could not be parsed as a PDF (corrupt, encrypted, or not a PDF at all).
    #[error("could not extract text from '{label}': {reason}")]
    Extraction { label: String, reason: String },

    /// Fewer than two documents survived extraction.
    #[error("need at least 2 documents to compare, found {found}")]
    EmptyInput { found: usize },

    /// The ZIP archive itself could not be read.
    #[error("could not read archive '{name}': {reason}")]
    Archive { name: String, reason: String },

    /// The ZIP archive was readable but held no PDF entries.
    #[error("archive '{name}' contains no PDF files")]
    EmptyArchive { name: String },

    #[error("threshold {0} is outside the range 0..=100")]
    InvalidThreshold(f64),

    #[error("{labels} labels supplied for a {size}x{size} similarity matrix")]
    LabelMismatch { labels: usize, size: usize },

    #[error("malformed similarity CSV: {0}")]
    MalformedCsv(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CopyCatchError>;

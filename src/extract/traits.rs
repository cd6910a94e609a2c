// Text extractor trait: swap-ready abstraction over document formats.
//
// The pipeline only needs "bytes in, text out". PDF is the format the tool
// ships with; tests drive the pipeline with a plain-text implementation.

use crate::error::Result;

/// Trait for turning a document payload into comparable plain text.
pub trait TextExtractor {
    /// Extract the full text of one document. `label` is only used to
    /// make error messages point at the right file.
    fn extract(&self, label: &str, bytes: &[u8]) -> Result<String>;
}

// Vectorizer trait: swap-ready abstraction.
//
// The similarity engine only needs one sparse row per document over a
// shared vocabulary. TF-IDF is the implementation the tool ships with.

use super::tfidf::TfIdfMatrix;
use crate::error::Result;

/// Trait for turning an ordered corpus of texts into document vectors.
pub trait Vectorizer {
    /// Fit a vocabulary on `texts` and return one row per text, in order.
    /// Fewer than two texts is an `EmptyInput` error.
    fn fit_transform(&self, texts: &[&str]) -> Result<TfIdfMatrix>;
}

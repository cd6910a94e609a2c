// Similarity engine: tokenization, TF-IDF vectors and the cosine matrix.

pub mod matrix;
pub mod tfidf;
pub mod tokenize;
pub mod traits;

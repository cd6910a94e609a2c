// CopyCatch: assignment similarity checker
//
// This is the library root. Each module corresponds to one stage of the
// pipeline: intake, vectorization, similarity, reporting, export.

pub mod compare;
pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod similarity;

pub use error::{CopyCatchError, Result};

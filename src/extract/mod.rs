// Document intake: PDF text extraction and ZIP archive expansion.

pub mod archive;
pub mod pdf;
pub mod traits;

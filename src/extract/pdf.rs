// PDF text extraction via the pure-Rust `pdf-extract` crate.
//
// Page texts are concatenated in document order with nothing in between,
// so a word split across a page boundary stays split the same way for
// every submission.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tracing::debug;

use super::traits::TextExtractor;
use crate::error::{CopyCatchError, Result};

/// Magic bytes every PDF file starts with (possibly after some junk bytes).
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the payload we look for the PDF header. Acrobat accepts the
/// header anywhere in the first 1024 bytes.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Serializes panic hook swaps between concurrent extractions.
static PANIC_HOOK_LOCK: Mutex<()> = Mutex::new(());

/// Default extractor: reads text layers out of PDF files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, label: &str, bytes: &[u8]) -> Result<String> {
        if !looks_like_pdf(bytes) {
            return Err(CopyCatchError::Extraction {
                label: label.to_string(),
                reason: "not a PDF file (missing %PDF- header)".to_string(),
            });
        }

        // pdf-extract panics on some malformed inputs instead of returning an
        // error; treat a panic as an unreadable document.
        let outcome = catch_parser_panic(|| pdf_extract::extract_text_from_mem_by_pages(bytes));

        let pages = match outcome {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                return Err(CopyCatchError::Extraction {
                    label: label.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(CopyCatchError::Extraction {
                    label: label.to_string(),
                    reason: "PDF parser crashed on this file".to_string(),
                })
            }
        };

        debug!(label, pages = pages.len(), "Extracted PDF text");
        Ok(pages.concat())
    }
}

/// Run `f`, turning a panic into `Err` without the panic message reaching
/// stderr. Panics on other threads still go to the previous hook.
fn catch_parser_panic<T>(f: impl FnOnce() -> T) -> thread::Result<T> {
    let _guard = PANIC_HOOK_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let previous = Arc::new(panic::take_hook());
    let forward = Arc::clone(&previous);
    let parser_thread = thread::current().id();
    panic::set_hook(Box::new(move |info| {
        if thread::current().id() != parser_thread {
            (**forward)(info);
        }
    }));

    let outcome = panic::catch_unwind(AssertUnwindSafe(f));

    // Dropping the silent hook releases its handle on the previous one
    drop(panic::take_hook());
    if let Ok(previous) = Arc::try_unwrap(previous) {
        panic::set_hook(previous);
    }
    outcome
}

/// Cheap header sniff so obviously non-PDF payloads fail with a clear reason.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window
        .windows(PDF_MAGIC.len())
        .any(|w| w == PDF_MAGIC)
}

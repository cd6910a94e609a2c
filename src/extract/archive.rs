// ZIP archive expansion.
//
// Instructors usually download a whole batch of submissions as one ZIP.
// Every PDF entry becomes its own document, labelled by its file stem;
// everything else in the archive is ignored.

use std::io::{Cursor, Read};
use std::path::Path;

use tracing::{debug, info};
use zip::ZipArchive;

use crate::corpus::label_from_filename;
use crate::error::{CopyCatchError, Result};

/// ZIP local file header signature.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// A PDF payload pulled out of an archive, not yet extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub label: String,
    pub bytes: Vec<u8>,
}

/// Whether a source should be expanded as a ZIP archive rather than
/// extracted directly.
///
/// The file extension decides when there is one. The ZIP signature is only
/// consulted for extensionless names, so a misnamed `.pdf` upload fails as
/// an unreadable document instead of as an empty archive.
pub fn is_archive(name: &str, bytes: &[u8]) -> bool {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match Path::new(base).extension() {
        Some(ext) => ext.eq_ignore_ascii_case("zip"),
        None => bytes.starts_with(ZIP_MAGIC),
    }
}

/// Pull every PDF entry out of a ZIP archive, in archive order.
///
/// Fails with `Archive` when the ZIP cannot be read and with `EmptyArchive`
/// when it holds no PDFs.
pub fn expand_archive(name: &str, bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let archive_err = |reason: String| CopyCatchError::Archive {
        name: name.to_string(),
        reason,
    };

    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| archive_err(e.to_string()))?;

    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| archive_err(e.to_string()))?;

        let entry_name = file.name().to_string();
        if !is_pdf_entry(&entry_name, file.is_dir()) {
            debug!(archive = name, entry = %entry_name, "Skipping non-PDF archive entry");
            continue;
        }

        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)
            .map_err(|e| archive_err(format!("{entry_name}: {e}")))?;

        entries.push(ArchiveEntry {
            label: label_from_filename(&entry_name),
            bytes: buf,
        });
    }

    if entries.is_empty() {
        return Err(CopyCatchError::EmptyArchive {
            name: name.to_string(),
        });
    }

    info!(archive = name, pdfs = entries.len(), "Expanded archive");
    Ok(entries)
}

fn is_pdf_entry(entry_name: &str, is_dir: bool) -> bool {
    if is_dir || entry_name.starts_with("__MACOSX/") {
        return false;
    }
    // macOS also drops "._name.pdf" resource forks next to the real files
    let base = entry_name.rsplit('/').next().unwrap_or(entry_name);
    if base.starts_with("._") {
        return false;
    }
    base.to_ascii_lowercase().ends_with(".pdf")
}

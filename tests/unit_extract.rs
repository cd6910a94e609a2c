// Unit tests for PDF intake against a real two-page document.
//
// tests/fixtures/two_pages.pdf holds "Glucose enzyme membrane" on page 1 and
// "Compiler kernel scheduler" on page 2, both set in plain Helvetica.

use std::io::{Cursor, Write};

use copycatch::error::CopyCatchError;
use copycatch::extract::pdf::PdfTextExtractor;
use copycatch::extract::traits::TextExtractor;
use copycatch::pipeline::{self, FailurePolicy, PipelineInput, SourceFile};
use copycatch::report::Threshold;
use copycatch::similarity::tfidf::TfIdfVectorizer;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const TWO_PAGES: &[u8] = include_bytes!("fixtures/two_pages.pdf");

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

// ============================================================
// Text extraction
// ============================================================

#[test]
fn pages_are_joined_in_document_order() {
    let text = PdfTextExtractor.extract("two_pages", TWO_PAGES).unwrap();

    let first = text.find("Glucose").expect("page 1 text missing");
    let second = text.find("Compiler").expect("page 2 text missing");
    assert!(first < second, "page order lost: {text:?}");
    assert_eq!(
        without_whitespace(&text),
        "GlucoseenzymemembraneCompilerkernelscheduler"
    );
}

#[test]
fn page_texts_are_concatenated_without_separator() {
    let pages = pdf_extract::extract_text_from_mem_by_pages(TWO_PAGES).unwrap();
    assert_eq!(pages.len(), 2);

    let text = PdfTextExtractor.extract("two_pages", TWO_PAGES).unwrap();
    assert_eq!(text, pages.concat());
}

// ============================================================
// Through the pipeline
// ============================================================

fn run(
    sources: Vec<SourceFile>,
    policy: FailurePolicy,
) -> copycatch::Result<copycatch::report::Report> {
    let input = PipelineInput {
        sources,
        threshold: Threshold::default(),
        on_unreadable: policy,
    };
    pipeline::run(&input, &PdfTextExtractor, &TfIdfVectorizer::default())
}

fn zip_bytes() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("notes.txt", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"lecture notes").unwrap();
    writer.finish().unwrap().into_inner()
}

#[test]
fn identical_pdfs_score_100() {
    let report = run(
        vec![
            SourceFile::new("alice.pdf", TWO_PAGES.to_vec()),
            SourceFile::new("bob.pdf", TWO_PAGES.to_vec()),
        ],
        FailurePolicy::Abort,
    )
    .unwrap();
    assert_eq!(report.pairs.len(), 1);
    assert!((report.pairs[0].similarity - 100.0).abs() < 1e-9);
}

#[test]
fn zip_named_as_pdf_is_skipped_as_unreadable() {
    let report = run(
        vec![
            SourceFile::new("alice.pdf", TWO_PAGES.to_vec()),
            SourceFile::new("renamed.pdf", zip_bytes()),
            SourceFile::new("bob.pdf", TWO_PAGES.to_vec()),
        ],
        FailurePolicy::Skip,
    )
    .unwrap();
    assert_eq!(report.matrix.labels, vec!["alice", "bob"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].label, "renamed");
}

#[test]
fn zip_named_as_pdf_aborts_as_extraction_failure() {
    let err = run(
        vec![
            SourceFile::new("alice.pdf", TWO_PAGES.to_vec()),
            SourceFile::new("renamed.pdf", zip_bytes()),
        ],
        FailurePolicy::Abort,
    )
    .unwrap_err();
    match err {
        CopyCatchError::Extraction { label, .. } => assert_eq!(label, "renamed"),
        other => panic!("expected Extraction, got {other:?}"),
    }
}

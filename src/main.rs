use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use copycatch::compare::compare_pair;
use copycatch::config::{self, Config};
use copycatch::corpus::{label_from_filename, Document};
use copycatch::export;
use copycatch::extract::pdf::PdfTextExtractor;
use copycatch::extract::traits::TextExtractor;
use copycatch::output::terminal;
use copycatch::pipeline::{self, FailurePolicy, PipelineInput, SourceFile};
use copycatch::report::Threshold;
use copycatch::similarity::tfidf::TfIdfVectorizer;

/// CopyCatch: assignment similarity checker.
///
/// Extracts text from PDF submissions, weights it with TF-IDF, and reports
/// pairs of documents whose cosine similarity crosses a threshold.
#[derive(Parser)]
#[command(name = "copycatch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare every submission against every other one
    Matrix {
        /// PDF files and/or ZIP archives of PDFs
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Report pairs strictly above this similarity percentage (50-100, default: 70)
        #[arg(long, value_parser = parse_threshold_arg)]
        threshold: Option<f64>,

        /// Write the similarity matrix as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the similarity matrix as an Excel workbook
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write CSV, XLSX and JSON into COPYCATCH_OUTPUT_DIR
        #[arg(long)]
        export_all: bool,

        /// Skip PDFs whose text cannot be extracted instead of aborting
        #[arg(long)]
        skip_unreadable: bool,
    },

    /// Compare one original assignment against one student submission
    Compare {
        /// The original (reference) assignment PDF
        original: PathBuf,

        /// The student submission PDF
        student: PathBuf,

        /// Only print the score, not the line-by-line text comparison
        #[arg(long)]
        no_diff: bool,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("copycatch=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Matrix {
            files,
            threshold,
            csv,
            xlsx,
            json,
            export_all,
            skip_unreadable,
        } => {
            let threshold = Threshold::new(threshold.unwrap_or(config.threshold))?;
            let on_unreadable = if skip_unreadable {
                FailurePolicy::Skip
            } else {
                config.on_unreadable
            };

            let sources = files
                .iter()
                .map(|path| {
                    SourceFile::from_path(path)
                        .with_context(|| format!("could not read {}", path.display()))
                })
                .collect::<Result<Vec<_>>>()?;

            println!("Comparing {} file(s)...", sources.len());

            let input = PipelineInput {
                sources,
                threshold,
                on_unreadable,
            };
            let report = pipeline::run(&input, &PdfTextExtractor, &TfIdfVectorizer::default())?;

            terminal::display_report(&report);

            let mut written = Vec::new();
            if let Some(path) = csv {
                export::csv::write_csv(&report.matrix, &path)?;
                written.push(path);
            }
            if let Some(path) = xlsx {
                export::xlsx::write_xlsx(&report.matrix, &path)?;
                written.push(path);
            }
            if let Some(path) = json {
                export::json::write_json(&report, &path)?;
                written.push(path);
            }
            if export_all {
                written.extend(export::export_all(&report, &config.output_dir)?);
            }

            for path in &written {
                println!("{}", format!("Saved: {}", path.display()).bold());
            }
        }

        Commands::Compare {
            original,
            student,
            no_diff,
        } => {
            let extractor = PdfTextExtractor;
            let original_doc = load_document(&extractor, &original)?;
            let student_doc = load_document(&extractor, &student)?;

            info!(
                original = %original_doc.label,
                student = %student_doc.label,
                "Comparing pair"
            );

            let comparison =
                compare_pair(&original_doc, &student_doc, &TfIdfVectorizer::default())?;
            terminal::display_comparison(&comparison, !no_diff);
        }
    }

    Ok(())
}

/// Read a PDF from disk and extract its text.
fn load_document(extractor: &dyn TextExtractor, path: &Path) -> Result<Document> {
    let source = SourceFile::from_path(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let label = label_from_filename(&source.name);
    let text = extractor.extract(&label, &source.bytes)?;
    Ok(Document::new(label, text))
}

fn parse_threshold_arg(raw: &str) -> std::result::Result<f64, String> {
    config::parse_threshold(raw).map_err(|e| e.to_string())
}

// Colored terminal output for similarity reports and pair comparisons.
//
// This module handles all terminal-specific formatting: colors, tables,
// diff rendering. The main.rs command handlers delegate here.

use colored::Colorize;

use crate::compare::{DiffHunk, DiffLineKind, PairComparison, Verdict};
use crate::report::Report;

/// Matrix header cells are cut to this many characters.
const LABEL_WIDTH: usize = 12;

/// Display the labeled matrix, reported pairs and any warnings.
pub fn display_report(report: &Report) {
    let matrix = &report.matrix;

    println!(
        "\n{}",
        format!("=== Similarity Matrix ({} documents) ===", matrix.size()).bold()
    );
    println!();

    // Header
    print!("  {:<width$}", "", width = LABEL_WIDTH);
    for label in &matrix.labels {
        let short = super::truncate_chars(label, LABEL_WIDTH - 3);
        print!(" {}", format!("{:>width$}", short, width = LABEL_WIDTH).dimmed());
    }
    println!();
    println!(
        "  {}",
        "-".repeat((LABEL_WIDTH + 1) * (matrix.size() + 1)).dimmed()
    );

    for (label, row) in matrix.labels.iter().zip(&matrix.cells) {
        let short = super::truncate_chars(label, LABEL_WIDTH - 3);
        print!("  {:<width$}", short, width = LABEL_WIDTH);
        for cell in row {
            // Pad before coloring so escape codes don't skew the column width
            let text = match cell {
                Some(v) => colorize_percent(*v, report.threshold.value()),
                None => format!("{:>width$}", "-", width = LABEL_WIDTH)
                    .dimmed()
                    .to_string(),
            };
            print!(" {text}");
        }
        println!();
    }

    display_pairs(report);

    if !report.degenerate.is_empty() {
        println!(
            "\n  {} no comparable text found in: {}",
            "Warning:".yellow(),
            report.degenerate.join(", ")
        );
    }
    for skipped in &report.skipped {
        println!(
            "  {} skipped {}: {}",
            "Warning:".yellow(),
            skipped.label,
            skipped.reason.dimmed()
        );
    }
}

fn display_pairs(report: &Report) {
    let threshold = report.threshold.value();
    println!();

    if report.pairs.is_empty() {
        println!("  {}", pairs_heading(0, threshold).green());
        return;
    }

    println!(
        "{}",
        format!("=== {} ===", pairs_heading(report.pairs.len(), threshold)).bold()
    );
    for pair in &report.pairs {
        println!(
            "  {:<30} {:<30} {}",
            pair.first,
            pair.second,
            format!("{:.2}%", pair.similarity).red().bold()
        );
    }
}

/// Display a two-document comparison: score, verdict and optionally the diff.
pub fn display_comparison(comparison: &PairComparison, show_diff: bool) {
    println!("\n{}", "=== Similarity Score ===".bold());
    println!(
        "  {} vs {}: {}",
        comparison.original,
        comparison.candidate,
        format!("{:.2}%", comparison.similarity).bold()
    );
    println!("  {}", colorize_verdict(comparison.verdict));

    if !show_diff {
        return;
    }

    println!("\n{}", "=== Text Comparison ===".bold());
    if comparison.hunks.is_empty() {
        println!("  {}", "Extracted texts are identical.".dimmed());
        return;
    }
    println!(
        "  {} {}   {} {}",
        "-".red(),
        "Original".red(),
        "+".green(),
        "Student".green()
    );
    for hunk in &comparison.hunks {
        display_hunk(hunk);
    }
}

fn display_hunk(hunk: &DiffHunk) {
    let old_start = hunk.lines.iter().find_map(|l| l.old_line).unwrap_or(0);
    let new_start = hunk.lines.iter().find_map(|l| l.new_line).unwrap_or(0);
    println!(
        "\n  {}",
        format!("@@ original line {old_start}, student line {new_start} @@").cyan()
    );

    for line in &hunk.lines {
        match line.kind {
            DiffLineKind::Context => println!("    {}", line.text.dimmed()),
            DiffLineKind::Removed => println!("  {} {}", "-".red(), line.text.red()),
            DiffLineKind::Added => println!("  {} {}", "+".green(), line.text.green()),
        }
    }
}

fn colorize_verdict(verdict: Verdict) -> String {
    let message = verdict.message();
    match verdict {
        Verdict::High => format!("!! {message}").red().bold().to_string(),
        Verdict::Partial => format!("!  {message}").yellow().to_string(),
        Verdict::Low => format!("ok {message}").green().to_string(),
    }
}

/// Summary line for the pair list. The threshold is printed as given, never
/// rounded, since pairs must score strictly above it.
fn pairs_heading(count: usize, threshold: f64) -> String {
    if count == 0 {
        format!("No pairs above {threshold}% similarity.")
    } else {
        format!("{count} pair(s) above {threshold}% similarity")
    }
}

/// Percent cell colored by whether it crosses the report threshold.
fn colorize_percent(value: f64, threshold: f64) -> String {
    let text = format!("{:>width$.2}", value, width = LABEL_WIDTH);
    if value > threshold {
        text.red().bold().to_string()
    } else if value > threshold / 2.0 {
        text.yellow().to_string()
    } else {
        text.normal().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_heading_keeps_fractional_threshold() {
        assert_eq!(pairs_heading(2, 72.5), "2 pair(s) above 72.5% similarity");
        assert_eq!(pairs_heading(0, 72.5), "No pairs above 72.5% similarity.");
        assert_eq!(pairs_heading(1, 70.0), "1 pair(s) above 70% similarity");
    }
}

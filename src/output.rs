//! Console output.
//!
//! All user-facing messages go through [`OutputFormatter`] so colors and
//! symbols stay consistent between the CLI and the library.

use crate::media_type::Category;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Consistent styling for CLI output.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a warning above `progress` without tearing the bar.
    pub fn warning_with_progress(progress: &ProgressBar, message: &str) {
        progress.suspend(|| Self::warning(message));
    }

    /// Creates a progress bar for the copy phase.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use picman::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("done");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints the end-of-run table: copied files per category, then the
    /// record totals for the run.
    pub fn summary_table(category_counts: &BTreeMap<Category, usize>, totals: &RunTotals) {
        Self::header("SUMMARY");

        let category_rows = category_rows(category_counts);
        let total_rows = totals.rows();

        let width = category_rows
            .iter()
            .chain(total_rows.iter())
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Copied".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &category_rows {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural_files(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            totals.copied.to_string().green().bold(),
            plural_files(totals.copied),
            width = width
        );

        println!();
        for (label, count) in &total_rows {
            println!("{:<width$} | {}", label, count, width = width);
        }
    }
}

/// Record totals shown under the summary table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub loaded: usize,
    pub ignored: usize,
    /// Active records whose source was missing during validation.
    pub missing: usize,
    pub copied: usize,
    /// Records skipped at copy time because their source was missing.
    pub skipped: usize,
}

impl RunTotals {
    fn rows(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("Loaded", self.loaded),
            ("Ignored", self.ignored),
            ("Missing", self.missing),
            ("Skipped", self.skipped),
        ]
    }
}

fn category_rows(category_counts: &BTreeMap<Category, usize>) -> Vec<(&'static str, usize)> {
    category_counts
        .iter()
        .map(|(category, count)| (category.description(), *count))
        .collect()
}

fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_files() {
        assert_eq!(plural_files(0), "files");
        assert_eq!(plural_files(1), "file");
        assert_eq!(plural_files(2), "files");
    }

    #[test]
    fn test_category_rows_use_descriptions() {
        let mut counts = BTreeMap::new();
        counts.insert(Category::Movie, 2);
        counts.insert(Category::Picture, 3);

        assert_eq!(
            category_rows(&counts),
            vec![("Pictures", 3), ("Movies", 2)]
        );
    }

    #[test]
    fn test_total_rows() {
        let totals = RunTotals {
            loaded: 10,
            ignored: 2,
            missing: 1,
            copied: 7,
            skipped: 1,
        };

        assert_eq!(
            totals.rows(),
            vec![("Loaded", 10), ("Ignored", 2), ("Missing", 1), ("Skipped", 1)]
        );
    }

    #[test]
    fn test_progress_bar_length() {
        let pb = OutputFormatter::create_progress_bar(7);
        assert_eq!(pb.length(), Some(7));
    }
}

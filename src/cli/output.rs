//! CLI output formatting utilities.

use crate::pipeline::{StageReport, VideoIdeasList};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        eprintln!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        eprintln!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        eprintln!("\n{}", style(msg).bold().underlined());
    }

    /// Print a one-line summary per idea, highest score first.
    pub fn ideas_summary(ideas: &VideoIdeasList) {
        for idea in ideas.ranked() {
            eprintln!(
                "  {} {} {}",
                style(format!("[{:>2}]", idea.score)).green().bold(),
                style(&idea.video_title).bold(),
                style(format!("({} sources)", idea.research.len())).dim()
            );
        }
    }

    /// Print a stage's raw output.
    pub fn stage_report(report: &StageReport) {
        Output::header(&format!("{} ({} items)", report.name, report.items));
        if report.raw_output.trim().is_empty() {
            eprintln!("  {}", style("(no output)").dim());
        } else {
            eprintln!("{}", content_preview(&report.raw_output, 2000));
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_len: usize) -> String {
    if content.chars().count() <= max_len {
        content.to_string()
    } else {
        let cut: String = content.chars().take(max_len).collect();
        format!("{}...", cut)
    }
}

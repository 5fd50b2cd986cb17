//! CLI output formatting.
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and, where the CLI needs it, a `print_*` wrapper that writes
//! to stdout. Format functions are pure: no I/O, no side effects.
//!
//! Paths are shown relative to the working root so the output reads the same
//! wherever the site lives.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Copying public files (3)
//! Article [1/2]: articles/a.html
//! Article [2/2]: articles/sub/b.html
//! Creating build/sub directories
//! Built 2 articles into build
//! ```
//!
//! A template without a body marker produces a warning on stderr:
//!
//! ```text
//! warning: templates/static.html has no <!-- insert body --> marker; body of articles/x.html dropped
//! ```
//!
//! ## Check
//!
//! ```text
//! Checked 3 articles
//! Missing templates
//!     templates/nope.html
//!         Referenced by: articles/c.html
//! Templates without a body marker
//!     templates/static.html
//! ```

use crate::site::{BuildEvent, BuildSummary, CheckReport};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display `path` relative to `root` when it lives underneath it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Build
// ============================================================================

/// Lines for one build progress event. Warnings are prefixed `warning:`.
pub fn format_build_event(event: &BuildEvent, root: &Path) -> Vec<String> {
    match event {
        BuildEvent::PublicCopied { files } => {
            vec![format!("Copying public files ({files})")]
        }
        BuildEvent::ArticleStarted { index, total, path } => {
            vec![format!(
                "Article [{index}/{total}]: {}",
                display_path(path, root)
            )]
        }
        BuildEvent::DirectoryCreated { path } => {
            vec![format!("Creating {} directories", display_path(path, root))]
        }
        BuildEvent::MarkerMissing { template, article } => {
            vec![format!(
                "warning: {} has no <!-- insert body --> marker; body of {} dropped",
                display_path(template, root),
                display_path(article, root)
            )]
        }
    }
}

/// Print an event: warnings to stderr, everything else to stdout.
pub fn print_build_event(event: &BuildEvent, root: &Path) {
    for line in format_build_event(event, root) {
        if line.starts_with("warning:") {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

pub fn format_build_summary(summary: &BuildSummary, build_dir: &Path, root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Built {} into {}",
        plural(summary.articles, "article", "articles"),
        display_path(build_dir, root)
    )];
    if summary.dropped_bodies > 0 {
        lines.push(format!(
            "{}{} written without a body (template has no marker)",
            indent(1),
            plural(summary.dropped_bodies, "article", "articles")
        ));
    }
    lines
}

pub fn print_build_summary(summary: &BuildSummary, build_dir: &Path, root: &Path) {
    for line in format_build_summary(summary, build_dir, root) {
        println!("{line}");
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_report(report: &CheckReport, root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Checked {}",
        plural(report.articles, "article", "articles")
    )];

    if !report.missing.is_empty() {
        lines.push("Missing templates".to_string());
        let mut last: Option<&Path> = None;
        for (template, article) in &report.missing {
            if last != Some(template.as_path()) {
                lines.push(format!("{}{}", indent(1), display_path(template, root)));
                last = Some(template.as_path());
            }
            lines.push(format!(
                "{}Referenced by: {}",
                indent(2),
                display_path(article, root)
            ));
        }
    }

    if !report.markerless.is_empty() {
        lines.push("Templates without a body marker".to_string());
        for template in &report.markerless {
            lines.push(format!("{}{}", indent(1), display_path(template, root)));
        }
    }

    lines
}

pub fn print_check_report(report: &CheckReport, root: &Path) {
    for line in format_check_report(report, root) {
        println!("{line}");
    }
}

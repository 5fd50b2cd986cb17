//! Splicing article text into a template.
//!
//! A template marks where the article goes with a body marker:
//!
//! ```text
//! <html><body><!-- insert body --></body></html>
//! ```
//!
//! The marker is matched case-insensitively and with flexible whitespace, so
//! `<!--insert body-->` and `<!-- INSERT   BODY -->` both work.
//!
//! ## Substitution Rules
//!
//! - Only the **first** marker is replaced. Any later marker text is copied
//!   through verbatim.
//! - The article is inserted byte for byte: no escaping, no re-encoding, no
//!   `$1`-style expansion.
//! - A template without a marker is written unchanged and the article is
//!   dropped. The caller gets [`MergeOutcome::NoMarker`] so it can warn.

use regex::bytes::Regex;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ASCII-only whitespace and case folding.
const MARKER_PATTERN: &str = r"(?i-u)<!--\s*insert\s*body\s*-->";

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Failed to read template {}: {source}", path.display())]
    ReadTemplate { path: PathBuf, source: io::Error },
    #[error("Failed to write {}: {source}", path.display())]
    WriteOutput { path: PathBuf, source: io::Error },
}

/// What happened to the article during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The first marker was replaced by the article.
    Inserted,
    /// The template had no marker; the article was not written.
    NoMarker,
}

/// Replaces the body marker in a template with article text.
#[derive(Debug, Clone)]
pub struct TemplateMerger {
    marker: Regex,
}

impl Default for TemplateMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateMerger {
    pub fn new() -> Self {
        Self {
            marker: Regex::new(MARKER_PATTERN).expect("valid body marker regex"),
        }
    }

    /// Whether `template` contains at least one body marker.
    pub fn has_marker(&self, template: &[u8]) -> bool {
        self.marker.is_match(template)
    }

    /// Stream the merged output into `out`.
    pub fn merge_into<W: Write>(
        &self,
        template: &[u8],
        article: &[u8],
        out: &mut W,
    ) -> io::Result<MergeOutcome> {
        match self.marker.find(template) {
            Some(m) => {
                out.write_all(&template[..m.start()])?;
                out.write_all(article)?;
                out.write_all(&template[m.end()..])?;
                Ok(MergeOutcome::Inserted)
            }
            None => {
                out.write_all(template)?;
                Ok(MergeOutcome::NoMarker)
            }
        }
    }

    /// Merge in memory.
    pub fn merge(&self, template: &[u8], article: &[u8]) -> (Vec<u8>, MergeOutcome) {
        let mut merged = Vec::with_capacity(template.len() + article.len());
        let outcome = self
            .merge_into(template, article, &mut merged)
            .expect("writing to a Vec cannot fail");
        (merged, outcome)
    }

    /// Read `template_path` and write it, merged with `article`, to `output_path`.
    ///
    /// The output file is created or truncated. The template is read in full
    /// before the output is opened.
    pub fn merge_file(
        &self,
        output_path: &Path,
        template_path: &Path,
        article: &[u8],
    ) -> Result<MergeOutcome, MergeError> {
        let template = fs::read(template_path).map_err(|source| MergeError::ReadTemplate {
            path: template_path.to_path_buf(),
            source,
        })?;

        let write_err = |source| MergeError::WriteOutput {
            path: output_path.to_path_buf(),
            source,
        };
        let file = File::create(output_path).map_err(write_err)?;
        let mut out = BufWriter::new(file);
        let outcome = self
            .merge_into(&template, article, &mut out)
            .map_err(write_err)?;
        out.flush().map_err(write_err)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn merge(template: &str, article: &str) -> (String, MergeOutcome) {
        let (out, outcome) = TemplateMerger::new().merge(template.as_bytes(), article.as_bytes());
        (String::from_utf8(out).unwrap(), outcome)
    }

    fn has_marker(template: &str) -> bool {
        TemplateMerger::new().has_marker(template.as_bytes())
    }

    // =========================================================================
    // Marker matching
    // =========================================================================

    #[test]
    fn marker_without_spaces() {
        assert!(has_marker("<!--insert body-->"));
    }

    #[test]
    fn marker_uppercase() {
        assert!(has_marker("<!-- INSERT BODY -->"));
    }

    #[test]
    fn marker_with_extra_whitespace() {
        assert!(has_marker("<!--   insert    body   -->"));
    }

    #[test]
    fn marker_spanning_lines() {
        assert!(has_marker("<!--\n\tinsert\n body\n-->"));
    }

    #[test]
    fn unicode_spaces_do_not_match_marker() {
        assert!(!has_marker("<!--\u{a0}insert body -->"));
        assert!(!has_marker("<!-- insert\u{2003}body -->"));
    }

    #[test]
    fn similar_comments_are_not_markers() {
        assert!(!has_marker("<!-- insert head -->"));
        assert!(!has_marker("<!-- body -->"));
        assert!(!has_marker("<! -- insert body -->"));
    }

    // =========================================================================
    // Substitution
    // =========================================================================

    #[test]
    fn splices_article_exactly() {
        let (out, outcome) = merge("<p>X</p><!-- insert body -->", "A");
        assert_eq!(out, "<p>X</p>A");
        assert_eq!(outcome, MergeOutcome::Inserted);
    }

    #[test]
    fn keeps_content_around_marker() {
        let (out, _) = merge("<body>\n<!--Insert Body-->\n</body>", "<p>hi</p>");
        assert_eq!(out, "<body>\n<p>hi</p>\n</body>");
    }

    #[test]
    fn no_marker_passes_template_through() {
        let template = "<html><p>static</p></html>";
        let (out, outcome) = merge(template, "dropped article");
        assert_eq!(out, template);
        assert!(!out.contains("dropped article"));
        assert_eq!(outcome, MergeOutcome::NoMarker);
    }

    #[test]
    fn only_first_marker_replaced() {
        let (out, _) = merge("a<!-- insert body -->b<!-- INSERT BODY -->c", "X");
        assert_eq!(out, "aXb<!-- INSERT BODY -->c");
    }

    #[test]
    fn article_inserted_verbatim() {
        let article = "$1 $& ${0} <script>&amp;</script>";
        let (out, _) = merge("[<!-- insert body -->]", article);
        assert_eq!(out, format!("[{article}]"));
    }

    #[test]
    fn article_containing_marker_is_not_reprocessed() {
        let (out, _) = merge("<!-- insert body -->|<!-- insert body -->", "<!-- insert body -->");
        assert_eq!(out, "<!-- insert body -->|<!-- insert body -->");
    }

    #[test]
    fn empty_article() {
        let (out, outcome) = merge("a<!-- insert body -->b", "");
        assert_eq!(out, "ab");
        assert_eq!(outcome, MergeOutcome::Inserted);
    }

    #[test]
    fn non_utf8_bytes_preserved() {
        let template = b"\xfe<!-- insert body -->\xff";
        let (out, _) = TemplateMerger::new().merge(template, b"caf\xe9");
        assert_eq!(out, b"\xfecaf\xe9\xff");
    }

    #[test]
    fn streaming_matches_in_memory() {
        let merger = TemplateMerger::new();
        let template = b"<h1>T</h1><!-- insert body --><footer/>";
        let mut buf = Vec::new();
        let outcome = merger.merge_into(template, b"body", &mut buf).unwrap();
        assert_eq!(outcome, MergeOutcome::Inserted);
        assert_eq!(buf, merger.merge(template, b"body").0);
    }

    // =========================================================================
    // merge_file
    // =========================================================================

    #[test]
    fn merge_file_writes_output() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("post.html");
        let output = tmp.path().join("out.html");
        fs::write(&template, "<h1>Post</h1><!-- insert body -->").unwrap();

        let outcome = TemplateMerger::new()
            .merge_file(&output, &template, b"Hello")
            .unwrap();
        assert_eq!(outcome, MergeOutcome::Inserted);
        assert_eq!(fs::read_to_string(&output).unwrap(), "<h1>Post</h1>Hello");
    }

    #[test]
    fn merge_file_truncates_existing_output() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("t.html");
        let output = tmp.path().join("out.html");
        fs::write(&template, "<!-- insert body -->").unwrap();
        fs::write(&output, "a much longer previous build output").unwrap();

        TemplateMerger::new()
            .merge_file(&output, &template, b"new")
            .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "new");
    }

    #[test]
    fn merge_file_missing_template_reports_path() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("missing.html");
        let output = tmp.path().join("out.html");

        let err = TemplateMerger::new()
            .merge_file(&output, &template, b"x")
            .unwrap_err();
        assert!(matches!(err, MergeError::ReadTemplate { .. }));
        assert!(err.to_string().contains("missing.html"));
        assert!(!output.exists());
    }
}

//! Template directive extraction and resolution.
//!
//! An article names its layout with an HTML comment anywhere in its text:
//!
//! ```text
//! <!-- template: post.html -->
//! ```
//!
//! Whitespace around the colon and inside the comment markers is ignored.
//! The name is restricted to `[A-Za-z0-9._-]+`, and the `template:` keyword
//! is case-sensitive. Anything that doesn't fit the pattern (wrong keyword,
//! a `/` in the name, missing colon) is not a directive at all; the article
//! then falls back to the default template.
//!
//! ## Precedence
//!
//! Only the first directive in document order counts. It is removed from the
//! article before merging ([`TemplateExtractor::strip`]); later directives are
//! left in the article text and end up in the output like any other comment.

use regex::bytes::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Template used by articles that carry no directive.
pub const DEFAULT_TEMPLATE: &str = "default.html";

// ASCII-only: `\s` must not match NBSP or other Unicode spaces.
const DIRECTIVE_PATTERN: &str = r"(?-u)<!--\s*template:\s*([a-zA-Z0-9._-]+)\s*-->";

/// A directive found in article text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Template name, e.g. `post.html`.
    pub name: &'a str,
    /// Byte range of the whole `<!-- ... -->` comment.
    pub span: Range<usize>,
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Could not find template {} referenced by {}", template.display(), article.display())]
    MissingTemplate { template: PathBuf, article: PathBuf },
}

/// Finds the template directive in article text.
///
/// Holds the compiled directive pattern; build one per run and reuse it for
/// every article.
#[derive(Debug, Clone)]
pub struct TemplateExtractor {
    directive: Regex,
}

impl Default for TemplateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateExtractor {
    pub fn new() -> Self {
        Self {
            directive: Regex::new(DIRECTIVE_PATTERN).expect("valid template directive regex"),
        }
    }

    /// Return the template name from the first directive in `text`, if any.
    ///
    /// Article text is raw bytes; the name itself is always ASCII.
    ///
    /// - `"<!-- template: post.html -->Hi"` → `Some("post.html")`
    /// - `"<!--template:a--><!--template:b-->"` → `Some("a")`
    /// - `"<!-- layout: post.html -->"` → `None`
    pub fn extract<'a>(&self, text: &'a [u8]) -> Option<&'a str> {
        self.find(text).map(|d| d.name)
    }

    /// Locate the first directive in `text`.
    pub fn find<'a>(&self, text: &'a [u8]) -> Option<Directive<'a>> {
        let caps = self.directive.captures(text)?;
        let whole = caps.get(0)?;
        let name = std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?;
        Some(Directive {
            name,
            span: whole.range(),
        })
    }

    /// Article text with its first directive cut out.
    ///
    /// Borrows when there is nothing to remove.
    pub fn strip<'a>(&self, text: &'a [u8]) -> Cow<'a, [u8]> {
        match self.find(text) {
            Some(Directive { span, .. }) => {
                let mut body = Vec::with_capacity(text.len() - span.len());
                body.extend_from_slice(&text[..span.start]);
                body.extend_from_slice(&text[span.end..]);
                Cow::Owned(body)
            }
            None => Cow::Borrowed(text),
        }
    }

    /// Resolve the template file an article should be merged into.
    ///
    /// Joins the extracted name (or `default_name` when the article has no
    /// directive) onto `templates_dir` and checks that it exists.
    pub fn resolve(
        &self,
        templates_dir: &Path,
        default_name: &str,
        article_text: &[u8],
        article_path: &Path,
    ) -> Result<PathBuf, ResolveError> {
        let name = self.extract(article_text).unwrap_or(default_name);
        let template = templates_dir.join(name);
        if !template.exists() {
            return Err(ResolveError::MissingTemplate {
                template,
                article: article_path.to_path_buf(),
            });
        }
        Ok(template)
    }
}

/// Whether `name` is usable as a template identifier.
///
/// Same character set the directive pattern accepts, so a configured default
/// can always be spelled as a directive too.
pub fn is_valid_template_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

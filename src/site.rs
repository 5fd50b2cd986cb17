//! Whole-site build and check.
//!
//! [`build_site`] runs the full pipeline against a [`Layout`]:
//!
//! ```text
//! 1. templates/ must exist             → BuildError::TemplatesMissing
//! 2. build/ recreated (after confirm)  → BuildError::Declined
//! 3. public/ copied into build/
//! 4. for each article, in sorted order:
//!      read → extract directive → resolve template → merge → write
//! ```
//!
//! The directive comment that selected the template is cut from the article
//! before merging, so `<!-- template: post.html -->Hello` merged into
//! `<h1>Post</h1><!-- insert body -->` gives `<h1>Post</h1>Hello`.
//!
//! The run stops at the first error. In particular a missing template aborts
//! the whole build, not just the offending article, and files already
//! written stay in `build/`.
//!
//! [`check_site`] does steps 1 and 4 without writing anything and collects
//! every problem instead of stopping at the first one.

use crate::config::{ConfigError, Layout};
use crate::directive::{ResolveError, TemplateExtractor};
use crate::merge::{MergeError, MergeOutcome, TemplateMerger};
use crate::prepare::{self, Confirm, PrepareError};
use crate::scan::{self, ScanError};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Directory {} does not exist. Nothing to do.", .0.display())]
    TemplatesMissing(PathBuf),
    #[error("Build directory {} exists and was not deleted", .0.display())]
    Declined(PathBuf),
    #[error(transparent)]
    MissingTemplate(#[from] ResolveError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("IO error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl From<PrepareError> for BuildError {
    fn from(err: PrepareError) -> Self {
        match err {
            PrepareError::Declined(path) => BuildError::Declined(path),
            PrepareError::Io { path, source } => BuildError::Io { path, source },
        }
    }
}

impl BuildError {
    /// Process exit code for this failure.
    ///
    /// | Code | Meaning |
    /// |------|---------|
    /// | 1 | templates directory missing |
    /// | 2 | build directory deletion declined |
    /// | 3 | an article references a missing template |
    /// | 4 | anything else (I/O, config, walk) |
    pub fn exit_code(&self) -> u8 {
        match self {
            BuildError::TemplatesMissing(_) => 1,
            BuildError::Declined(_) => 2,
            BuildError::MissingTemplate(_) => 3,
            BuildError::Config(_)
            | BuildError::Scan(_)
            | BuildError::Merge(_)
            | BuildError::Io { .. } => 4,
        }
    }
}

/// Progress reported while building.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// The public directory was copied into the build directory.
    PublicCopied { files: usize },
    /// Article `index` of `total` (1-based) is about to be processed.
    ArticleStarted {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    /// Parent directories were created for an output file.
    DirectoryCreated { path: PathBuf },
    /// The template had no body marker, so the article text was dropped.
    MarkerMissing { template: PathBuf, article: PathBuf },
}

/// Result of a successful build.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BuildSummary {
    pub articles: usize,
    pub public_files: usize,
    /// Articles that were written without their body (template lacks a marker).
    pub dropped_bodies: usize,
}

/// Result of [`check_site`].
#[derive(Debug, Default)]
pub struct CheckReport {
    pub articles: usize,
    /// Every `(template, article)` pair where the template doesn't exist,
    /// sorted by template.
    pub missing: Vec<(PathBuf, PathBuf)>,
    /// Existing templates referenced by some article that have no body marker.
    pub markerless: Vec<PathBuf>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

fn send(progress: Option<&Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

fn require_templates(layout: &Layout) -> Result<(), BuildError> {
    if !layout.templates.is_dir() {
        return Err(BuildError::TemplatesMissing(layout.templates.clone()));
    }
    Ok(())
}

fn read_article(path: &Path) -> Result<Vec<u8>, BuildError> {
    fs::read(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the site described by `layout`.
pub fn build_site(
    layout: &Layout,
    confirm: &mut dyn Confirm,
    progress: Option<Sender<BuildEvent>>,
) -> Result<BuildSummary, BuildError> {
    let progress = progress.as_ref();
    require_templates(layout)?;

    prepare::prepare_build_dir(&layout.build, confirm)?;

    let mut summary = BuildSummary::default();
    if let Some(files) = prepare::copy_public(&layout.public, &layout.build)? {
        summary.public_files = files;
        send(progress, BuildEvent::PublicCopied { files });
    }

    let extractor = TemplateExtractor::new();
    let merger = TemplateMerger::new();

    let articles = scan::discover_articles(&layout.articles)?;
    let total = articles.len();
    for (i, path) in articles.iter().enumerate() {
        send(
            progress,
            BuildEvent::ArticleStarted {
                index: i + 1,
                total,
                path: path.clone(),
            },
        );

        let article = read_article(path)?;
        let template =
            extractor.resolve(&layout.templates, &layout.default_template, &article, path)?;

        let body = extractor.strip(&article);

        let output = scan::output_path(&layout.articles, &layout.build, path)?;
        if let Some(parent) = output.parent()
            && !parent.exists()
        {
            send(
                progress,
                BuildEvent::DirectoryCreated {
                    path: parent.to_path_buf(),
                },
            );
            fs::create_dir_all(parent).map_err(|source| BuildError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if merger.merge_file(&output, &template, &body)? == MergeOutcome::NoMarker {
            summary.dropped_bodies += 1;
            send(
                progress,
                BuildEvent::MarkerMissing {
                    template,
                    article: path.clone(),
                },
            );
        }
        summary.articles += 1;
    }

    Ok(summary)
}

/// Validate every article's template reference without writing anything.
///
/// Only a missing templates directory or an I/O failure is returned as an
/// error; missing templates are collected into the report.
pub fn check_site(layout: &Layout) -> Result<CheckReport, BuildError> {
    require_templates(layout)?;

    let extractor = TemplateExtractor::new();
    let merger = TemplateMerger::new();

    let articles = scan::discover_articles(&layout.articles)?;
    let mut report = CheckReport {
        articles: articles.len(),
        ..CheckReport::default()
    };
    let mut used = BTreeSet::new();

    for path in &articles {
        let article = read_article(path)?;
        match extractor.resolve(&layout.templates, &layout.default_template, &article, path) {
            Ok(template) => {
                used.insert(template);
            }
            Err(ResolveError::MissingTemplate {
                template,
                article: referrer,
            }) => {
                report.missing.push((template, referrer));
            }
        }
    }

    report.missing.sort();

    for template in used {
        let text = fs::read(&template).map_err(|source| BuildError::Io {
            path: template.clone(),
            source,
        })?;
        if !merger.has_marker(&text) {
            report.markerless.push(template);
        }
    }

    Ok(report)
}

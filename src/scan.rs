//! Article discovery.
//!
//! Every non-directory entry under the articles root is an article, at any
//! depth. Nothing is filtered by extension: a `.txt` or `.xml` file is merged
//! into its template the same way an `.html` file is.
//!
//! ```text
//! articles/                 build/
//! ├── a.html         →      ├── a.html
//! └── sub/                  └── sub/
//!     └── b.html     →          └── b.html
//! ```
//!
//! Paths are returned sorted, so build order and progress output don't
//! depend on the platform's directory enumeration order.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[error("Article {} is outside {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Collect all article files under `root`, sorted.
///
/// Symlinked files are treated as articles. Symlinked directories are
/// skipped like any other directory and not descended into.
pub fn discover_articles(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut articles = Vec::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        // `file_type` doesn't follow links; `path().is_dir()` does.
        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }
        articles.push(entry.into_path());
    }
    articles.sort();
    Ok(articles)
}

/// Output location for `article`: its path relative to `articles_root`,
/// re-rooted under `build_root`.
pub fn output_path(
    articles_root: &Path,
    build_root: &Path,
    article: &Path,
) -> Result<PathBuf, ScanError> {
    let relative = article
        .strip_prefix(articles_root)
        .map_err(|_| ScanError::OutsideRoot {
            path: article.to_path_buf(),
            root: articles_root.to_path_buf(),
        })?;
    Ok(build_root.join(relative))
}

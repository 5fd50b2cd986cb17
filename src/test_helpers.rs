//! Shared test utilities.
//!
//! [`TestSite`] is a throwaway working root in a temp directory with helpers
//! for writing and reading files by relative path.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = example_site();
//! build_site(&site.layout(), &mut |_: &str| true, None).unwrap();
//! assert_eq!(site.read("build/a.html"), "<h1>Post</h1>Hello");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::{Layout, SiteConfig};

pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Layout with the default config.
    pub fn layout(&self) -> Layout {
        Layout::new(self.path(), &SiteConfig::default())
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.path().join(rel)).unwrap();
    }

    /// Read a file. Panics with the path on failure.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path().join(rel))
            .unwrap_or_else(|e| panic!("reading '{rel}': {e}"))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path().join(rel).exists()
    }
}

/// Two templates, one article using a directive and one nested article
/// falling back to `default.html`.
pub fn example_site() -> TestSite {
    let site = TestSite::new();
    site.write("templates/default.html", "<!-- insert body -->");
    site.write("templates/post.html", "<h1>Post</h1><!-- insert body -->");
    site.write("articles/a.html", "<!-- template: post.html -->Hello");
    site.write("articles/sub/b.html", "World");
    site
}

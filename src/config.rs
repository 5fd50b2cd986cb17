//! Site configuration module.
//!
//! Handles loading and validating the optional `config.toml` in the
//! working root. Every key has a default, so a site with the conventional
//! layout needs no config file at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! templates_dir = "templates"       # Required to exist at build time
//! articles_dir = "articles"         # Walked recursively
//! public_dir = "public"             # Copied into the build dir if present
//! build_dir = "build"               # Recreated on every build
//! default_template = "default.html" # Used by articles without a directive
//! ```
//!
//! Directory values are relative to the working root passed with `--root`.
//! Unknown keys are rejected to catch typos early. `build_dir` is deleted on
//! every build, so it must be a subdirectory of the working root that neither
//! contains nor sits inside any of the other directories.

use crate::directive::{DEFAULT_TEMPLATE, is_valid_template_name};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding template files, looked up by name.
    pub templates_dir: String,
    /// Directory walked for articles.
    pub articles_dir: String,
    /// Static files copied verbatim into the build directory.
    pub public_dir: String,
    /// Output directory, deleted and recreated by every build.
    pub build_dir: String,
    /// Template name for articles without a `<!-- template: ... -->` directive.
    pub default_template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            templates_dir: "templates".to_string(),
            articles_dir: "articles".to_string(),
            public_dir: "public".to_string(),
            build_dir: "build".to_string(),
            default_template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dirs = [
            ("templates_dir", &self.templates_dir),
            ("articles_dir", &self.articles_dir),
            ("public_dir", &self.public_dir),
            ("build_dir", &self.build_dir),
        ];
        for (key, value) in dirs {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        let Some(build) = within_root(&self.build_dir).filter(|p| !p.as_os_str().is_empty())
        else {
            return Err(ConfigError::Validation(format!(
                "build_dir \"{}\" must be a subdirectory of the working root",
                self.build_dir
            )));
        };
        for (key, value) in &dirs[..3] {
            let Some(source) = within_root(value) else {
                continue;
            };
            if build.starts_with(&source) || source.starts_with(&build) {
                return Err(ConfigError::Validation(format!(
                    "build_dir \"{}\" overlaps {key} \"{value}\"",
                    self.build_dir
                )));
            }
        }
        if !is_valid_template_name(&self.default_template) {
            return Err(ConfigError::Validation(format!(
                "default_template \"{}\" may only contain letters, digits, '.', '_' and '-'",
                self.default_template
            )));
        }
        Ok(())
    }
}

/// Lexically normalize a root-relative directory setting.
///
/// `.` components are dropped and `..` pops the previous one. Returns `None`
/// for absolute paths and for paths that climb out of the root. The working
/// root itself normalizes to an empty path.
fn within_root(value: &str) -> Option<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in Path::new(value).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(normalized)
}

/// A [`SiteConfig`] anchored at a working root.
///
/// Every path the build touches comes from here; nothing in the crate uses
/// the process working directory implicitly.
#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
    pub templates: PathBuf,
    pub articles: PathBuf,
    pub public: PathBuf,
    pub build: PathBuf,
    pub default_template: String,
}

impl Layout {
    pub fn new(root: &Path, config: &SiteConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            templates: root.join(&config.templates_dir),
            articles: root.join(&config.articles_dir),
            public: root.join(&config.public_dir),
            build: root.join(&config.build_dir),
            default_template: config.default_template.clone(),
        }
    }
}

/// Load config from `config.toml` in the working root.
///
/// A missing file means all defaults. Keys absent from the file keep their
/// default values; unknown keys are an error.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    let config = if path.exists() {
        toml::from_str(&fs::read_to_string(&path)?)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# tmplpress configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Paths are relative to the working root (--root).
# Unknown keys will cause an error.

# Directory containing template files. Must exist.
templates_dir = "templates"

# Directory walked recursively for articles. Every file is an article.
articles_dir = "articles"

# Static files copied into the build directory before articles are merged.
# Skipped when the directory does not exist.
public_dir = "public"

# Output directory. Deleted (after confirmation) and recreated every build.
build_dir = "build"

# Template for articles that carry no <!-- template: NAME --> directive.
default_template = "default.html"
"##
}

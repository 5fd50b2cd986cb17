//! # tmplpress
//!
//! A minimal static site builder. Articles are HTML fragments (or any text)
//! that name their layout in a comment; templates mark where the article
//! goes. A build splices each article into its template and writes the result
//! under `build/`, mirroring the `articles/` tree.
//!
//! ```text
//! site/
//! ├── config.toml          # Optional, see [`config`]
//! ├── templates/
//! │   ├── default.html     # <html>…<!-- insert body -->…</html>
//! │   └── post.html
//! ├── articles/
//! │   ├── a.html           # <!-- template: post.html -->Hello
//! │   └── sub/b.html       # no directive → default.html
//! ├── public/              # Copied into build/ as-is
//! └── build/               # Output, recreated every run
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`directive`] | Finds `<!-- template: NAME -->` in an article and resolves it to a template file |
//! | [`merge`] | Replaces the first `<!-- insert body -->` in a template with the article |
//! | [`scan`] | Walks `articles/` and maps each article to its output path |
//! | [`prepare`] | Confirmed deletion of `build/`, copy of `public/` |
//! | [`site`] | Orchestrates a build or a read-only check |
//! | [`config`] | `config.toml` loading, merging over defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## One Pass, No Engine
//!
//! There are no loops, conditionals, or includes. A template is text with one
//! hole. Anything fancier belongs in a real templating engine.
//!
//! ## Stop at the First Problem
//!
//! A build aborts on the first error, including an article naming a template
//! that doesn't exist. `tmplpress check` is the batch alternative: it reports
//! every missing template at once without writing anything.
//!
//! ## Full Rebuilds
//!
//! `build/` is deleted and recreated on every run, after confirmation. No
//! caching, no incremental state, nothing carried between runs.

pub mod config;
pub mod directive;
pub mod merge;
pub mod output;
pub mod prepare;
pub mod scan;
pub mod site;

#[cfg(test)]
pub(crate) mod test_helpers;

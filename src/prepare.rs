//! Build directory setup: confirmed deletion and public asset copy.
//!
//! A build always starts from an empty build directory. If one already exists
//! the user has to agree to delete it; the question goes through the
//! [`Confirm`] trait so the build can run unattended (`--yes`) or under test
//! without a console.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("Not deleting {}, build aborted", .0.display())]
    Declined(PathBuf),
    #[error("IO error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> PrepareError + '_ {
    move |source| PrepareError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Something that can answer a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        Ok(self(prompt))
    }
}

/// Asks on a writer and reads one line of answer from a reader.
///
/// [`ConsolePrompt::stdio`] wires it to the terminal.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for ConsolePrompt<R, W> {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{prompt} [y/n]: ")?;
        self.output.flush()?;
        let mut response = String::new();
        self.input.read_line(&mut response)?;
        Ok(is_affirmative(&response))
    }
}

/// Only answers starting with `y` or `Y` count as yes. Empty input is a no.
pub fn is_affirmative(response: &str) -> bool {
    matches!(response.chars().next(), Some('y' | 'Y'))
}

/// Ensure `build` exists and is empty.
///
/// If it already exists, `confirm` decides whether it is deleted. A refusal
/// returns [`PrepareError::Declined`] without touching the filesystem.
pub fn prepare_build_dir(build: &Path, confirm: &mut dyn Confirm) -> Result<(), PrepareError> {
    if build.exists() {
        let prompt = format!("Delete build directory {}?", build.display());
        if !confirm.confirm(&prompt).map_err(io_err(build))? {
            return Err(PrepareError::Declined(build.to_path_buf()));
        }
        fs::remove_dir_all(build).map_err(io_err(build))?;
    }
    fs::create_dir_all(build).map_err(io_err(build))
}

/// Copy the public directory into the build directory, overwriting files.
///
/// Returns the number of files copied, or `None` when `public` doesn't exist.
pub fn copy_public(public: &Path, build: &Path) -> Result<Option<usize>, PrepareError> {
    if !public.is_dir() {
        return Ok(None);
    }
    copy_dir_recursive(public, build).map(Some)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, PrepareError> {
    fs::create_dir_all(dst).map_err(io_err(dst))?;
    let mut copied = 0;
    for entry in fs::read_dir(src).map_err(io_err(src))? {
        let entry = entry.map_err(io_err(src))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).map_err(io_err(&src_path))?;
            copied += 1;
        }
    }
    Ok(copied)
}

//! In-place source repair and the parse-or-convert strategy chain.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use pyscope_core::parse_module;
use pyscope_error::{Error, Result};

use crate::staging::copy_into;
use crate::PY2_CONVERT_DIR;

fn non_ascii_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\x00-\x7F]+").expect("literal pattern"))
}

/// Repairs a Python file so the parser can take it: permissive UTF-8 decode,
/// tab expansion, non-ASCII stripping, and a one-shot `2to3` fallback for
/// python 2 sources.
#[derive(Debug, Clone)]
pub struct SourceCleaner {
    indent_size: usize,
}

impl Default for SourceCleaner {
    fn default() -> Self {
        Self { indent_size: 4 }
    }
}

/// The fallback chain, tried in order; first parse success wins.
#[derive(Debug, Clone, Copy)]
enum Strategy {
    /// Parse the repaired file as-is.
    Direct,
    /// Convert python 2 syntax down with `2to3`, then parse the output.
    ConvertPy2,
}

impl Strategy {
    const CHAIN: [Strategy; 2] = [Strategy::Direct, Strategy::ConvertPy2];

    fn candidate(self, cleaner: &SourceCleaner, path: &Path) -> Result<PathBuf> {
        match self {
            Strategy::Direct => Ok(path.to_path_buf()),
            Strategy::ConvertPy2 => cleaner.convert_py2(path),
        }
    }
}

impl SourceCleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spaces each tab expands to. Default is 4.
    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    /// Read a file with a permissive decode, dropping invalid sequences.
    pub fn read_lossy(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| {
            Error::from(e)
                .with_operation("clean::read_lossy")
                .with_context("path", path.display().to_string())
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Replace every tab with `indent_size` spaces, in place.
    ///
    /// Destructive: the file at `path` is rewritten before any parse attempt.
    pub fn fix_indentation(&self, path: &Path) -> Result<()> {
        let content = self.read_lossy(path)?;
        let fixed = content.replace('\t', &" ".repeat(self.indent_size));
        fs::write(path, fixed).map_err(|e| {
            Error::from(e)
                .with_operation("clean::fix_indentation")
                .with_context("path", path.display().to_string())
        })
    }

    /// Strip non-ASCII characters, in place.
    pub fn strip_non_ascii(&self, path: &Path) -> Result<()> {
        let content = self.read_lossy(path)?;
        let stripped = non_ascii_pattern().replace_all(&content, "");
        fs::write(path, stripped.as_ref()).map_err(|e| {
            Error::from(e)
                .with_operation("clean::strip_non_ascii")
                .with_context("path", path.display().to_string())
        })
    }

    /// Run `2to3` on the file, writing the converted copy into the
    /// `_2to3_files` directory next to it. Returns the converted path.
    pub fn convert_py2(&self, path: &Path) -> Result<PathBuf> {
        let directory = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| Error::invalid_argument("path has no file name"))?;
        let convert_dir = directory.join(PY2_CONVERT_DIR);

        let output = Command::new("2to3")
            .arg("-w")
            .arg("-n")
            .arg("-o")
            .arg(&convert_dir)
            .arg(path)
            .output()
            .map_err(|e| {
                let err = if e.kind() == io::ErrorKind::NotFound {
                    Error::tool_not_found("2to3").set_source(e)
                } else {
                    Error::from(e)
                };
                err.with_operation("clean::convert_py2")
                    .with_context("path", path.display().to_string())
            })?;

        if !output.status.success() {
            return Err(Error::conversion_failed("2to3 exited with a failure status")
                .with_operation("clean::convert_py2")
                .with_context("path", path.display().to_string())
                .with_context(
                    "stderr",
                    String::from_utf8_lossy(&output.stderr).trim().to_string(),
                ));
        }

        Ok(convert_dir.join(file_name))
    }

    /// Normalize `path` into a parseable staged copy under `staging_dir`.
    ///
    /// Applies the in-place repairs, then walks the strategy chain. On the
    /// first candidate that parses, the candidate is copied into
    /// `staging_dir` (collision-safe) and its staged path returned. When the
    /// chain is exhausted the last error is surfaced as definitive.
    pub fn normalize(&self, path: &Path, staging_dir: &Path) -> Result<PathBuf> {
        if !path.is_file() {
            return Err(Error::file_not_found(path.display().to_string())
                .with_operation("clean::normalize"));
        }

        self.fix_indentation(path)?;
        self.strip_non_ascii(path)?;

        let mut last_err: Option<Error> = None;
        for strategy in Strategy::CHAIN {
            let candidate = match strategy.candidate(self, path) {
                Ok(candidate) => candidate,
                Err(e) => {
                    debug!(strategy = ?strategy, error = %e, "strategy produced no candidate");
                    last_err = Some(e);
                    continue;
                }
            };

            let bytes = fs::read(&candidate).map_err(|e| {
                Error::from(e)
                    .with_operation("clean::normalize")
                    .with_context("path", candidate.display().to_string())
            })?;

            match parse_module(&bytes) {
                Ok(_) => return copy_into(&candidate, staging_dir),
                Err(e) => {
                    debug!(strategy = ?strategy, error = %e, "candidate failed to parse");
                    last_err = Some(e.with_operation("clean::normalize"));
                }
            }
        }

        let err = last_err
            .unwrap_or_else(|| Error::parse_failed("no strategy produced a parseable file"));
        Err(err
            .with_context("path", path.display().to_string())
            .persist())
    }
}

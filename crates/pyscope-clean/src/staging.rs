//! Staging-directory lifecycle: collision-safe copies in, scoped removal out.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use pyscope_error::{Error, Result};

use crate::{CLEANED_FILES_DIR, PY2_CONVERT_DIR};

/// Copy `source` into `dest_dir` under its own file name, appending `(1)`,
/// `(2)`, ... while the name is taken.
///
/// A copy failure (the usual cause is a broken symbolic link) is a
/// best-effort skip: it is logged and the unstaged source path is returned,
/// never escalated.
pub fn copy_into(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(Error::file_not_found(source.display().to_string())
            .with_operation("clean::copy_into"));
    }

    fs::create_dir_all(dest_dir).map_err(|e| {
        Error::from(e)
            .with_operation("clean::copy_into")
            .with_context("dir", dest_dir.display().to_string())
    })?;

    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::invalid_argument("source path has no utf-8 file name"))?;

    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let ext = Path::new(file_name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let mut dest = dest_dir.join(file_name);
    let mut counter = 1;
    while dest.exists() {
        dest = dest_dir.join(format!("{stem}({counter}){ext}"));
        counter += 1;
    }

    match fs::copy(source, &dest) {
        Ok(_) => Ok(dest),
        Err(e) => {
            warn!(path = %source.display(), error = %e, "skipping uncopyable file");
            Ok(source.to_path_buf())
        }
    }
}

/// Owner of the transient staging directories for one source directory.
///
/// Both the cleaned-files directory and the `2to3` output directory are
/// removed on drop, success or failure, so a batch leaves nothing behind.
#[derive(Debug)]
pub struct StagingGuard {
    staging_dir: PathBuf,
    convert_dir: PathBuf,
    keep: bool,
}

impl StagingGuard {
    /// Guard the staging directories that live next to files in `source_dir`.
    pub fn new(source_dir: &Path) -> Self {
        Self {
            staging_dir: source_dir.join(CLEANED_FILES_DIR),
            convert_dir: source_dir.join(PY2_CONVERT_DIR),
            keep: false,
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Leave the directories in place on drop, for inspection.
    pub fn keep(mut self) -> Self {
        self.keep = true;
        self
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for dir in [&self.staging_dir, &self.convert_dir] {
            if dir.exists() {
                if let Err(e) = fs::remove_dir_all(dir) {
                    warn!(dir = %dir.display(), error = %e, "failed to remove staging directory");
                }
            }
        }
    }
}

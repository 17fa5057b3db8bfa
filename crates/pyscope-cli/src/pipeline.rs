//! Per-file processing pipeline: clean → parse → classify.

use std::fs;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use pyscope_clean::{SourceCleaner, StagingGuard};
use pyscope_core::{extract_identifiers, IdentifierRecord};
use pyscope_error::Result;

use crate::PyscopeOptions;

/// One identifier record tagged with the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    pub file: String,
    #[serde(flatten)]
    pub record: IdentifierRecord,
}

/// Classify every discovered file.
///
/// A file that fails to normalize or parse is logged and skipped; it
/// contributes zero records to the batch, never a truncated sequence.
pub fn process_files(opts: &PyscopeOptions, files: &[String]) -> Result<Vec<FileRecord>> {
    let batch_start = Instant::now();
    info!("Classifying {} python files", files.len());

    let cleaner = SourceCleaner::new();
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for file in files {
        match process_one(&cleaner, file, opts.no_clean) {
            Ok(records) => {
                rows.extend(records.into_iter().map(|record| FileRecord {
                    file: file.clone(),
                    record,
                }));
            }
            Err(e) => {
                skipped += 1;
                warn!(file, error = %e, "skipping file");
            }
        }
    }

    info!(
        "Classification: {:.2}s ({} files, {} skipped, {} identifiers)",
        batch_start.elapsed().as_secs_f64(),
        files.len() - skipped,
        skipped,
        rows.len()
    );

    Ok(rows)
}

fn process_one(cleaner: &SourceCleaner, file: &str, no_clean: bool) -> Result<Vec<IdentifierRecord>> {
    let path = Path::new(file);

    if no_clean {
        let source = fs::read(path)?;
        return extract_identifiers(&source);
    }

    // The guard owns the staging directories next to the source file and
    // removes them once the file's records are extracted, even on failure.
    let source_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let guard = StagingGuard::new(source_dir);
    let staged = cleaner.normalize(path, guard.staging_dir())?;
    let source = fs::read(&staged)?;
    extract_identifiers(&source)
}

//! File discovery and filtering for pyscope.

use std::collections::HashSet;
use std::io;
use std::time::Instant;

use ignore::WalkBuilder;
use tracing::info;

use pyscope_error::Result;

use crate::PyscopeOptions;

/// Directories to skip during file discovery.
fn should_skip_dir(name: &str) -> bool {
    matches!(
        name,
        // Virtualenvs and interpreter caches
        "venv"
            | ".venv"
            | "env"
            | ".env"
            | "__pycache__"
            | "site-packages"
            | ".tox"
            | ".mypy_cache"
            | ".pytest_cache"
            // Build output directories
            | "build"
            | "dist"
            | "target"
            | "out"
            // Vendor/dependency directories
            | "vendor"
            | "node_modules"
            | "third_party"
    )
}

/// Check if a file is auto-generated code that should be skipped.
fn is_generated_file(path: &std::path::Path) -> bool {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    // Protobuf/gRPC generated modules
    file_name.ends_with("_pb2.py") || file_name.ends_with("_pb2_grpc.py")
}

/// Discover python files from `opts.files` and `opts.dirs`.
///
/// Walks `opts.dirs` collecting `.py` files, plus any explicit `opts.files`,
/// deduplicated and with generated modules skipped.
pub fn discover_files(opts: &PyscopeOptions) -> Result<Vec<String>> {
    let discovery_start = Instant::now();

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut skipped_count = 0usize;

    let mut add_path = |path: &str| {
        if seen.contains(path) {
            return;
        }
        if is_generated_file(std::path::Path::new(path)) {
            skipped_count += 1;
            return;
        }
        seen.insert(path.to_string());
        files.push(path.to_string());
    };

    for file in &opts.files {
        add_path(file);
    }

    if !opts.dirs.is_empty() {
        let walker_threads = std::thread::available_parallelism()
            .map(|v| v.get())
            .unwrap_or(1);

        for dir in &opts.dirs {
            let mut builder = WalkBuilder::new(dir);
            builder
                .standard_filters(true)
                .follow_links(false)
                .threads(walker_threads)
                .filter_entry(|entry| {
                    // Always include root
                    if entry.depth() == 0 {
                        return true;
                    }
                    // Non-directories pass through
                    let Some(file_type) = entry.file_type() else {
                        return true;
                    };
                    if !file_type.is_dir() {
                        return true;
                    }
                    // Filter directories by name
                    let Some(name) = entry.file_name().to_str() else {
                        return true;
                    };
                    !should_skip_dir(&name.to_ascii_lowercase())
                });

            for entry in builder.build() {
                let entry = entry.map_err(|e| {
                    io::Error::other(format!("Failed to walk directory {dir}: {e}"))
                })?;

                if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                    continue;
                }

                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("py") {
                    add_path(&path.to_string_lossy());
                }
            }
        }
    }

    if skipped_count > 0 {
        info!("Skipped {} generated python modules", skipped_count);
    }

    info!(
        "File discovery: {:.2}s ({} files)",
        discovery_start.elapsed().as_secs_f64(),
        files.len()
    );

    if files.is_empty() {
        return Err("No input files found. Check that the directory contains python files.".into());
    }

    Ok(files)
}

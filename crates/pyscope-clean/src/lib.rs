//! # pyscope-clean
//!
//! The source normalizer: takes a raw Python file and produces a staged copy
//! that is guaranteed to parse, or a definitive failure.
//!
//! The repairs (permissive decode, tab expansion, non-ASCII stripping) are
//! applied **in place** to the input file before any parse attempt, exactly
//! as downstream dataset tooling expects; callers needing the original must
//! copy it beforehand. Parsing is then attempted through an ordered strategy
//! chain: the repaired file as-is, then a one-shot `2to3` downgrade
//! conversion. The first strategy whose output parses wins; when both fail
//! the error is definitive and nothing is staged.

mod cleaner;
mod staging;

pub use cleaner::SourceCleaner;
pub use staging::{copy_into, StagingGuard};

/// Staging directory for cleaned copies, created next to the source file.
pub const CLEANED_FILES_DIR: &str = "cleaned_files";

/// Output directory for `2to3`-converted files, created next to the source
/// file. Fixed per source directory, so concurrent normalization of files in
/// the same directory requires external serialization.
pub const PY2_CONVERT_DIR: &str = "_2to3_files";

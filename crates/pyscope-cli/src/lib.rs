//! pyscope command-line interface.
//!
pub mod discovery;
pub mod output;
pub mod pipeline;

use pyscope_error::Result;

pub use output::OutputFormat;
pub use pipeline::{process_files, FileRecord};

/// Options for running pyscope.
pub struct PyscopeOptions {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
    pub output: Option<String>,
    pub no_clean: bool,
    pub format: OutputFormat,
}

/// Main entry point: discover, classify, render.
pub fn run_main(opts: &PyscopeOptions) -> Result<String> {
    let files = discovery::discover_files(opts)?;
    let rows = process_files(opts, &files)?;
    output::render(&rows, opts.format)
}

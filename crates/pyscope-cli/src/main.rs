use std::time::Instant;

use clap::ArgGroup;
use clap::Parser;

use pyscope_cli::{run_main, OutputFormat, PyscopeOptions};
use pyscope_error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "pyscope",
    about = "pyscope: scope-tagged identifier extraction for python source",
    version,
    group = ArgGroup::new("inputs").required(true).args(["files", "dirs"])
)]
pub struct Cli {
    /// Individual python files to classify (repeatable)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        num_args = 1..,
        action = clap::ArgAction::Append,
        conflicts_with = "dirs"
    )]
    files: Vec<String>,

    /// Directories to scan recursively (repeatable)
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        num_args = 1..,
        action = clap::ArgAction::Append,
        conflicts_with = "files"
    )]
    dirs: Vec<String>,

    /// Skip the normalizer and classify files as-is.
    ///
    /// Without cleaning, a file that fails to parse is skipped; with
    /// cleaning, the input files are repaired IN PLACE before parsing.
    #[arg(long = "no-clean", default_value_t = false)]
    no_clean: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = PyscopeOptions {
        files: args.files,
        dirs: args.dirs,
        output: args.output.clone(),
        no_clean: args.no_clean,
        format: args.format,
    };

    match run_main(&opts) {
        Ok(rendered) => {
            if let Some(ref path) = args.output {
                std::fs::write(path, &rendered)?;
                tracing::info!(path, "output written");
            } else {
                println!("{rendered}");
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            tracing::error!(error = %e, "execution failed");
        }
    }

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    eprintln!("Total time: {total_secs:.2}s");
    Ok(())
}

pub fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}

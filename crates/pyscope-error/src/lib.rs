//! # pyscope-error
//!
//! Unified error handling for pyscope.
//!
//! ## Design
//!
//! - **ErrorKind**: what went wrong (e.g. ParseFailed, ConversionFailed)
//! - **ErrorStatus**: whether retrying can help (Permanent, Temporary, Persistent)
//! - **Error context**: key/value pairs that locate the failing file or phase
//! - **Error source**: the underlying error, wrapped rather than leaked
//!
//! ## Usage
//!
//! ```rust
//! use pyscope_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ParseFailed, "tree contains ERROR nodes")
//!         .with_operation("clean::normalize")
//!         .with_context("path", "dataset/legacy.py"))
//! }
//! ```
//!
//! All fallible pyscope functions return `Result<T, pyscope_error::Error>`.
//! External errors are attached with `set_source`; the same failure is
//! wrapped once, and callers further up only append context.

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the pyscope Error.
pub type Result<T> = std::result::Result<T, Error>;

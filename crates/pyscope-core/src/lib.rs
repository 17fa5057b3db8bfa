//! # pyscope-core
//!
//! The scope-tracking identifier classifier: parse Python source with
//! tree-sitter, walk the tree, and emit one [`IdentifierRecord`] per bound
//! identifier, tagged with its [`RoleTag`] and the [`TraversalContext`] it
//! was bound in.
//!
//! ```rust
//! use pyscope_core::{classify, parse_module};
//!
//! let source = b"class A:\n    def f(self):\n        x = 1\n";
//! let tree = parse_module(source).unwrap();
//! let records = classify(&tree, source);
//! assert_eq!(records.len(), 4); // A, f, self, x
//! ```

mod classify;
mod context;
mod parse;
mod record;
mod token;

pub use classify::{classify, extract_identifiers};
pub use context::TraversalContext;
pub use parse::parse_module;
pub use record::{IdentifierRecord, RoleTag};
pub use token::NodeKind;

pub use pyscope_error::{Error, ErrorKind, ErrorStatus, Result};

//! Error kinds for pyscope operations.

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on this to decide how to handle a failure, most importantly
/// whether the normalizer should still attempt its downgrade fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid arguments or options
    InvalidArgument,

    /// Source code failed to parse
    ParseFailed,

    /// The parse tree contains syntax errors
    SyntaxError,

    /// The file content could not be decoded
    EncodingError,

    /// The python 2 to 3 downgrade conversion failed
    ConversionFailed,

    /// An external tool (2to3) is not installed or not on PATH
    ToolNotFound,

    /// File does not exist
    FileNotFound,

    /// Permission denied accessing a file or directory
    PermissionDenied,

    /// Generic I/O failure
    IoFailed,
}

impl ErrorKind {
    /// Whether this kind of error may resolve on retry.
    ///
    /// A transient I/O failure can; a parse or conversion failure cannot
    /// without external changes to the file.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::IoFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::ParseFailed.to_string(), "ParseFailed");
        assert_eq!(ErrorKind::ConversionFailed.to_string(), "ConversionFailed");
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::IoFailed.is_retryable());
        assert!(!ErrorKind::ParseFailed.is_retryable());
        assert!(!ErrorKind::ToolNotFound.is_retryable());
    }
}

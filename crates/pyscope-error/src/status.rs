//! Error status for retry logic.

use std::fmt;

/// The status of an error, indicating whether it can be retried.
///
/// - `Permanent`: don't retry, the error won't resolve without external changes
/// - `Temporary`: a retry may succeed
/// - `Persistent`: was temporary but survived the retry; stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorStatus {
    /// Error is permanent.
    ///
    /// Examples: ParseFailed, FileNotFound, ToolNotFound
    #[default]
    Permanent,

    /// Error is temporary; retry may succeed.
    ///
    /// Example: IoFailed
    Temporary,

    /// Error was temporary but persisted after retrying.
    ///
    /// The normalizer marks its definitive failure with this after the
    /// downgrade strategy is exhausted.
    Persistent,
}

impl ErrorStatus {
    /// Check if retry is recommended.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorStatus::Temporary)
    }

    /// Mark as persistent after failed retries.
    pub fn persist(self) -> Self {
        match self {
            ErrorStatus::Temporary => ErrorStatus::Persistent,
            other => other,
        }
    }

    /// Get status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Permanent => "permanent",
            ErrorStatus::Temporary => "temporary",
            ErrorStatus::Persistent => "persistent",
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retryable() {
        assert!(!ErrorStatus::Permanent.is_retryable());
        assert!(ErrorStatus::Temporary.is_retryable());
        assert!(!ErrorStatus::Persistent.is_retryable());
    }

    #[test]
    fn test_persist() {
        assert_eq!(ErrorStatus::Temporary.persist(), ErrorStatus::Persistent);
        assert_eq!(ErrorStatus::Permanent.persist(), ErrorStatus::Permanent);
        assert_eq!(ErrorStatus::Persistent.persist(), ErrorStatus::Persistent);
    }
}

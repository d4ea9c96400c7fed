/// Error types for textfinder.
///
/// Every failure a search can hit falls into one of three buckets, which the CLI
/// uses to pick its message prefix and exit code:
///
/// 1. **Bad input**: an empty target or a zero worker count. These are caught
///    before any worker is spawned, so no partial work is ever performed.
/// 2. **Corpus unavailable**: the loader could not produce the lines (missing
///    file, permission problem, undecodable bytes). Passed through unchanged.
/// 3. **Internal**: a worker panicked or the pool misbehaved. The whole search is
///    aborted; totals from the workers that did finish are discarded.
///
/// ```rust,ignore
/// match textfinder::search(&corpus, "abc", 4) {
///     Ok(output) => println!("{}", output.total_matches),
///     Err(SearchError::InvalidArgument(msg)) => eprintln!("bad input: {msg}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while loading a corpus or searching it
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Corpus unavailable: {path}: {reason}")]
    CorpusUnavailable { path: PathBuf, reason: String },
    #[error("Search cancelled before all workers finished")]
    Cancelled,
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification of a [`SearchError`] for user-facing reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadInput,
    CorpusUnavailable,
    Internal,
}

impl SearchError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn corpus_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorpusUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Classifies the error for reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::ConfigError(_) => ErrorKind::BadInput,
            Self::CorpusUnavailable { .. } | Self::IoError(_) => ErrorKind::CorpusUnavailable,
            Self::Cancelled | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SearchError::invalid_argument("empty target");
        assert!(matches!(err, SearchError::InvalidArgument(_)));

        let err = SearchError::corpus_unavailable("missing.txt", "No such file");
        assert!(matches!(err, SearchError::CorpusUnavailable { .. }));

        let err = SearchError::internal("worker panicked");
        assert!(matches!(err, SearchError::Internal(_)));

        let err = SearchError::config_error("bad yaml");
        assert!(matches!(err, SearchError::ConfigError(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_argument("target must not be empty");
        assert_eq!(err.to_string(), "Invalid argument: target must not be empty");

        let err = SearchError::corpus_unavailable("lines.txt", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Corpus unavailable: lines.txt: No such file or directory"
        );

        let err = SearchError::internal("worker 3 panicked");
        assert_eq!(err.to_string(), "Internal error: worker 3 panicked");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            SearchError::invalid_argument("x").kind(),
            ErrorKind::BadInput
        );
        assert_eq!(
            SearchError::corpus_unavailable("f", "gone").kind(),
            ErrorKind::CorpusUnavailable
        );
        assert_eq!(SearchError::Cancelled.kind(), ErrorKind::Internal);
        assert_eq!(SearchError::internal("boom").kind(), ErrorKind::Internal);
    }
}

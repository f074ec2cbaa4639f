//! Error types for session operations

use crate::adapter::ExecutionError;
use lacassa_config::ConfigError;
use lacassa_query::QueryError;
use thiserror::Error;

/// Session error type
#[derive(Error, Debug)]
pub enum SessionError {
    /// Building or compiling the statement failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The adapter failed to run a statement or fetch a page
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Session configuration was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A paged aggregation was cancelled before the last page
    #[error("Aggregation cancelled after {pages} pages")]
    Cancelled { pages: usize },
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// Whether the failure came from the store rather than from the caller
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}

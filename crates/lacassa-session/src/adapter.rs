//! Execution adapter seam.
//!
//! The transport to the store lives behind [`ExecutionAdapter`]. Retries
//! and connection state belong to the adapter. This crate hands it the
//! session config once, then compiled text plus positional params and
//! [`ExecutionOptions`] for every statement, and walks the pages it returns.

use lacassa_config::{Consistency, SessionConfig, TimeoutConfig};
use lacassa_query::Value;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Opaque failure surfaced by an adapter (network, store rejection, timeout)
#[derive(Error, Debug)]
#[error("Execution failed: {message}")]
pub struct ExecutionError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying transport error
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Per-statement settings taken from the session config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Rows the store should return per page
    pub page_size: u32,
    pub consistency: Consistency,
    pub request_timeout: Duration,
}

impl ExecutionOptions {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            page_size: config.page_size,
            consistency: config.consistency,
            request_timeout: config.timeouts.request_timeout(),
        }
    }
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            page_size: 5000,
            consistency: Consistency::default(),
            request_timeout: TimeoutConfig::default().request_timeout(),
        }
    }
}

/// A bounded slice of a result set
pub trait PageCursor: Sized {
    /// Rows in this page
    fn row_count(&self) -> usize;

    /// Whether no further pages exist
    fn is_last_page(&self) -> bool;

    /// Fetch the following page. Blocks for a round-trip to the store.
    fn next_page(&self) -> Result<Self, ExecutionError>;
}

/// Executes compiled statements against the store
pub trait ExecutionAdapter {
    type Cursor: PageCursor;

    /// Open the connection described by `config` (contact points,
    /// credentials, connect timeout, keyspace). Called once per session.
    fn connect(&self, config: &SessionConfig) -> Result<(), ExecutionError>;

    /// Run `cql` with `params` bound positionally and return the first page
    fn execute(
        &self,
        cql: &str,
        params: &[Value],
        options: &ExecutionOptions,
    ) -> Result<Self::Cursor, ExecutionError>;
}

impl<A: ExecutionAdapter + ?Sized> ExecutionAdapter for &A {
    type Cursor = A::Cursor;

    fn connect(&self, config: &SessionConfig) -> Result<(), ExecutionError> {
        (**self).connect(config)
    }

    fn execute(
        &self,
        cql: &str,
        params: &[Value],
        options: &ExecutionOptions,
    ) -> Result<Self::Cursor, ExecutionError> {
        (**self).execute(cql, params, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_execution_error_keeps_source() {
        let err = ExecutionError::with_source(
            "connection reset",
            io::Error::new(io::ErrorKind::ConnectionReset, "peer closed"),
        );

        assert_eq!(err.to_string(), "Execution failed: connection reset");
        assert_eq!(err.source().map(|s| s.to_string()), Some("peer closed".to_string()));
    }

    #[test]
    fn test_options_follow_config() {
        let config = SessionConfig::new("blog")
            .with_page_size(2)
            .with_consistency(Consistency::One);

        let options = ExecutionOptions::from_config(&config);

        assert_eq!(options.page_size, 2);
        assert_eq!(options.consistency, Consistency::One);
        assert_eq!(options.request_timeout, Duration::from_millis(12_000));
    }

    #[test]
    fn test_default_options_match_default_config() {
        assert_eq!(
            ExecutionOptions::default(),
            ExecutionOptions::from_config(&SessionConfig::new("blog"))
        );
    }

    #[test]
    fn test_execution_error_without_source() {
        let err = ExecutionError::new("timeout");
        assert_eq!(err.message(), "timeout");
        assert!(err.source().is_none());
    }
}

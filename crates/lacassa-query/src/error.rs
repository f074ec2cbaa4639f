//! Error types for query construction and compilation

use thiserror::Error;

/// Errors raised while building or compiling a query.
///
/// Declaration-time failures (`InvalidCollectionType`, `UnsupportedOperator`,
/// `EmptyInList`) surface from the builder call that caused them; the rest
/// surface from the grammar when a statement is rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid collection type: {kind}, should be any one of set, list, map")]
    InvalidCollectionType { kind: String },

    #[error("Invalid collection shape: {kind} requires {expected}")]
    InvalidCollectionShape {
        kind: &'static str,
        expected: &'static str,
    },

    #[error("Unsupported operator: {operator}")]
    UnsupportedOperator { operator: String },

    #[error("In-list for column {column} has no values")]
    EmptyInList { column: String },

    #[error("Query has no target table")]
    MissingTable,

    #[error("Bindings mismatch: {expected} placeholders but {actual} bound values")]
    BindingMismatch { expected: usize, actual: usize },

    #[error("Column {column} is written both as a plain value and as a collection")]
    ConflictingColumn { column: String },

    #[error("Index creation requires at least one column")]
    EmptyIndex,
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    /// Create an unsupported operator error
    pub fn unsupported_operator<S: Into<String>>(operator: S) -> Self {
        Self::UnsupportedOperator {
            operator: operator.into(),
        }
    }

    /// Whether the error was raised by a builder call rather than at render time
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCollectionType { .. }
                | Self::UnsupportedOperator { .. }
                | Self::EmptyInList { .. }
        )
    }
}

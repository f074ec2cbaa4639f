//! # Lacassa Query
//!
//! Fluent query construction and CQL compilation for wide-column stores with
//! native set, list and map columns.
//!
//! ## Pipeline
//!
//! ```text
//! Query (builder) ──> Statement (compile plan) ──> QueryRenderer ──> RenderedQuery
//! ```
//!
//! - [`Query`] accumulates the table, projection, predicates, modifiers and
//!   queued collection mutations
//! - [`Statement`] borrows a query and picks the statement form
//! - [`CqlGrammar`] renders text plus positional params; collection values
//!   are embedded as literals rather than bound
//!
//! ## Usage
//!
//! ```rust
//! use lacassa_query::{CollectionValue, CqlGrammar, Query, QueryRenderer, Statement, row};
//!
//! let query = Query::table("posts")
//!     .where_("user", "=", "u1")?
//!     .update_collection_with("set", "tags", "+", CollectionValue::items(["rust"]))?;
//! let values = row([("title", "Hello")]);
//!
//! let rendered = CqlGrammar.render(&Statement::Update { query: &query, values: &values })?;
//! assert_eq!(
//!     rendered.cql,
//!     "update posts set title = ?, tags=tags+{'rust'} where user = ?"
//! );
//! # Ok::<(), lacassa_query::QueryError>(())
//! ```

pub mod collection;
pub mod error;
pub mod plan;
pub mod query;
pub mod render;
pub mod value;

// Re-exports
pub use collection::{encode, CollectionKind, CollectionMutation, CollectionValue, DeltaOp};
pub use error::{QueryError, QueryResult};
pub use plan::{row, Row, Statement};
pub use query::{BindingKind, Bindings, Connector, Operator, Predicate, PredicateValue, Query};
pub use render::{CqlGrammar, QueryRenderer, RenderedQuery};
pub use value::Value;

//! Compile plans.
//!
//! A [`Statement`] pairs a borrowed [`Query`] with the statement form to
//! render and any per-statement input. The borrow keeps the query frozen
//! while the renderer reads it.

use crate::query::Query;
use crate::value::Value;
use std::collections::BTreeMap;

/// Plain column values for insert and update, kept in sorted column order
pub type Row = BTreeMap<String, Value>;

/// Build a [`Row`] from column/value pairs
pub fn row<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Statement form to render from a query
#[derive(Debug, Clone, Copy)]
pub enum Statement<'q> {
    Select(&'q Query),
    Insert { query: &'q Query, values: &'q Row },
    Update { query: &'q Query, values: &'q Row },
    Delete(&'q Query),
    Index { query: &'q Query, columns: &'q [String] },
}

impl<'q> Statement<'q> {
    pub fn query(&self) -> &'q Query {
        match self {
            Statement::Select(query) | Statement::Delete(query) => query,
            Statement::Insert { query, .. }
            | Statement::Update { query, .. }
            | Statement::Index { query, .. } => query,
        }
    }

    /// Lowercase verb, used for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "select",
            Statement::Insert { .. } => "insert",
            Statement::Update { .. } => "update",
            Statement::Delete(_) => "delete",
            Statement::Index { .. } => "index",
        }
    }
}

//! Target renderers for compile plans.
//!
//! Renderers convert a [`Statement`] into query text plus the positional
//! params to bind alongside it.

mod cql;

pub use cql::CqlGrammar;

use crate::error::QueryResult;
use crate::plan::Statement;
use crate::value::Value;

/// Output from rendering
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    /// The generated query string
    pub cql: String,
    /// Positional params, in placeholder order
    pub params: Vec<Value>,
}

impl RenderedQuery {
    pub fn new(cql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            cql: cql.into(),
            params,
        }
    }

    /// Substitute params into their placeholders as literals.
    ///
    /// For diagnostics only; execution always binds params. Placeholders
    /// inside quoted literals are left alone, and surplus placeholders stay
    /// as `?`.
    pub fn to_inline_cql(&self) -> String {
        let mut out = String::with_capacity(self.cql.len());
        let mut params = self.params.iter();
        let mut in_literal = false;

        for ch in self.cql.chars() {
            match ch {
                '\'' => {
                    in_literal = !in_literal;
                    out.push(ch);
                }
                '?' if !in_literal => match params.next() {
                    Some(value) => out.push_str(&value.to_cql_literal()),
                    None => out.push(ch),
                },
                _ => out.push(ch),
            }
        }

        out
    }
}

/// Wrap a single identifier segment, doubling embedded double quotes.
///
/// The `*` wildcard is returned untouched.
pub fn wrap_value(value: &str) -> String {
    if value == "*" {
        value.to_string()
    } else {
        value.replace('"', "\"\"")
    }
}

/// Wrap a possibly dotted identifier (`keyspace.table`, `table.column`)
pub fn wrap(identifier: &str) -> String {
    identifier
        .split('.')
        .map(wrap_value)
        .collect::<Vec<_>>()
        .join(".")
}

/// Wrap and comma-join a column list
pub fn columnize<S: AsRef<str>>(columns: &[S]) -> String {
    columns
        .iter()
        .map(|c| wrap(c.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trait for rendering compile plans to a target query language.
pub trait QueryRenderer: Send + Sync {
    /// Unique name for this renderer
    fn name(&self) -> &str;

    /// Render the statement to a query string with parameters
    fn render(&self, statement: &Statement<'_>) -> QueryResult<RenderedQuery>;
}

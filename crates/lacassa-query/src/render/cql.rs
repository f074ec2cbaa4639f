//! CQL grammar.
//!
//! Renders compile plans to the store's query language:
//! - positional `?` placeholders for plain values and where predicates
//! - inline literals for collection columns, which cannot be bound
//! - `and`-only where clauses, `limit` and `allow filtering` suffixes

use crate::collection::CollectionMutation;
use crate::error::{QueryError, QueryResult};
use crate::plan::{Row, Statement};
use crate::query::{Predicate, PredicateValue, Query};
use crate::render::{columnize, wrap, QueryRenderer, RenderedQuery};
use crate::value::Value;
use std::collections::HashSet;
use tracing::{trace, warn};

/// Stateless CQL compiler
#[derive(Debug, Clone, Copy, Default)]
pub struct CqlGrammar;

impl CqlGrammar {
    pub fn new() -> Self {
        Self
    }

    /// Compile a select statement
    pub fn compile_select(&self, query: &Query) -> QueryResult<RenderedQuery> {
        let table = self.table(query)?;
        let wheres = self.compile_wheres(query)?;

        let mut parts = vec!["select".to_string()];
        if query.is_distinct() {
            parts.push("distinct".to_string());
        }
        parts.push(match query.columns() {
            Some(columns) if !columns.is_empty() => columnize(columns),
            _ => "*".to_string(),
        });
        parts.push("from".to_string());
        parts.push(table);
        parts.extend(wheres);
        if let Some(limit) = query.limit_value() {
            parts.push(format!("limit {}", limit));
        }
        if query.allows_filtering() {
            parts.push("allow filtering".to_string());
        }

        Ok(RenderedQuery::new(
            parts.join(" "),
            query.bindings().r#where.clone(),
        ))
    }

    /// Compile an insert statement.
    ///
    /// Plain values become `?` placeholders in sorted column order; queued
    /// insert collections follow as inline literals in declaration order.
    pub fn compile_insert(&self, query: &Query, values: &Row) -> QueryResult<RenderedQuery> {
        let table = self.table(query)?;
        let collections = query.pending_insert_collections();
        self.check_conflicts(values, collections)?;

        if values.is_empty() && collections.is_empty() {
            warn!(table = %table, "Compiling insert with no values or collections");
        }

        let mut columns: Vec<String> = values.keys().map(|k| wrap(k)).collect();
        columns.extend(collections.iter().map(|m| wrap(&m.column)));

        let mut parameters: Vec<String> = values.keys().map(|_| "?".to_string()).collect();
        for mutation in collections {
            parameters.push(mutation.literal()?);
        }

        let cql = format!(
            "insert into {} ({}) values ({})",
            table,
            columns.join(", "),
            parameters.join(", ")
        );
        let params = values.values().cloned().collect();

        Ok(RenderedQuery::new(cql, params))
    }

    /// Compile an update statement.
    ///
    /// Params are the plain values followed by the where bindings.
    pub fn compile_update(&self, query: &Query, values: &Row) -> QueryResult<RenderedQuery> {
        let table = self.table(query)?;
        let collections = query.pending_update_collections();
        self.check_conflicts(values, collections)?;
        let wheres = self.compile_wheres(query)?;

        let plain = values
            .keys()
            .map(|k| format!("{} = ?", wrap(k)))
            .collect::<Vec<_>>()
            .join(", ");
        let assignments = self.compile_update_collections(collections)?;

        let set_clause = [plain, assignments]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        if set_clause.is_empty() {
            warn!(table = %table, "Compiling update with no values or collections");
        }

        let mut parts = vec!["update".to_string(), table, "set".to_string()];
        if !set_clause.is_empty() {
            parts.push(set_clause);
        }
        parts.extend(wheres);

        let params = values
            .values()
            .chain(query.bindings().r#where.iter())
            .cloned()
            .collect();

        Ok(RenderedQuery::new(parts.join(" "), params))
    }

    /// Render collection assignments for an update, in declaration order
    pub fn compile_update_collections(
        &self,
        collections: &[CollectionMutation],
    ) -> QueryResult<String> {
        let assignments = collections
            .iter()
            .map(CollectionMutation::assignment)
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(assignments.join(", "))
    }

    /// Compile a delete statement.
    ///
    /// Named delete columns produce a column delete; otherwise the whole row
    /// is deleted.
    pub fn compile_delete(&self, query: &Query) -> QueryResult<RenderedQuery> {
        let table = self.table(query)?;
        let wheres = self.compile_wheres(query)?;

        let mut parts = vec!["delete".to_string()];
        if let Some(columns) = query.delete_column_list() {
            if !columns.is_empty() {
                parts.push(columnize(columns));
            }
        }
        parts.push("from".to_string());
        parts.push(table);
        parts.extend(wheres);

        Ok(RenderedQuery::new(
            parts.join(" "),
            query.bindings().r#where.clone(),
        ))
    }

    /// Compile a secondary index creation
    pub fn compile_index(&self, query: &Query, columns: &[String]) -> QueryResult<RenderedQuery> {
        let table = self.table(query)?;
        if columns.is_empty() {
            return Err(QueryError::EmptyIndex);
        }

        Ok(RenderedQuery::new(
            format!(
                "create index if not exists on {}({})",
                table,
                columnize(columns)
            ),
            Vec::new(),
        ))
    }

    fn table(&self, query: &Query) -> QueryResult<String> {
        query.table_name().map(wrap).ok_or(QueryError::MissingTable)
    }

    /// Render the where clause, or nothing when there are no predicates.
    ///
    /// Every bound select or where value must land on a where placeholder;
    /// no clause renders a select placeholder.
    fn compile_wheres(&self, query: &Query) -> QueryResult<Option<String>> {
        let bindings = query.bindings();
        let expected = query.where_placeholder_count();
        let actual = bindings.select.len() + bindings.r#where.len();
        if expected != actual {
            return Err(QueryError::BindingMismatch { expected, actual });
        }

        let wheres = query.wheres();
        if wheres.is_empty() {
            return Ok(None);
        }

        let mut clause = String::from("where");
        for (i, predicate) in wheres.iter().enumerate() {
            if i > 0 {
                clause.push(' ');
                clause.push_str(predicate.connector.as_str());
            }
            clause.push(' ');
            clause.push_str(&self.compile_predicate(predicate));
        }

        Ok(Some(clause))
    }

    fn compile_predicate(&self, predicate: &Predicate) -> String {
        let placeholder = match &predicate.value {
            PredicateValue::Single(_) => "?".to_string(),
            PredicateValue::Many(values) => format!("({})", parameterize(values)),
        };
        format!(
            "{} {} {}",
            wrap(&predicate.column),
            predicate.operator,
            placeholder
        )
    }

    /// Each column may be written once per statement, either as a plain
    /// value or by a single collection mutation
    fn check_conflicts(&self, values: &Row, collections: &[CollectionMutation]) -> QueryResult<()> {
        let mut seen = HashSet::new();
        for mutation in collections {
            if values.contains_key(&mutation.column) || !seen.insert(mutation.column.as_str()) {
                return Err(QueryError::ConflictingColumn {
                    column: mutation.column.clone(),
                });
            }
        }
        Ok(())
    }
}

fn parameterize(values: &[Value]) -> String {
    vec!["?"; values.len()].join(", ")
}

impl QueryRenderer for CqlGrammar {
    fn name(&self) -> &str {
        "cql"
    }

    fn render(&self, statement: &Statement<'_>) -> QueryResult<RenderedQuery> {
        let rendered = match *statement {
            Statement::Select(query) => self.compile_select(query),
            Statement::Insert { query, values } => self.compile_insert(query, values),
            Statement::Update { query, values } => self.compile_update(query, values),
            Statement::Delete(query) => self.compile_delete(query),
            Statement::Index { query, columns } => self.compile_index(query, columns),
        }?;

        trace!(
            kind = statement.kind(),
            cql = %rendered.cql,
            params = rendered.params.len(),
            "Rendered statement"
        );

        Ok(rendered)
    }
}

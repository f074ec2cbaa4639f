//! Session facade
//!
//! Ties the query builder, the CQL grammar and an execution adapter
//! together: build a [`Query`] with [`Session::table`], then hand it to one
//! of the terminal operations to compile and execute it.

use crate::adapter::{ExecutionAdapter, ExecutionOptions};
use crate::error::SessionResult;
use crate::paginate::PageAggregator;
use lacassa_config::SessionConfig;
use lacassa_query::{CqlGrammar, Query, QueryRenderer, Row, Statement, Value};
use std::borrow::Cow;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A configured handle for running queries through an adapter
pub struct Session<A: ExecutionAdapter> {
    adapter: A,
    config: SessionConfig,
    options: ExecutionOptions,
    grammar: CqlGrammar,
}

impl<A: ExecutionAdapter> Session<A> {
    /// Validate `config` and connect the adapter with it
    pub fn new(adapter: A, config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        adapter.connect(&config)?;
        info!(
            contact_points = ?config.contact_points(),
            keyspace = %config.keyspace,
            page_size = config.page_size,
            consistency = %config.consistency,
            "Session ready"
        );

        Ok(Self {
            adapter,
            options: ExecutionOptions::from_config(&config),
            config,
            grammar: CqlGrammar::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Options sent with every statement
    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    /// Begin a query against `table`
    pub fn table(&self, table: impl Into<String>) -> Query {
        Query::table(table)
    }

    /// Run the query as a select
    pub fn get(&self, query: &Query) -> SessionResult<A::Cursor> {
        self.run(Statement::Select(query))
    }

    /// Exact row count of the query's result, across every page
    pub fn count(&self, query: &Query) -> SessionResult<u64> {
        self.count_with_cancel(query, &CancellationToken::new())
    }

    /// Like [`Session::count`], abandoning the page walk once `cancel` fires
    pub fn count_with_cancel(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> SessionResult<u64> {
        let rendered = self.grammar.render(&Statement::Select(query))?;
        debug!(cql = %rendered.cql, params = rendered.params.len(), "Counting rows");
        PageAggregator::with_cancellation(cancel.clone()).count(
            &self.adapter,
            &rendered,
            &self.options,
        )
    }

    /// Insert one record plus any queued insert collections.
    ///
    /// Nothing is executed when there is neither a value nor a collection.
    pub fn insert(&self, query: &Query, values: &Row) -> SessionResult<Option<A::Cursor>> {
        if values.is_empty() && query.pending_insert_collections().is_empty() {
            debug!(table = ?query.table_name(), "Skipping empty insert");
            return Ok(None);
        }
        self.run(Statement::Insert { query, values }).map(Some)
    }

    /// Insert each record as its own statement, in order.
    ///
    /// Queued insert collections are written with every record. Records that
    /// would be empty inserts are skipped. The first failure stops the run.
    pub fn insert_many(&self, query: &Query, records: &[Row]) -> SessionResult<Vec<A::Cursor>> {
        let mut cursors = Vec::with_capacity(records.len());
        for values in records {
            if let Some(cursor) = self.insert(query, values)? {
                cursors.push(cursor);
            }
        }
        Ok(cursors)
    }

    /// Update matching rows with plain values and queued collection writes
    pub fn update(&self, query: &Query, values: &Row) -> SessionResult<A::Cursor> {
        self.run(Statement::Update { query, values })
    }

    /// Delete whole rows matching the query
    pub fn delete_row(&self, query: &Query) -> SessionResult<A::Cursor> {
        let query = match query.delete_column_list() {
            Some(columns) if !columns.is_empty() => {
                Cow::Owned(query.clone().delete_columns(Vec::<String>::new()))
            }
            _ => Cow::Borrowed(query),
        };
        self.run(Statement::Delete(&query))
    }

    /// Delete only `columns` from rows matching the query
    pub fn delete_columns<I, S>(&self, query: &Query, columns: I) -> SessionResult<A::Cursor>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let query = query.clone().delete_columns(columns);
        self.run(Statement::Delete(&query))
    }

    /// Create a secondary index on the query's table
    pub fn index(&self, query: &Query, columns: &[String]) -> SessionResult<A::Cursor> {
        self.run(Statement::Index { query, columns })
    }

    /// Execute hand-written CQL with positional params
    pub fn statement(&self, cql: &str, params: &[Value]) -> SessionResult<A::Cursor> {
        debug!(cql, params = params.len(), "Executing statement");
        Ok(self.adapter.execute(cql, params, &self.options)?)
    }

    /// Execute hand-written CQL with no params
    pub fn raw(&self, cql: &str) -> SessionResult<A::Cursor> {
        self.statement(cql, &[])
    }

    fn run(&self, statement: Statement<'_>) -> SessionResult<A::Cursor> {
        let rendered = self.grammar.render(&statement)?;
        debug!(
            kind = statement.kind(),
            cql = %rendered.cql,
            params = rendered.params.len(),
            "Executing statement"
        );
        Ok(self
            .adapter
            .execute(&rendered.cql, &rendered.params, &self.options)?)
    }
}

//! Query model.
//!
//! A [`Query`] accumulates clauses, bindings and collection mutations through
//! consuming builder calls. It is read (never mutated) by the grammar when a
//! statement is rendered, so one query can be compiled any number of times.

use crate::collection::{CollectionKind, CollectionMutation, CollectionValue, DeltaOp};
use crate::error::{QueryError, QueryResult};
use crate::value::Value;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Where-clause operators the store accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Ne,
    In,
    Contains,
    ContainsKey,
    Like,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::Ne => "!=",
            Operator::In => "in",
            Operator::Contains => "contains",
            Operator::ContainsKey => "contains key",
            Operator::Like => "like",
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();

        match normalized.as_str() {
            "=" => Ok(Operator::Eq),
            "<" => Ok(Operator::Lt),
            ">" => Ok(Operator::Gt),
            "<=" => Ok(Operator::Le),
            ">=" => Ok(Operator::Ge),
            "!=" => Ok(Operator::Ne),
            "in" => Ok(Operator::In),
            "contains" => Ok(Operator::Contains),
            "contains key" => Ok(Operator::ContainsKey),
            "like" => Ok(Operator::Like),
            _ => Err(QueryError::unsupported_operator(s)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a predicate joins the one before it. The store has no `or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "and",
        }
    }
}

/// Right-hand side of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateValue {
    Single(Value),
    Many(Vec<Value>),
}

/// A single `where` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub value: PredicateValue,
    pub connector: Connector,
}

impl Predicate {
    /// Number of `?` placeholders this predicate renders
    pub fn placeholder_count(&self) -> usize {
        match &self.value {
            PredicateValue::Single(_) => 1,
            PredicateValue::Many(values) => values.len(),
        }
    }
}

/// Clause a binding belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Select,
    Where,
}

/// Bound values, bucketed by clause.
///
/// Insertion order within each bucket is the positional order at execution.
/// Collection buckets hold the mutations themselves since they are rendered
/// inline rather than bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    pub select: Vec<Value>,
    pub r#where: Vec<Value>,
    pub update_collection: Vec<CollectionMutation>,
    pub insert_collection: Vec<CollectionMutation>,
}

/// Accumulator for a single logical query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    table: Option<String>,
    columns: Option<Vec<String>>,
    wheres: Vec<Predicate>,
    limit: Option<NonZeroU32>,
    distinct: bool,
    allow_filtering: bool,
    bindings: Bindings,
    delete_columns: Option<Vec<String>>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a query against `table`
    pub fn table(table: impl Into<String>) -> Self {
        Self::new().from(table)
    }

    /// Set the target table or materialized view
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the projection list
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Add a predicate; `operator` must be on the supported list
    pub fn where_(
        mut self,
        column: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
    ) -> QueryResult<Self> {
        let operator = operator.parse::<Operator>()?;
        let value = value.into();
        self.bindings.r#where.push(value.clone());
        self.wheres.push(Predicate {
            column: column.into(),
            operator,
            value: PredicateValue::Single(value),
            connector: Connector::And,
        });
        Ok(self)
    }

    /// Add an equality predicate
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.bindings.r#where.push(value.clone());
        self.wheres.push(Predicate {
            column: column.into(),
            operator: Operator::Eq,
            value: PredicateValue::Single(value),
            connector: Connector::And,
        });
        self
    }

    /// Add an `in (...)` predicate with one placeholder per value.
    ///
    /// An empty value list is rejected since `in ()` is not valid CQL.
    pub fn where_in<I, V>(mut self, column: impl Into<String>, values: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let column = column.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(QueryError::EmptyInList { column });
        }

        self.bindings.r#where.extend(values.iter().cloned());
        self.wheres.push(Predicate {
            column,
            operator: Operator::In,
            value: PredicateValue::Many(values),
            connector: Connector::And,
        });
        Ok(self)
    }

    /// Cap the number of returned rows; zero clears the cap
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = NonZeroU32::new(n);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn allow_filtering(mut self) -> Self {
        self.allow_filtering = true;
        self
    }

    /// Replace the whole collection in `column`
    pub fn update_collection(
        self,
        kind: &str,
        column: impl Into<String>,
        value: CollectionValue,
    ) -> QueryResult<Self> {
        let kind = kind.parse::<CollectionKind>()?;
        Ok(self.push_update_collection(CollectionMutation::new(kind, column, value)))
    }

    /// Apply a delta (`+` or `-`) to the collection in `column`
    pub fn update_collection_with(
        self,
        kind: &str,
        column: impl Into<String>,
        operator: &str,
        value: CollectionValue,
    ) -> QueryResult<Self> {
        let kind = kind.parse::<CollectionKind>()?;
        let operator = operator.parse::<DeltaOp>()?;
        Ok(self.push_update_collection(
            CollectionMutation::new(kind, column, value).with_operator(operator),
        ))
    }

    fn push_update_collection(mut self, mutation: CollectionMutation) -> Self {
        self.bindings.update_collection.push(mutation);
        self
    }

    /// Write a collection literal into `column` on insert
    pub fn insert_collection(
        mut self,
        kind: &str,
        column: impl Into<String>,
        value: CollectionValue,
    ) -> QueryResult<Self> {
        let kind = kind.parse::<CollectionKind>()?;
        self.bindings
            .insert_collection
            .push(CollectionMutation::new(kind, column, value));
        Ok(self)
    }

    /// Switch delete compilation from row delete to column delete
    pub fn delete_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delete_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Push a raw binding into a clause bucket.
    ///
    /// The grammar checks every bound value against the rendered
    /// placeholders, so a stray binding fails at render time. No clause
    /// renders a select placeholder, so any select binding fails too.
    pub fn add_binding(mut self, value: impl Into<Value>, kind: BindingKind) -> Self {
        let value = value.into();
        match kind {
            BindingKind::Select => self.bindings.select.push(value),
            BindingKind::Where => self.bindings.r#where.push(value),
        }
        self
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn wheres(&self) -> &[Predicate] {
        &self.wheres
    }

    pub fn limit_value(&self) -> Option<u32> {
        self.limit.map(NonZeroU32::get)
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn allows_filtering(&self) -> bool {
        self.allow_filtering
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn pending_update_collections(&self) -> &[CollectionMutation] {
        &self.bindings.update_collection
    }

    pub fn pending_insert_collections(&self) -> &[CollectionMutation] {
        &self.bindings.insert_collection
    }

    pub fn delete_column_list(&self) -> Option<&[String]> {
        self.delete_columns.as_deref()
    }

    /// Total placeholders the where clause will render
    pub fn where_placeholder_count(&self) -> usize {
        self.wheres.iter().map(Predicate::placeholder_count).sum()
    }
}

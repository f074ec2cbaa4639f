//! Collection literals and mutations.
//!
//! Set, list and map columns cannot be bound as prepared-statement params,
//! so their values are rendered inline:
//! - set: `{'a','b'}`
//! - list: `['a','b']`
//! - map: `{'k':1,'j':2}`
//!
//! Items keep the caller's order. Sets are not deduplicated here; the store
//! collapses duplicates when it applies the write.

use crate::error::{QueryError, QueryResult};
use crate::render::wrap;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// The three native collection types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Set,
    List,
    Map,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Set => "set",
            CollectionKind::List => "list",
            CollectionKind::Map => "map",
        }
    }

    fn delimiters(&self) -> (char, char) {
        match self {
            CollectionKind::Set | CollectionKind::Map => ('{', '}'),
            CollectionKind::List => ('[', ']'),
        }
    }
}

impl FromStr for CollectionKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "set" => Ok(CollectionKind::Set),
            "list" => Ok(CollectionKind::List),
            "map" => Ok(CollectionKind::Map),
            _ => Err(QueryError::InvalidCollectionType {
                kind: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a collection write
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionValue {
    /// Flat items, for sets and lists
    Items(Vec<Value>),
    /// Key/value pairs, for maps
    Pairs(Vec<(Value, Value)>),
}

impl CollectionValue {
    /// Build a flat item list from anything convertible to [`Value`]
    pub fn items<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        CollectionValue::Items(items.into_iter().map(Into::into).collect())
    }

    /// Build a pair list from anything convertible to [`Value`]
    pub fn pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        CollectionValue::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            CollectionValue::Items(items) => items.len(),
            CollectionValue::Pairs(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Delta operator applied against the stored collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOp {
    /// Append to a list, add to a set, merge into a map
    Add,
    /// Remove elements (or map keys)
    Remove,
}

impl DeltaOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaOp::Add => "+",
            DeltaOp::Remove => "-",
        }
    }
}

impl FromStr for DeltaOp {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(DeltaOp::Add),
            "-" => Ok(DeltaOp::Remove),
            other => Err(QueryError::unsupported_operator(other)),
        }
    }
}

/// A queued write against a collection column.
///
/// With no operator the whole collection is replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionMutation {
    pub kind: CollectionKind,
    pub column: String,
    pub value: CollectionValue,
    pub operator: Option<DeltaOp>,
}

impl CollectionMutation {
    pub fn new(kind: CollectionKind, column: impl Into<String>, value: CollectionValue) -> Self {
        Self {
            kind,
            column: column.into(),
            value,
            operator: None,
        }
    }

    pub fn with_operator(mut self, operator: DeltaOp) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Render the literal for this mutation's value
    pub fn literal(&self) -> QueryResult<String> {
        encode(self.kind, &self.value)
    }

    /// Render the `set` fragment used by update statements
    pub fn assignment(&self) -> QueryResult<String> {
        let literal = self.literal()?;
        let column = wrap(&self.column);
        Ok(match self.operator {
            Some(op) => format!("{column}={column}{op}{literal}", op = op.as_str()),
            None => format!("{column}={literal}"),
        })
    }
}

/// Encode a collection value as a store literal.
pub fn encode(kind: CollectionKind, value: &CollectionValue) -> QueryResult<String> {
    let body = match (kind, value) {
        (CollectionKind::Set | CollectionKind::List, CollectionValue::Items(items)) => items
            .iter()
            .map(Value::to_cql_literal)
            .collect::<Vec<_>>()
            .join(","),
        (CollectionKind::Map, CollectionValue::Pairs(pairs)) => pairs
            .iter()
            .map(|(k, v)| format!("{}:{}", k.to_cql_literal(), v.to_cql_literal()))
            .collect::<Vec<_>>()
            .join(","),
        (CollectionKind::Map, CollectionValue::Items(_)) => {
            return Err(QueryError::InvalidCollectionShape {
                kind: kind.as_str(),
                expected: "key/value pairs",
            })
        }
        (CollectionKind::Set | CollectionKind::List, CollectionValue::Pairs(_)) => {
            return Err(QueryError::InvalidCollectionShape {
                kind: kind.as_str(),
                expected: "a flat list of items",
            })
        }
    };

    let (open, close) = kind.delimiters();
    Ok(format!("{open}{body}{close}"))
}

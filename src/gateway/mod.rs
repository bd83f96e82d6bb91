//! # Gateway
//!
//! Thin query layer in front of the hosted datastore.
//!
//! Handlers never talk to the datastore directly. They describe a read as a
//! [`Query`] and hand it to whichever [`Gateway`] the server was started with.
//!
//! ## Backends
//! - [`postgrest::PostgrestGateway`]: the hosted REST endpoint, one HTTP `GET` per query
//! - [`memory::MemoryGateway`]: JSON rows held in memory, used by tests and the offline fixture mode
//!
//! ## Capabilities
//! - select columns
//! - equality filter
//! - case-insensitive substring filter
//! - ordering
//! - limit
//! - single-row fetch
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod memory;
pub mod postgrest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Places,
    Categories,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Places => "places",
            Table::Categories => "categories",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    /// Case-insensitive substring match. The needle is stored raw and escaped by the backend.
    Contains { column: String, needle: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub table: Table,
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Empty selection means every column.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, column: &str, needle: &str) -> Self {
        self.filters.push(Filter::Contains {
            column: column.to_string(),
            needle: needle.to_string(),
        });
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Error, Debug)]
pub enum DatastoreError {
    #[error("datastore unreachable: {0}")]
    Transport(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected row shape in {table}: {source}")]
    Decode {
        table: Table,
        #[source]
        source: serde_json::Error,
    },
}

impl DatastoreError {
    /// Message safe to hand back to a browser. Transport details and row dumps stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            DatastoreError::Transport(_) => "datastore unreachable".to_string(),
            DatastoreError::Status { message, .. } => message.clone(),
            DatastoreError::Decode { table, .. } => format!("unexpected row shape in {table}"),
        }
    }
}

impl From<reqwest::Error> for DatastoreError {
    fn from(err: reqwest::Error) -> Self {
        DatastoreError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn fetch(&self, query: &Query) -> Result<Vec<Value>, DatastoreError>;

    /// First matching row, if any.
    async fn fetch_one(&self, query: &Query) -> Result<Option<Value>, DatastoreError> {
        let query = query.clone().limit(1);
        Ok(self.fetch(&query).await?.into_iter().next())
    }
}

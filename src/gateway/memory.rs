//! In-memory tables evaluated with the same [`Query`] semantics as the hosted datastore.
use std::{cmp::Ordering, collections::HashMap, fs::read_to_string, path::Path};

use anyhow::{Context, Error};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{DatastoreError, Direction, Filter, Gateway, Query, Table};

#[derive(Default)]
pub struct MemoryGateway {
    tables: HashMap<Table, Vec<Value>>,
}

#[derive(Deserialize)]
struct Fixture {
    #[serde(default)]
    categories: Vec<Value>,
    #[serde(default)]
    places: Vec<Value>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, table: Table, rows: Vec<Value>) -> Self {
        self.tables.entry(table).or_default().extend(rows);
        self
    }

    /// Loads `{ "categories": [...], "places": [...] }`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let fixture: Fixture = serde_json::from_str(json)?;

        Ok(Self::new()
            .with_rows(Table::Categories, fixture.categories)
            .with_rows(Table::Places, fixture.places))
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let json = read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

        Self::from_json(&json).with_context(|| format!("parsing {}", path.display()))
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { column, value } => row.get(column).unwrap_or(&Value::Null) == value,
        Filter::Contains { column, needle } => row
            .get(column)
            .and_then(Value::as_str)
            .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase())),
    }
}

/// Nulls sort after everything else, as in Postgres.
fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn project(row: &Value, columns: &[String]) -> Value {
    if columns.is_empty() {
        return row.clone();
    }

    let projected: Map<String, Value> = columns
        .iter()
        .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
        .collect();

    Value::Object(projected)
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn fetch(&self, query: &Query) -> Result<Vec<Value>, DatastoreError> {
        let Some(rows) = self.tables.get(&query.table) else {
            return Ok(Vec::new());
        };

        let mut selected: Vec<&Value> = rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .collect();

        if let Some(order) = &query.order {
            selected.sort_by(|a, b| {
                let a = a.get(&order.column).unwrap_or(&Value::Null);
                let b = b.get(&order.column).unwrap_or(&Value::Null);
                match order.direction {
                    Direction::Ascending => compare(a, b),
                    Direction::Descending => compare(b, a),
                }
            });
        }

        let limit = query.limit.unwrap_or(usize::MAX);

        Ok(selected
            .into_iter()
            .take(limit)
            .map(|row| project(row, &query.columns))
            .collect())
    }
}

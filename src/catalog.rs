//! # Catalog
//!
//! The only place that builds queries against `places` and `categories`.
//!
//! Every place read starts from [`published_places`], so unpublished rows
//! cannot leak through a forgotten filter at a call site.
//!
//! ## Limits
//! - Suggestions: 8
//! - Home top picks: 12
//! - Home search results: 30
//! - Category listing: unbounded
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    gateway::{DatastoreError, Direction, Gateway, Query, Table},
    models::{Category, Place, PlaceSummary, Suggestion},
    utils::searchable,
};

pub const SUGGESTION_LIMIT: usize = 8;
pub const TOP_PICKS_LIMIT: usize = 12;
pub const SEARCH_LIMIT: usize = 30;

const SUGGESTION_COLUMNS: &[&str] = &["name", "slug", "score", "verdict"];
const SUMMARY_COLUMNS: &[&str] = &[
    "name",
    "slug",
    "verdict",
    "score",
    "category_slug",
    "short_location",
];
const CATEGORY_COLUMNS: &[&str] = &["name", "slug", "description"];

fn published_places(columns: &[&str]) -> Query {
    Query::new(Table::Places)
        .select(columns)
        .eq("published", true)
}

fn decode<T: DeserializeOwned>(table: Table, rows: Vec<Value>) -> Result<Vec<T>, DatastoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|source| DatastoreError::Decode { table, source }))
        .collect()
}

fn decode_one<T: DeserializeOwned>(table: Table, row: Option<Value>) -> Result<Option<T>, DatastoreError> {
    row.map(|row| serde_json::from_value(row).map_err(|source| DatastoreError::Decode { table, source }))
        .transpose()
}

#[derive(Clone)]
pub struct Catalog {
    gateway: Arc<dyn Gateway>,
}

impl Catalog {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Top name matches for the search box. Short queries never reach the datastore.
    pub async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, DatastoreError> {
        let Some(query) = searchable(query) else {
            return Ok(Vec::new());
        };

        debug!("Suggesting for {query:?}");
        let rows = self
            .gateway
            .fetch(
                &published_places(SUGGESTION_COLUMNS)
                    .contains("name", query)
                    .order("score", Direction::Descending)
                    .limit(SUGGESTION_LIMIT),
            )
            .await?;

        decode(Table::Places, rows)
    }

    pub async fn top_places(&self) -> Result<Vec<PlaceSummary>, DatastoreError> {
        let rows = self
            .gateway
            .fetch(
                &published_places(SUMMARY_COLUMNS)
                    .order("score", Direction::Descending)
                    .limit(TOP_PICKS_LIMIT),
            )
            .await?;

        decode(Table::Places, rows)
    }

    /// Full search from the home page. Any non-empty trimmed query is accepted.
    pub async fn search_places(&self, query: &str) -> Result<Vec<PlaceSummary>, DatastoreError> {
        let rows = self
            .gateway
            .fetch(
                &published_places(SUMMARY_COLUMNS)
                    .contains("name", query.trim())
                    .order("score", Direction::Descending)
                    .limit(SEARCH_LIMIT),
            )
            .await?;

        decode(Table::Places, rows)
    }

    pub async fn places_in_category(&self, category_slug: &str) -> Result<Vec<PlaceSummary>, DatastoreError> {
        let rows = self
            .gateway
            .fetch(
                &published_places(SUMMARY_COLUMNS)
                    .eq("category_slug", category_slug)
                    .order("score", Direction::Descending),
            )
            .await?;

        decode(Table::Places, rows)
    }

    pub async fn published_place(&self, slug: &str) -> Result<Option<Place>, DatastoreError> {
        let row = self
            .gateway
            .fetch_one(&published_places(&[]).eq("slug", slug))
            .await?;

        decode_one(Table::Places, row)
    }

    pub async fn published_place_slugs(&self) -> Result<Vec<String>, DatastoreError> {
        let rows = self.gateway.fetch(&published_places(&["slug"])).await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get("slug").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, DatastoreError> {
        let rows = self
            .gateway
            .fetch(
                &Query::new(Table::Categories)
                    .select(CATEGORY_COLUMNS)
                    .order("name", Direction::Ascending),
            )
            .await?;

        decode(Table::Categories, rows)
    }

    pub async fn category(&self, slug: &str) -> Result<Option<Category>, DatastoreError> {
        let row = self
            .gateway
            .fetch_one(
                &Query::new(Table::Categories)
                    .select(CATEGORY_COLUMNS)
                    .eq("slug", slug),
            )
            .await?;

        decode_one(Table::Categories, row)
    }

    pub async fn category_slugs(&self) -> Result<Vec<String>, DatastoreError> {
        let rows = self
            .gateway
            .fetch(&Query::new(Table::Categories).select(&["slug"]))
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get("slug").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

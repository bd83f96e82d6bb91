//! # PostgREST
//!
//! Hosted datastore reached over its REST interface.
//!
//! Every [`Query`] becomes a single `GET {base}/rest/v1/{table}` where each
//! clause is a query parameter:
//!
//! | clause     | parameter                    |
//! |------------|------------------------------|
//! | select     | `select=name,slug`           |
//! | equality   | `published=eq.true`          |
//! | substring  | `name=ilike.*wat*`           |
//! | ordering   | `order=score.desc`           |
//! | limit      | `limit=8`                    |
//!
//! The anon key goes out twice, as `apikey` and as a bearer token.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{DatastoreError, Direction, Filter, Gateway, Query};
use crate::utils::escape_like;

pub struct PostgrestGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl PostgrestGateway {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, DatastoreError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, query: &Query) -> String {
        format!("{}/rest/v1/{}", self.base_url, query.table)
    }
}

pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = Vec::new();

    let select = if query.columns.is_empty() {
        "*".to_string()
    } else {
        query.columns.join(",")
    };
    params.push(("select".to_string(), select));

    for filter in &query.filters {
        match filter {
            Filter::Eq { column, value } => {
                params.push((column.clone(), format!("eq.{}", literal(value))));
            }
            Filter::Contains { column, needle } => {
                params.push((column.clone(), format!("ilike.*{}*", escape_like(needle))));
            }
        }
    }

    if let Some(order) = &query.order {
        let direction = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }

    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Gateway for PostgrestGateway {
    async fn fetch(&self, query: &Query) -> Result<Vec<Value>, DatastoreError> {
        let params = query_params(query);
        debug!("GET {} {:?}", self.endpoint(query), params);

        let response = self
            .client
            .get(self.endpoint(query))
            .query(&params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(body);

            return Err(DatastoreError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| DatastoreError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    use super::*;
    use crate::gateway::Table;

    fn suggestion_query() -> Query {
        Query::new(Table::Places)
            .select(&["name", "slug", "score", "verdict"])
            .eq("published", true)
            .contains("name", "wat")
            .order("score", Direction::Descending)
            .limit(8)
    }

    #[test]
    fn test_query_params() {
        let params = query_params(&suggestion_query());

        assert_eq!(
            params,
            vec![
                ("select".to_string(), "name,slug,score,verdict".to_string()),
                ("published".to_string(), "eq.true".to_string()),
                ("name".to_string(), "ilike.*wat*".to_string()),
                ("order".to_string(), "score.desc".to_string()),
                ("limit".to_string(), "8".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_all_and_string_equality() {
        let query = Query::new(Table::Categories).eq("slug", "temples");
        let params = query_params(&query);

        assert_eq!(params[0], ("select".to_string(), "*".to_string()));
        assert_eq!(params[1], ("slug".to_string(), "eq.temples".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_sends_key_and_clauses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/places"))
            .and(header("apikey", "anon"))
            .and(header("authorization", "Bearer anon"))
            .and(query_param("name", "ilike.*wat*"))
            .and(query_param("order", "score.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "Wat Arun", "slug": "wat-arun", "score": 9, "verdict": "worth_it" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = PostgrestGateway::new(&format!("{}/", server.uri()), "anon").unwrap();
        let rows = gateway.fetch(&suggestion_query()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["slug"], "wat-arun");
    }

    #[tokio::test]
    async fn test_fetch_surfaces_datastore_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/places"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "42703",
                "message": "column places.nope does not exist"
            })))
            .mount(&server)
            .await;

        let gateway = PostgrestGateway::new(&server.uri(), "anon").unwrap();
        let err = gateway.fetch(&suggestion_query()).await.unwrap_err();

        match err {
            DatastoreError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "column places.nope does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_one_limits_to_single_row() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/categories"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let gateway = PostgrestGateway::new(&server.uri(), "anon").unwrap();
        let row = gateway
            .fetch_one(&Query::new(Table::Categories).eq("slug", "nope"))
            .await
            .unwrap();

        assert!(row.is_none());
    }
}

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::{models::Suggestion, routes::SuggestionsBody};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Request cancelled")]
    Cancelled,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Suggestions unavailable ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Malformed suggestions: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[async_trait]
pub trait SuggestionClient: Send + Sync {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, FetchError>;
}

/// Talks to `GET /api/suggestions` on a running server.
pub struct HttpSuggestionClient {
    client: Client,
    endpoint: String,
}

impl HttpSuggestionClient {
    /// `base_url` is the site root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/suggestions", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl SuggestionClient for HttpSuggestionClient {
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, FetchError> {
        debug!("Fetching suggestions for {query:?}");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            // Proxies answer with HTML; keep the status even when the body is not ours.
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<SuggestionsBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: SuggestionsBody = response.json().await?;
        Ok(body.items)
    }
}

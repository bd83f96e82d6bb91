use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{gateway::DatastoreError, pages::NotFoundPage};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Datastore error: {0}")]
    Datastore(#[from] DatastoreError),

    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => match NotFoundPage.render() {
                Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
                Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
            },
            other => {
                error!("{other}");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}

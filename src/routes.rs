use std::{sync::Arc, time::Duration};

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{
        HeaderValue, Method, StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, warn};

use crate::{
    error::AppError,
    models::Suggestion,
    pages::{CategoryCard, CategoryPage, DirectoryPage, HomePage, PlacePage, render},
    sitemap::Sitemap,
    state::State,
    utils::is_lookup_slug,
};

type AppState = AxumState<Arc<State>>;

pub fn router(state: Arc<State>) -> Router {
    let cache_control = HeaderValue::from_str(&format!(
        "public, s-maxage={}, stale-while-revalidate",
        state.config.revalidate_secs
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("public, s-maxage=3600"));

    let pages = Router::new()
        .route("/", get(home_handler))
        .route("/is-it-worth-it", get(directory_handler))
        .route("/is-it-worth-it/category/{slug}", get(category_handler))
        .route("/is-it-worth-it/{slug}", get(place_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .layer(SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, cache_control));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let api = Router::new()
        .route("/api/suggestions", get(suggestions_handler))
        .layer(cors);

    Router::new()
        .merge(pages)
        .merge(api)
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize, Deserialize)]
pub struct SuggestionsBody {
    pub items: Vec<Suggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn suggestions_handler(
    AxumState(state): AppState,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    match state.catalog.suggest(&params.q).await {
        Ok(items) => (StatusCode::OK, Json(SuggestionsBody { items, error: None })),
        Err(e) => {
            error!("Suggestion lookup failed for {:?}: {e}", params.q);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SuggestionsBody {
                    items: Vec::new(),
                    error: Some(e.public_message()),
                }),
            )
        }
    }
}

pub async fn home_handler(
    AxumState(state): AppState,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let query = params.q.trim();

    let places = async {
        if query.is_empty() {
            state.catalog.top_places().await
        } else {
            state.catalog.search_places(query).await
        }
    };
    let (categories, places) = tokio::join!(state.catalog.categories(), places);

    let categories = categories.unwrap_or_else(|e| {
        warn!("Home categories unavailable: {e}");
        Vec::new()
    });
    let places = places.unwrap_or_else(|e| {
        warn!("Home places unavailable: {e}");
        Vec::new()
    });

    render(&HomePage::new(query, &places, &categories))
}

pub async fn directory_handler(AxumState(state): AppState) -> Result<Html<String>, AppError> {
    let categories = state.catalog.categories().await.unwrap_or_else(|e| {
        warn!("Directory categories unavailable: {e}");
        Vec::new()
    });

    render(&DirectoryPage {
        categories: categories.iter().map(CategoryCard::from).collect(),
    })
}

pub async fn category_handler(
    AxumState(state): AppState,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    if !is_lookup_slug(&slug) {
        return Err(AppError::NotFound);
    }

    let (category, places) = tokio::join!(
        state.catalog.category(&slug),
        state.catalog.places_in_category(&slug)
    );

    let category = category.unwrap_or_else(|e| {
        warn!("Category {slug} unavailable: {e}");
        None
    });
    let places = places.unwrap_or_else(|e| {
        warn!("Places for category {slug} unavailable: {e}");
        Vec::new()
    });

    if category.is_none() && places.is_empty() {
        return Err(AppError::NotFound);
    }

    render(&CategoryPage::new(&slug, category.as_ref(), &places))
}

pub async fn place_handler(
    AxumState(state): AppState,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    if !is_lookup_slug(&slug) {
        return Err(AppError::NotFound);
    }

    let place = state.catalog.published_place(&slug).await.unwrap_or_else(|e| {
        warn!("Place {slug} unavailable: {e}");
        None
    });

    match place {
        Some(place) => render(&PlacePage::from(&place)),
        None => Err(AppError::NotFound),
    }
}

pub async fn sitemap_handler(AxumState(state): AppState) -> Result<Response, AppError> {
    let body = Sitemap::build(&state.catalog, &state.config.site_url)
        .await
        .render()?;

    Ok(([(CONTENT_TYPE, "application/xml")], body).into_response())
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}

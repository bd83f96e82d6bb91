//! # Pages
//!
//! View models for the server-rendered pages. Templates live in `templates/`.
//!
//! Everything a template prints is resolved here first: verdict labels, scores,
//! and the `—` placeholder for quick facts the editors have not filled in.
use askama::Template;
use axum::response::Html;

use crate::{
    error::AppError,
    models::{Category, Faq, Place, PlaceSummary, format_score},
};

pub const MISSING: &str = "—";

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

pub struct PlaceRow {
    pub name: String,
    pub slug: String,
    pub verdict: &'static str,
    pub score: String,
    pub location: String,
}

impl From<&PlaceSummary> for PlaceRow {
    fn from(place: &PlaceSummary) -> Self {
        Self {
            name: place.name.clone(),
            slug: place.slug.clone(),
            verdict: place.verdict.label(),
            score: format_score(place.score),
            location: place.short_location.clone().unwrap_or_default(),
        }
    }
}

pub struct CategoryCard {
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl From<&Category> for CategoryCard {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub query: String,
    pub heading: String,
    pub places: Vec<PlaceRow>,
    pub categories: Vec<CategoryCard>,
}

impl HomePage {
    pub fn new(query: &str, places: &[PlaceSummary], categories: &[Category]) -> Self {
        let heading = if query.is_empty() {
            "Top picks".to_string()
        } else {
            format!("Results for “{query}”")
        };

        Self {
            query: query.to_string(),
            heading,
            places: places.iter().map(PlaceRow::from).collect(),
            categories: categories.iter().map(CategoryCard::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "directory.html")]
pub struct DirectoryPage {
    pub categories: Vec<CategoryCard>,
}

#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryPage {
    pub name: String,
    pub description: String,
    pub places: Vec<PlaceRow>,
}

impl CategoryPage {
    /// Falls back to the slug as a title when the category row is missing.
    pub fn new(slug: &str, category: Option<&Category>, places: &[PlaceSummary]) -> Self {
        Self {
            name: category.map_or_else(|| slug.to_string(), |c| c.name.clone()),
            description: category
                .and_then(|c| c.description.clone())
                .unwrap_or_default(),
            places: places.iter().map(PlaceRow::from).collect(),
        }
    }
}

pub struct Fact {
    pub label: &'static str,
    pub value: String,
}

#[derive(Template)]
#[template(path = "place.html")]
pub struct PlacePage {
    pub name: String,
    pub category_slug: Option<String>,
    pub verdict: &'static str,
    pub score: String,
    pub location: String,
    pub summary: String,
    pub why_go: String,
    pub facts: Vec<Fact>,
    pub avoid_if: String,
    pub alternatives: String,
    pub maps_url: String,
    pub faqs: Vec<Faq>,
}

fn or_missing(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| MISSING.to_string())
}

impl From<&Place> for PlacePage {
    fn from(place: &Place) -> Self {
        Self {
            name: place.name.clone(),
            category_slug: place.category_slug.clone(),
            verdict: place.verdict.label(),
            score: format_score(place.score),
            location: place.short_location.clone().unwrap_or_default(),
            summary: place.summary.clone().unwrap_or_default(),
            why_go: place
                .why_go
                .clone()
                .unwrap_or_else(|| "Coming soon".to_string()),
            facts: vec![
                Fact { label: "Best time", value: or_missing(&place.best_time) },
                Fact { label: "Time needed", value: or_missing(&place.time_needed) },
                Fact { label: "Cost level", value: or_missing(&place.cost_level) },
                Fact { label: "Crowds", value: or_missing(&place.crowd_level) },
                Fact { label: "Tourist-trap risk", value: or_missing(&place.tourist_trap_risk) },
            ],
            avoid_if: place.avoid_if.clone().unwrap_or_default(),
            alternatives: place.alternatives.clone().unwrap_or_default(),
            maps_url: place.google_maps_url.clone().unwrap_or_default(),
            faqs: place.faqs.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage;

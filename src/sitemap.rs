//! # Sitemap
//!
//! `sitemap.xml` for crawlers.
//!
//! ## Entries
//! - `{site}/`
//! - `{site}/is-it-worth-it`
//! - `{site}/is-it-worth-it/category/{slug}` for every category
//! - `{site}/is-it-worth-it/{slug}` for every published place
//!
//! A failed lookup drops that group of entries instead of failing the whole document.
use askama::Template;
use tracing::error;

use crate::catalog::Catalog;

#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct Sitemap {
    pub urls: Vec<String>,
}

impl Sitemap {
    pub fn new(site_url: &str, category_slugs: &[String], place_slugs: &[String]) -> Self {
        let site_url = site_url.trim_end_matches('/');

        let mut urls = Vec::with_capacity(2 + category_slugs.len() + place_slugs.len());
        urls.push(format!("{site_url}/"));
        urls.push(format!("{site_url}/is-it-worth-it"));
        urls.extend(
            category_slugs
                .iter()
                .map(|slug| format!("{site_url}/is-it-worth-it/category/{slug}")),
        );
        urls.extend(
            place_slugs
                .iter()
                .map(|slug| format!("{site_url}/is-it-worth-it/{slug}")),
        );

        Self { urls }
    }

    pub async fn build(catalog: &Catalog, site_url: &str) -> Self {
        let (places, categories) = tokio::join!(catalog.published_place_slugs(), catalog.category_slugs());

        let places = places.unwrap_or_else(|e| {
            error!("Sitemap place lookup failed: {e}");
            Vec::new()
        });
        let categories = categories.unwrap_or_else(|e| {
            error!("Sitemap category lookup failed: {e}");
            Vec::new()
        });

        Self::new(site_url, &categories, &places)
    }
}

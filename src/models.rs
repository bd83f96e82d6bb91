//! Row types for the `places` and `categories` tables.
//!
//! Optional columns default at the boundary so templates never see a missing key.
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    WorthIt,
    Skip,
    #[serde(other)]
    Depends,
}

impl Verdict {
    pub fn icon(&self) -> &'static str {
        match self {
            Verdict::WorthIt => "✅",
            Verdict::Skip => "❌",
            Verdict::Depends => "⚠️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::WorthIt => "Worth it ✅",
            Verdict::Skip => "Skip ❌",
            Verdict::Depends => "Depends ⚠️",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub slug: String,
    pub score: f64,
    pub verdict: Verdict,
}

/// List-row projection used by the home and category pages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub name: String,
    pub slug: String,
    pub verdict: Verdict,
    pub score: f64,
    #[serde(default)]
    pub category_slug: Option<String>,
    #[serde(default)]
    pub short_location: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(alias = "question")]
    pub q: String,
    #[serde(alias = "answer")]
    pub a: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub category_slug: Option<String>,
    pub verdict: Verdict,
    pub score: f64,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub short_location: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub why_go: Option<String>,
    #[serde(default)]
    pub best_time: Option<String>,
    #[serde(default)]
    pub time_needed: Option<String>,
    #[serde(default)]
    pub cost_level: Option<String>,
    #[serde(default)]
    pub crowd_level: Option<String>,
    #[serde(default)]
    pub tourist_trap_risk: Option<String>,
    #[serde(default)]
    pub avoid_if: Option<String>,
    #[serde(default)]
    pub alternatives: Option<String>,
    #[serde(default)]
    pub google_maps_url: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub faqs: Vec<Faq>,
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders a score the way editors write it: `8` not `8.0`, `8.5` kept.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_verdict_decoding() {
        let verdicts: Vec<Verdict> =
            serde_json::from_value(json!(["worth_it", "skip", "depends", "maybe"])).unwrap();

        assert_eq!(
            verdicts,
            vec![Verdict::WorthIt, Verdict::Skip, Verdict::Depends, Verdict::Depends]
        );
        assert_eq!(serde_json::to_value(Verdict::WorthIt).unwrap(), json!("worth_it"));
    }

    #[test]
    fn test_place_defaults_optional_fields() {
        let place: Place = serde_json::from_value(json!({
            "slug": "wat-pho",
            "name": "Wat Pho",
            "category_slug": "temples",
            "verdict": "worth_it",
            "score": 9,
            "published": true,
            "best_time": null,
            "faqs": null
        }))
        .unwrap();

        assert_eq!(place.best_time, None);
        assert_eq!(place.google_maps_url, None);
        assert!(place.faqs.is_empty());
    }

    #[test]
    fn test_place_without_category_decodes() {
        for row in [
            json!({ "slug": "lumpini-park", "name": "Lumpini Park", "category_slug": null, "verdict": "worth_it", "score": 8 }),
            json!({ "slug": "lumpini-park", "name": "Lumpini Park", "verdict": "worth_it", "score": 8 }),
        ] {
            let place: Place = serde_json::from_value(row).unwrap();
            assert_eq!(place.category_slug, None);
        }
    }

    #[test]
    fn test_faq_aliases() {
        let faqs: Vec<Faq> = serde_json::from_value(json!([
            { "q": "Dress code?", "a": "Cover shoulders." },
            { "question": "Entry fee?", "answer": "300 THB" }
        ]))
        .unwrap();

        assert_eq!(faqs[1].q, "Entry fee?");
        assert_eq!(faqs[1].a, "300 THB");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(8.0), "8");
        assert_eq!(format_score(8.5), "8.5");
        assert_eq!(format_score(0.0), "0");
    }
}

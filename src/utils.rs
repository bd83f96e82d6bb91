use std::sync::LazyLock;

use regex::Regex;

/// Shortest trimmed query, in characters, worth sending to the datastore.
pub const MIN_QUERY_CHARS: usize = 2;

static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^/\p{Cc}]+$").unwrap());
static LIKE_META: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\\%_]").unwrap());

/// Slugs are whatever the datastore holds; only values that cannot be a single
/// path segment are turned away before a lookup.
pub fn is_lookup_slug(slug: &str) -> bool {
    SLUG.is_match(slug)
}

/// Trimmed query if it is long enough to search for.
pub fn searchable(query: &str) -> Option<&str> {
    let query = query.trim();

    (query.chars().count() >= MIN_QUERY_CHARS).then_some(query)
}

/// Escapes LIKE metacharacters. `*` is the REST wildcard and cannot be escaped, so it is dropped.
pub fn escape_like(needle: &str) -> String {
    let stripped = needle.replace('*', "");

    LIKE_META.replace_all(&stripped, r"\$0").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs() {
        assert!(is_lookup_slug("wat-arun"));
        assert!(is_lookup_slug("chatuchak2"));
        assert!(is_lookup_slug("wat_arun"));
        assert!(is_lookup_slug("Wat-Arun"));
        assert!(is_lookup_slug("double--dash"));
        assert!(!is_lookup_slug(""));
        assert!(!is_lookup_slug("../etc"));
        assert!(!is_lookup_slug("wat\narun"));
    }

    #[test]
    fn test_searchable() {
        assert_eq!(searchable(""), None);
        assert_eq!(searchable("   "), None);
        assert_eq!(searchable(" w "), None);
        assert_eq!(searchable(" wa "), Some("wa"));
        assert_eq!(searchable("วัด"), Some("วัด"));
        assert_eq!(searchable("é"), None);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("wat"), "wat");
        assert_eq!(escape_like("100%"), r"100\%");
        assert_eq!(escape_like("a_b"), r"a\_b");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("*wat*"), "wat");
    }
}

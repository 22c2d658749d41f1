//! URL slugs for blog posts and portfolio folders

use std::sync::LazyLock;

use regex_lite::Regex;

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Slug used when a title has no usable characters
const FALLBACK_SLUG: &str = "item";

/// Lowercase `text` and collapse every run of other characters into `-`
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let slug = NON_SLUG.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Return `desired`, or `desired-N` with the smallest N that is not taken
pub fn unique_slug<'a, I>(desired: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = taken.into_iter().collect();
    if !taken.contains(&desired) {
        return desired.to_string();
    }

    let mut counter = 1;
    loop {
        let candidate = format!("{desired}-{counter}");
        if !taken.contains(&candidate.as_str()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Kitchen & Bath  "), "kitchen-bath");
        assert_eq!(slugify("2024 Spring Sale"), "2024-spring-sale");
        assert_eq!(slugify("Café Déco"), "caf-d-co");
        assert_eq!(slugify("!!!"), "item");
    }

    #[test]
    fn unique_slug_keeps_free_slug() {
        assert_eq!(unique_slug("news", ["about", "team"]), "news");
    }

    #[test]
    fn unique_slug_appends_counter() {
        assert_eq!(unique_slug("news", ["news"]), "news-1");
        assert_eq!(unique_slug("news", ["news", "news-1", "news-2"]), "news-3");
        // Gaps are reused
        assert_eq!(unique_slug("news", ["news", "news-2"]), "news-1");
    }
}

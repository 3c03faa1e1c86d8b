use std::sync::LazyLock;

use regex::Regex;

static ASIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(?:dp|gp/product|ASIN)/([A-Z0-9]{10})").expect("valid asin regex")
});

/// Strips any query string and fragment from `url` and appends `tag=<partner_tag>`.
///
/// With no partner tag (or a blank one) the URL is returned unchanged,
/// query string included.
#[must_use]
pub fn normalize_product_url(url: &str, partner_tag: Option<&str>) -> String {
    let url = url.trim();
    let Some(tag) = partner_tag.map(str::trim).filter(|t| !t.is_empty()) else {
        return url.to_string();
    };

    // Fragment goes with the query; the tag is then always the sole parameter.
    let base = url.split(['?', '#']).next().unwrap_or(url);
    format!("{base}?tag={tag}")
}

/// Pulls the 10-character catalog identifier out of a product URL.
#[must_use]
pub fn extract_asin(url: &str) -> Option<String> {
    ASIN_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Resolves `href` against the page it was found on.
///
/// Absolute URLs pass through; root-relative paths take the page's scheme and
/// host; anything else is returned as-is.
#[must_use]
pub fn absolutize(href: &str, page_url: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        let scheme = page_url.split("://").next().unwrap_or("https");
        return format!("{scheme}://{rest}");
    }
    if href.starts_with('/') {
        if let Some((scheme, rest)) = page_url.split_once("://") {
            let host = rest.split('/').next().unwrap_or(rest);
            return format!("{scheme}://{host}{href}");
        }
    }
    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_appends_tag() {
        assert_eq!(
            normalize_product_url("https://x.com/dp/B000?ref=abc", Some("foo-20")),
            "https://x.com/dp/B000?tag=foo-20"
        );
    }

    #[test]
    fn appends_tag_to_bare_url() {
        assert_eq!(
            normalize_product_url("https://www.amazon.com/dp/B09B8V1LZ3", Some("foo-20")),
            "https://www.amazon.com/dp/B09B8V1LZ3?tag=foo-20"
        );
    }

    #[test]
    fn replaces_existing_tag() {
        assert_eq!(
            normalize_product_url("https://x.com/dp/B000?tag=other-21&th=1", Some("foo-20")),
            "https://x.com/dp/B000?tag=foo-20"
        );
    }

    #[test]
    fn drops_fragment_before_appending_tag() {
        assert_eq!(
            normalize_product_url("https://x.com/dp/B000#reviews", Some("foo-20")),
            "https://x.com/dp/B000?tag=foo-20"
        );
    }

    #[test]
    fn passes_through_without_tag() {
        let url = "https://x.com/dp/B000?ref=abc";
        assert_eq!(normalize_product_url(url, None), url);
        assert_eq!(normalize_product_url(url, Some("  ")), url);
    }

    #[test]
    fn extracts_asin_from_known_paths() {
        assert_eq!(
            extract_asin("https://www.amazon.com/Echo-Dot/dp/B09B8V1LZ3/ref=zg_bs"),
            Some("B09B8V1LZ3".to_string())
        );
        assert_eq!(
            extract_asin("https://www.amazon.com/gp/product/B07FZ8S74R?th=1"),
            Some("B07FZ8S74R".to_string())
        );
        assert_eq!(
            extract_asin("https://www.amazon.com/ASIN/B0BSHF7WHW"),
            Some("B0BSHF7WHW".to_string())
        );
    }

    #[test]
    fn asin_requires_uppercase_ten_chars() {
        assert_eq!(extract_asin("https://www.amazon.com/dp/b09b8v1lz3"), None);
        assert_eq!(extract_asin("https://www.amazon.com/dp/B09"), None);
        assert_eq!(extract_asin("https://www.amazon.com/s?k=echo"), None);
    }

    #[test]
    fn absolutize_root_relative_href() {
        assert_eq!(
            absolutize("/Echo/dp/B09B8V1LZ3", "https://www.amazon.com/gp/bestsellers/electronics"),
            "https://www.amazon.com/Echo/dp/B09B8V1LZ3"
        );
    }

    #[test]
    fn absolutize_keeps_absolute_and_protocol_relative() {
        let page = "https://www.amazon.com/gp/new-releases";
        assert_eq!(
            absolutize("https://other.com/dp/B000000001", page),
            "https://other.com/dp/B000000001"
        );
        assert_eq!(
            absolutize("//www.amazon.com/dp/B000000001", page),
            "https://www.amazon.com/dp/B000000001"
        );
    }
}

//! Text shape checks used before offering a conversion.

use regex::Regex;
use std::sync::OnceLock;

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url regex is valid"))
}

fn image_regex() -> &'static Regex {
    static IMAGE: OnceLock<Regex> = OnceLock::new();
    IMAGE.get_or_init(|| {
        Regex::new(r"(?i)\.(?:png|jpe?g|gif|webp|svg|bmp|avif)(?:\?\S*)?$")
            .expect("image regex is valid")
    })
}

fn link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| {
        Regex::new(r"^\[([^\[\]]*)\]\((https?://[^\s)]+)\)$").expect("link regex is valid")
    })
}

/// The whole (trimmed) text is a single http(s) URL.
pub fn is_url(text: &str) -> bool {
    url_regex().is_match(text.trim())
}

/// The (trimmed) text ends in a common image file extension.
pub fn is_image(text: &str) -> bool {
    image_regex().is_match(text.trim())
}

/// The whole (trimmed) text is a markdown link `[label](url)`.
pub fn is_linked_url(text: &str) -> bool {
    link_regex().is_match(text.trim())
}

/// URL part of a markdown link, if `text` is one.
pub fn url_from_link(text: &str) -> Option<String> {
    link_regex()
        .captures(text.trim())
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com"));
        assert!(is_url("http://example.com/a?b=c#d"));
        assert!(is_url("  https://example.com/page\n"));
        assert!(!is_url("example.com"));
        assert!(!is_url("https://example.com and more"));
        assert!(!is_url("ftp://example.com"));
        assert!(!is_url("https:///nohost"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("https://cdn.example.com/pic.PNG"));
        assert!(is_image("https://cdn.example.com/pic.jpeg?w=200"));
        assert!(is_image("https://cdn.example.com/anim.gif"));
        assert!(!is_image("https://example.com/page.html"));
        assert!(!is_image("https://example.com/png"));
    }

    #[test]
    fn test_is_linked_url() {
        assert!(is_linked_url("[Example](https://example.com)"));
        assert!(is_linked_url("[](https://example.com/a)"));
        assert!(!is_linked_url("https://example.com"));
        assert!(!is_linked_url("see [Example](https://example.com)"));
        assert!(!is_linked_url("[Example](not-a-url)"));
    }

    #[test]
    fn test_url_from_link() {
        assert_eq!(
            url_from_link("[Example](https://example.com/x)").as_deref(),
            Some("https://example.com/x")
        );
        assert_eq!(url_from_link("https://example.com"), None);
    }
}

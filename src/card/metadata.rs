//! Link metadata and the default HTML meta-tag extractor

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use url::Url;

// ─────────────────────────────────────────────────────────────────────────────
// LinkMetadata
// ─────────────────────────────────────────────────────────────────────────────

/// Page metadata summarized into a card. `url` and `title` are always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LinkMetadata {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: None,
            host: None,
            favicon: None,
            image: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extractor Contract
// ─────────────────────────────────────────────────────────────────────────────

/// Turns fetched HTML into metadata.
///
/// Must never panic on malformed markup; returns `None` when no title can
/// be found.
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, url: &str, html: &str) -> Option<LinkMetadata>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Meta-Tag Extractor
// ─────────────────────────────────────────────────────────────────────────────

fn meta_tag_regex() -> &'static Regex {
    static META: OnceLock<Regex> = OnceLock::new();
    META.get_or_init(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("meta regex is valid"))
}

fn link_tag_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(r"(?is)<link\b[^>]*>").expect("link regex is valid"))
}

fn attribute_regex() -> &'static Regex {
    static ATTR: OnceLock<Regex> = OnceLock::new();
    ATTR.get_or_init(|| {
        Regex::new(r#"(?s)([a-zA-Z_:.-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("attribute regex is valid")
    })
}

fn title_regex() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex is valid"))
}

/// Lower-cased attribute map of a single tag.
fn attributes(tag: &str) -> HashMap<String, String> {
    attribute_regex()
        .captures_iter(tag)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps.get(2).or(caps.get(3)).or(caps.get(4))?.as_str();
            Some((name, value.to_string()))
        })
        .collect()
}

/// Decode entities and collapse whitespace; empty results become `None`.
fn clean(text: &str) -> Option<String> {
    let decoded = html_escape::decode_html_entities(text);
    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Extracts Open Graph / Twitter card / standard meta tags, falling back to
/// the page `<title>`. Only metadata the page itself declares is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaTagExtractor;

impl MetaTagExtractor {
    /// `property`/`name` → `content` for every meta tag; first one wins.
    fn meta_map(html: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for tag in meta_tag_regex().find_iter(html) {
            let attrs = attributes(tag.as_str());
            let key = attrs.get("property").or_else(|| attrs.get("name"));
            if let (Some(key), Some(content)) = (key, attrs.get("content")) {
                map.entry(key.to_ascii_lowercase())
                    .or_insert_with(|| content.clone());
            }
        }
        map
    }

    fn first_of(map: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| map.get(*key).and_then(|v| clean(v)))
    }

    /// `href` of the first `<link>` whose `rel` list contains `rel`.
    fn link_href(html: &str, rel: &str) -> Option<String> {
        link_tag_regex().find_iter(html).find_map(|tag| {
            let attrs = attributes(tag.as_str());
            let rels = attrs.get("rel")?.to_ascii_lowercase();
            if rels.split_whitespace().any(|r| r == rel) {
                attrs.get("href").and_then(|href| clean(href))
            } else {
                None
            }
        })
    }

    /// Host of the canonical URL the page declares (`og:url` or
    /// `<link rel="canonical">`).
    fn canonical_host(
        map: &HashMap<String, String>,
        html: &str,
        base: Option<&Url>,
    ) -> Option<String> {
        let canonical = Self::first_of(map, &["og:url"])
            .or_else(|| Self::link_href(html, "canonical"))?;
        let resolved = resolve(base, canonical);
        Url::parse(&resolved)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

/// Resolve a possibly relative reference against the page URL.
fn resolve(base: Option<&Url>, reference: String) -> String {
    match base.and_then(|base| base.join(&reference).ok()) {
        Some(resolved) => resolved.to_string(),
        None => reference,
    }
}

impl MetadataExtractor for MetaTagExtractor {
    fn extract(&self, url: &str, html: &str) -> Option<LinkMetadata> {
        let meta = Self::meta_map(html);
        let base = Url::parse(url).ok();

        let title = Self::first_of(&meta, &["og:title", "twitter:title"]).or_else(|| {
            title_regex()
                .captures(html)
                .and_then(|caps| caps.get(1))
                .and_then(|m| clean(m.as_str()))
        })?;

        let description = Self::first_of(
            &meta,
            &["og:description", "twitter:description", "description"],
        );
        let image = Self::first_of(&meta, &["og:image", "twitter:image", "twitter:image:src"])
            .map(|image| resolve(base.as_ref(), image));
        let favicon = Self::link_href(html, "icon").map(|icon| resolve(base.as_ref(), icon));
        let host = Self::canonical_host(&meta, html, base.as_ref());

        Some(LinkMetadata {
            url: url.to_string(),
            title,
            description,
            host,
            favicon,
            image,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! `autoembed` fenced-block processor
//!
//! An embed block only stores the URL. The category is derived from the URL
//! every time the block is rendered, so the block never disagrees with the
//! renderer that draws it.

use super::element::Element;
use super::height_cache::EmbedHeightCache;
use super::social::SocialPostEmbed;
use super::video::VideoEmbed;
use super::{CONTAINER_CLASS, ERROR_CLASS, SOCIAL_CONTAINER_CLASS};
use crate::card::normalize_indentation;
use crate::classify::{classify, UrlCategory};
use crate::config::Settings;
use log::debug;
use serde::Deserialize;
use std::sync::Arc;

/// Fence language of embed blocks.
pub const EMBED_BLOCK_LANGUAGE: &str = "autoembed";

/// Text inserted for the "Embed" paste choice.
pub fn embed_block(url: &str) -> String {
    format!("\n```{}\nurl: {}\n```\n", EMBED_BLOCK_LANGUAGE, url)
}

/// Block body. Older blocks also carry a `type` key, which is ignored.
#[derive(Debug, Deserialize)]
struct EmbedBlock {
    url: Option<String>,
}

/// Renders `autoembed` blocks into frame markup or an inline error.
#[derive(Debug, Clone)]
pub struct EmbedProcessor {
    settings: Settings,
    dark_mode: bool,
    heights: Arc<EmbedHeightCache>,
}

impl EmbedProcessor {
    pub fn new(settings: &Settings, dark_mode: bool, heights: Arc<EmbedHeightCache>) -> Self {
        Self {
            settings: settings.clone(),
            dark_mode,
            heights,
        }
    }

    /// Render a block body into a container element, or an error element.
    pub fn run(&self, source: &str) -> Element {
        if source.trim().is_empty() {
            return error_element("url is required");
        }

        let block: Option<EmbedBlock> = match serde_yaml::from_str(&normalize_indentation(source)) {
            Ok(block) => block,
            Err(e) => {
                debug!("autoembed: YAML parse error: {}", e);
                return error_element("failed to parse YAML");
            }
        };

        match block.and_then(|b| b.url).filter(|url| !url.trim().is_empty()) {
            Some(url) => self.render_url(url.trim()),
            None => error_element("url is required"),
        }
    }

    /// Render a URL into its category's container, or an error element.
    pub fn render_url(&self, url: &str) -> Element {
        let category = classify(url);
        if !category.is_embeddable() {
            return error_element(&format!("not an embeddable URL: {}", url));
        }
        if !self.settings.embed_enabled(category) {
            return error_element(&format!("{} embeds are disabled: {}", category, url));
        }

        match self.frame(category, url) {
            Some(frame) => {
                let container_class = if category == UrlCategory::SocialPost {
                    SOCIAL_CONTAINER_CLASS
                } else {
                    CONTAINER_CLASS
                };
                Element::new("div")
                    .with_class(container_class)
                    .with_child(frame)
            }
            None => error_element(&format!("failed to generate embed: {}", url)),
        }
    }

    /// Category-specific frame, `None` if no identifier can be extracted.
    pub fn frame(&self, category: UrlCategory, url: &str) -> Option<Element> {
        match category {
            UrlCategory::VideoProvider => VideoEmbed::parse(url).map(|v| v.to_element()),
            UrlCategory::SocialPost => SocialPostEmbed::parse(url)
                .map(|s| s.to_element(self.dark_mode, &self.heights)),
            UrlCategory::General => None,
        }
    }
}

/// Inline error element shown in place of an embed.
pub fn error_element(message: &str) -> Element {
    Element::new("div")
        .with_class(ERROR_CLASS)
        .with_child(Element::new("span").with_text(format!("autoembed error: {}", message)))
}

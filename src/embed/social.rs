//! Social-post (Twitter / X) embeds

use super::element::Element;
use super::height_cache::EmbedHeightCache;
use super::EMBED_FRAME_CLASS;
use crate::classify::social_pattern;

/// Sandbox tokens granted to social-post frames. Nothing else is allowed.
pub const SANDBOX_ALLOW_LIST: [&str; 6] = [
    "allow-forms",
    "allow-presentation",
    "allow-same-origin",
    "allow-scripts",
    "allow-modals",
    "allow-popups",
];

/// Attribute carrying the post id on post frames.
pub const POST_ID_ATTRIBUTE: &str = "data-twitter-post-id";

pub const SOCIAL_FRAME_CLASS: &str = "twitter-embed-iframe";

/// A post or profile reference parsed from a Twitter / X URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialPostEmbed {
    pub handle: String,
    /// Present for single posts, absent for profile timelines
    pub post_id: Option<String>,
}

impl SocialPostEmbed {
    pub fn parse(url: &str) -> Option<Self> {
        let caps = social_pattern().captures(url)?;
        Some(Self {
            handle: caps.get(1)?.as_str().to_string(),
            post_id: caps.get(2).map(|m| m.as_str().to_string()),
        })
    }

    pub fn is_post(&self) -> bool {
        self.post_id.is_some()
    }

    /// Frame address: themed single-post frame or profile timeline.
    pub fn frame_url(&self, dark_mode: bool) -> String {
        match &self.post_id {
            Some(post_id) => format!(
                "https://platform.twitter.com/embed/Tweet.html?dnt=true&theme={}&id={}",
                if dark_mode { "dark" } else { "light" },
                post_id
            ),
            None => format!(
                "https://syndication.twitter.com/srv/timeline-profile/screen-name/{}?dnt=true",
                self.handle
            ),
        }
    }

    /// Build the sandboxed frame, pre-sized from the height cache.
    pub fn to_element(&self, dark_mode: bool, heights: &EmbedHeightCache) -> Element {
        let mut frame = Element::new("iframe")
            .with_class(EMBED_FRAME_CLASS)
            .with_class(SOCIAL_FRAME_CLASS)
            .with_attr("src", self.frame_url(dark_mode))
            .with_attr("sandbox", SANDBOX_ALLOW_LIST.join(" "));

        if let Some(post_id) = &self.post_id {
            frame.set_attr("scrolling", "no");
            frame.set_attr("loading", "lazy");
            frame.set_attr(POST_ID_ATTRIBUTE, post_id.as_str());
            if let Some(height) = heights.get(post_id) {
                frame.set_height(height);
            }
        } else {
            frame.set_attr("loading", "lazy");
        }

        frame
    }
}

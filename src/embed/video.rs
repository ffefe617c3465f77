//! Video-provider (YouTube) embeds

use super::element::Element;
use super::EMBED_FRAME_CLASS;
use crate::classify::video_pattern;

/// A YouTube video reference parsed from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    pub video_id: String,
    /// Playback start in seconds (`t=`)
    pub start_secs: Option<u64>,
    /// Short-form video, styled with a portrait frame
    pub shorts: bool,
}

impl VideoEmbed {
    /// Parse a video URL. `None` when no id can be extracted.
    pub fn parse(url: &str) -> Option<Self> {
        let caps = video_pattern().captures(url)?;
        let video_id = caps.get(2)?.as_str().to_string();
        let start_secs = caps.get(3).and_then(|m| m.as_str().parse().ok());
        let shorts = caps.get(1).is_some_and(|m| m.as_str() == "shorts");

        Some(Self {
            video_id,
            start_secs,
            shorts,
        })
    }

    pub fn embed_url(&self) -> String {
        let mut url = format!("https://www.youtube.com/embed/{}", self.video_id);
        if let Some(start) = self.start_secs {
            url.push_str(&format!("?start={}", start));
        }
        url
    }

    pub fn style_class(&self) -> &'static str {
        if self.shorts {
            "youtube-shorts-embed"
        } else {
            "youtube-embed"
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new("iframe")
            .with_class(EMBED_FRAME_CLASS)
            .with_class(self.style_class())
            .with_attr("src", self.embed_url())
            .with_attr("allowfullscreen", "true")
            .with_attr("loading", "lazy")
    }
}

//! URL classification
//!
//! Maps a URL string onto the closed set of content categories that decide
//! which embed renderer applies. Patterns are tried video first, then social
//! post; anything else (including unparseable input) is `General`.

mod checks;

pub use checks::{is_image, is_linked_url, is_url, url_from_link};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

/// Content category of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlCategory {
    /// YouTube videos, shorts and live streams
    VideoProvider,
    /// Twitter / X posts and profiles
    SocialPost,
    General,
}

impl UrlCategory {
    /// Whether an embed renderer exists for this category.
    pub fn is_embeddable(&self) -> bool {
        !matches!(self, UrlCategory::General)
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrlCategory::VideoProvider => "video",
            UrlCategory::SocialPost => "social post",
            UrlCategory::General => "general",
        }
    }
}

impl fmt::Display for UrlCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// YouTube URL pattern.
///
/// Captures: 1 = path kind (`watch`, `embed`, `shorts`, `v`, `e`, `live`;
/// absent for `youtu.be`), 2 = video id, 3 = optional start seconds (`t=`).
pub(crate) fn video_pattern() -> &'static Regex {
    static VIDEO: OnceLock<Regex> = OnceLock::new();
    VIDEO.get_or_init(|| {
        Regex::new(
            r"(?:https?://)?(?:www\.|m\.)?youtu(?:\.be/|be\.com/(?:\S*?/)?(watch|embed|shorts|v|e|live)\b(?:/|\S*?(?:v=|v/)))([-a-zA-Z0-9_]{11,})(?:\S*?[?&]t=(\d+)s?)?",
        )
        .expect("video regex is valid")
    })
}

/// Twitter / X URL pattern.
///
/// Captures: 1 = handle, 2 = optional post id.
pub(crate) fn social_pattern() -> &'static Regex {
    static SOCIAL: OnceLock<Regex> = OnceLock::new();
    SOCIAL.get_or_init(|| {
        Regex::new(r"https?://(?:www\.|mobile\.)?(?:x|twitter)\.com/(\w+)(?:/status/(\w+))?")
            .expect("social regex is valid")
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────────────

/// Classify a URL. First matching family wins.
pub fn classify(url: &str) -> UrlCategory {
    if video_pattern().is_match(url) {
        UrlCategory::VideoProvider
    } else if social_pattern().is_match(url) {
        UrlCategory::SocialPost
    } else {
        UrlCategory::General
    }
}

/// Whether the URL belongs to a category with an embed renderer.
pub fn is_embeddable(url: &str) -> bool {
    classify(url).is_embeddable()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

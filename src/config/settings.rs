//! User settings for auto-card-embed
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence. Every field has a
//! default, so a partial or missing file resolves to a fully populated value.

use crate::classify::UrlCategory;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Color theme used for theme-aware embeds (social-post frames).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the host's current appearance
    #[default]
    System,
}

impl Theme {
    /// Resolve to a dark/light decision, deferring to the host for `System`.
    pub fn is_dark(&self, host_is_dark: bool) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::System => host_is_dark,
        }
    }

    /// Get a display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences for URL conversion.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Paste & Menus
    // ─────────────────────────────────────────────────────────────────────────
    /// Offer the Card / Embed / Link / Plain menu when a URL is pasted
    pub show_popup_on_paste: bool,

    /// Add the conversion commands to the editor context menu
    pub show_in_menu_item: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Embeds
    // ─────────────────────────────────────────────────────────────────────────
    /// Allow video-provider (YouTube) embeds
    pub enable_youtube_embed: bool,

    /// Allow social-post (Twitter/X) embeds
    pub enable_twitter_embed: bool,

    /// Theme for social-post frames
    pub theme: Theme,

    /// Maximum number of remembered social-post heights
    pub height_cache_capacity: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Network
    // ─────────────────────────────────────────────────────────────────────────
    /// Custom User-Agent for metadata requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_popup_on_paste: true,
            show_in_menu_item: true,
            enable_youtube_embed: true,
            enable_twitter_embed: true,
            theme: Theme::default(),
            height_cache_capacity: Self::DEFAULT_HEIGHT_CACHE_CAPACITY,
            user_agent: None,
        }
    }
}

impl Settings {
    /// Default number of cached social-post heights.
    pub const DEFAULT_HEIGHT_CACHE_CAPACITY: usize = 256;
    /// Minimum allowed height cache capacity.
    pub const MIN_HEIGHT_CACHE_CAPACITY: usize = 1;
    /// Maximum allowed height cache capacity.
    pub const MAX_HEIGHT_CACHE_CAPACITY: usize = 10_000;

    /// Whether embedding is enabled for the given category.
    ///
    /// `General` URLs are never embeddable.
    pub fn embed_enabled(&self, category: UrlCategory) -> bool {
        match category {
            UrlCategory::VideoProvider => self.enable_youtube_embed,
            UrlCategory::SocialPost => self.enable_twitter_embed,
            UrlCategory::General => false,
        }
    }

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.height_cache_capacity = self.height_cache_capacity.clamp(
            Self::MIN_HEIGHT_CACHE_CAPACITY,
            Self::MAX_HEIGHT_CACHE_CAPACITY,
        );

        // Blank user agents fall back to the client default
        if self
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.trim().is_empty())
        {
            self.user_agent = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert!(settings.show_popup_on_paste);
        assert!(settings.show_in_menu_item);
        assert!(settings.enable_youtube_embed);
        assert!(settings.enable_twitter_embed);
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.height_cache_capacity, 256);
        assert!(settings.user_agent.is_none());
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(serde_json::to_string(&Theme::System).unwrap(), "\"system\"");
    }

    #[test]
    fn test_theme_is_dark() {
        assert!(!Theme::Light.is_dark(true));
        assert!(Theme::Dark.is_dark(false));
        assert!(Theme::System.is_dark(true));
        assert!(!Theme::System.is_dark(false));
    }

    #[test]
    fn test_embed_enabled_per_category() {
        let settings = Settings {
            enable_youtube_embed: false,
            ..Settings::default()
        };

        assert!(!settings.embed_enabled(UrlCategory::VideoProvider));
        assert!(settings.embed_enabled(UrlCategory::SocialPost));
        assert!(!settings.embed_enabled(UrlCategory::General));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json_sanitized(r#"{"show_popup_on_paste": false}"#).unwrap();

        assert!(!settings.show_popup_on_paste);
        assert!(settings.show_in_menu_item);
        assert!(settings.enable_twitter_embed);
    }

    #[test]
    fn test_sanitize_clamps_cache_capacity() {
        let mut settings = Settings {
            height_cache_capacity: 0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.height_cache_capacity, 1);

        settings.height_cache_capacity = 1_000_000;
        settings.sanitize();
        assert_eq!(settings.height_cache_capacity, 10_000);
    }

    #[test]
    fn test_sanitize_drops_blank_user_agent() {
        let settings = Settings::from_json_sanitized(r#"{"user_agent": "   "}"#).unwrap();
        assert!(settings.user_agent.is_none());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let result = Settings::from_json_sanitized(r#"{"theme": "dark", "future_feature": true}"#);
        assert_eq!(result.unwrap().theme, Theme::Dark);
    }

    #[test]
    fn test_wrong_types_rejected() {
        let result = Settings::from_json_sanitized(r#"{"enable_youtube_embed": "yes"}"#);
        assert!(result.is_err());
    }
}

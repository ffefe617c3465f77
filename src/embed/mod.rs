//! Embed module for auto-card-embed
//!
//! Renders classified URLs into sandboxed third-party frames: YouTube
//! players and Twitter / X post or profile frames. Social-post frames are
//! pre-sized from [`EmbedHeightCache`], which the [`ResizeListener`] keeps
//! up to date from cross-frame messages.

mod element;
mod height_cache;
mod processor;
mod resize;
mod social;
mod video;

pub use element::Element;
pub use height_cache::EmbedHeightCache;
pub use processor::{embed_block, error_element, EmbedProcessor, EMBED_BLOCK_LANGUAGE};
pub use resize::{FrameHandle, FrameRegistry, ResizeListener, ResizeNotice, RESIZE_ORIGIN};
pub use social::{SocialPostEmbed, POST_ID_ATTRIBUTE, SANDBOX_ALLOW_LIST};
pub use video::VideoEmbed;

/// Class shared by every embed frame.
pub const EMBED_FRAME_CLASS: &str = "auto-card-embed-iframe";

/// Container class for video embeds.
pub const CONTAINER_CLASS: &str = "auto-card-embed-container";

/// Container class for social-post embeds; the resize listener only touches
/// frames inside these.
pub const SOCIAL_CONTAINER_CLASS: &str = "auto-card-embed-twitter-container";

/// Class of the inline error element.
pub const ERROR_CLASS: &str = "auto-card-embed-error";

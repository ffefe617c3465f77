//! Card module for auto-card-embed
//!
//! Link metadata, the extractor contract with its default meta-tag
//! implementation, and the card / title-link text formats.

mod metadata;
mod render;

pub use metadata::{LinkMetadata, MetaTagExtractor, MetadataExtractor};
pub use render::{
    card_block_body, parse_card_block, render_card, render_title_link, CARD_BLOCK_LANGUAGE,
};
pub(crate) use render::normalize_indentation;

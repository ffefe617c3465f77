//! auto-card-embed
//!
//! Turns bare URLs in a markdown document into richer content: a fenced
//! `cardlink` metadata card, a `[title](url)` link, or a fenced `autoembed`
//! block rendered as a sandboxed YouTube or Twitter / X frame.
//!
//! The [`AutoCardEmbed`] service is the entry point. It is wired to the host
//! through small traits: [`editor::Editor`] for the live document,
//! [`fetch::Transport`] for HTTP, and the collaborators in [`host`].

pub mod card;
pub mod classify;
pub mod config;
pub mod convert;
pub mod editor;
pub mod embed;
pub mod error;
pub mod fetch;
pub mod host;
pub mod menu;
pub mod orchestrator;
pub mod placeholder;
pub mod string_utils;

pub use classify::{classify, UrlCategory};
pub use config::{load_config, save_config, Settings, Theme};
pub use convert::{ConversionOutcome, Converter};
pub use error::{Error, Result};
pub use orchestrator::{AutoCardEmbed, PasteDecision, PasteEvent, RenderedEmbed};

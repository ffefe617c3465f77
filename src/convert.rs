//! URL → card / title-link conversion
//!
//! Runs the placeholder protocol against the remote fetcher and the
//! metadata extractor. The editor lock is held only for the synchronous
//! Begin and Locate steps, so the document stays editable while a fetch is
//! pending.

use crate::card::{render_card, render_title_link, LinkMetadata, MetadataExtractor};
use crate::editor::{Editor, SharedEditor};
use crate::fetch::RemoteFetcher;
use crate::host::Notifier;
use crate::placeholder::{Placeholder, PlaceholderKind, Resolution};
use log::debug;
use std::sync::Arc;

/// Notice shown when a card could not be built.
pub const CARD_FAILED_NOTICE: &str = "Couldn't fetch link metadata";

/// Notice shown when a title link could not be built.
pub const TITLE_FAILED_NOTICE: &str = "Couldn't fetch link title";

/// How a single conversion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Text was inserted directly, without a fetch
    Inserted,
    /// The placeholder was replaced with the synthesized content
    Converted,
    /// Metadata was unavailable; the placeholder was replaced with fallback text
    Reverted,
    /// The placeholder had disappeared; the document was left alone
    Abandoned,
}

impl ConversionOutcome {
    fn from_resolution(resolution: Resolution, converted: bool) -> Self {
        match (resolution, converted) {
            (Resolution::Abandoned, _) => ConversionOutcome::Abandoned,
            (Resolution::Replaced, true) => ConversionOutcome::Converted,
            (Resolution::Replaced, false) => ConversionOutcome::Reverted,
        }
    }
}

/// Fetch + extract + placeholder resolution.
#[derive(Clone)]
pub struct Converter {
    fetcher: RemoteFetcher,
    extractor: Arc<dyn MetadataExtractor>,
    notifier: Arc<dyn Notifier>,
}

impl Converter {
    pub fn new(
        fetcher: RemoteFetcher,
        extractor: Arc<dyn MetadataExtractor>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            notifier,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn MetadataExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Fetch a page and extract its metadata. `None` on any failure.
    pub async fn link_metadata(&self, url: &str) -> Option<LinkMetadata> {
        let response = self.fetcher.fetch(url).await?;
        let metadata = self.extractor.extract(url, &response.text);
        if metadata.is_none() {
            debug!("No metadata could be extracted from {}", url);
        }
        metadata
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Card
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the selection with a card for `url`.
    pub async fn convert_url_to_card<E>(&self, editor: &SharedEditor<E>, url: &str) -> ConversionOutcome
    where
        E: Editor + Send,
    {
        let placeholder = {
            let mut editor = editor.lock().await;
            Placeholder::insert(&mut *editor, PlaceholderKind::Card, url)
        };
        self.complete_card(editor, &placeholder).await
    }

    /// Await metadata for an already inserted card placeholder and resolve it.
    pub async fn complete_card<E>(
        &self,
        editor: &SharedEditor<E>,
        placeholder: &Placeholder,
    ) -> ConversionOutcome
    where
        E: Editor + Send,
    {
        let metadata = self.link_metadata(placeholder.url()).await;

        let mut editor = editor.lock().await;
        match metadata {
            Some(metadata) => {
                let resolution = placeholder.resolve(&mut *editor, &render_card(&metadata));
                ConversionOutcome::from_resolution(resolution, true)
            }
            None => {
                let resolution = placeholder.resolve(&mut *editor, placeholder.fallback_text());
                if resolution == Resolution::Replaced {
                    self.notifier.notify(CARD_FAILED_NOTICE);
                }
                ConversionOutcome::from_resolution(resolution, false)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Title Link
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the selection with `[title](url)`.
    ///
    /// Without a title the link text falls back to the URL itself.
    pub async fn convert_url_to_title_link<E>(
        &self,
        editor: &SharedEditor<E>,
        url: &str,
    ) -> ConversionOutcome
    where
        E: Editor + Send,
    {
        let placeholder = {
            let mut editor = editor.lock().await;
            Placeholder::insert(&mut *editor, PlaceholderKind::TitleLink, url)
        };

        let title = self.link_metadata(url).await.map(|metadata| metadata.title);

        let mut editor = editor.lock().await;
        match title {
            Some(title) => {
                let resolution = placeholder.resolve(&mut *editor, &render_title_link(&title, url));
                ConversionOutcome::from_resolution(resolution, true)
            }
            None => {
                let resolution = placeholder.resolve(&mut *editor, &render_title_link(url, url));
                if resolution == Resolution::Replaced {
                    self.notifier.notify(TITLE_FAILED_NOTICE);
                }
                ConversionOutcome::from_resolution(resolution, false)
            }
        }
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("fetcher", &self.fetcher)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

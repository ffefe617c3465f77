//! Conversion orchestrator
//!
//! `AutoCardEmbed` owns the settings, the converter, the embed height cache
//! and the live-frame registry, and wires them to the host entry points:
//! paste interception, the two commands, the context menu, and rendering of
//! `autoembed` blocks. The resize listener is registered on [`load`] and
//! removed on [`unload`] (or drop).
//!
//! [`load`]: AutoCardEmbed::load
//! [`unload`]: AutoCardEmbed::unload

use crate::card::{MetaTagExtractor, MetadataExtractor};
use crate::classify::{classify, is_image, is_linked_url, is_url, url_from_link, UrlCategory};
use crate::config::Settings;
use crate::convert::{ConversionOutcome, Converter};
use crate::editor::{
    offset_to_position, position_to_offset, select_url_at_cursor, Editor, SharedEditor,
};
use crate::embed::{
    embed_block, EmbedHeightCache, EmbedProcessor, Element, FrameHandle, FrameRegistry,
    ResizeListener,
};
use crate::error::Result;
use crate::fetch::{RemoteFetcher, Transport};
use crate::host::{
    ClipboardSource, Connectivity, LogNotifier, MessageChannel, Notifier, OnlineStatus,
    SubscriptionId, SystemClipboard,
};
use crate::menu::{
    command, commands, editor_menu, paste_menu, CommandSpec, EditorAction, MenuContext, MenuItem,
    PasteChoice,
};
use crate::placeholder::{Placeholder, PlaceholderKind};
use futures::future::join_all;
use log::{debug, info};
use regex::Regex;
use std::sync::{Arc, OnceLock};

// ─────────────────────────────────────────────────────────────────────────────
// Paste Interception Types
// ─────────────────────────────────────────────────────────────────────────────

/// A paste about to happen in the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteEvent {
    /// Plain-text clipboard payload
    pub text: String,
    /// The paste carries files (images, attachments)
    pub has_files: bool,
}

impl PasteEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            has_files: false,
        }
    }
}

/// What the host should do with a paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteDecision {
    /// Let the host paste normally
    Default,
    /// Suppress the default paste and show this menu at the cursor
    Intercept {
        url: String,
        category: UrlCategory,
        menu: Vec<MenuItem<PasteChoice>>,
    },
}

/// An embed rendered for the host, with the frames it registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmbed {
    pub element: Element,
    /// Frames mounted in the service's registry. They stay mounted until
    /// passed back through `release_embed` or `rerender_embed`.
    pub frames: Vec<FrameHandle>,
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\S+").expect("token regex is valid"))
}

/// URL carried by a selection token: a bare URL or a markdown link.
fn token_url(token: &str) -> Option<String> {
    if is_url(token) {
        Some(token.to_string())
    } else if is_linked_url(token) {
        url_from_link(token)
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AutoCardEmbed
// ─────────────────────────────────────────────────────────────────────────────

/// The URL-to-content conversion service.
pub struct AutoCardEmbed {
    settings: Settings,
    converter: Converter,
    heights: Arc<EmbedHeightCache>,
    frames: Arc<FrameRegistry>,
    connectivity: Arc<dyn Connectivity>,
    clipboard: Arc<dyn ClipboardSource>,
    resize_subscription: Option<(Arc<dyn MessageChannel>, SubscriptionId)>,
}

impl AutoCardEmbed {
    /// Create the service. Settings are sanitized once here.
    pub fn new(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        let mut settings = settings;
        settings.sanitize();

        let converter = Converter::new(
            RemoteFetcher::new(transport),
            Arc::new(MetaTagExtractor),
            Arc::new(LogNotifier),
        );

        Self {
            heights: Arc::new(EmbedHeightCache::new(settings.height_cache_capacity)),
            frames: Arc::new(FrameRegistry::new()),
            connectivity: Arc::new(OnlineStatus::default()),
            clipboard: Arc::new(SystemClipboard),
            resize_subscription: None,
            converter,
            settings,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.converter = self.converter.clone().with_notifier(notifier);
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn MetadataExtractor>) -> Self {
        self.converter = self.converter.clone().with_extractor(extractor);
        self
    }

    pub fn with_connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSource>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn height_cache(&self) -> &Arc<EmbedHeightCache> {
        &self.heights
    }

    pub fn frames(&self) -> &Arc<FrameRegistry> {
        &self.frames
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Register the resize listener on `channel`. A second call while loaded
    /// is a no-op and returns `false`.
    pub fn load(&mut self, channel: Arc<dyn MessageChannel>) -> bool {
        if self.resize_subscription.is_some() {
            debug!("Resize listener already registered");
            return false;
        }

        let listener = ResizeListener::new(Arc::clone(&self.heights), Arc::clone(&self.frames));
        let id = channel.subscribe(listener.into_handler());
        self.resize_subscription = Some((channel, id));
        info!("auto-card-embed loaded");
        true
    }

    /// Remove the resize listener. Returns `false` if it was not registered.
    pub fn unload(&mut self) -> bool {
        match self.resize_subscription.take() {
            Some((channel, id)) => {
                channel.unsubscribe(id);
                info!("auto-card-embed unloaded");
                true
            }
            None => false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.resize_subscription.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Paste Interception
    // ─────────────────────────────────────────────────────────────────────────

    /// Decide whether a paste should open the conversion menu.
    ///
    /// Only a single non-image URL pasted while online, without files and
    /// with the popup enabled, is intercepted.
    pub fn on_paste(&self, event: &PasteEvent) -> PasteDecision {
        if !self.settings.show_popup_on_paste || !self.is_online() || event.has_files {
            return PasteDecision::Default;
        }

        let text = event.text.trim();
        if text.is_empty() || !is_url(text) || is_image(text) {
            return PasteDecision::Default;
        }

        let category = classify(text);
        PasteDecision::Intercept {
            url: text.to_string(),
            category,
            menu: paste_menu(&MenuContext::new(category, &self.settings)),
        }
    }

    /// Apply a paste-menu choice at the current selection.
    pub async fn choose<E>(
        &self,
        editor: &SharedEditor<E>,
        url: &str,
        choice: PasteChoice,
    ) -> ConversionOutcome
    where
        E: Editor + Send,
    {
        debug!("Paste choice {:?} for {}", choice, url);
        match choice {
            PasteChoice::Card => self.converter.convert_url_to_card(editor, url).await,
            PasteChoice::LinkWithTitle => {
                self.converter.convert_url_to_title_link(editor, url).await
            }
            PasteChoice::Embed => {
                editor.lock().await.replace_selection(&embed_block(url));
                ConversionOutcome::Inserted
            }
            PasteChoice::PlainUrl => {
                editor.lock().await.replace_selection(url);
                ConversionOutcome::Inserted
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Direct conversion: replace the selection with a card for `url`.
    pub async fn convert_url_to_card<E>(&self, editor: &SharedEditor<E>, url: &str) -> ConversionOutcome
    where
        E: Editor + Send,
    {
        self.converter.convert_url_to_card(editor, url).await
    }

    /// "Paste URL as card": read the clipboard and convert it.
    ///
    /// An empty clipboard does nothing (`Ok(None)`). Offline, non-URL or
    /// image-URL text is pasted as is.
    pub async fn manual_paste_as_card<E>(
        &self,
        editor: &SharedEditor<E>,
    ) -> Result<Option<ConversionOutcome>>
    where
        E: Editor + Send,
    {
        let text = self.clipboard.read_text().await?;
        if text.is_empty() {
            return Ok(None);
        }

        let url = text.trim();
        if !self.is_online() || !is_url(url) || is_image(url) {
            editor.lock().await.replace_selection(&text);
            return Ok(Some(ConversionOutcome::Inserted));
        }

        Ok(Some(self.converter.convert_url_to_card(editor, url).await))
    }

    /// "Enhance selected URL to card": convert every URL in the selection.
    ///
    /// With nothing selected the selection is first widened to the link or
    /// URL under the cursor. Each whitespace-separated token that is a bare
    /// URL or a markdown link gets its own placeholder in place, so the text
    /// around it is kept; all fetches then run concurrently. Outcomes are in
    /// document order. Skipped entirely while offline.
    pub async fn enhance_selected_url<E>(&self, editor: &SharedEditor<E>) -> Vec<ConversionOutcome>
    where
        E: Editor + Send,
    {
        if !self.is_online() {
            debug!("Offline, skipping selection enhancement");
            return Vec::new();
        }

        let placeholders = {
            let mut doc = editor.lock().await;
            select_url_at_cursor(&mut *doc);

            let selection = doc.selection();
            let (from, _) = doc.selection_range();
            let base = position_to_offset(&doc.value(), from);

            let targets: Vec<(usize, usize, String)> = token_regex()
                .find_iter(&selection)
                .filter_map(|m| token_url(m.as_str()).map(|url| (m.start(), m.end(), url)))
                .collect();

            // Back to front so earlier offsets stay valid
            let mut placeholders = Vec::with_capacity(targets.len());
            for (start, end, url) in targets.into_iter().rev() {
                let text = doc.value();
                let anchor = offset_to_position(&text, base + start);
                let head = offset_to_position(&text, base + end);
                doc.set_selection(anchor, head);
                placeholders.push(Placeholder::insert(&mut *doc, PlaceholderKind::Card, &url));
            }
            placeholders.reverse();
            placeholders
        };

        if placeholders.is_empty() {
            debug!("No URL found in selection");
            return Vec::new();
        }

        join_all(
            placeholders
                .iter()
                .map(|placeholder| self.converter.complete_card(editor, placeholder)),
        )
        .await
    }

    /// Context-menu items for the current state.
    pub fn editor_menu(&self) -> Vec<MenuItem<EditorAction>> {
        editor_menu(&self.settings, self.is_online())
    }

    /// Commands to register with the host.
    pub fn commands(&self) -> &'static [CommandSpec] {
        commands()
    }

    /// Whether the command with `id` may run right now.
    pub fn command_available(&self, id: &str) -> bool {
        command(id).is_some_and(|spec| spec.is_available(self.is_online()))
    }

    /// Run a context-menu or command action.
    pub async fn run_action<E>(
        &self,
        editor: &SharedEditor<E>,
        action: EditorAction,
    ) -> Result<Vec<ConversionOutcome>>
    where
        E: Editor + Send,
    {
        match action {
            EditorAction::PasteAsCard => Ok(self
                .manual_paste_as_card(editor)
                .await?
                .into_iter()
                .collect()),
            EditorAction::EnhanceSelection => Ok(self.enhance_selected_url(editor).await),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Embeds
    // ─────────────────────────────────────────────────────────────────────────

    /// Render an `autoembed` block body and mount its frames so resize
    /// messages reach them.
    pub fn render_embed(&self, source: &str, host_is_dark: bool) -> RenderedEmbed {
        let processor = EmbedProcessor::new(
            &self.settings,
            self.settings.theme.is_dark(host_is_dark),
            Arc::clone(&self.heights),
        );
        let element = processor.run(source);
        let frames = self.frames.mount(&element);
        RenderedEmbed { element, frames }
    }

    /// Unmount the frames of an embed the host removed. Returns how many
    /// were still mounted.
    pub fn release_embed(&self, rendered: &RenderedEmbed) -> usize {
        rendered
            .frames
            .iter()
            .filter(|handle| self.frames.unmount(**handle))
            .count()
    }

    /// Replace a previously rendered embed, unmounting its frames first.
    pub fn rerender_embed(
        &self,
        previous: &RenderedEmbed,
        source: &str,
        host_is_dark: bool,
    ) -> RenderedEmbed {
        self.release_embed(previous);
        self.render_embed(source, host_is_dark)
    }
}

impl Drop for AutoCardEmbed {
    fn drop(&mut self) {
        self.unload();
    }
}

impl std::fmt::Debug for AutoCardEmbed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoCardEmbed")
            .field("settings", &self.settings)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

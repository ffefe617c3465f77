//! Placeholder protocol for asynchronous document edits
//!
//! A conversion first replaces the selection with a short "in progress"
//! string carrying a random token (Begin). After its async work it takes a
//! fresh snapshot of the document, finds that exact string (Locate) and
//! replaces it in one range edit. If the string is gone, the result is
//! dropped and only logged; no other location is ever guessed.
//!
//! Four base-36 characters give 36^4 ≈ 1.7M tokens. Collisions with text
//! already in the document are avoided at Begin; collisions with text typed
//! during the await are accepted.

use crate::editor::{offset_to_position, Editor, EditorPosition};
use log::{debug, info};
use rand::Rng;

/// Number of characters in a placeholder token.
pub const TOKEN_LEN: usize = 4;

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Attempts at finding a token not already present in the document.
const MAX_TOKEN_ATTEMPTS: usize = 16;

/// Generate a random lowercase base-36 token.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Placeholder Kinds
// ─────────────────────────────────────────────────────────────────────────────

/// What a pending placeholder will become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Card,
    TitleLink,
}

impl PlaceholderKind {
    pub fn label(&self) -> &'static str {
        match self {
            PlaceholderKind::Card => "Fetching Data",
            PlaceholderKind::TitleLink => "Fetching Title",
        }
    }

    /// In-progress display string, e.g. `[Fetching Data#a1b2](https://…)`.
    pub fn display(&self, token: &str, url: &str) -> String {
        format!("[{}#{}]({})", self.label(), token, url)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Placeholder
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of the Locate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The placeholder was found and replaced
    Replaced,
    /// The placeholder no longer exists verbatim; nothing was changed
    Abandoned,
}

/// A pending placeholder inserted into a live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    url: String,
    display: String,
    /// Selected text that the placeholder replaced
    original: String,
}

impl Placeholder {
    /// Begin: replace the current selection with a fresh placeholder.
    pub fn insert<E: Editor + ?Sized>(editor: &mut E, kind: PlaceholderKind, url: &str) -> Self {
        let original = editor.selection();
        let document = editor.value();

        let mut display = kind.display(&generate_token(), url);
        for _ in 1..MAX_TOKEN_ATTEMPTS {
            if !document.contains(&display) {
                break;
            }
            display = kind.display(&generate_token(), url);
        }

        debug!("Inserting placeholder {}", display);
        editor.replace_selection(&display);

        Self {
            url: url.to_string(),
            display,
            original,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The exact text searched for at Locate.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Text that was selected at Begin.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Revert text: the original selection, or the URL if nothing was selected.
    pub fn fallback_text(&self) -> &str {
        if self.original.is_empty() {
            &self.url
        } else {
            &self.original
        }
    }

    /// Locate + Terminal: replace the placeholder with `replacement` in a
    /// single range edit, or abandon if it can no longer be found.
    pub fn resolve<E: Editor + ?Sized>(&self, editor: &mut E, replacement: &str) -> Resolution {
        let text = editor.value();
        match locate(&text, &self.display) {
            Some((from, to)) => {
                editor.replace_range(replacement, from, to);
                Resolution::Replaced
            }
            None => {
                info!(
                    "Unable to find text \"{}\" in current editor, bailing out; link {}",
                    self.display, self.url
                );
                Resolution::Abandoned
            }
        }
    }
}

/// Editor range of the first exact occurrence of `needle` in `text`.
pub fn locate(text: &str, needle: &str) -> Option<(EditorPosition, EditorPosition)> {
    if needle.is_empty() {
        return None;
    }
    let start = text.find(needle)?;
    let end = start + needle.len();
    Some((offset_to_position(text, start), offset_to_position(text, end)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Editor module for auto-card-embed
//!
//! This module defines the host editor contract the conversion pipeline
//! writes through, the offset ↔ `{line, ch}` transform, and an in-memory
//! document used by the command line and tests.

mod document;
mod position;
mod selection;

use std::sync::Arc;
use tokio::sync::Mutex;

pub use document::TextDocument;
pub use position::{offset_to_position, position_to_offset, EditorPosition};
pub use selection::select_url_at_cursor;

/// The live document as seen by the conversion pipeline.
///
/// Addressed exclusively by `{line, ch}` coordinates; the pipeline derives
/// coordinates from its own substring searches over [`Editor::value`].
pub trait Editor {
    /// Currently selected text (empty when nothing is selected).
    fn selection(&self) -> String;

    fn something_selected(&self) -> bool;

    /// Ordered `(from, to)` ends of the current selection.
    fn selection_range(&self) -> (EditorPosition, EditorPosition);

    fn set_selection(&mut self, anchor: EditorPosition, head: EditorPosition);

    /// Replace the selection (or insert at the cursor) with `text`.
    fn replace_selection(&mut self, text: &str);

    fn cursor(&self) -> EditorPosition;

    /// Text of a single line, without its terminating newline.
    fn line(&self, line: usize) -> Option<String>;

    /// Full snapshot of the document text.
    fn value(&self) -> String;

    /// Replace the text between two positions in one edit.
    fn replace_range(&mut self, text: &str, from: EditorPosition, to: EditorPosition);
}

/// An editor shared between the host and in-flight conversions.
///
/// The lock is only held for the synchronous Begin and Locate steps, never
/// across a network await, so the host stays free to edit meanwhile.
pub type SharedEditor<E> = Arc<Mutex<E>>;

/// Wrap an editor for sharing with conversion tasks.
pub fn shared<E: Editor>(editor: E) -> SharedEditor<E> {
    Arc::new(Mutex::new(editor))
}

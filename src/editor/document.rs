//! In-memory text document implementing the host `Editor` contract
//!
//! Used by the command-line front end and by tests. Selection is stored as
//! byte offsets (anchor/head); the `Editor` surface speaks `{line, ch}`.

use super::position::{offset_to_position, position_to_offset, EditorPosition};
use super::Editor;
use crate::string_utils::floor_char_boundary;

/// A plain-text buffer with a single selection.
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    content: String,
    /// Selection anchor (byte offset)
    anchor: usize,
    /// Selection head / cursor (byte offset)
    head: usize,
}

impl TextDocument {
    /// Create a document with the cursor at the end of `content`.
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let end = content.len();
        Self {
            content,
            anchor: end,
            head: end,
        }
    }

    /// Create a document with the byte range `from..to` selected.
    pub fn with_selection(content: impl Into<String>, from: usize, to: usize) -> Self {
        let mut doc = Self::new(content);
        doc.anchor = floor_char_boundary(&doc.content, from);
        doc.head = floor_char_boundary(&doc.content, to);
        doc
    }

    /// Current text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Place the cursor, collapsing any selection.
    pub fn set_cursor(&mut self, position: EditorPosition) {
        let offset = position_to_offset(&self.content, position);
        self.anchor = offset;
        self.head = offset;
    }

    /// Insert text at a byte offset without touching the selection range
    /// semantics beyond shifting it. Models an unrelated user edit.
    pub fn insert_at(&mut self, offset: usize, text: &str) {
        let offset = floor_char_boundary(&self.content, offset);
        self.splice(offset, offset, text);
    }

    /// Replace the whole text. The selection collapses to the end.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.anchor = self.content.len();
        self.head = self.content.len();
    }

    fn selection_offsets(&self) -> (usize, usize) {
        (self.anchor.min(self.head), self.anchor.max(self.head))
    }

    /// Replace `start..end` with `text`, keeping the selection anchored to
    /// the surrounding text.
    fn splice(&mut self, start: usize, end: usize, text: &str) {
        self.content.replace_range(start..end, text);
        let inserted_end = start + text.len();

        let shift = |offset: usize| -> usize {
            if offset >= end {
                offset - (end - start) + text.len()
            } else if offset > start {
                inserted_end
            } else {
                offset
            }
        };
        self.anchor = shift(self.anchor);
        self.head = shift(self.head);
    }
}

impl Editor for TextDocument {
    fn selection(&self) -> String {
        let (from, to) = self.selection_offsets();
        self.content[from..to].to_string()
    }

    fn something_selected(&self) -> bool {
        self.anchor != self.head
    }

    fn selection_range(&self) -> (EditorPosition, EditorPosition) {
        let (from, to) = self.selection_offsets();
        (
            offset_to_position(&self.content, from),
            offset_to_position(&self.content, to),
        )
    }

    fn set_selection(&mut self, anchor: EditorPosition, head: EditorPosition) {
        self.anchor = position_to_offset(&self.content, anchor);
        self.head = position_to_offset(&self.content, head);
    }

    fn replace_selection(&mut self, text: &str) {
        let (from, to) = self.selection_offsets();
        self.splice(from, to, text);
        let cursor = from + text.len();
        self.anchor = cursor;
        self.head = cursor;
    }

    fn cursor(&self) -> EditorPosition {
        offset_to_position(&self.content, self.head)
    }

    fn line(&self, line: usize) -> Option<String> {
        self.content.split('\n').nth(line).map(str::to_string)
    }

    fn value(&self) -> String {
        self.content.clone()
    }

    fn replace_range(&mut self, text: &str, from: EditorPosition, to: EditorPosition) {
        let start = position_to_offset(&self.content, from);
        let end = position_to_offset(&self.content, to);
        let (start, end) = (start.min(end), start.max(end));
        self.splice(start, end, text);
    }
}

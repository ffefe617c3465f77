//! Flat offset ↔ `{line, ch}` coordinate transform
//!
//! Substring search over the document yields byte offsets, while the host
//! editor is addressed by zero-based line and character column.

use crate::string_utils::{byte_index_to_char_index, char_index_to_byte_index, floor_char_boundary};
use serde::{Deserialize, Serialize};

/// A position in the host editor: zero-based line and character column.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EditorPosition {
    pub line: usize,
    pub ch: usize,
}

impl EditorPosition {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// Translate a byte offset in `content` into an editor position.
///
/// The line is the number of `\n` characters before the offset; the column
/// is the number of characters between the preceding newline and the offset.
/// Offsets past the end clamp to the end, and offsets inside a multi-byte
/// character clamp to its start.
pub fn offset_to_position(content: &str, offset: usize) -> EditorPosition {
    let offset = floor_char_boundary(content, offset);
    let prefix = &content[..offset];

    let line = prefix.bytes().filter(|&b| b == b'\n').count();
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    let ch = byte_index_to_char_index(&prefix[line_start..], prefix.len() - line_start);

    EditorPosition { line, ch }
}

/// Translate an editor position back into a byte offset in `content`.
///
/// Lines past the end clamp to the end of the text; columns past the end of
/// a line clamp to the end of that line.
pub fn position_to_offset(content: &str, position: EditorPosition) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match content[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return content.len(),
        }
    }

    let line_end = content[line_start..]
        .find('\n')
        .map_or(content.len(), |i| line_start + i);
    line_start + char_index_to_byte_index(&content[line_start..line_end], position.ch)
}

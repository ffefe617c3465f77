//! Cursor word-boundary expansion for URL commands
//!
//! When a command runs without a selection, the selection is widened to the
//! markdown link or bare URL under the cursor.

use super::{Editor, EditorPosition};
use crate::string_utils::{byte_index_to_char_index, char_index_to_byte_index};
use regex::Regex;
use std::sync::OnceLock;

fn link_in_line_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| {
        Regex::new(r"\[[^\[\]]*\]\(https?://[^\s)]+\)").expect("link regex is valid")
    })
}

fn url_in_line_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"https?://[^\s\[\]()<>]+").expect("url regex is valid"))
}

/// Byte range of the first `regex` match in `line` that contains `cursor`.
fn match_around(regex: &Regex, line: &str, cursor: usize) -> Option<(usize, usize)> {
    regex
        .find_iter(line)
        .find(|m| m.start() <= cursor && cursor <= m.end())
        .map(|m| (m.start(), m.end()))
}

/// Expand an empty selection to the link or URL under the cursor.
///
/// Markdown links win over bare URLs. When neither surrounds the cursor the
/// selection collapses onto the cursor. An existing selection is left as is.
/// Returns `true` when something ends up selected.
pub fn select_url_at_cursor<E: Editor + ?Sized>(editor: &mut E) -> bool {
    if editor.something_selected() {
        return true;
    }

    let cursor = editor.cursor();
    let Some(line) = editor.line(cursor.line) else {
        editor.set_selection(cursor, cursor);
        return false;
    };
    let cursor_byte = char_index_to_byte_index(&line, cursor.ch);

    let found = match_around(link_in_line_regex(), &line, cursor_byte)
        .or_else(|| match_around(url_in_line_regex(), &line, cursor_byte));

    match found {
        Some((start, end)) => {
            let from = EditorPosition::new(cursor.line, byte_index_to_char_index(&line, start));
            let to = EditorPosition::new(cursor.line, byte_index_to_char_index(&line, end));
            editor.set_selection(from, to);
            true
        }
        None => {
            editor.set_selection(cursor, cursor);
            false
        }
    }
}

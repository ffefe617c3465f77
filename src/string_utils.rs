//! UTF-8 Safe String Utilities
//!
//! Document text is searched by byte offset (`str::find`) while the host
//! editor addresses columns by character. These helpers convert between the
//! two without ever slicing inside a multi-byte character.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }

    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Check if a byte is the start of a UTF-8 character.
///
/// Continuation bytes look like 10xxxxxx; everything else starts a character.
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    (byte & 0b1100_0000) != 0b1000_0000
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index to a byte index.
///
/// Returns the string length if `char_index` is beyond the string.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character index.
///
/// If the byte index is in the middle of a character, it counts
/// up to (but not including) that character.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

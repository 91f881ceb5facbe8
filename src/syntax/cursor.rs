//! Character cursor shared by the markup parsers.
//!
//! This module provides the [`crate::syntax::cursor::TextCursor`] type, a cursor-based reader
//! over UTF-8 text. All three grammars of the completion engine (tags and attributes,
//! style selectors and markup extensions) walk their input one character at a time and
//! record byte offsets of interesting boundaries; the cursor keeps that walk bounds-checked
//! and character-boundary correct.
//!
//! # Architecture
//!
//! The cursor maintains a byte position within a borrowed `&str`:
//!
//! - **Position tracking** - [`TextCursor::pos`] is always a character boundary
//! - **Non-failing access** - reading past the end yields `None` rather than an error,
//!   because the text being parsed is, by definition, an unfinished edit
//! - **Look-behind** - [`TextCursor::ends_with`] checks delimiters such as `-->` that are
//!   only recognisable once fully consumed
//!
//! # Usage Examples
//!
//! ```rust
//! use xamlscope::syntax::TextCursor;
//!
//! let mut cursor = TextCursor::new("<Button Width=");
//! assert_eq!(cursor.peek(), Some('<'));
//!
//! let mut names = 0;
//! while let Some((pos, c)) = cursor.next_char() {
//!     if c == ' ' {
//!         names += 1;
//!         assert_eq!(pos, 7);
//!     }
//! }
//! assert_eq!(names, 1);
//! assert!(!cursor.has_more_data());
//! ```

/// A bounds-checked, character-aware cursor over a string slice.
///
/// Offsets handed out by the cursor are byte offsets into the original slice and can be used
/// directly to slice it.
#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    data: &'a str,
    position: usize,
}

impl<'a> TextCursor<'a> {
    /// Create a new cursor positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a str) -> Self {
        TextCursor { data, position: 0 }
    }

    /// Length of the underlying text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` while unread characters remain.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Current byte position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// The full text this cursor walks over.
    #[must_use]
    pub fn data(&self) -> &'a str {
        self.data
    }

    /// Move to `pos`, clamped to the text length and floored to a character boundary.
    pub fn seek(&mut self, pos: usize) {
        self.position = floor_char_boundary(self.data, pos);
    }

    /// Look at the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.data[self.position..].chars().next()
    }

    /// Look at the character before the current position.
    #[must_use]
    pub fn peek_back(&self) -> Option<char> {
        self.data[..self.position].chars().next_back()
    }

    /// Consume the next character, returning it together with its byte offset.
    pub fn next_char(&mut self) -> Option<(usize, char)> {
        let c = self.peek()?;
        let at = self.position;
        self.position += c.len_utf8();
        Some((at, c))
    }

    /// Returns `true` if the text consumed so far ends with `needle`.
    #[must_use]
    pub fn ends_with(&self, needle: &str) -> bool {
        self.data[..self.position].ends_with(needle)
    }

    /// The unread remainder of the text.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.data[self.position..]
    }

    /// The text between `start` and the current position.
    ///
    /// Returns an empty string if `start` lies beyond the current position.
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &'a str {
        slice(self.data, start, self.position)
    }
}

/// Largest character boundary in `text` that is not greater than `pos`.
#[must_use]
pub fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Tolerant slicing: clamps both ends and never panics on bad boundaries.
#[must_use]
pub fn slice(text: &str, start: usize, end: usize) -> &str {
    let end = floor_char_boundary(text, end);
    let start = floor_char_boundary(text, start.min(end));
    &text[start..end]
}

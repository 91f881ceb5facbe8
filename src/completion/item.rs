//! Completion records handed to the presentation layer.

use std::fmt;

use bitflags::bitflags;

use crate::metadata::MetadataEvent;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    /// What a [`Completion`] inserts.
    ///
    /// Used both as a single tag and as a set: a few candidates combine a base kind with a
    /// presentation hint (`CLASS | TARGET_TYPE_CLASS`, `NAMESPACE | EDITOR_HINT`). Ranking and
    /// icon mapping switch on the exact combined value. The empty value is the `None` kind.
    pub struct CompletionKind: u32 {
        /// Text snippet with `$0` cursor marker
        const SNIPPET = 0x0001;
        /// Type name
        const CLASS = 0x0002;
        /// Instance property
        const PROPERTY = 0x0004;
        /// Attached property, `Owner.Name`
        const ATTACHED_PROPERTY = 0x0008;
        /// Static property or named constant
        const STATIC_PROPERTY = 0x0010;
        /// Namespace identifier or directive
        const NAMESPACE = 0x0020;
        /// Enumeration member or fixed keyword
        const ENUM = 0x0040;
        /// Markup extension name
        const MARKUP_EXTENSION = 0x0080;
        /// Event
        const EVENT = 0x0100;
        /// Attached event, `Owner.Name`
        const ATTACHED_EVENT = 0x0200;
        /// Property of a data context (view model)
        const DATA_PROPERTY = 0x0300;
        /// Type offered as the target of a style or selector
        const TARGET_TYPE_CLASS = 0x0400;
        /// Editor-specific rendering hint for namespace lists
        const EDITOR_HINT = 0x0800;
        /// Selector syntax
        const SELECTOR = 0x1000;
        /// Element name
        const NAME = 0x2000;
    }
}

/// Payload a completion carries for the code-generation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionData {
    /// The event a `<New Event Handler>` snippet generates a handler for
    Event(MetadataEvent),
}

/// One candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Text shown in the list
    pub display_text: String,
    /// Text that replaces the typed token; may contain a `$0` cursor marker
    pub insert_text: String,
    /// Secondary text, usually a full type name
    pub description: String,
    /// Candidate kind
    pub kind: CompletionKind,
    /// Cursor position inside `insert_text` after insertion
    pub recommended_cursor_offset: Option<usize>,
    /// Open the completion list again right after inserting this candidate
    pub trigger_completion_after_insert: bool,
    /// Opaque payload
    pub data: Option<CompletionData>,
}

impl Completion {
    /// A candidate that shows and inserts the same text.
    pub fn new(text: impl Into<String>, kind: CompletionKind) -> Self {
        let text = text.into();
        Self::with_display(text.clone(), text, kind)
    }

    /// A candidate with distinct display and insert texts.
    pub fn with_display(
        display_text: impl Into<String>,
        insert_text: impl Into<String>,
        kind: CompletionKind,
    ) -> Self {
        Self::described(display_text, insert_text, String::new(), kind)
    }

    /// A candidate with a description.
    pub fn described(
        display_text: impl Into<String>,
        insert_text: impl Into<String>,
        description: impl Into<String>,
        kind: CompletionKind,
    ) -> Self {
        Completion {
            display_text: display_text.into(),
            insert_text: insert_text.into(),
            description: description.into(),
            kind,
            recommended_cursor_offset: None,
            trigger_completion_after_insert: false,
            data: None,
        }
    }

    /// Returns the candidate with a cursor position inside the inserted text.
    #[must_use]
    pub fn with_cursor_offset(mut self, offset: usize) -> Self {
        self.recommended_cursor_offset = Some(offset);
        self
    }

    /// Returns the candidate marked to reopen the list after insertion.
    #[must_use]
    pub fn triggering(mut self) -> Self {
        self.trigger_completion_after_insert = true;
        self
    }

    /// Returns the candidate with a payload.
    #[must_use]
    pub fn with_data(mut self, data: CompletionData) -> Self {
        self.data = Some(data);
        self
    }
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text)
    }
}

/// Ranked candidates and the document offset their replacement starts at.
///
/// The replacement range is `start_position..cursor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSet {
    /// Candidates in presentation order
    pub completions: Vec<Completion>,
    /// Byte offset into the document where the replaced token begins
    pub start_position: usize,
}

impl CompletionSet {
    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.completions.len()
    }

    /// Returns `true` if there are no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completions.is_empty()
    }

    /// Display texts in order.
    pub fn display_texts(&self) -> impl Iterator<Item = &str> {
        self.completions.iter().map(|c| c.display_text.as_str())
    }

    /// First candidate with the given display text.
    #[must_use]
    pub fn find(&self, display_text: &str) -> Option<&Completion> {
        self.completions
            .iter()
            .find(|c| c.display_text == display_text)
    }
}

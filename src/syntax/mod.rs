//! Error-tolerant parsers for the three grammars a completion request can end in.
//!
//! A completion request hands the engine the document text up to the cursor. That text is
//! unfinished by definition, so none of the parsers in this module can fail: each one walks its
//! input character by character and reports the syntactic position of the last character.
//!
//! # Key Components
//!
//! - [`XmlParser`] - Elements, attributes and attribute values, with the stack of open elements
//! - [`SelectorParser`] - Style selectors inside `Selector="..."` values
//! - [`MarkupExtensionParser`] - `{Extension ...}` attribute values
//! - [`Patterns`] - Compiled regular expressions shared across requests
//! - [`TextCursor`] - Character cursor the parsers are built on
//!
//! All offsets reported by these parsers are byte offsets into the text they were given, and
//! always fall on character boundaries.

mod cursor;
mod markup;
mod patterns;
mod selector;
mod xml;

pub use cursor::{floor_char_boundary, TextCursor};
pub use markup::{MarkupExtensionParser, MarkupState};
pub use patterns::Patterns;
pub use selector::{SelectorParser, SelectorStatement};
pub use xml::{XmlParser, XmlState};

pub(crate) use cursor::slice;

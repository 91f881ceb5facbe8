//! Markup-extension grammar parser.
//!
//! Attribute values starting with `{` are markup extensions:
//!
//! ```text
//! {Binding Path=Name, Mode=TwoWay}
//! {StaticResource AccentBrush}
//! {Binding Source={x:Static local:Settings.Default}, Path=Theme}
//! ```
//!
//! [`MarkupExtensionParser`] reports where the end of such a prefix sits: in the extension name,
//! in a property name (or positional argument), or in a property value. Extensions nest; the
//! parser always describes the innermost extension that is still open.
//!
//! An unquoted value followed by `,` leaves the parser in [`MarkupState::InsideElement`], the
//! same state as right after the extension name. Callers that need to tell the two apart look
//! backwards for the nearest `,` or `=`. Either way no property name is current there.
//!
//! # Examples
//!
//! ```rust
//! use xamlscope::syntax::{MarkupExtensionParser, MarkupState};
//!
//! let parser = MarkupExtensionParser::parse("{Binding Path=Na");
//! assert_eq!(parser.state(), MarkupState::AttributeValue);
//! assert_eq!(parser.element_name(), Some("Binding"));
//! assert_eq!(parser.attribute_name(), Some("Path"));
//! assert_eq!(parser.attributes_count(), 1);
//! assert_eq!(parser.current_value_start(), 14);
//! ```

use strum::{Display, EnumIter};

use crate::syntax::cursor::{slice, TextCursor};

/// Syntactic position at the end of a markup-extension prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum MarkupState {
    /// The extension name is being typed
    StartElement,
    /// After the extension name or a separator
    InsideElement,
    /// A property name or positional argument is being typed
    StartAttribute,
    /// After `=`, before the value
    BeforeAttributeValue,
    /// A property value is being typed
    AttributeValue,
    /// The outermost extension has been closed
    End,
    /// The text does not start with `{`
    Failed,
}

#[derive(Debug, Clone, Default)]
struct Extension {
    name: (usize, usize),
    attribute: Option<(usize, usize)>,
    attributes_count: usize,
}

/// Result of parsing a markup-extension prefix.
#[derive(Debug, Clone)]
pub struct MarkupExtensionParser<'a> {
    text: &'a str,
    state: MarkupState,
    /// Open extensions, outermost first
    stack: Vec<Extension>,
    value_start: usize,
    quote: Option<char>,
}

impl<'a> MarkupExtensionParser<'a> {
    /// Parse a prefix that starts with `{`.
    #[must_use]
    pub fn parse(text: &'a str) -> MarkupExtensionParser<'a> {
        let mut parser = MarkupExtensionParser {
            text,
            state: MarkupState::Failed,
            stack: Vec::new(),
            value_start: 0,
            quote: None,
        };

        let mut cursor = TextCursor::new(text);
        if cursor.next_char().map(|(_, c)| c) != Some('{') {
            return parser;
        }
        parser.open(cursor.pos());

        while let Some((pos, c)) = cursor.next_char() {
            parser.step(pos, c, cursor.pos());
            if matches!(parser.state, MarkupState::End | MarkupState::Failed) {
                break;
            }
        }

        log::trace!(
            "markup extension prefix parsed: state={} depth={}",
            parser.state,
            parser.stack.len()
        );
        parser
    }

    fn open(&mut self, name_start: usize) {
        self.stack.push(Extension {
            name: (name_start, name_start),
            ..Extension::default()
        });
        self.state = MarkupState::StartElement;
    }

    fn close(&mut self) {
        self.stack.pop();
        self.quote = None;
        if self.stack.is_empty() {
            self.state = MarkupState::End;
        } else {
            self.separate();
        }
    }

    /// Moves between properties; the previous property name no longer applies.
    fn separate(&mut self) {
        if let Some(ext) = self.current() {
            ext.attribute = None;
        }
        self.state = MarkupState::InsideElement;
    }

    fn current(&mut self) -> Option<&mut Extension> {
        self.stack.last_mut()
    }

    fn step(&mut self, pos: usize, c: char, end: usize) {
        match self.state {
            MarkupState::StartElement => match c {
                '}' => self.close(),
                c if c.is_whitespace() || c == ',' => self.state = MarkupState::InsideElement,
                _ => {
                    if let Some(ext) = self.current() {
                        ext.name.1 = end;
                    }
                }
            },
            MarkupState::InsideElement => match c {
                '}' => self.close(),
                '{' => self.open(end),
                c if c.is_whitespace() || c == ',' => {}
                _ => {
                    if let Some(ext) = self.current() {
                        ext.attribute = Some((pos, end));
                    }
                    self.state = MarkupState::StartAttribute;
                }
            },
            MarkupState::StartAttribute => match c {
                '}' => self.close(),
                '=' => {
                    if let Some(ext) = self.current() {
                        ext.attributes_count += 1;
                    }
                    self.value_start = end;
                    self.state = MarkupState::BeforeAttributeValue;
                }
                c if c.is_whitespace() || c == ',' => self.separate(),
                _ => {
                    if let Some((_, attribute_end)) =
                        self.current().and_then(|ext| ext.attribute.as_mut())
                    {
                        *attribute_end = end;
                    }
                }
            },
            MarkupState::BeforeAttributeValue => match c {
                '}' => self.close(),
                '{' => self.open(end),
                '\'' => {
                    self.quote = Some(c);
                    self.value_start = end;
                    self.state = MarkupState::AttributeValue;
                }
                ',' => self.separate(),
                c if c.is_whitespace() => self.value_start = end,
                _ => {
                    self.quote = None;
                    self.value_start = pos;
                    self.state = MarkupState::AttributeValue;
                }
            },
            MarkupState::AttributeValue => match (self.quote, c) {
                (Some(quote), c) if c == quote => {
                    self.quote = None;
                    self.separate();
                }
                (Some(_), _) => {}
                (None, '}') => self.close(),
                (None, ',') => self.separate(),
                (None, c) if c.is_whitespace() => self.separate(),
                (None, _) => {}
            },
            MarkupState::End | MarkupState::Failed => {}
        }
    }

    /// Final state.
    #[must_use]
    pub fn state(&self) -> MarkupState {
        self.state
    }

    /// Name of the innermost open extension, as typed (`x:Static`, `Binding`).
    #[must_use]
    pub fn element_name(&self) -> Option<&'a str> {
        let ext = self.stack.last()?;
        Some(slice(self.text, ext.name.0, ext.name.1))
    }

    /// Most recent property name or positional argument of the innermost extension.
    #[must_use]
    pub fn attribute_name(&self) -> Option<&'a str> {
        let (start, end) = self.stack.last()?.attribute?;
        Some(slice(self.text, start, end))
    }

    /// Number of named properties (`Name=`) of the innermost extension.
    #[must_use]
    pub fn attributes_count(&self) -> usize {
        self.stack.last().map_or(0, |ext| ext.attributes_count)
    }

    /// Nesting depth of open extensions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Byte offset, relative to the parsed text, where the token being typed begins.
    ///
    /// Between tokens this is the end of the text.
    #[must_use]
    pub fn current_value_start(&self) -> usize {
        match self.state {
            MarkupState::StartElement => self.stack.last().map_or(0, |ext| ext.name.0),
            MarkupState::StartAttribute => self
                .stack
                .last()
                .and_then(|ext| ext.attribute)
                .map_or(self.text.len(), |(start, _)| start),
            MarkupState::BeforeAttributeValue | MarkupState::AttributeValue => self.value_start,
            _ => self.text.len(),
        }
    }

    /// The value typed so far in [`MarkupState::BeforeAttributeValue`] or
    /// [`MarkupState::AttributeValue`].
    #[must_use]
    pub fn attribute_value(&self) -> Option<&'a str> {
        matches!(
            self.state,
            MarkupState::BeforeAttributeValue | MarkupState::AttributeValue
        )
        .then(|| slice(self.text, self.value_start, self.text.len()))
    }
}

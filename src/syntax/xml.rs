//! Error-tolerant tag and attribute parser.
//!
//! [`XmlParser`] classifies the position at the end of a text prefix: is the user typing an
//! element name, an attribute name, an attribute value, or something the completion engine has
//! nothing to offer for (text content, comments, closing tags)? The input is the document up to
//! the cursor and is expected to be truncated in the middle of a construct, so parsing never
//! fails. Every character moves a small state machine forward and the machine's final state is
//! the answer.
//!
//! # State Machine
//!
//! ```text
//!            '<'              ws              name char          '='            quote
//!   None ---------> StartElement ---> InsideElement ---> StartAttribute ---> BeforeAttributeValue ---> AttributeValue
//!    ^  ^                |   ^  '>'      |    ^                                                          |
//!    |  |     '>'        |   +-----------+    +--------------------- closing quote ----------------------+
//!    |  +----------------+
//!    |
//!    +--- "-->" InsideComment / "]]>" InsideCdata / '>' InsideDeclaration, ClosingTag
//! ```
//!
//! Alongside the state the parser keeps a stack with the start offset of every element that is
//! still open. Processing instructions, `<!...>` declarations, comments and CDATA sections never
//! enter the stack; a closing tag pops it; a self-closing tag leaves it unchanged. While a start
//! tag is being typed, that tag is the top of the stack, so `parent_tag_name(0)` is the tag
//! being edited and `parent_tag_name(1)` its container.
//!
//! # Examples
//!
//! ```rust
//! use xamlscope::syntax::{XmlParser, XmlState};
//!
//! let text = r#"<Grid><Button Content="Hel"#;
//! let parser = XmlParser::parse(text);
//!
//! assert_eq!(parser.state(), XmlState::AttributeValue);
//! assert_eq!(parser.tag_name(), Some("Button"));
//! assert_eq!(parser.attribute_name(), Some("Content"));
//! assert_eq!(parser.attribute_value(), Some("Hel"));
//! assert_eq!(parser.current_value_start(), Some(23));
//! assert_eq!(parser.parent_tag_name(1), Some("Grid"));
//! ```

use strum::{Display, EnumIter};

use crate::syntax::cursor::{slice, TextCursor};

/// Syntactic position at the end of the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum XmlState {
    /// Character data between tags
    None,
    /// Inside `<!-- ... -->`
    InsideComment,
    /// Inside `<![CDATA[ ... ]]>`
    InsideCdata,
    /// Inside `<?...?>` or `<!DOCTYPE ...>`
    InsideDeclaration,
    /// Inside `</...>`
    ClosingTag,
    /// Right after `<`, the element name is being typed
    StartElement,
    /// Inside a start tag, between attributes
    InsideElement,
    /// An attribute name is being typed
    StartAttribute,
    /// After `=`, before the opening quote
    BeforeAttributeValue,
    /// Inside a quoted attribute value
    AttributeValue,
}

impl XmlState {
    /// Returns `true` for the states that lie inside a start tag.
    #[must_use]
    pub fn is_in_start_tag(self) -> bool {
        matches!(
            self,
            XmlState::StartElement
                | XmlState::InsideElement
                | XmlState::StartAttribute
                | XmlState::BeforeAttributeValue
                | XmlState::AttributeValue
        )
    }
}

/// Result of parsing a document prefix.
///
/// All string accessors borrow from the parsed text; all offsets are byte offsets into it.
#[derive(Debug, Clone)]
pub struct XmlParser<'a> {
    text: &'a str,
    state: XmlState,
    /// Start offsets (the `<`) of every open element, outermost first
    elements: Vec<usize>,
    tag_name_start: usize,
    tag_name_end: Option<usize>,
    attribute_name_start: usize,
    attribute_name_end: Option<usize>,
    attribute_value_start: usize,
    quote: char,
    /// Start of the comment or CDATA payload, used to find the terminator
    section_start: usize,
    self_closing: bool,
    has_errors: bool,
}

impl<'a> XmlParser<'a> {
    /// Parse `text` and return the state at its end.
    #[must_use]
    pub fn parse(text: &'a str) -> XmlParser<'a> {
        let mut parser = XmlParser {
            text,
            state: XmlState::None,
            elements: Vec::new(),
            tag_name_start: 0,
            tag_name_end: None,
            attribute_name_start: 0,
            attribute_name_end: None,
            attribute_value_start: 0,
            quote: '"',
            section_start: 0,
            self_closing: false,
            has_errors: false,
        };

        let mut cursor = TextCursor::new(text);
        while let Some((pos, c)) = cursor.next_char() {
            parser.step(&mut cursor, pos, c);
        }

        log::trace!(
            "xml prefix parsed: state={} depth={} errors={}",
            parser.state,
            parser.elements.len(),
            parser.has_errors
        );
        parser
    }

    fn step(&mut self, cursor: &mut TextCursor<'a>, pos: usize, c: char) {
        match self.state {
            XmlState::None => {
                if c == '<' {
                    self.open_tag(cursor, pos);
                }
            }
            XmlState::InsideComment => {
                if cursor.slice_from(self.section_start).ends_with("-->") {
                    self.state = XmlState::None;
                }
            }
            XmlState::InsideCdata => {
                if cursor.slice_from(self.section_start).ends_with("]]>") {
                    self.state = XmlState::None;
                }
            }
            XmlState::InsideDeclaration => {
                if c == '>' {
                    self.state = XmlState::None;
                }
            }
            XmlState::ClosingTag => {
                if c == '>' {
                    if self.elements.pop().is_none() {
                        self.has_errors = true;
                    }
                    self.state = XmlState::None;
                }
            }
            XmlState::StartElement => {
                if c.is_whitespace() {
                    self.tag_name_end = Some(pos);
                    self.state = XmlState::InsideElement;
                } else if c == '/' {
                    self.tag_name_end = Some(pos);
                    self.state = XmlState::InsideElement;
                    self.self_closing = true;
                } else if c == '>' {
                    self.tag_name_end = Some(pos);
                    self.close_start_tag();
                }
            }
            XmlState::InsideElement => self.inside_element(pos, c),
            XmlState::StartAttribute => {
                if c == '=' {
                    self.attribute_name_end = Some(pos);
                    self.state = XmlState::BeforeAttributeValue;
                } else if c.is_whitespace() {
                    self.attribute_name_end = Some(pos);
                    self.state = XmlState::InsideElement;
                } else if c == '/' || c == '>' {
                    self.attribute_name_end = Some(pos);
                    self.state = XmlState::InsideElement;
                    self.inside_element(pos, c);
                }
            }
            XmlState::BeforeAttributeValue => {
                if c == '"' || c == '\'' {
                    self.quote = c;
                    self.attribute_value_start = pos + 1;
                    self.state = XmlState::AttributeValue;
                } else if !c.is_whitespace() {
                    self.has_errors = true;
                    self.clear_attribute();
                    self.state = XmlState::InsideElement;
                    self.inside_element(pos, c);
                }
            }
            XmlState::AttributeValue => {
                if c == self.quote {
                    self.clear_attribute();
                    self.state = XmlState::InsideElement;
                }
            }
        }
    }

    fn open_tag(&mut self, cursor: &mut TextCursor<'a>, pos: usize) {
        let rest = cursor.remaining();
        if rest.starts_with("!--") {
            cursor.seek(pos + 4);
            self.section_start = cursor.pos();
            self.state = XmlState::InsideComment;
        } else if rest.starts_with("![CDATA[") {
            cursor.seek(pos + 9);
            self.section_start = cursor.pos();
            self.state = XmlState::InsideCdata;
        } else if rest.starts_with('!') || rest.starts_with('?') {
            self.state = XmlState::InsideDeclaration;
        } else if rest.starts_with('/') {
            self.state = XmlState::ClosingTag;
        } else {
            self.elements.push(pos);
            self.tag_name_start = pos + 1;
            self.tag_name_end = None;
            self.self_closing = false;
            self.clear_attribute();
            self.state = XmlState::StartElement;
        }
    }

    fn inside_element(&mut self, pos: usize, c: char) {
        if c == '>' {
            self.close_start_tag();
        } else if c == '/' {
            self.self_closing = true;
        } else if c == '=' && self.attribute_name_end.is_some() {
            self.self_closing = false;
            self.state = XmlState::BeforeAttributeValue;
        } else if !c.is_whitespace() {
            self.self_closing = false;
            self.attribute_name_start = pos;
            self.attribute_name_end = None;
            self.state = XmlState::StartAttribute;
        }
    }

    fn close_start_tag(&mut self) {
        if self.self_closing {
            self.elements.pop();
        }
        self.self_closing = false;
        self.clear_attribute();
        self.state = XmlState::None;
    }

    fn clear_attribute(&mut self) {
        self.attribute_name_end = None;
        self.attribute_name_start = 0;
    }

    /// Final state.
    #[must_use]
    pub fn state(&self) -> XmlState {
        self.state
    }

    /// The parsed text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Set when the prefix contained constructs the parser had to skip, such as a closing tag
    /// without a matching start tag or an unquoted attribute value.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Number of open elements, including the start tag being typed.
    #[must_use]
    pub fn nesting_level(&self) -> usize {
        self.elements.len()
    }

    /// Name of the start tag the text ends in.
    ///
    /// While the name itself is being typed ([`XmlState::StartElement`]) this is the partial
    /// name, possibly empty.
    #[must_use]
    pub fn tag_name(&self) -> Option<&'a str> {
        if !self.state.is_in_start_tag() {
            return None;
        }
        let end = self.tag_name_end.unwrap_or(self.text.len());
        Some(slice(self.text, self.tag_name_start, end))
    }

    /// Name of the attribute being typed or valued.
    #[must_use]
    pub fn attribute_name(&self) -> Option<&'a str> {
        match self.state {
            XmlState::StartAttribute => Some(slice(
                self.text,
                self.attribute_name_start,
                self.text.len(),
            )),
            XmlState::BeforeAttributeValue | XmlState::AttributeValue => self
                .attribute_name_end
                .map(|end| slice(self.text, self.attribute_name_start, end)),
            _ => None,
        }
    }

    /// The attribute value typed so far, without the opening quote.
    #[must_use]
    pub fn attribute_value(&self) -> Option<&'a str> {
        (self.state == XmlState::AttributeValue)
            .then(|| slice(self.text, self.attribute_value_start, self.text.len()))
    }

    /// Offset at which the token being typed begins.
    ///
    /// - [`XmlState::StartElement`]: first character of the tag name
    /// - [`XmlState::StartAttribute`]: first character of the attribute name
    /// - [`XmlState::AttributeValue`]: first character after the opening quote
    #[must_use]
    pub fn current_value_start(&self) -> Option<usize> {
        match self.state {
            XmlState::StartElement => Some(self.tag_name_start),
            XmlState::StartAttribute => Some(self.attribute_name_start),
            XmlState::AttributeValue => Some(self.attribute_value_start),
            _ => None,
        }
    }

    /// Name of an enclosing tag.
    ///
    /// Level `0` is the innermost open element, which is the start tag being typed when the
    /// text ends inside one. Level `n` is its `n`-th container.
    #[must_use]
    pub fn parent_tag_name(&self, level: usize) -> Option<&'a str> {
        let index = self.elements.len().checked_sub(level + 1)?;
        let start = self.elements[index];
        Some(element_name(self.text, start))
    }

    /// Find the value of the first attribute named one of `names` on an enclosing tag.
    ///
    /// The search starts at `start_level` (see [`XmlParser::parent_tag_name`]) and walks at most
    /// `max_levels` further containers outwards; `max_levels == 0` inspects a single tag. Only
    /// attributes with a closing quote are considered.
    #[must_use]
    pub fn find_parent_attribute_value(
        &self,
        names: &[&str],
        start_level: usize,
        max_levels: usize,
    ) -> Option<&'a str> {
        let last = start_level.saturating_add(max_levels);
        (start_level..=last)
            .map_while(|level| {
                let index = self.elements.len().checked_sub(level + 1)?;
                Some(self.elements[index])
            })
            .find_map(|start| {
                AttributeScanner::new(self.text, start)
                    .find(|(name, _)| names.contains(name))
                    .map(|(_, value)| value)
            })
    }
}

/// Name of the element whose `<` sits at `start`.
fn element_name(text: &str, start: usize) -> &str {
    let from = (start + 1).min(text.len());
    let rest = &text[from..];
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    &rest[..end]
}

/// Iterates the complete `name="value"` pairs of the start tag whose `<` sits at `start`.
///
/// Stops at the end of the tag or at the end of the text, whichever comes first.
struct AttributeScanner<'a> {
    cursor: TextCursor<'a>,
}

impl<'a> AttributeScanner<'a> {
    fn new(text: &'a str, start: usize) -> Self {
        let mut cursor = TextCursor::new(text);
        cursor.seek(start + 1 + element_name(text, start).len());
        AttributeScanner { cursor }
    }
}

impl<'a> Iterator for AttributeScanner<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while self
                .cursor
                .peek()
                .is_some_and(|c| c.is_whitespace() || c == '/')
            {
                self.cursor.next_char();
            }
            match self.cursor.peek() {
                None | Some('>') => return None,
                _ => {}
            }

            let name_start = self.cursor.pos();
            while self
                .cursor
                .peek()
                .is_some_and(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
            {
                self.cursor.next_char();
            }
            let name = self.cursor.slice_from(name_start);

            while self.cursor.peek().is_some_and(char::is_whitespace) {
                self.cursor.next_char();
            }
            if self.cursor.peek() != Some('=') {
                continue;
            }
            self.cursor.next_char();
            while self.cursor.peek().is_some_and(char::is_whitespace) {
                self.cursor.next_char();
            }

            let quote = match self.cursor.peek() {
                Some(q @ ('"' | '\'')) => q,
                _ => continue,
            };
            self.cursor.next_char();
            let value_start = self.cursor.pos();
            let value_len = self.cursor.remaining().find(quote)?;
            self.cursor.seek(value_start + value_len);
            let value = self.cursor.slice_from(value_start);
            self.cursor.next_char();
            return Some((name, value));
        }
    }
}

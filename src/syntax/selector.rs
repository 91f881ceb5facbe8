//! Style selector grammar parser.
//!
//! Style selectors are a CSS-like language embedded in `Selector="..."` attribute values:
//!
//! ```text
//! Button.primary:pointerover /template/ ContentPresenter#PART_ContentPresenter
//! local|MyControl[IsEnabled=True] > :is(TextBlock, Label)
//! ^:not(.disabled)[(Grid.Row)=1]
//! ```
//!
//! [`SelectorParser`] walks a selector prefix and reports which construct the last character
//! belongs to ([`SelectorStatement`]) together with the fragments typed so far: type name and
//! namespace prefix, property name and value, the enclosing pseudo-class function, the element
//! name after `#` and, after `/template/`, the owning type whose template parts are in scope.
//!
//! Like the tag parser, this parser never fails. Input it cannot make sense of moves it to
//! [`SelectorStatement::End`] and sets [`SelectorParser::is_error`].
//!
//! # Offsets
//!
//! [`SelectorParser::last_parsed_position`] is the byte offset, relative to the parsed text,
//! where the token being typed begins. Replacing `last_parsed_position..text.len()` with a
//! candidate completes that token:
//!
//! | Text | Statement | Token start |
//! |------|-----------|-------------|
//! | `Butt` | `TypeName` | `0` |
//! | `local\|Bu` | `TypeName` | `0` (the namespace prefix is part of the token) |
//! | `Button:poi` | `Colon` | `6` (the colon is part of the token) |
//! | `Button#na` | `Name` | `7` |
//! | `Button[IsEn` | `Property` | `7` |
//! | `Button[(Grid.Ro` | `AttachedProperty` | `13` |
//! | `Button[IsEnabled=Tr` | `Value` | `17` |
//! | `Button /temp` | `Template` | `7` |
//! | `Button > ` | `Traversal` | `9` |
//!
//! # Examples
//!
//! ```rust
//! use xamlscope::syntax::{SelectorParser, SelectorStatement};
//!
//! let parser = SelectorParser::parse("Button:");
//! assert_eq!(parser.statement(), SelectorStatement::Colon);
//! assert_eq!(parser.previous_statement(), SelectorStatement::TypeName);
//! assert_eq!(parser.type_name(), Some("Button"));
//! assert_eq!(parser.last_parsed_position(), 6);
//! ```

use strum::{Display, EnumIter};

use crate::syntax::cursor::{slice, TextCursor};

const TEMPLATE: &str = "/template/";

/// Construct the end of a selector prefix belongs to.
///
/// The declaration order is significant: statements up to and including
/// [`SelectorStatement::Middle`] describe positions where nothing selector-specific has been
/// typed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum SelectorStatement {
    /// Nothing typed, or right after `,`
    Start,
    /// After a closed `]` or `)`
    Middle,
    /// A pseudo-class after `:`, possibly a function name before its `(`
    Colon,
    /// A style class after `.`
    Class,
    /// An element name after `#`
    Name,
    /// After `/template/`, a type may follow
    CanHaveType,
    /// After a combinator (whitespace, `>` or `^`)
    Traversal,
    /// A type name, optionally with a `namespace|` prefix
    TypeName,
    /// A property name after `[`
    Property,
    /// An attached property after `[(`, `Owner.Name`
    AttachedProperty,
    /// A property value after `=`
    Value,
    /// A partial `/template/`
    Template,
    /// Arguments of `:nth-child(` or `:nth-last-child(`
    Function,
    /// Right after `:is(` or `:not(`, a nested selector may follow
    FunctionArgs,
    /// Unparseable input
    End,
}

/// Selector state saved when entering `:is(` or `:not(`.
#[derive(Debug, Clone)]
struct Frame<'a> {
    function: &'a str,
    type_name: Option<&'a str>,
    namespace: Option<&'a str>,
}

/// Result of parsing a selector prefix.
#[derive(Debug, Clone)]
pub struct SelectorParser<'a> {
    text: &'a str,
    statement: SelectorStatement,
    previous_statement: SelectorStatement,
    frames: Vec<Frame<'a>>,
    token_start: usize,
    type_start: usize,
    type_name: Option<&'a str>,
    namespace: Option<&'a str>,
    /// Most recent type, kept across combinators to name the template owner
    last_type: Option<(Option<&'a str>, &'a str)>,
    pseudo_start: usize,
    nth_function: Option<&'a str>,
    class_name: Option<&'a str>,
    element_name: Option<&'a str>,
    property_name: Option<&'a str>,
    property_owner: Option<&'a str>,
    property_owner_namespace: Option<&'a str>,
    attached_closed: bool,
    value: Option<&'a str>,
    is_template: bool,
    template_owner: Option<(Option<&'a str>, &'a str)>,
    is_error: bool,
}

impl<'a> SelectorParser<'a> {
    /// Parse a selector prefix.
    #[must_use]
    pub fn parse(text: &'a str) -> SelectorParser<'a> {
        let mut parser = SelectorParser {
            text,
            statement: SelectorStatement::Start,
            previous_statement: SelectorStatement::Start,
            frames: Vec::new(),
            token_start: 0,
            type_start: 0,
            type_name: None,
            namespace: None,
            last_type: None,
            pseudo_start: 0,
            nth_function: None,
            class_name: None,
            element_name: None,
            property_name: None,
            property_owner: None,
            property_owner_namespace: None,
            attached_closed: false,
            value: None,
            is_template: false,
            template_owner: None,
            is_error: false,
        };

        let mut cursor = TextCursor::new(text);
        while let Some((pos, c)) = cursor.next_char() {
            parser.step(pos, c, cursor.pos());
        }

        log::trace!(
            "selector prefix parsed: statement={} previous={} error={}",
            parser.statement,
            parser.previous_statement,
            parser.is_error
        );
        parser
    }

    fn set(&mut self, statement: SelectorStatement) {
        if statement != self.statement {
            self.previous_statement = self.statement;
            self.statement = statement;
        }
    }

    fn fail(&mut self, end: usize) {
        self.is_error = true;
        self.token_start = end;
        self.set(SelectorStatement::End);
    }

    fn step(&mut self, pos: usize, c: char, end: usize) {
        match self.statement {
            SelectorStatement::End => {}
            SelectorStatement::Function => {
                if c == ')' {
                    self.nth_function = None;
                    self.token_start = end;
                    self.set(SelectorStatement::Middle);
                }
            }
            SelectorStatement::Template => {
                let typed = slice(self.text, self.token_start, end);
                if typed == TEMPLATE {
                    self.is_template = true;
                    self.template_owner = self.last_type;
                    self.reset_type();
                    self.token_start = end;
                    self.set(SelectorStatement::CanHaveType);
                } else if !TEMPLATE.starts_with(typed) {
                    self.fail(end);
                }
            }
            SelectorStatement::Property => self.property(c, end),
            SelectorStatement::AttachedProperty => self.attached_property(pos, c, end),
            SelectorStatement::Value => {
                if c == ']' {
                    self.token_start = end;
                    self.set(SelectorStatement::Middle);
                } else {
                    self.value = Some(slice(self.text, self.token_start, end));
                }
            }
            _ => self.selector(pos, c, end),
        }
    }

    fn selector(&mut self, pos: usize, c: char, end: usize) {
        use SelectorStatement as S;

        if is_identifier(c) {
            match self.statement {
                S::Start | S::Traversal | S::CanHaveType | S::FunctionArgs => {
                    self.type_start = pos;
                    self.token_start = pos;
                    self.namespace = None;
                    self.extend_type(end);
                    self.set(S::TypeName);
                }
                S::TypeName => self.extend_type(end),
                S::Class => self.class_name = Some(slice(self.text, self.token_start, end)),
                S::Name => self.element_name = Some(slice(self.text, self.token_start, end)),
                S::Colon => {}
                _ => self.fail(end),
            }
            return;
        }

        match c {
            '|' if self.statement == S::TypeName && self.namespace.is_none() => {
                self.namespace = self.type_name;
                self.type_name = Some("");
                self.type_start = end;
            }
            '.' => {
                self.class_name = Some("");
                self.token_start = end;
                self.set(S::Class);
            }
            '#' => {
                self.element_name = Some("");
                self.token_start = end;
                self.set(S::Name);
            }
            ':' => {
                self.token_start = pos;
                self.pseudo_start = end;
                self.set(S::Colon);
            }
            '(' if self.statement == S::Colon => {
                let function = slice(self.text, self.pseudo_start, pos);
                match function {
                    "is" | "not" => {
                        self.frames.push(Frame {
                            function,
                            type_name: self.type_name,
                            namespace: self.namespace,
                        });
                        self.reset_type();
                        self.token_start = end;
                        self.set(S::FunctionArgs);
                    }
                    "nth-child" | "nth-last-child" => {
                        self.nth_function = Some(function);
                        self.token_start = end;
                        self.set(S::Function);
                    }
                    _ => self.fail(end),
                }
            }
            ')' => match self.frames.pop() {
                Some(frame) => {
                    self.type_name = frame.type_name;
                    self.namespace = frame.namespace;
                    self.token_start = end;
                    self.set(S::Middle);
                }
                None => self.fail(end),
            },
            '[' => {
                self.property_name = Some("");
                self.property_owner = None;
                self.property_owner_namespace = None;
                self.attached_closed = false;
                self.value = None;
                self.token_start = end;
                self.set(S::Property);
            }
            '/' => {
                self.token_start = pos;
                self.set(S::Template);
            }
            ',' => {
                self.reset_type();
                self.last_type = None;
                self.is_template = false;
                self.template_owner = None;
                self.token_start = end;
                self.set(if self.frames.is_empty() {
                    S::Start
                } else {
                    S::FunctionArgs
                });
            }
            '>' | '^' => {
                self.reset_type();
                self.token_start = end;
                self.set(S::Traversal);
            }
            c if c.is_whitespace() => {
                self.token_start = end;
                if !matches!(self.statement, S::Start | S::Traversal | S::CanHaveType | S::FunctionArgs) {
                    self.reset_type();
                    self.set(S::Traversal);
                }
            }
            _ => self.fail(end),
        }
    }

    fn property(&mut self, c: char, end: usize) {
        let property_empty = self.property_name.map_or(true, str::is_empty);
        if is_identifier(c) {
            self.property_name = Some(slice(self.text, self.token_start, end));
        } else if c == '(' && property_empty {
            self.token_start = end;
            self.set(SelectorStatement::AttachedProperty);
        } else if c == '=' && !property_empty {
            self.value = Some("");
            self.token_start = end;
            self.set(SelectorStatement::Value);
        } else if c == ']' {
            self.token_start = end;
            self.set(SelectorStatement::Middle);
        } else if !c.is_whitespace() {
            self.fail(end);
        }
    }

    fn attached_property(&mut self, pos: usize, c: char, end: usize) {
        if self.attached_closed {
            match c {
                '=' => {
                    self.value = Some("");
                    self.token_start = end;
                    self.set(SelectorStatement::Value);
                }
                ']' => {
                    self.token_start = end;
                    self.set(SelectorStatement::Middle);
                }
                c if c.is_whitespace() => {}
                _ => self.fail(end),
            }
            return;
        }

        match c {
            c if is_identifier(c) => {
                self.property_name = Some(slice(self.text, self.token_start, end));
            }
            '|' if self.property_owner.is_none() && self.property_owner_namespace.is_none() => {
                self.property_owner_namespace = self.property_name;
                self.property_name = Some("");
                self.token_start = end;
            }
            '.' if self.property_owner.is_none() => {
                self.property_owner = Some(slice(self.text, self.token_start, pos));
                self.property_name = Some("");
                self.token_start = end;
            }
            ')' if self.property_owner.is_some() => {
                self.attached_closed = true;
            }
            _ => self.fail(end),
        }
    }

    fn extend_type(&mut self, end: usize) {
        let name = slice(self.text, self.type_start, end);
        self.type_name = Some(name);
        self.last_type = Some((self.namespace, name));
    }

    fn reset_type(&mut self) {
        self.type_name = None;
        self.namespace = None;
    }

    /// Statement the end of the text belongs to.
    #[must_use]
    pub fn statement(&self) -> SelectorStatement {
        self.statement
    }

    /// Statement before the final one.
    #[must_use]
    pub fn previous_statement(&self) -> SelectorStatement {
        self.previous_statement
    }

    /// Type name of the current selector segment, without its namespace prefix.
    ///
    /// `Some("")` right after a `namespace|` prefix, `None` when no type was given.
    #[must_use]
    pub fn type_name(&self) -> Option<&'a str> {
        self.type_name
    }

    /// Namespace prefix typed before `|`.
    #[must_use]
    pub fn namespace(&self) -> Option<&'a str> {
        self.namespace
    }

    /// Type of the current segment in `alias:Name` form, as used by type lookups.
    #[must_use]
    pub fn full_type_name(&self) -> Option<String> {
        Some(qualify(self.namespace, self.type_name?))
    }

    /// Innermost pseudo-class function whose argument list is open.
    #[must_use]
    pub fn function_name(&self) -> Option<&'a str> {
        self.nth_function
            .or_else(|| self.frames.last().map(|frame| frame.function))
    }

    /// Style class after the last `.`.
    #[must_use]
    pub fn class_name(&self) -> Option<&'a str> {
        self.class_name
    }

    /// Element name after the last `#`.
    #[must_use]
    pub fn element_name(&self) -> Option<&'a str> {
        self.element_name
    }

    /// Property name inside `[...]`; for attached properties the part after the owner's `.`.
    #[must_use]
    pub fn property_name(&self) -> Option<&'a str> {
        self.property_name
    }

    /// Owner type of an attached property in `alias:Name` form.
    #[must_use]
    pub fn property_owner(&self) -> Option<String> {
        self.property_owner
            .map(|owner| qualify(self.property_owner_namespace, owner))
    }

    /// Namespace prefix typed before `|` inside `[(`.
    #[must_use]
    pub fn property_owner_namespace(&self) -> Option<&'a str> {
        self.property_owner_namespace
    }

    /// Value typed after `=` inside `[...]`.
    #[must_use]
    pub fn value(&self) -> Option<&'a str> {
        self.value
    }

    /// Returns `true` once `/template/` has been passed in the current selector.
    #[must_use]
    pub fn is_template(&self) -> bool {
        self.is_template
    }

    /// Type that preceded `/template/`, in `alias:Name` form.
    #[must_use]
    pub fn template_owner(&self) -> Option<String> {
        self.template_owner
            .map(|(namespace, name)| qualify(namespace, name))
    }

    /// Byte offset, relative to the parsed text, where the token being typed begins.
    #[must_use]
    pub fn last_parsed_position(&self) -> usize {
        match self.statement {
            SelectorStatement::TypeName => self.token_start.min(self.type_start),
            _ => self.token_start,
        }
    }

    /// Set when the text contains input the grammar does not allow.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

fn is_identifier(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn qualify(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(namespace) => format!("{namespace}:{name}"),
        None => name.to_string(),
    }
}

//! Completion request dispatch.
//!
//! [`CompletionEngine::get_completions`] parses the document up to the cursor and branches on
//! where the cursor sits:
//!
//! - **element name** (`<Bu`): element types, or members for a `Type.Member` property element
//! - **attribute name** (`<Button Wi`): properties, events, directives, attached members
//! - **attribute value** (`<Button Background="Re`): see [`crate::completion`] for the value
//!   branches
//!
//! Everything else (text content, comments, closing tags) has no candidates.

use std::sync::Arc;

use crate::{
    completion::{
        helper::{
            get_insert_text, starts_with_ignore_case, typed_prefix_len, MetadataHelper,
            ResolutionContext, TypeFilter,
        },
        item::{Completion, CompletionKind, CompletionSet},
        ranking::sort_completions,
    },
    metadata::{Metadata, MetadataType},
    syntax::{floor_char_boundary, Patterns, XmlParser, XmlState},
    Result,
};

const ATTRIBUTE_SUFFIX: &str = "=\"$0\"";

/// Produces completion candidates for markup documents.
///
/// One engine serves one document at a time: it caches the namespace-resolution context of the
/// last request. The compiled [`Patterns`] can be shared between engines.
///
/// # Examples
///
/// ```rust,no_run
/// use std::{path::Path, sync::Arc};
/// use xamlscope::{
///     completion::CompletionEngine,
///     metadata::{provider::InMemoryProvider, MetadataReader},
/// };
///
/// let reader = MetadataReader::new(Box::new(InMemoryProvider::default()));
/// let metadata = Arc::new(reader.for_target_assembly(Path::new("bin/App.dll"))?);
/// let engine = CompletionEngine::new()?;
///
/// let text = r#"<Window xmlns="https://github.com/avaloniaui"><Bu"#;
/// if let Some(set) = engine.get_completions(&metadata, text, text.len()) {
///     for completion in &set.completions {
///         println!("{completion} -> {}", completion.insert_text);
///     }
/// }
/// # Ok::<(), xamlscope::Error>(())
/// ```
#[derive(Debug)]
pub struct CompletionEngine {
    helper: MetadataHelper,
    patterns: Arc<Patterns>,
}

/// Everything a single request works with.
pub(crate) struct Request<'r> {
    pub(crate) context: &'r ResolutionContext,
    pub(crate) state: &'r XmlParser<'r>,
    pub(crate) patterns: &'r Patterns,
    /// The whole document
    pub(crate) full_text: &'r str,
    /// The document up to the cursor
    pub(crate) text: &'r str,
    pub(crate) pos: usize,
}

/// Element form of a type name.
struct ElementInfo {
    display_text: String,
    insert_text: String,
    cursor_offset: Option<usize>,
    trigger: bool,
}

impl CompletionEngine {
    /// Create an engine with freshly compiled patterns.
    ///
    /// # Errors
    /// Returns [`crate::Error::Pattern`] if the built-in patterns fail to compile.
    pub fn new() -> Result<Self> {
        Ok(Self::with_patterns(Arc::new(Patterns::new()?)))
    }

    /// Create an engine that shares already compiled patterns.
    #[must_use]
    pub fn with_patterns(patterns: Arc<Patterns>) -> Self {
        CompletionEngine {
            helper: MetadataHelper::new(),
            patterns,
        }
    }

    /// The namespace-resolution cache.
    #[must_use]
    pub fn helper(&self) -> &MetadataHelper {
        &self.helper
    }

    /// Candidates for the cursor at byte offset `pos` of `full_text`, for the assembly the
    /// model was built for.
    ///
    /// Returns `None` when nothing can be offered at this position.
    #[must_use]
    pub fn get_completions(
        &self,
        metadata: &Arc<Metadata>,
        full_text: &str,
        pos: usize,
    ) -> Option<CompletionSet> {
        self.get_completions_for(metadata, full_text, pos, metadata.target_assembly_name())
    }

    /// Candidates for the cursor at byte offset `pos` of `full_text`, resolving project-relative
    /// namespaces against `assembly_name`.
    #[must_use]
    pub fn get_completions_for(
        &self,
        metadata: &Arc<Metadata>,
        full_text: &str,
        pos: usize,
        assembly_name: Option<&str>,
    ) -> Option<CompletionSet> {
        let pos = floor_char_boundary(full_text, pos);
        if pos == 0 {
            return None;
        }

        let text = &full_text[..pos];
        let context = self.helper.set_context(metadata, text, assembly_name);
        let state = XmlParser::parse(text);
        log::trace!(
            "Completion at {pos}: {} tag={:?} attribute={:?}",
            state.state(),
            state.tag_name(),
            state.attribute_name()
        );

        let request = Request {
            context: &context,
            state: &state,
            patterns: &self.patterns,
            full_text,
            text,
            pos,
        };

        let mut completions = Vec::new();
        let start_position = match state.state() {
            XmlState::StartElement => request.element_completions(&mut completions),
            XmlState::InsideElement | XmlState::StartAttribute => {
                request.attribute_completions(&mut completions)
            }
            XmlState::AttributeValue => request.value_completions(&mut completions),
            _ => return None,
        };

        if completions.is_empty() {
            return None;
        }
        Some(CompletionSet {
            completions: sort_completions(completions),
            start_position,
        })
    }

    /// Whether typing `c` should open the completion list.
    #[must_use]
    pub fn should_trigger_on(c: char) -> bool {
        c.is_alphanumeric()
            || matches!(
                c,
                '/' | '<' | ' ' | '.' | ':' | '$' | '#' | '-' | '^' | '{' | '=' | '[' | '|' | '('
            )
    }
}

impl Request<'_> {
    /// Element names, or members of a `Type.Member` property element.
    fn element_completions(&self, out: &mut Vec<Completion>) -> usize {
        let mut start = self.state.current_value_start().unwrap_or(0);
        let Some(tag) = self.state.tag_name() else {
            return start;
        };

        if let Some((owner, member)) = tag.split_once('.') {
            start += owner.len() + 1;
            let same_type = self.state.parent_tag_name(1) == Some(owner);
            let (attached, kind) = if same_type {
                (None, CompletionKind::PROPERTY)
            } else {
                (Some(true), CompletionKind::ATTACHED_PROPERTY)
            };
            out.extend(
                self.context
                    .filter_property_names(owner, member, attached, false, false)
                    .map(|name| Completion::new(name, kind)),
            );
            return start;
        }

        if tag.is_empty() {
            out.push(Completion::with_display(
                "<!-- -->",
                "!--$0-->",
                CompletionKind::SNIPPET,
            ));
        }

        for (key, metadata_type) in self
            .context
            .filter_types(tag, TypeFilter::empty())
            .filter(|(_, t)| !t.is_abstract())
        {
            let info = element_info(key, metadata_type);
            let insert_text = get_insert_text(&info.insert_text, tag);
            let trimmed = info.insert_text.len() - insert_text.len();

            let mut completion = Completion::described(
                info.display_text,
                insert_text,
                metadata_type.full_name.clone(),
                CompletionKind::CLASS,
            );
            if let Some(offset) = info.cursor_offset {
                completion = completion.with_cursor_offset(offset.saturating_sub(trimmed));
            }
            if info.trigger {
                completion = completion.triggering();
            }
            out.push(completion);
        }

        start + typed_prefix_len(tag)
    }

    /// Attribute names of the start tag being edited.
    fn attribute_completions(&self, out: &mut Vec<Completion>) -> usize {
        let ctx = self.context;
        let mut start = match self.state.state() {
            XmlState::InsideElement => self.pos,
            _ => self.state.current_value_start().unwrap_or(self.pos),
        };

        // The attribute already has a value when only its name is being edited
        let (suffix, suffix_offset) = if self.full_text[self.pos..].starts_with('=') {
            ("", 0)
        } else {
            (ATTRIBUTE_SUFFIX, 2)
        };
        let attribute = self.state.attribute_name().unwrap_or("");

        if let Some((owner, member)) = attribute.split_once('.') {
            start += owner.len() + 1;
            out.extend(
                ctx.filter_property_names(owner, member, Some(true), true, false)
                    .map(|name| {
                        Completion::with_display(
                            name,
                            format!("{name}{suffix}"),
                            CompletionKind::ATTACHED_PROPERTY,
                        )
                        .with_cursor_offset(name.len() + suffix_offset)
                    }),
            );
            out.extend(
                ctx.filter_event_names(owner, member, true).map(|name| {
                    Completion::with_display(
                        name,
                        format!("{name}{suffix}"),
                        CompletionKind::ATTACHED_EVENT,
                    )
                    .with_cursor_offset(name.len() + suffix_offset)
                }),
            );
            return start;
        }

        let Some(tag) = self.state.tag_name() else {
            return start;
        };

        out.extend(
            ctx.filter_property_names(tag, attribute, Some(false), true, false)
                .map(|name| {
                    Completion::with_display(name, format!("{name}{suffix}"), CompletionKind::PROPERTY)
                        .with_cursor_offset(name.len() + suffix_offset)
                }),
        );

        // `On.Options` is a read-only list property
        if tag == "On" {
            out.push(
                Completion::described(
                    "Options",
                    "Options=\"\"",
                    "Options",
                    CompletionKind::PROPERTY,
                )
                .with_cursor_offset(9),
            );
        }

        out.extend(ctx.filter_event_names(tag, attribute, false).map(|name| {
            Completion::with_display(name, format!("{name}{suffix}"), CompletionKind::EVENT)
                .with_cursor_offset(name.len() + suffix_offset)
        }));

        let Some(target) = ctx.lookup_type(tag) else {
            return start;
        };

        let mut shaped = false;
        for (key, _) in ctx
            .filter_types(attribute, TypeFilter::DIRECTIVES)
            .filter(|(_, directive)| directive.applies_to(target))
        {
            let insert_text = get_insert_text(key, attribute);
            shaped |= insert_text.len() != key.len();
            out.push(Completion::with_display(
                insert_text.clone(),
                format!("{insert_text}{suffix}"),
                CompletionKind::NAMESPACE,
            ));
        }

        if target.is_bindable_object() {
            if attribute.is_empty() || starts_with_ignore_case("xmlns", attribute) {
                out.push(Completion::new("xmlns", CompletionKind::CLASS));
            }
            for name in ctx.filter_type_names(attribute, TypeFilter::ATTACHED_OR_EVENTS) {
                let insert_text = get_insert_text(name, attribute);
                shaped |= insert_text.len() != name.len();
                out.push(Completion::new(insert_text, CompletionKind::CLASS));
            }
        }

        if shaped {
            start += typed_prefix_len(attribute);
        }
        start
    }
}

/// Element form of the type registered as `key`.
///
/// Markup extensions lose their `Extension` suffix. Generic definitions (``List`1``) are shown
/// as `List<T>` and insert an `x:TypeArguments` attribute with the cursor inside its value.
fn element_info(key: &str, metadata_type: &MetadataType) -> ElementInfo {
    let mut name = key;
    if metadata_type.is_markup_extension() {
        if let Some(stripped) = strip_extension_suffix(name) {
            name = stripped;
        }
    }

    let plain = ElementInfo {
        display_text: name.to_string(),
        insert_text: name.to_string(),
        cursor_offset: None,
        trigger: false,
    };
    if !metadata_type.is_generic() {
        return plain;
    }

    let Some((base, arity)) = name.split_once('`') else {
        return plain;
    };
    let Ok(arity) = arity.trim().parse::<usize>() else {
        return plain;
    };

    if arity <= 1 {
        let insert_text = format!("{base} x:TypeArguments=\"\"");
        ElementInfo {
            display_text: format!("{base}<T>"),
            cursor_offset: Some(insert_text.len() - 1),
            insert_text,
            trigger: true,
        }
    } else {
        let parameters: Vec<String> = (1..=arity).map(|i| format!("T{i}")).collect();
        let opening = format!("{base} x:TypeArguments=\"");
        ElementInfo {
            display_text: format!("{base}<{}>", parameters.join(",")),
            cursor_offset: Some(opening.len()),
            insert_text: format!("{opening}{}\"", ",".repeat(arity - 1)),
            trigger: true,
        }
    }
}

/// `name` without a trailing `Extension`, compared case-insensitively.
pub(crate) fn strip_extension_suffix(name: &str) -> Option<&str> {
    const SUFFIX: &str = "extension";
    let split = name.len().checked_sub(SUFFIX.len())?;
    name.get(split..)
        .filter(|tail| tail.eq_ignore_ascii_case(SUFFIX))
        .and_then(|_| name.get(..split))
}

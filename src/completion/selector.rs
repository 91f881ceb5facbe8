//! Completion inside `Selector="..."` values.

use std::collections::HashSet;

use crate::{
    completion::{
        engine::Request,
        helper::{filter_properties, starts_with_ignore_case, TypeFilter},
        item::{Completion, CompletionKind},
        values::hint_kind,
    },
    metadata::MetadataType,
    syntax::{SelectorParser, SelectorStatement},
};

const COMBINATORS: &[&str] = &["^", ":", ">", ".", "#"];

/// Pseudo-class functions as `(display, insert)`.
const FUNCTIONS: &[(&str, &str)] = &[
    (":is()", ":is("),
    (":not()", ":not("),
    (":nth-child()", ":nth-child("),
    (":nth-last-child()", ":nth-last-child("),
];

const TEMPLATE: &str = "/template/";

fn selector_kind() -> CompletionKind {
    CompletionKind::SELECTOR | CompletionKind::ENUM
}

fn target_kind() -> CompletionKind {
    CompletionKind::CLASS | CompletionKind::TARGET_TYPE_CLASS
}

/// Whether a type can be the subject of a selector.
fn is_selectable(t: &MetadataType) -> bool {
    !t.is_generic() && !t.is_markup_extension() && (t.is_bindable_object() || t.has_attached_properties())
}

/// Keeps the first spelling of each value, comparing case-insensitively.
fn dedup_ignore_case<'v>(values: impl Iterator<Item = &'v String>) -> Vec<&'v str> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(v.to_lowercase()))
        .map(String::as_str)
        .collect()
}

impl Request<'_> {
    /// Candidates for the selector prefix `text`.
    ///
    /// Returns the offset into `text` where the replaced token begins, or `None` when the
    /// position offers nothing.
    pub(crate) fn selector_completions(&self, text: &str, out: &mut Vec<Completion>) -> Option<usize> {
        let parser = SelectorParser::parse(text);
        let before = out.len();
        let start = parser.last_parsed_position();

        match parser.statement() {
            SelectorStatement::Colon | SelectorStatement::FunctionArgs => {
                self.pseudo_class_completions(&parser, out);
            }
            SelectorStatement::Name => self.name_completions(&parser, out),
            SelectorStatement::CanHaveType | SelectorStatement::TypeName => {
                self.selector_type_completions(&parser, out);
            }
            SelectorStatement::Property => {
                let ctx = self.context;
                let owner = self.selector_type(&parser);
                let typed = parser.property_name().unwrap_or("");
                out.extend(
                    filter_properties(ctx.lookup_type(&owner), typed, None, false, false).map(|p| {
                        let kind = if p.is_attached {
                            CompletionKind::ATTACHED_PROPERTY
                        } else {
                            CompletionKind::PROPERTY
                        };
                        Completion::with_display(p.name.clone(), format!("{}=", p.name), kind)
                    }),
                );
            }
            SelectorStatement::AttachedProperty => {
                return self.attached_property_completions(&parser, out);
            }
            SelectorStatement::Template => {
                out.push(Completion::new(TEMPLATE, selector_kind()));
            }
            SelectorStatement::Start | SelectorStatement::Traversal => {
                if parser.is_error() {
                    return None;
                }
                out.extend(COMBINATORS.iter().map(|c| Completion::new(*c, selector_kind())));
                out.extend(
                    FUNCTIONS
                        .iter()
                        .map(|(display, insert)| Completion::with_display(*display, *insert, selector_kind())),
                );
                out.push(Completion::new(TEMPLATE, selector_kind()));
                out.extend(
                    self.context
                        .filter_types("", TypeFilter::empty())
                        .filter(|(_, t)| t.is_bindable_object() || t.has_attached_properties())
                        .map(|(key, _)| Completion::new(key.replace(':', "|"), target_kind())),
                );
            }
            SelectorStatement::Value => self.selector_value_completions(&parser, out),
            SelectorStatement::Middle
            | SelectorStatement::Class
            | SelectorStatement::Function
            | SelectorStatement::End => {}
        }

        (out.len() > before).then_some(start)
    }

    /// Type of the current selector segment, falling back to the `TargetType` of an enclosing
    /// `ControlTheme`.
    fn selector_type(&self, parser: &SelectorParser<'_>) -> String {
        let name = parser.type_name().map(str::to_string).or_else(|| {
            (self.state.parent_tag_name(1) == Some("ControlTheme"))
                .then(|| self.state.find_parent_attribute_value(&["TargetType"], 1, 0))
                .flatten()
                .map(str::to_string)
        });
        match (parser.namespace(), name) {
            (Some(namespace), Some(name)) => format!("{namespace}:{name}"),
            (_, name) => name.unwrap_or_default(),
        }
    }

    fn pseudo_class_completions(&self, parser: &SelectorParser<'_>, out: &mut Vec<Completion>) {
        let ctx = self.context;
        let function = parser.function_name().unwrap_or("");
        let no_type = parser.type_name().map_or(true, str::is_empty);

        if parser.previous_statement() <= SelectorStatement::Middle && no_type {
            out.push(Completion::with_display(":is()", ":is(", selector_kind()));
        } else if function.is_empty() {
            out.extend(
                FUNCTIONS[1..]
                    .iter()
                    .map(|(display, insert)| Completion::with_display(*display, *insert, selector_kind())),
            );
        }

        if no_type {
            let all = ctx
                .filter_types("", TypeFilter::empty())
                .flat_map(|(_, t)| t.pseudo_classes.iter());
            out.extend(
                dedup_ignore_case(all)
                    .into_iter()
                    .map(|p| Completion::new(p, selector_kind())),
            );
        } else if let Some(t) = ctx
            .lookup_type(&self.selector_type(parser))
            .filter(|t| t.has_pseudo_classes())
        {
            out.extend(
                dedup_ignore_case(t.pseudo_classes.iter())
                    .into_iter()
                    .map(|p| Completion::new(p, selector_kind())),
            );
        }

        if function == "is" {
            out.extend(
                ctx.filter_types("", TypeFilter::empty())
                    .filter(|(_, t)| t.is_bindable_object())
                    .map(|(_, t)| Completion::new(ctx.xmlns_name(t, '|'), target_kind())),
            );
        }
    }

    /// Element names after `#`, or template part names after `/template/`.
    fn name_completions(&self, parser: &SelectorParser<'_>, out: &mut Vec<Completion>) {
        let ctx = self.context;
        let typed = parser.element_name().unwrap_or("");
        let kind = CompletionKind::NAME | CompletionKind::CLASS;

        if !parser.is_template() {
            out.extend(
                self.patterns
                    .element_names(self.full_text)
                    .into_iter()
                    .filter(|name| starts_with_ignore_case(name, typed))
                    .map(|name| Completion::new(name, kind)),
            );
            return;
        }

        let Some(owner_name) = parser.template_owner().filter(|o| !o.is_empty()) else {
            return;
        };
        let Some((_, owner)) = ctx
            .filter_types(&owner_name, TypeFilter::empty())
            .find(|(_, t)| !t.template_parts.is_empty())
        else {
            return;
        };

        let part_type_name = parser.full_type_name().unwrap_or_default();
        let part_type = (!part_type_name.is_empty())
            .then(|| ctx.filter_types(&part_type_name, TypeFilter::empty()).next())
            .flatten()
            .map(|(_, t)| t);

        out.extend(
            owner
                .template_parts
                .iter()
                .filter(|part| {
                    part_type.map_or(true, |t| part.assembly_qualified_name == t.assembly_qualified_name)
                })
                .filter(|part| starts_with_ignore_case(&part.name, typed))
                .map(|part| Completion::new(part.name.clone(), kind)),
        );
    }

    fn selector_type_completions(&self, parser: &SelectorParser<'_>, out: &mut Vec<Completion>) {
        let ctx = self.context;
        let typed = parser.full_type_name().unwrap_or_default();

        if let Some(namespace) = typed.strip_suffix(':') {
            let types = ctx
                .aliases()
                .get(namespace)
                .and_then(|id| ctx.metadata().namespace(id));
            out.extend(
                types
                    .into_iter()
                    .flat_map(|types| types.values())
                    .filter_map(|token| ctx.metadata().get(*token))
                    .filter(|t| is_selectable(t))
                    .map(|t| {
                        Completion::with_display(t.name.clone(), format!("{namespace}|{}", t.name), target_kind())
                    }),
            );
            return;
        }

        out.extend(
            ctx.filter_types(&typed, TypeFilter::empty())
                .filter(|(_, t)| is_selectable(t))
                .map(|(_, t)| Completion::new(ctx.xmlns_name(t, '|'), target_kind())),
        );
    }

    /// `[(Owner.Name)` candidates: owner types first, then their attached properties.
    fn attached_property_completions(
        &self,
        parser: &SelectorParser<'_>,
        out: &mut Vec<Completion>,
    ) -> Option<usize> {
        let ctx = self.context;
        let typed = parser.property_name().unwrap_or("");
        let before = out.len();

        if let Some(owner) = parser.property_owner() {
            let owner_type = ctx.lookup_type(&owner).filter(|t| t.has_attached_properties());
            out.extend(filter_properties(owner_type, typed, Some(true), false, false).map(|p| {
                Completion::with_display(p.name.clone(), format!("{})", p.name), CompletionKind::ATTACHED_PROPERTY)
            }));
            return (out.len() > before).then_some(parser.last_parsed_position());
        }

        // The alias typed before `|` belongs to the replaced token
        let namespace = parser.property_owner_namespace();
        let search = match namespace {
            Some(namespace) => format!("{namespace}:{typed}"),
            None => typed.to_string(),
        };
        out.extend(
            ctx.filter_types(&search, TypeFilter::empty())
                .filter(|(_, t)| t.has_attached_properties())
                .map(|(_, t)| {
                    let name = ctx.xmlns_name(t, '|');
                    Completion::with_display(name.clone(), format!("{name}."), CompletionKind::CLASS)
                }),
        );
        let start = parser.last_parsed_position() - namespace.map_or(0, |namespace| namespace.len() + 1);
        (out.len() > before).then_some(start)
    }

    fn selector_value_completions(&self, parser: &SelectorParser<'_>, out: &mut Vec<Completion>) {
        let ctx = self.context;
        let property = match parser.property_owner() {
            Some(owner) => ctx.lookup_property(&owner, parser.property_name().unwrap_or("")),
            None => ctx
                .lookup_type(&self.selector_type(parser))
                .and_then(|t| t.property(parser.property_name().unwrap_or(""))),
        };
        let Some(mut property_type) = property.and_then(|p| ctx.property_type(p)) else {
            return;
        };
        if property_type.is_nullable() {
            match property_type.underlying_type.and_then(|token| ctx.metadata().get(token)) {
                Some(underlying) => property_type = underlying,
                None => return,
            }
        }
        if !property_type.has_hint_values() {
            return;
        }

        let value = parser.value().unwrap_or("");
        let kind = hint_kind(property_type);
        out.extend(
            property_type
                .hint_values
                .iter()
                .filter(|v| starts_with_ignore_case(v, value))
                .map(|v| Completion::new(v.clone(), kind)),
        );
    }
}

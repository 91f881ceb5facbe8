//! Attribute-value completion.
//!
//! What an attribute value may contain depends on what the attribute means. The branches are
//! tried in order and the first that applies wins:
//!
//! 1. `{...}` values are markup extensions
//! 2. an event attribute offers a handler-stub snippet
//! 3. a property whose type lists literal values offers them; selectors and space or comma
//!    separated lists complete only their last token
//! 4. a `System.Type` property offers type names
//! 5. `xmlns` / `xmlns:*` offer namespace identifiers
//! 6. `x:Class` offers the classes of the assembly being edited
//! 7. `Setter.Property` / `Setter.Value` resolve the styled type from the enclosing style
//! 8. `On.Options` / `On.Content` use the platform switches

use crate::{
    completion::{
        engine::Request,
        helper::{contains_ignore_case, get_insert_text, starts_with_ignore_case, typed_prefix_len, TypeFilter},
        item::{Completion, CompletionData, CompletionKind},
    },
    metadata::{builder::TYPE_TYPE, MetadataType},
    syntax::slice,
};

/// `OnPlatform` switch names.
pub(crate) const PLATFORMS: &[&str] = &["Windows", "macOS", "Linux", "Android", "iOS", "Browser"];

/// Values of `<On Options="...">` inside an `OnPlatform` element.
const PLATFORM_OPTIONS: &[&str] = &["Windows", "macOS", "Linux", "Android", "IOS", "Browser"];

/// `OnFormFactor` switch names.
pub(crate) const FORM_FACTORS: &[&str] = &["Desktop", "Mobile"];

/// Kind of the hint values of `metadata_type`.
pub(crate) fn hint_kind(metadata_type: &MetadataType) -> CompletionKind {
    if metadata_type.is_enum() {
        CompletionKind::ENUM
    } else {
        CompletionKind::STATIC_PROPERTY
    }
}

/// Whether values of this type can be completed from hints.
pub(crate) fn offers_values(metadata_type: &MetadataType) -> bool {
    metadata_type.has_hint_values() || metadata_type.is_binding_path()
}

impl Request<'_> {
    /// Candidates inside a quoted attribute value.
    pub(crate) fn value_completions(&self, out: &mut Vec<Completion>) -> usize {
        let ctx = self.context;
        let state = self.state;
        let Some(value_start) = state.current_value_start() else {
            return self.pos;
        };
        let mut start = value_start;
        let tag = state.tag_name();
        let attribute = state.attribute_name().unwrap_or("");
        let value = state.attribute_value().unwrap_or("");

        let property = match attribute.split_once('.') {
            Some((owner, member)) => ctx.lookup_property(owner, member),
            None => tag.and_then(|tag| ctx.lookup_property(tag, attribute)),
        };

        if value.starts_with('{') {
            let data = slice(self.text, value_start, self.pos);
            return value_start + self.markup_completions(property, data, out);
        }

        if let Some(tag) = tag {
            if let Some(event) = ctx.lookup_type(tag).and_then(|t| t.event(attribute)) {
                let handler = get_insert_text(tag, tag);
                out.push(
                    Completion::with_display(
                        "<New Event Handler>",
                        format!("{handler}_{attribute}"),
                        CompletionKind::SNIPPET,
                    )
                    .with_data(CompletionData::Event(event.clone())),
                );
                return start;
            }
        }

        let property = property.or_else(|| {
            ctx.lookup_type(attribute)
                .and_then(MetadataType::default_property)
        });
        let property_type = property.and_then(|p| ctx.property_type(p));

        if let Some(property_type) = property_type {
            let is_selector = property_type.is_composite_value() && attribute == "Selector";
            if offers_values(property_type) || is_selector {
                let search = slice(self.text, value_start, self.pos);
                if is_selector {
                    if let Some(delta) = self.selector_completions(search, out) {
                        start += delta;
                    }
                } else if property_type.is_composite_value() {
                    let last = search.rsplit([' ', ',']).next().unwrap_or(search);
                    start += search.len() - last.len();
                    out.extend(self.hint_completions(property_type, last));
                } else {
                    out.extend(self.hint_completions(property_type, search));
                }
                return start;
            }

            if property_type.full_name == TYPE_TYPE {
                let names: Vec<_> = ctx
                    .filter_type_names(value, TypeFilter::empty())
                    .map(|name| Completion::new(get_insert_text(name, value), CompletionKind::CLASS))
                    .collect();
                if !names.is_empty() {
                    out.extend(names);
                    start += typed_prefix_len(value);
                }
                return start;
            }
        }

        if attribute == "xmlns" || attribute.contains("xmlns:") {
            return start + self.xmlns_completions(value, out);
        }
        if let Some(alias) = attribute.strip_suffix(":Class") {
            return start + self.class_completions(alias, value, out);
        }
        match (tag, attribute) {
            (Some("Setter"), "Property" | "Value") => {
                self.setter_completions(attribute, value, out);
                if let Some(dot) = value.rfind('.') {
                    start += dot + 1;
                }
            }
            (Some("On"), _) => self.on_completions(attribute, out),
            _ => {}
        }
        start
    }

    /// Literal values of `metadata_type`, plus data-context paths for the binding-path type.
    pub(crate) fn hint_completions(&self, metadata_type: &MetadataType, entered: &str) -> Vec<Completion> {
        let kind = hint_kind(metadata_type);
        let mut completions: Vec<Completion> = self
            .context
            .filter_hint_values(metadata_type, entered)
            .into_iter()
            .map(|value| Completion::new(value, kind))
            .collect();
        if metadata_type.is_binding_path() {
            completions.extend(self.binding_path_completions(entered));
        }
        completions
    }

    /// Namespace identifiers known to the model.
    fn xmlns_completions(&self, value: &str, out: &mut Vec<Completion>) -> usize {
        let kind = CompletionKind::NAMESPACE | CompletionKind::EDITOR_HINT;
        let namespaces = self.context.metadata().namespaces().map(|(id, _)| id);

        if value.starts_with("clr-namespace:") {
            out.extend(
                namespaces
                    .filter(|id| {
                        starts_with_ignore_case(id, value) && contains_ignore_case(id, ";assembly=")
                    })
                    .map(|id| Completion::new(get_insert_text(id, value), kind)),
            );
            return typed_prefix_len(value);
        }

        for scheme in ["using:", "clr-namespace:"] {
            if scheme.starts_with(value) {
                out.push(Completion::new(scheme, kind));
            }
        }
        out.extend(
            namespaces
                .filter(|id| id.starts_with(value) && !id.starts_with("clr-namespace"))
                .map(|id| Completion::new(id, kind)),
        );
        0
    }

    /// Full names of the concrete classes of the assembly being edited, for `x:Class`.
    fn class_completions(&self, alias: &str, value: &str, out: &mut Vec<Completion>) -> usize {
        let ctx = self.context;
        let metadata = ctx.metadata();
        if ctx.aliases().get(alias).map(String::as_str) != Some(metadata.profile().xaml_namespace) {
            return 0;
        }

        let assembly_key = format!(";assembly={}", ctx.assembly_name().unwrap_or_default());
        let before = out.len();
        out.extend(
            metadata
                .namespaces()
                .filter(|(id, _)| id.ends_with(&assembly_key))
                .flat_map(|(_, types)| types.values())
                .filter_map(|token| metadata.get(*token))
                .filter(|t| !t.is_abstract() && starts_with_ignore_case(&t.full_name, value))
                .map(|t| {
                    Completion::new(
                        get_insert_text(&t.full_name, value),
                        CompletionKind::CLASS | CompletionKind::TARGET_TYPE_CLASS,
                    )
                }),
        );
        if out.len() > before {
            typed_prefix_len(value)
        } else {
            0
        }
    }

    /// Type a `Setter` applies to: the `TargetType` of an enclosing style or theme, otherwise
    /// the last type named by the enclosing selector.
    fn setter_target(&self) -> Option<String> {
        let state = self.state;
        if matches!(state.parent_tag_name(1), Some("Style" | "ControlTheme")) {
            if let Some(target) = state.find_parent_attribute_value(&["TargetType"], 1, 0) {
                return (!target.is_empty()).then(|| target.to_string());
            }
        }

        let selector = state
            .find_parent_attribute_value(&["Selector"], 1, 0)
            .unwrap_or_default();
        let fallback = self.context.metadata().profile().fallback_setter_type;
        Some(
            self.patterns
                .selector_types(selector)
                .pop()
                .unwrap_or_else(|| fallback.to_string()),
        )
    }

    fn setter_completions(&self, attribute: &str, value: &str, out: &mut Vec<Completion>) {
        let ctx = self.context;
        let Some(target) = self.setter_target() else {
            return;
        };

        if attribute == "Property" {
            if let Some((owner, member)) = value.split_once('.') {
                out.extend(
                    ctx.filter_property_names(owner, member, Some(true), true, false)
                        .map(|name| Completion::described(name, name, name, CompletionKind::ATTACHED_PROPERTY)),
                );
            } else {
                out.extend(
                    ctx.filter_property_names(&target, value, Some(false), true, false)
                        .map(|name| Completion::new(name, CompletionKind::DATA_PROPERTY)),
                );
                out.extend(
                    ctx.filter_type_names(value, TypeFilter::ATTACHED_OR_EVENTS)
                        .map(|name| {
                            Completion::with_display(name, get_insert_text(name, value), CompletionKind::CLASS)
                        }),
                );
            }
            return;
        }

        let Some(setter_property) = self.state.find_parent_attribute_value(&["Property"], 0, 0) else {
            return;
        };
        let (owner, name) = match setter_property.split_once('.') {
            Some((owner, name)) => (owner, name),
            None => (target.as_str(), setter_property),
        };
        if let Some(property_type) = ctx
            .lookup_property(owner, name)
            .and_then(|p| ctx.property_type(p))
            .filter(|t| t.has_hint_values())
        {
            out.extend(self.hint_completions(property_type, value));
        }
    }

    /// Switch names for `<On Options="`, or the values of the property an `On` belongs to.
    fn on_completions(&self, attribute: &str, out: &mut Vec<Completion>) {
        match attribute {
            "Options" => {
                let names = match self.state.parent_tag_name(1) {
                    Some("OnPlatform") => PLATFORM_OPTIONS,
                    Some("OnFormFactor") => FORM_FACTORS,
                    _ => return,
                };
                out.extend(names.iter().map(|name| Completion::new(*name, CompletionKind::ENUM)));
            }
            "Content" => {
                let Some((owner, member)) = self
                    .state
                    .parent_tag_name(2)
                    .and_then(|tag| tag.split_once('.'))
                else {
                    return;
                };
                let ctx = self.context;
                if let Some(property_type) = ctx
                    .lookup_property(owner, member)
                    .and_then(|p| ctx.property_type(p))
                    .filter(|t| t.has_hint_values())
                {
                    out.extend(self.hint_completions(property_type, ""));
                }
            }
            _ => {}
        }
    }
}

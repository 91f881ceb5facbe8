//! Completion inside `{Extension ...}` attribute values.

use crate::{
    completion::{
        engine::{strip_extension_suffix, Request},
        helper::{get_insert_text, typed_prefix_len, TypeFilter},
        item::{Completion, CompletionKind},
        values::{offers_values, FORM_FACTORS, PLATFORMS},
    },
    metadata::{builder::TYPE_TYPE, CtorArgument, MetadataProperty, MetadataType},
    syntax::{slice, MarkupExtensionParser, MarkupState},
};

impl Request<'_> {
    /// Candidates for the markup-extension prefix `data` (starting at `{`).
    ///
    /// `property` is the property the whole attribute sets. Returns the offset into `data` at
    /// which the replaced token begins.
    pub(crate) fn markup_completions(
        &self,
        property: Option<&MetadataProperty>,
        data: &str,
        out: &mut Vec<Completion>,
    ) -> usize {
        let ctx = self.context;
        let ext = MarkupExtensionParser::parse(data);
        let typed_name = ext.element_name().unwrap_or("");
        let name = typed_name.trim();
        let extension_name = if ctx
            .lookup_type(name)
            .is_some_and(MetadataType::is_markup_extension)
        {
            name.to_string()
        } else {
            format!("{name}Extension")
        };

        match ext.state() {
            MarkupState::StartElement => {
                out.extend(
                    ctx.filter_type_names(typed_name, TypeFilter::MARKUP_EXTENSIONS)
                        .map(|key| strip_extension_suffix(key).unwrap_or(key))
                        .map(|key| {
                            Completion::new(
                                get_insert_text(key, typed_name),
                                CompletionKind::MARKUP_EXTENSION,
                            )
                        }),
                );
                ext.current_value_start() + typed_prefix_len(typed_name)
            }
            MarkupState::StartAttribute | MarkupState::InsideElement => {
                let start = if ext.state() == MarkupState::InsideElement {
                    data.len()
                } else {
                    ext.current_value_start()
                };

                if name == "OnPlatform" || name == "OnFormFactor" {
                    self.platform_switch_completions(name, &ext, data, out);
                    return start;
                }

                let attribute = ext.attribute_name().unwrap_or("");
                out.extend(
                    ctx.filter_property_names(&extension_name, attribute, Some(false), true, false)
                        .map(|p| {
                            Completion::described(p, format!("{p}="), p, CompletionKind::PROPERTY)
                        }),
                );

                let extension = ctx.lookup_type(&extension_name);
                match extension {
                    Some(t)
                        if t.is_markup_extension()
                            && t.ctor_argument != CtorArgument::None
                            && ext.attributes_count() == 0 =>
                    {
                        self.ctor_argument_completions(t, property, attribute, out);
                    }
                    _ => {
                        if let Some(default_type) = extension
                            .and_then(MetadataType::default_property)
                            .and_then(|p| ctx.property_type(p))
                            .filter(|t| offers_values(t))
                        {
                            out.extend(self.hint_completions(default_type, attribute));
                        }
                    }
                }
                start
            }
            MarkupState::BeforeAttributeValue | MarkupState::AttributeValue => {
                let value_start = ext.current_value_start();
                let entered = slice(data, value_start, data.len());
                let value_property = if name == "OnPlatform" || name == "OnFormFactor" {
                    self.xml_property()
                } else {
                    ctx.lookup_property(&extension_name, ext.attribute_name().unwrap_or(""))
                };

                match value_property.and_then(|p| ctx.property_type(p)) {
                    Some(t) if offers_values(t) => {
                        out.extend(self.hint_completions(t, entered));
                        value_start
                    }
                    Some(t) if t.full_name == TYPE_TYPE => {
                        out.extend(
                            ctx.filter_type_names(entered, TypeFilter::empty())
                                .map(|name| {
                                    Completion::new(get_insert_text(name, entered), CompletionKind::CLASS)
                                }),
                        );
                        value_start + typed_prefix_len(entered)
                    }
                    _ => value_start,
                }
            }
            MarkupState::End | MarkupState::Failed => ext.current_value_start(),
        }
    }

    /// The property of the XML attribute the markup extension is written in.
    fn xml_property(&self) -> Option<&MetadataProperty> {
        self.context.lookup_property(
            self.state.tag_name().unwrap_or(""),
            self.state.attribute_name().unwrap_or(""),
        )
    }

    /// `{OnPlatform Windows=..., macOS=...}` switch names, or the values of the property the
    /// extension is written for.
    fn platform_switch_completions(
        &self,
        name: &str,
        ext: &MarkupExtensionParser<'_>,
        data: &str,
        out: &mut Vec<Completion>,
    ) {
        // A `,` after a value leaves the parser between properties, not after the name
        let after_separator = data
            .rfind([',', '='])
            .is_some_and(|i| data[i..].starts_with(','));

        if after_separator || ext.state() == MarkupState::StartAttribute {
            let names = if name == "OnPlatform" { PLATFORMS } else { FORM_FACTORS };
            out.extend(names.iter().map(|switch| {
                Completion::described(*switch, format!("{switch}="), *switch, CompletionKind::ENUM)
            }));
        } else if let Some(property_type) = self
            .xml_property()
            .and_then(|p| self.context.property_type(p))
            .filter(|t| t.has_hint_values())
        {
            out.extend(self.hint_completions(property_type, ""));
        }
    }

    /// Positional-argument candidates of an extension with no named property set yet.
    fn ctor_argument_completions(
        &self,
        extension: &MetadataType,
        property: Option<&MetadataProperty>,
        argument: &str,
        out: &mut Vec<Completion>,
    ) {
        let ctx = self.context;
        match extension.ctor_argument {
            CtorArgument::HintValues => {
                if extension.has_hint_values() {
                    out.extend(self.hint_completions(extension, argument));
                }
            }
            CtorArgument::Type => {
                if !argument.contains('.') {
                    self.ctor_type_names(argument, TypeFilter::empty(), property, out);
                }
            }
            _ => {
                if let Some((owner, member)) = argument.split_once('.') {
                    out.extend(
                        ctx.filter_property_names(owner, member, None, false, true)
                            .map(|p| {
                                Completion::described(
                                    p,
                                    format!("{owner}.{p}"),
                                    p,
                                    CompletionKind::STATIC_PROPERTY,
                                )
                            }),
                    );
                } else {
                    let filter = if extension.ctor_argument == CtorArgument::Object {
                        TypeFilter::STATIC_GETTERS
                    } else {
                        TypeFilter::empty()
                    };
                    self.ctor_type_names(argument, filter, property, out);
                }
            }
        }
    }

    fn ctor_type_names(
        &self,
        argument: &str,
        filter: TypeFilter,
        property: Option<&MetadataProperty>,
        out: &mut Vec<Completion>,
    ) {
        out.extend(
            self.context
                .filter_type_names(argument, filter)
                .map(|name| Completion::described(name, name, name, CompletionKind::CLASS)),
        );

        if let Some(property_type) = property
            .and_then(|p| self.context.property_type(p))
            .filter(|t| t.has_hint_values())
        {
            let name = &property_type.name;
            out.push(Completion::described(
                name.clone(),
                format!("{name}."),
                name.clone(),
                CompletionKind::CLASS,
            ));
        }
    }
}

//! Binding path completion.
//!
//! A binding path is a `.`-separated walk over properties starting from a source:
//!
//! - the `DataType` / `x:DataType` declared on the element or an ancestor (the default)
//! - `$self`, the element the binding is written on
//! - `$parent` or `$parent[Type]`, an ancestor element
//! - `#name`, a named element
//!
//! Each completed segment resolves to the declared type of the property it names; the last,
//! partially typed segment is completed from that type's readable instance properties.

use crate::{
    completion::{
        engine::Request,
        helper::{filter_properties, TypeFilter},
        item::{Completion, CompletionKind},
    },
    metadata::MetadataType,
};

const DATA_TYPE_ATTRIBUTES: &[&str] = &["DataType", "x:DataType"];

const PARENT: &str = "$parent";

impl Request<'_> {
    /// Candidates for the binding path prefix `entered`.
    ///
    /// Insert texts repeat the completed segments so the whole path is replaced.
    pub(crate) fn binding_path_completions(&self, entered: &str) -> Vec<Completion> {
        let ctx = self.context;
        let segments: Vec<&str> = entered.split('.').collect();

        if let [first] = segments.as_slice() {
            if let Some(typed) = first.strip_prefix("$parent[") {
                return ctx
                    .filter_type_names(typed, TypeFilter::empty())
                    .map(|name| {
                        Completion::described(
                            name,
                            format!("{PARENT}[{name}]."),
                            name,
                            CompletionKind::CLASS,
                        )
                    })
                    .collect();
            }
            if first.starts_with('#') {
                return self
                    .patterns
                    .element_names(self.full_text)
                    .into_iter()
                    .map(|name| Completion::described(name, format!("#{name}"), name, CompletionKind::CLASS))
                    .collect();
            }
            return property_completions(self.data_type(), first, "");
        }

        let fallback = self.context.metadata().profile().fallback_setter_type;
        let (mut current, mut index) = match segments[0] {
            "$self" => (self.state.parent_tag_name(0).and_then(|t| ctx.lookup_type(t)), 1),
            PARENT => (
                ctx.lookup_type(self.state.parent_tag_name(1).unwrap_or(fallback)),
                1,
            ),
            first if first.starts_with("$parent[") => {
                let name = first
                    .trim_start_matches("$parent[")
                    .trim_end_matches(']');
                (ctx.lookup_type(name), 1)
            }
            first if first.starts_with('$') || first.starts_with('#') => (ctx.lookup_type(fallback), 1),
            _ => (self.data_type(), 0),
        };

        let last = segments.len() - 1;
        while index < last && !segments[index].is_empty() {
            let Some(t) = current else {
                break;
            };
            current = if index <= 1 && segments[index] == "BindingContext" {
                self.data_type()
            } else {
                t.property(segments[index])
                    .and_then(|p| ctx.property_type(p))
            };
            index += 1;
        }

        if index < last {
            return Vec::new();
        }
        let prefix_end = entered.len() - segments[last].len();
        property_completions(current, segments[last], &entered[..prefix_end])
    }

    /// Type named by the closest `DataType` attribute.
    fn data_type(&self) -> Option<&MetadataType> {
        self.state
            .find_parent_attribute_value(DATA_TYPE_ATTRIBUTES, 0, usize::MAX)
            .and_then(|name| self.context.lookup_type(name))
    }
}

fn property_completions(
    metadata_type: Option<&MetadataType>,
    typed: &str,
    prefix: &str,
) -> Vec<Completion> {
    filter_properties(metadata_type, typed, Some(false), false, false)
        .map(|p| {
            Completion::described(
                p.name.clone(),
                format!("{prefix}{}", p.name),
                p.name.clone(),
                CompletionKind::DATA_PROPERTY,
            )
        })
        .collect()
}

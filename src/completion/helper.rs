//! Document-scoped lookups over a [`Metadata`] model.
//!
//! A document refers to types through the XML namespace aliases declared on its root element:
//! `<Window xmlns="https://github.com/avaloniaui" xmlns:local="using:App">` makes `Button` and
//! `local:MainView` valid element names. [`ResolutionContext`] is the table of every type the
//! document can name, keyed by that alias-qualified name, together with the queries the engine
//! runs against it.
//!
//! Building the table walks every namespace the aliases point to, so [`MetadataHelper`] caches
//! the last context and reuses it while the model, the target assembly and the alias set stay
//! the same. A changed alias set produces a fresh context that replaces the cached one in a
//! single store; requests that already hold the old context keep using it.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use bitflags::bitflags;
use quick_xml::{events::Event, Reader};

use crate::metadata::{Metadata, MetadataProperty, MetadataType, TypeToken};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Capability filters of [`ResolutionContext::filter_types`]
    pub struct TypeFilter: u8 {
        /// Only types declaring attached properties or attached events
        const ATTACHED_OR_EVENTS = 0x01;
        /// Only markup extensions
        const MARKUP_EXTENSIONS = 0x02;
        /// Only types with readable static properties
        const STATIC_GETTERS = 0x04;
        /// Only directives of the xaml namespace; without it, directives are excluded
        const DIRECTIVES = 0x08;
    }
}

/// Alias-resolved type table of one document.
#[derive(Debug)]
pub struct ResolutionContext {
    metadata: Arc<Metadata>,
    assembly_name: Option<String>,
    aliases: BTreeMap<String, String>,
    types: BTreeMap<String, TypeToken>,
}

impl ResolutionContext {
    /// Resolve `aliases` against `metadata`.
    ///
    /// Aliases pointing at a `clr-namespace:` without an `;assembly=` part refer to the
    /// assembly being edited.
    #[must_use]
    pub fn new(
        metadata: Arc<Metadata>,
        aliases: BTreeMap<String, String>,
        assembly_name: Option<&str>,
    ) -> Self {
        let mut types = BTreeMap::new();
        let bound = aliases
            .iter()
            .map(|(prefix, namespace)| (prefix.as_str(), namespace.as_str()))
            .chain(std::iter::once(("", "")));

        for (prefix, namespace) in bound {
            let namespace = match assembly_name {
                Some(assembly)
                    if !assembly.is_empty()
                        && namespace.starts_with("clr-namespace:")
                        && !namespace.contains(";assembly=") =>
                {
                    format!("{namespace};assembly={assembly}")
                }
                _ => namespace.to_string(),
            };
            let Some(registered) = metadata.namespace(&namespace) else {
                continue;
            };

            for token in registered.values() {
                let Some(metadata_type) = metadata.get(*token) else {
                    continue;
                };
                let key = if prefix.is_empty() {
                    metadata_type.name.clone()
                } else {
                    format!("{prefix}:{}", metadata_type.name)
                };
                types.insert(key, *token);
            }
        }

        ResolutionContext {
            metadata,
            assembly_name: assembly_name.map(str::to_string),
            aliases,
            types,
        }
    }

    fn is_current(
        &self,
        metadata: &Arc<Metadata>,
        assembly_name: Option<&str>,
        aliases: &BTreeMap<String, String>,
    ) -> bool {
        Arc::ptr_eq(&self.metadata, metadata)
            && self.assembly_name.as_deref() == assembly_name
            && self.aliases == *aliases
    }

    /// The model this context resolves against.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Declared aliases, prefix to namespace identifier. The default namespace has an empty
    /// prefix.
    #[must_use]
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Simple name of the assembly being edited.
    #[must_use]
    pub fn assembly_name(&self) -> Option<&str> {
        self.assembly_name.as_deref()
    }

    /// Number of names the document can use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the document cannot name any type.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All names with their types, ordered by name.
    pub fn types(&self) -> impl Iterator<Item = (&str, &MetadataType)> {
        self.types
            .iter()
            .filter_map(|(key, token)| Some((key.as_str(), self.metadata.get(*token)?)))
    }

    /// Names containing `prefix`, case-insensitively, that pass `filter`.
    ///
    /// If both the name and `prefix` contain exactly one `:`, the alias parts must be equal
    /// and only the type parts are matched by substring.
    pub fn filter_types<'s>(
        &'s self,
        prefix: &'s str,
        filter: TypeFilter,
    ) -> impl Iterator<Item = (&'s str, &'s MetadataType)> + 's {
        let profile = *self.metadata.profile();
        self.types().filter(move |(key, t)| {
            t.is_xaml_directive() == filter.contains(TypeFilter::DIRECTIVES)
                && matches_type_name(key, prefix)
                && !profile.is_hidden(key)
                && (!filter.contains(TypeFilter::ATTACHED_OR_EVENTS)
                    || t.has_attached_properties()
                    || t.has_attached_events())
                && (!filter.contains(TypeFilter::MARKUP_EXTENSIONS) || t.is_markup_extension())
                && (!filter.contains(TypeFilter::STATIC_GETTERS) || t.has_static_get_properties())
        })
    }

    /// Names of [`ResolutionContext::filter_types`].
    pub fn filter_type_names<'s>(
        &'s self,
        prefix: &'s str,
        filter: TypeFilter,
    ) -> impl Iterator<Item = &'s str> + 's {
        self.filter_types(prefix, filter).map(|(key, _)| key)
    }

    /// Type a document name refers to.
    ///
    /// Falls back to `name + "Extension"`, since markup extensions are written without their
    /// suffix.
    #[must_use]
    pub fn lookup_type(&self, name: &str) -> Option<&MetadataType> {
        self.types
            .get(name)
            .or_else(|| self.types.get(&format!("{name}Extension")))
            .and_then(|token| self.metadata.get(*token))
    }

    /// Property named exactly `property` of the type `type_name` refers to.
    #[must_use]
    pub fn lookup_property(&self, type_name: &str, property: &str) -> Option<&MetadataProperty> {
        self.lookup_type(type_name)?.property(property)
    }

    /// Declared type of a property.
    #[must_use]
    pub fn property_type(&self, property: &MetadataProperty) -> Option<&MetadataType> {
        self.metadata.get(property.type_token?)
    }

    /// Names of the matching properties of the type `type_name` refers to.
    pub fn filter_property_names<'s>(
        &'s self,
        type_name: &str,
        property: &'s str,
        attached: Option<bool>,
        has_setter: bool,
        static_getter: bool,
    ) -> impl Iterator<Item = &'s str> + 's {
        filter_properties(
            self.lookup_type(type_name),
            property,
            attached,
            has_setter,
            static_getter,
        )
        .map(|p| p.name.as_str())
    }

    /// Names of the events of `type_name` containing `name` with the given attachment.
    pub fn filter_event_names<'s>(
        &'s self,
        type_name: &str,
        name: &'s str,
        attached: bool,
    ) -> impl Iterator<Item = &'s str> + 's {
        self.lookup_type(type_name)
            .into_iter()
            .flat_map(|t| t.events.iter())
            .filter(move |e| e.is_attached == attached && contains_ignore_case(&e.name, name))
            .map(|e| e.name.as_str())
    }

    /// Literal values a type accepts.
    ///
    /// Values computed from the assembly being edited come first, filtered by `entered`; the
    /// static hint set follows unfiltered so an editor can keep the full list while the user
    /// edits a partial value.
    #[must_use]
    pub fn filter_hint_values(&self, metadata_type: &MetadataType, entered: &str) -> Vec<String> {
        let mut values = Vec::new();
        if let (Some(assembly), Some(compute)) = (
            self.assembly_name().filter(|a| !a.is_empty()),
            metadata_type.hint_values_fn,
        ) {
            values.extend(
                compute(assembly)
                    .into_iter()
                    .filter(|v| contains_ignore_case(v, entered)),
            );
        }
        values.extend(metadata_type.hint_values.iter().cloned());
        values
    }

    /// The name a selector uses for `metadata_type`: `alias|Name` when the type's namespace is
    /// bound to a non-default alias, `Name` otherwise.
    #[must_use]
    pub fn xmlns_name(&self, metadata_type: &MetadataType, separator: char) -> String {
        let alias = self
            .metadata
            .inverse_namespace(&metadata_type.full_name)
            .filter(|ns| !ns.is_empty())
            .and_then(|ns| {
                self.aliases
                    .iter()
                    .find(|(_, value)| value.as_str() == ns)
                    .map(|(prefix, _)| prefix)
            })
            .filter(|prefix| !prefix.is_empty());
        match alias {
            Some(prefix) => format!("{prefix}{separator}{}", metadata_type.name),
            None => metadata_type.name.clone(),
        }
    }
}

/// Per-document cache of the last [`ResolutionContext`].
#[derive(Debug, Default)]
pub struct MetadataHelper {
    context: RwLock<Option<Arc<ResolutionContext>>>,
}

impl MetadataHelper {
    /// Create a helper with nothing cached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a document prefix, reused if nothing it depends on changed.
    pub fn set_context(
        &self,
        metadata: &Arc<Metadata>,
        text: &str,
        assembly_name: Option<&str>,
    ) -> Arc<ResolutionContext> {
        let aliases = namespace_aliases(text, metadata.profile().default_namespace);

        if let Some(current) = read_lock!(self.context).as_ref() {
            if current.is_current(metadata, assembly_name, &aliases) {
                return Arc::clone(current);
            }
        }

        log::debug!("Resolving {} namespace aliases", aliases.len());
        let context = Arc::new(ResolutionContext::new(
            Arc::clone(metadata),
            aliases,
            assembly_name,
        ));
        *write_lock!(self.context) = Some(Arc::clone(&context));
        context
    }

    /// The cached context, if any.
    #[must_use]
    pub fn context(&self) -> Option<Arc<ResolutionContext>> {
        read_lock!(self.context).clone()
    }
}

/// Properties of `metadata_type` whose name contains `name`, case-insensitively.
///
/// - `has_setter` selects writable properties, otherwise readable ones
/// - `attached` filters by attachment when set
/// - `static_getter` selects readable static properties, otherwise instance properties
pub fn filter_properties<'t>(
    metadata_type: Option<&'t MetadataType>,
    name: &'t str,
    attached: Option<bool>,
    has_setter: bool,
    static_getter: bool,
) -> impl Iterator<Item = &'t MetadataProperty> + 't {
    metadata_type
        .into_iter()
        .flat_map(|t| t.properties.iter())
        .filter(move |p| {
            contains_ignore_case(&p.name, name)
                && (if has_setter { p.has_setter } else { p.has_getter })
                && attached.map_or(true, |attached| p.is_attached == attached)
                && (if static_getter {
                    p.is_static && p.has_getter
                } else {
                    !p.is_static
                })
        })
}

/// Namespace aliases declared on the first element of `text`.
///
/// The default alias (empty prefix) falls back to `default_namespace`. Text that does not get
/// as far as a complete first start tag declares nothing.
#[must_use]
pub fn namespace_aliases(text: &str, default_namespace: &str) -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();
    let mut reader = Reader::from_str(text);

    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                for attribute in element.attributes().flatten() {
                    let Ok(name) = std::str::from_utf8(attribute.key.as_ref()) else {
                        continue;
                    };
                    let prefix = if name == "xmlns" {
                        ""
                    } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                        prefix
                    } else {
                        continue;
                    };
                    if let Ok(value) = attribute.unescape_value() {
                        aliases.insert(prefix.to_string(), value.into_owned());
                    }
                }
                break;
            }
            Ok(Event::Eof) | Err(_) => break,
            Ok(_) => {}
        }
    }

    aliases
        .entry(String::new())
        .or_insert_with(|| default_namespace.to_string());
    aliases
}

/// Length of the part of `typed` that ends at its last `:`, `.`, `;` or `=`.
///
/// That part is already on screen; [`get_insert_text`] drops it from candidates and the
/// replacement starts right after it.
#[must_use]
pub fn typed_prefix_len(typed: &str) -> usize {
    typed.rfind([':', '.', ';', '=']).map_or(0, |split| split + 1)
}

/// Text to insert for `candidate` when the user already typed `typed`.
///
/// If the candidate starts with the typed text up to and including its last `:`, `.`, `;` or
/// `=`, that part is dropped.
#[must_use]
pub fn get_insert_text(candidate: &str, typed: &str) -> String {
    let cut = typed_prefix_len(typed);
    if cut > 0 && starts_with_ignore_case(candidate, &typed[..cut]) {
        if let Some(rest) = candidate.get(cut..) {
            return rest.to_string();
        }
    }
    candidate.to_string()
}

/// Case-insensitive substring test.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive prefix test.
pub(crate) fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Splits `alias:Name`; names with no colon or several are not split.
fn split_alias(name: &str) -> Option<(&str, &str)> {
    if name.matches(':').count() == 1 {
        name.split_once(':')
    } else {
        None
    }
}

fn matches_type_name(key: &str, prefix: &str) -> bool {
    match (split_alias(key), split_alias(prefix)) {
        (Some((key_alias, key_name)), Some((alias, name))) => {
            key_alias == alias && contains_ignore_case(key_name, name)
        }
        _ => contains_ignore_case(key, prefix),
    }
}

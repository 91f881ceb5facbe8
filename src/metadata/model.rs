//! The per-binary metadata model.
//!
//! [`Metadata`] is built once per target binary by [`crate::metadata::MetadataBuilder`] and is
//! read-only afterwards. It owns every [`MetadataType`] in a flat arena addressed by
//! [`TypeToken`] and indexes them by namespace identifier:
//!
//! ```text
//! "https://github.com/avaloniaui"                          -> { "Button" -> #12, "Grid" -> #40, ... }
//! "clr-namespace:Avalonia.Controls;assembly=Avalonia.Controls" -> { "Button" -> #12, ... }
//! "using:Avalonia.Controls"                                -> { "Button" -> #12, ... }
//! ```
//!
//! The same type is usually reachable from several identifiers; within one identifier, short
//! names are unique. An inverse index maps a type's full name back to one identifier that
//! contains it, so a type can be rendered with whatever alias the document bound to that
//! identifier.

use std::collections::{BTreeMap, HashMap};

use crate::metadata::{profile::FrameworkProfile, token::TypeToken, types::MetadataType};

/// Types of one namespace identifier, keyed by short name.
pub type NamespaceTypes = BTreeMap<String, TypeToken>;

/// Immutable type model of one target binary.
#[derive(Debug, Clone)]
pub struct Metadata {
    types: Vec<MetadataType>,
    namespaces: BTreeMap<String, NamespaceTypes>,
    inverse_namespace: HashMap<String, String>,
    full_names: HashMap<String, TypeToken>,
    target_assembly_name: Option<String>,
    profile: FrameworkProfile,
}

impl Metadata {
    /// Create an empty model for the given framework conventions.
    #[must_use]
    pub fn new(profile: FrameworkProfile) -> Self {
        Metadata {
            types: Vec::new(),
            namespaces: BTreeMap::new(),
            inverse_namespace: HashMap::new(),
            full_names: HashMap::new(),
            target_assembly_name: None,
            profile,
        }
    }

    /// Add a type to the arena and return its token.
    ///
    /// The type's `token` field is overwritten with the issued token. The full-name index keeps
    /// the first type registered under a name.
    pub fn push_type(&mut self, mut metadata_type: MetadataType) -> TypeToken {
        let token = TypeToken(u32::try_from(self.types.len()).unwrap_or(u32::MAX));
        metadata_type.token = token;
        self.full_names
            .entry(metadata_type.full_name.clone())
            .or_insert(token);
        self.types.push(metadata_type);
        token
    }

    /// Register a type under a namespace identifier.
    ///
    /// A later registration of the same short name in the same identifier replaces the earlier
    /// one. Returns `false` if the token is unknown.
    pub fn add_type(&mut self, namespace: &str, token: TypeToken) -> bool {
        let Some(metadata_type) = self.types.get(token.index()) else {
            return false;
        };
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(metadata_type.name.clone(), token);
        self.inverse_namespace
            .insert(metadata_type.full_name.clone(), namespace.to_string());
        true
    }

    /// Type behind a token.
    #[must_use]
    pub fn get(&self, token: TypeToken) -> Option<&MetadataType> {
        self.types.get(token.index())
    }

    /// Mutable access for the builder.
    pub(crate) fn get_mut(&mut self, token: TypeToken) -> Option<&mut MetadataType> {
        self.types.get_mut(token.index())
    }

    /// Type registered first under `full_name`.
    #[must_use]
    pub fn type_by_full_name(&self, full_name: &str) -> Option<&MetadataType> {
        self.full_names.get(full_name).and_then(|t| self.get(*t))
    }

    /// Token of the type registered first under `full_name`.
    #[must_use]
    pub fn token_by_full_name(&self, full_name: &str) -> Option<TypeToken> {
        self.full_names.get(full_name).copied()
    }

    /// Types of a namespace identifier.
    #[must_use]
    pub fn namespace(&self, identifier: &str) -> Option<&NamespaceTypes> {
        self.namespaces.get(identifier)
    }

    /// All namespace identifiers with their types, ordered by identifier.
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &NamespaceTypes)> {
        self.namespaces.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// One namespace identifier that contains the type with this full name.
    #[must_use]
    pub fn inverse_namespace(&self, full_name: &str) -> Option<&str> {
        self.inverse_namespace.get(full_name).map(String::as_str)
    }

    /// Every type of the arena, including unregistered helper types.
    pub fn types(&self) -> impl Iterator<Item = &MetadataType> {
        self.types.iter()
    }

    /// Number of types in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the model holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Simple name of the assembly being edited.
    #[must_use]
    pub fn target_assembly_name(&self) -> Option<&str> {
        self.target_assembly_name.as_deref()
    }

    /// Set the simple name of the assembly being edited.
    pub fn set_target_assembly_name(&mut self, name: impl Into<String>) {
        self.target_assembly_name = Some(name.into());
    }

    /// Framework conventions the model was built with.
    #[must_use]
    pub fn profile(&self) -> &FrameworkProfile {
        &self.profile
    }
}

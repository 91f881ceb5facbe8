//! The markup-facing type record and its flags.
//!
//! A [`MetadataType`] is what the completion engine knows about one framework or user type:
//! its identity, what it may be used as in markup (element, markup extension, directive), which
//! literal values it accepts, and the members collected from its inheritance chain.
//!
//! # Key Types
//! - [`MetadataType`] - One type of the model
//! - [`TypeFlags`] - Capability flags
//! - [`CtorArgument`] - Positional argument support of markup extensions
//! - [`TemplatePart`] - Named template slot declared by a control
//! - [`HintValuesFn`], [`DirectiveFilter`] - Pure functions a type can carry

use bitflags::bitflags;
use strum::Display;

use crate::metadata::{
    members::{MetadataEvent, MetadataField, MetadataProperty},
    token::TypeToken,
};

/// Computes hint values that depend on the assembly being edited.
///
/// Receives the simple name of the target assembly.
pub type HintValuesFn = fn(&str) -> Vec<String>;

/// Decides whether a directive applies to an element of the given type.
pub type DirectiveFilter = fn(&MetadataType) -> bool;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Capability flags of a [`MetadataType`]
    pub struct TypeFlags: u32 {
        /// Static class
        const STATIC = 0x0001;
        /// Abstract class, never offered as an element
        const ABSTRACT = 0x0002;
        /// Enumeration, its members are the hint values
        const ENUM = 0x0004;
        /// Generic type definition, needs `x:TypeArguments`
        const GENERIC = 0x0008;
        /// Usable as `{Name ...}` in attribute values
        const MARKUP_EXTENSION = 0x0010;
        /// Language intrinsic of the xaml namespace (`x:Class`, `x:Name`, ...)
        const XAML_DIRECTIVE = 0x0020;
        /// Nullable wrapper, see [`MetadataType::underlying_type`]
        const NULLABLE = 0x0040;
        /// Derives from the framework's bindable base type
        const BINDABLE_OBJECT = 0x0080;
        /// Values are space or comma separated lists; only the last token is completed
        const COMPOSITE_VALUE = 0x0100;
        /// Declares at least one attached property
        const HAS_ATTACHED_PROPERTIES = 0x0200;
        /// Declares at least one attached event
        const HAS_ATTACHED_EVENTS = 0x0400;
        /// Has readable static properties, usable with `{x:Static}`
        const HAS_STATIC_GET_PROPERTIES = 0x0800;
        /// Has settable instance properties
        const HAS_SET_PROPERTIES = 0x1000;
        /// The reserved binding-path pseudo type
        const BINDING_PATH = 0x2000;
    }
}

/// How a markup extension accepts a positional (constructor) argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum CtorArgument {
    /// No single-argument constructor
    #[default]
    None,
    /// Accepts a type name
    Type,
    /// Accepts an arbitrary object or string
    Object,
    /// Accepts either a type name or an object
    TypeAndObject,
    /// Accepts one of the type's hint values
    HintValues,
}

/// A named template part a control expects in its template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePart {
    /// Part name, e.g. `PART_ContentPresenter`
    pub name: String,
    /// Short name of the part's type
    pub type_name: String,
    /// Full name of the part's type
    pub type_full_name: String,
    /// Assembly-qualified name of the part's type
    pub assembly_qualified_name: String,
}

/// One type of the metadata model.
#[derive(Debug, Clone)]
pub struct MetadataType {
    /// Key of this type in its model
    pub token: TypeToken,
    /// Short name as used in markup (`Button`, ``List`1``)
    pub name: String,
    /// Namespace-qualified name (`Avalonia.Controls.Button`)
    pub full_name: String,
    /// Assembly-qualified name, the stable identity across namespace aliases
    pub assembly_qualified_name: String,
    /// Capability flags
    pub flags: TypeFlags,
    /// Wrapped type of a nullable wrapper
    pub underlying_type: Option<TypeToken>,
    /// Closed set of literal values, in declaration order
    pub hint_values: Vec<String>,
    /// Hint values computed from the target assembly name
    pub hint_values_fn: Option<HintValuesFn>,
    /// Pseudo-classes declared by this type and its ancestors, without duplicates
    pub pseudo_classes: Vec<String>,
    /// Positional argument support
    pub ctor_argument: CtorArgument,
    /// Template parts declared by this type
    pub template_parts: Vec<TemplatePart>,
    /// Properties, most-derived level first
    pub properties: Vec<MetadataProperty>,
    /// Events, most-derived level first
    pub events: Vec<MetadataEvent>,
    /// Public fields, most-derived level first
    pub fields: Vec<MetadataField>,
    /// Restricts a directive to matching element types
    pub directive_filter: Option<DirectiveFilter>,
}

impl MetadataType {
    /// Create an empty type whose full name equals its short name.
    ///
    /// The token is assigned when the type is added to a model.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        MetadataType {
            token: TypeToken(0),
            full_name: name.clone(),
            assembly_qualified_name: name.clone(),
            name,
            flags: TypeFlags::empty(),
            underlying_type: None,
            hint_values: Vec::new(),
            hint_values_fn: None,
            pseudo_classes: Vec::new(),
            ctor_argument: CtorArgument::None,
            template_parts: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            fields: Vec::new(),
            directive_filter: None,
        }
    }

    /// Returns the type with the given full name (and assembly-qualified name).
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self.assembly_qualified_name = self.full_name.clone();
        self
    }

    /// Returns the type with additional flags.
    #[must_use]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Returns the type with the given hint values.
    #[must_use]
    pub fn with_hint_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hint_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the type with an extra property.
    #[must_use]
    pub fn with_property(mut self, property: MetadataProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Static class
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(TypeFlags::STATIC)
    }

    /// Abstract class
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeFlags::ABSTRACT)
    }

    /// Enumeration
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.flags.contains(TypeFlags::ENUM)
    }

    /// Generic type definition
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.flags.contains(TypeFlags::GENERIC)
    }

    /// Markup extension
    #[must_use]
    pub fn is_markup_extension(&self) -> bool {
        self.flags.contains(TypeFlags::MARKUP_EXTENSION)
    }

    /// Directive of the xaml namespace
    #[must_use]
    pub fn is_xaml_directive(&self) -> bool {
        self.flags.contains(TypeFlags::XAML_DIRECTIVE)
    }

    /// Nullable wrapper
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.flags.contains(TypeFlags::NULLABLE)
    }

    /// Participates in the attached-member system
    #[must_use]
    pub fn is_bindable_object(&self) -> bool {
        self.flags.contains(TypeFlags::BINDABLE_OBJECT)
    }

    /// Values are token lists
    #[must_use]
    pub fn is_composite_value(&self) -> bool {
        self.flags.contains(TypeFlags::COMPOSITE_VALUE)
    }

    /// The reserved binding-path pseudo type
    #[must_use]
    pub fn is_binding_path(&self) -> bool {
        self.flags.contains(TypeFlags::BINDING_PATH)
    }

    /// Declares attached properties
    #[must_use]
    pub fn has_attached_properties(&self) -> bool {
        self.flags.contains(TypeFlags::HAS_ATTACHED_PROPERTIES)
    }

    /// Declares attached events
    #[must_use]
    pub fn has_attached_events(&self) -> bool {
        self.flags.contains(TypeFlags::HAS_ATTACHED_EVENTS)
    }

    /// Has readable static properties
    #[must_use]
    pub fn has_static_get_properties(&self) -> bool {
        self.flags.contains(TypeFlags::HAS_STATIC_GET_PROPERTIES)
    }

    /// Has settable instance properties
    #[must_use]
    pub fn has_set_properties(&self) -> bool {
        self.flags.contains(TypeFlags::HAS_SET_PROPERTIES)
    }

    /// Returns `true` if the type has a static hint set or computes one.
    #[must_use]
    pub fn has_hint_values(&self) -> bool {
        !self.hint_values.is_empty() || self.hint_values_fn.is_some()
    }

    /// Returns `true` if the type declares pseudo-classes.
    #[must_use]
    pub fn has_pseudo_classes(&self) -> bool {
        !self.pseudo_classes.is_empty()
    }

    /// First property with exactly this name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&MetadataProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The unnamed default property.
    #[must_use]
    pub fn default_property(&self) -> Option<&MetadataProperty> {
        self.properties.iter().find(|p| p.is_default())
    }

    /// First event with exactly this name.
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&MetadataEvent> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Whether this directive may be used on an element of type `element`.
    ///
    /// Types without a filter apply everywhere.
    #[must_use]
    pub fn applies_to(&self, element: &MetadataType) -> bool {
        self.directive_filter.map_or(true, |filter| filter(element))
    }

    /// Recompute the member-derived capability flags from the current member lists.
    pub fn refresh_member_flags(&mut self) {
        let props = &self.properties;
        self.flags.set(
            TypeFlags::HAS_ATTACHED_PROPERTIES,
            props.iter().any(|p| p.is_attached),
        );
        self.flags.set(
            TypeFlags::HAS_STATIC_GET_PROPERTIES,
            props.iter().any(|p| p.is_static && p.has_getter),
        );
        self.flags.set(
            TypeFlags::HAS_SET_PROPERTIES,
            props.iter().any(|p| !p.is_static && p.has_setter),
        );
        self.flags.set(
            TypeFlags::HAS_ATTACHED_EVENTS,
            self.events.iter().any(|e| e.is_attached),
        );
    }
}

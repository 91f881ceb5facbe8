//! Members of a [`crate::metadata::MetadataType`].
//!
//! Members are plain records collected while walking a type's inheritance chain. They are
//! stored on the type in declaration order, most-derived level first, so a type's member list is
//! also its override order: the first match of a name wins.

use crate::metadata::token::TypeToken;

/// A property that may be set from markup.
///
/// Besides ordinary instance properties this also models:
/// - **attached properties**, synthesized from a `Get<Name>` / `Set<Name>` static method pair
///   next to a static property-descriptor field (`is_attached`)
/// - **static members** of static classes and enum members, usable as `{x:Static}` values
///   (`is_static`)
/// - the unnamed **default property** of directives and markup extensions, which types the
///   positional argument (`name` is empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataProperty {
    /// Property name, empty for the default property
    pub name: String,
    /// Declared type, `None` if it could not be resolved
    pub type_token: Option<TypeToken>,
    /// Type that declares the property
    pub declaring_type: Option<TypeToken>,
    /// Attached property addressed as `Owner.Name`
    pub is_attached: bool,
    /// Static member
    pub is_static: bool,
    /// Readable
    pub has_getter: bool,
    /// Writable
    pub has_setter: bool,
}

impl MetadataProperty {
    /// Create a property with the given flags.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        type_token: Option<TypeToken>,
        declaring_type: Option<TypeToken>,
    ) -> Self {
        MetadataProperty {
            name: name.into(),
            type_token,
            declaring_type,
            is_attached: false,
            is_static: false,
            has_getter: true,
            has_setter: true,
        }
    }

    /// Returns the property with the attached flag set.
    #[must_use]
    pub fn attached(mut self) -> Self {
        self.is_attached = true;
        self
    }

    /// Returns the property marked static.
    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Returns the property with the given accessors.
    #[must_use]
    pub fn with_accessors(mut self, has_getter: bool, has_setter: bool) -> Self {
        self.has_getter = has_getter;
        self.has_setter = has_setter;
        self
    }

    /// Returns `true` for the unnamed default property.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }
}

/// An event that can be wired to a handler from markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEvent {
    /// Event name
    pub name: String,
    /// Attached (routed) event addressed as `Owner.Name`
    pub is_attached: bool,
    /// `(type name, parameter name)` pairs of the handler delegate, used to generate a handler
    /// stub in the code-behind
    pub handler_parameters: Vec<(String, String)>,
}

/// A field visible to markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    /// Field name
    pub name: String,
    /// Field type, `None` if it could not be resolved
    pub type_token: Option<TypeToken>,
    /// Type that declares the field
    pub declaring_type: Option<TypeToken>,
    /// Static field
    pub is_static: bool,
}

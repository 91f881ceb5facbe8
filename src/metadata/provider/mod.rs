//! Reflection provider interface.
//!
//! Reading binary assembly metadata is not part of this crate. A [`MetadataProvider`] opens a
//! target binary and exposes, through a [`ReflectionSession`], the raw facts of every assembly in
//! the target's dependency closure. The [`crate::metadata::MetadataBuilder`] only reads these
//! traits.
//!
//! Per-assembly and per-type sequences carry [`crate::Result`] items: a provider reports a type
//! or assembly that failed to load as an `Err` entry and the builder skips it.
//!
//! # Key Components
//!
//! - [`MetadataProvider`] - Opens a session for a target binary
//! - [`ReflectionSession`] - Target assembly name plus the assemblies of the closure
//! - [`AssemblyInformation`] - One assembly: identity, grants, custom attributes, types
//! - [`TypeInformation`] - One type: identity, flags, base type, members
//! - [`descriptor`] - Owned implementations, used by tests and by embedders that already hold
//!   the facts in memory
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use xamlscope::metadata::provider::{
//!     AssemblyDescriptor, InMemoryProvider, MetadataProvider, PropertyInfo, TypeAttributes,
//!     TypeDescriptor,
//! };
//!
//! let button = TypeDescriptor::new("App", "App.Controls", "Button")
//!     .with_attributes(TypeAttributes::PUBLIC)
//!     .with_property(PropertyInfo::new("Content", "System.Object"));
//! let provider = InMemoryProvider::new(
//!     "App",
//!     vec![AssemblyDescriptor::new("App").with_type(button)],
//! );
//!
//! let session = provider.open("App.dll".as_ref())?;
//! assert_eq!(session.target_assembly_name(), "App");
//! assert_eq!(session.assemblies().len(), 1);
//! # Ok::<(), xamlscope::Error>(())
//! ```

mod descriptor;

pub use descriptor::{AssemblyDescriptor, InMemoryProvider, TypeDescriptor};

use std::{path::Path, sync::Arc};

use bitflags::bitflags;

use crate::Result;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Declaration flags of a reflected type
    pub struct TypeAttributes: u32 {
        /// Publicly visible
        const PUBLIC = 0x01;
        /// Interface
        const INTERFACE = 0x02;
        /// Abstract class
        const ABSTRACT = 0x04;
        /// Static class
        const STATIC = 0x08;
        /// Enumeration
        const ENUM = 0x10;
        /// Generic type definition
        const GENERIC = 0x20;
    }
}

/// Accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible everywhere
    #[default]
    Public,
    /// Visible inside the declaring assembly and its friends
    Internal,
    /// Not visible outside the declaring type
    Private,
}

/// A reflected property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Property name
    pub name: String,
    /// Full name of the property type, in reflection notation
    pub type_full_name: String,
    /// Accessibility of the property
    pub visibility: Visibility,
    /// Static property
    pub is_static: bool,
    /// Has an accessible getter
    pub has_getter: bool,
    /// Has an accessible setter
    pub has_setter: bool,
}

impl PropertyInfo {
    /// A public read-write instance property.
    #[must_use]
    pub fn new(name: impl Into<String>, type_full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_full_name: type_full_name.into(),
            visibility: Visibility::Public,
            is_static: false,
            has_getter: true,
            has_setter: true,
        }
    }

    /// Returns the property without a setter.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.has_setter = false;
        self
    }

    /// Returns the property marked static.
    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Returns the property with the given accessibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A reflected event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInfo {
    /// Event name
    pub name: String,
    /// Publicly visible
    pub is_public: bool,
    /// `(type name, parameter name)` pairs of the handler delegate's `Invoke` method
    pub handler_parameters: Vec<(String, String)>,
}

impl EventInfo {
    /// A public event with the conventional `(object sender, EventArgs e)` handler.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public: true,
            handler_parameters: vec![
                ("object".to_string(), "sender".to_string()),
                ("EventArgs".to_string(), "e".to_string()),
            ],
        }
    }
}

/// A reflected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name
    pub name: String,
    /// Full name of the field type
    pub type_full_name: String,
    /// Publicly visible
    pub is_public: bool,
    /// Static field
    pub is_static: bool,
}

impl FieldInfo {
    /// A public static field, the usual shape of property and event descriptors.
    #[must_use]
    pub fn public_static(name: impl Into<String>, type_full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_full_name: type_full_name.into(),
            is_public: true,
            is_static: true,
        }
    }
}

/// A reflected method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Parameter name
    pub name: String,
    /// Full name of the parameter type
    pub type_full_name: String,
}

/// A reflected method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    /// Method name, `.ctor` for instance constructors
    pub name: String,
    /// Publicly visible
    pub is_public: bool,
    /// Static method
    pub is_static: bool,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterInfo>,
    /// Full name of the return type, `None` for `void`
    pub return_type_full_name: Option<String>,
}

impl MethodInfo {
    /// Name of instance constructors.
    pub const CONSTRUCTOR: &'static str = ".ctor";

    /// A public instance method without parameters returning `void`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public: true,
            is_static: false,
            parameters: Vec::new(),
            return_type_full_name: None,
        }
    }

    /// A public instance constructor with the given parameter types.
    #[must_use]
    pub fn constructor(parameter_types: &[&str]) -> Self {
        let mut ctor = Self::new(Self::CONSTRUCTOR);
        for (i, ty) in parameter_types.iter().enumerate() {
            ctor = ctor.with_parameter(&format!("arg{i}"), ty);
        }
        ctor
    }

    /// Returns the method marked static.
    #[must_use]
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Returns the method with an extra parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: &str, type_full_name: &str) -> Self {
        self.parameters.push(ParameterInfo {
            name: name.to_string(),
            type_full_name: type_full_name.to_string(),
        });
        self
    }

    /// Returns the method with a return type.
    #[must_use]
    pub fn returning(mut self, type_full_name: &str) -> Self {
        self.return_type_full_name = Some(type_full_name.to_string());
        self
    }

    /// Whether this is an instance constructor.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR
    }
}

/// A custom attribute applied to an assembly or type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAttributeInfo {
    /// Full name of the attribute type
    pub type_full_name: String,
    /// Constructor arguments rendered as strings
    pub arguments: Vec<String>,
}

impl CustomAttributeInfo {
    /// Create an attribute from its type and constructor arguments.
    #[must_use]
    pub fn new(type_full_name: impl Into<String>, arguments: &[&str]) -> Self {
        Self {
            type_full_name: type_full_name.into(),
            arguments: arguments.iter().map(ToString::to_string).collect(),
        }
    }
}

/// A named template part declared by a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePartInfo {
    /// Part name
    pub name: String,
    /// Short name of the part type
    pub type_name: String,
    /// Full name of the part type
    pub type_full_name: String,
    /// Assembly-qualified name of the part type
    pub assembly_qualified_name: String,
}

/// Facts about one reflected type.
pub trait TypeInformation: Send + Sync {
    /// Short name, with a generic arity suffix (``List`1``)
    fn name(&self) -> &str;
    /// Namespace, empty for the global namespace
    fn namespace(&self) -> &str;
    /// Namespace-qualified name
    fn full_name(&self) -> &str;
    /// Assembly-qualified name
    fn assembly_qualified_name(&self) -> &str;
    /// Declaration flags
    fn attributes(&self) -> TypeAttributes;
    /// Member names of an enumeration, in declaration order
    fn enum_values(&self) -> &[String];
    /// Full names of the interfaces the type implements directly
    fn interfaces(&self) -> &[String];
    /// Base type, `None` for roots and interfaces
    fn base_type(&self) -> Option<Arc<dyn TypeInformation>>;
    /// Custom attributes applied to the type
    fn custom_attributes(&self) -> &[CustomAttributeInfo];
    /// Properties declared by this type
    fn properties(&self) -> &[PropertyInfo];
    /// Events declared by this type
    fn events(&self) -> &[EventInfo];
    /// Fields declared by this type
    fn fields(&self) -> &[FieldInfo];
    /// Methods and constructors declared by this type
    fn methods(&self) -> &[MethodInfo];
    /// Pseudo-classes declared by this type
    fn pseudo_classes(&self) -> &[String];
    /// Template parts declared by this type
    fn template_parts(&self) -> &[TemplatePartInfo];
}

/// Facts about one reflected assembly.
pub trait AssemblyInformation: Send + Sync {
    /// Simple name
    fn name(&self) -> &str;
    /// Full display name
    fn display_name(&self) -> &str;
    /// Full public key, empty for unsigned assemblies
    fn public_key(&self) -> &[u8];
    /// Arguments of the assembly's `InternalsVisibleToAttribute`s
    fn internals_visible_to(&self) -> &[String];
    /// Assembly-level custom attributes
    fn custom_attributes(&self) -> &[CustomAttributeInfo];
    /// All types of the assembly; types that failed to load are `Err` entries
    fn types(&self) -> Vec<Result<Arc<dyn TypeInformation>>>;
}

/// An open reflection session over one target binary and its dependencies.
pub trait ReflectionSession {
    /// Display name of the target assembly
    fn target_assembly_name(&self) -> &str;
    /// Assemblies of the closure, target first; assemblies that failed to load are `Err` entries
    fn assemblies(&self) -> Vec<Result<Arc<dyn AssemblyInformation>>>;
}

/// Opens reflection sessions.
pub trait MetadataProvider: Send + Sync {
    /// Open a session for the binary at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Provider`] or [`crate::Error::FileError`] if the binary cannot be
    /// read.
    fn open(&self, path: &Path) -> Result<Box<dyn ReflectionSession>>;
}

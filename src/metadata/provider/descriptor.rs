//! Owned reflection facts and an in-memory provider.

use std::{path::Path, sync::Arc};

use crate::{
    metadata::provider::{
        AssemblyInformation, CustomAttributeInfo, EventInfo, FieldInfo, MetadataProvider,
        MethodInfo, PropertyInfo, ReflectionSession, TemplatePartInfo, TypeAttributes,
        TypeInformation,
    },
    Error, Result,
};

/// Owned facts about one type.
#[derive(Debug, Clone, Default)]
pub struct TypeDescriptor {
    /// Short name
    pub name: String,
    /// Namespace
    pub namespace: String,
    /// Namespace-qualified name
    pub full_name: String,
    /// Assembly-qualified name
    pub assembly_qualified_name: String,
    /// Declaration flags
    pub attributes: TypeAttributes,
    /// Enumeration members
    pub enum_values: Vec<String>,
    /// Directly implemented interfaces
    pub interfaces: Vec<String>,
    /// Base type
    pub base_type: Option<Arc<TypeDescriptor>>,
    /// Custom attributes
    pub custom_attributes: Vec<CustomAttributeInfo>,
    /// Declared properties
    pub properties: Vec<PropertyInfo>,
    /// Declared events
    pub events: Vec<EventInfo>,
    /// Declared fields
    pub fields: Vec<FieldInfo>,
    /// Declared methods and constructors
    pub methods: Vec<MethodInfo>,
    /// Declared pseudo-classes
    pub pseudo_classes: Vec<String>,
    /// Declared template parts
    pub template_parts: Vec<TemplatePartInfo>,
}

impl TypeDescriptor {
    /// Create a type of `assembly` with the given namespace and short name.
    ///
    /// The type is private until [`TypeDescriptor::with_attributes`] says otherwise.
    #[must_use]
    pub fn new(assembly: &str, namespace: &str, name: &str) -> Self {
        let full_name = if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{namespace}.{name}")
        };
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            assembly_qualified_name: format!("{full_name}, {assembly}"),
            full_name,
            ..Self::default()
        }
    }

    /// Returns the type with additional declaration flags.
    #[must_use]
    pub fn with_attributes(mut self, attributes: TypeAttributes) -> Self {
        self.attributes |= attributes;
        self
    }

    /// Returns the type with a base type.
    #[must_use]
    pub fn with_base(mut self, base: &Arc<TypeDescriptor>) -> Self {
        self.base_type = Some(Arc::clone(base));
        self
    }

    /// Returns the type implementing an interface.
    #[must_use]
    pub fn with_interface(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    /// Returns the type as an enumeration with the given members.
    #[must_use]
    pub fn with_enum_values(mut self, values: &[&str]) -> Self {
        self.attributes |= TypeAttributes::ENUM;
        self.enum_values = values.iter().map(ToString::to_string).collect();
        self
    }

    /// Returns the type with a custom attribute.
    #[must_use]
    pub fn with_custom_attribute(mut self, attribute: CustomAttributeInfo) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Returns the type with a property.
    #[must_use]
    pub fn with_property(mut self, property: PropertyInfo) -> Self {
        self.properties.push(property);
        self
    }

    /// Returns the type with an event.
    #[must_use]
    pub fn with_event(mut self, event: EventInfo) -> Self {
        self.events.push(event);
        self
    }

    /// Returns the type with a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the type with a method.
    #[must_use]
    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    /// Returns the type with pseudo-classes.
    #[must_use]
    pub fn with_pseudo_classes(mut self, pseudo_classes: &[&str]) -> Self {
        self.pseudo_classes
            .extend(pseudo_classes.iter().map(ToString::to_string));
        self
    }

    /// Returns the type with a template part of the given type.
    #[must_use]
    pub fn with_template_part(mut self, name: &str, part_type: &TypeDescriptor) -> Self {
        self.template_parts.push(TemplatePartInfo {
            name: name.to_string(),
            type_name: part_type.name.clone(),
            type_full_name: part_type.full_name.clone(),
            assembly_qualified_name: part_type.assembly_qualified_name.clone(),
        });
        self
    }
}

impl TypeInformation for TypeDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn assembly_qualified_name(&self) -> &str {
        &self.assembly_qualified_name
    }

    fn attributes(&self) -> TypeAttributes {
        self.attributes
    }

    fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    fn base_type(&self) -> Option<Arc<dyn TypeInformation>> {
        self.base_type
            .as_ref()
            .map(|base| Arc::clone(base) as Arc<dyn TypeInformation>)
    }

    fn custom_attributes(&self) -> &[CustomAttributeInfo] {
        &self.custom_attributes
    }

    fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    fn events(&self) -> &[EventInfo] {
        &self.events
    }

    fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    fn pseudo_classes(&self) -> &[String] {
        &self.pseudo_classes
    }

    fn template_parts(&self) -> &[TemplatePartInfo] {
        &self.template_parts
    }
}

/// Owned facts about one assembly.
#[derive(Debug, Clone, Default)]
pub struct AssemblyDescriptor {
    /// Simple name
    pub name: String,
    /// Display name
    pub display_name: String,
    /// Full public key
    pub public_key: Vec<u8>,
    /// Friend-assembly grants
    pub internals_visible_to: Vec<String>,
    /// Assembly-level custom attributes
    pub custom_attributes: Vec<CustomAttributeInfo>,
    /// Types of the assembly
    pub types: Vec<Arc<TypeDescriptor>>,
    /// Types that fail to load, reported as provider errors
    pub broken_types: Vec<String>,
}

impl AssemblyDescriptor {
    /// Create an unsigned assembly with version `1.0.0.0`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: format!("{name}, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null"),
            ..Self::default()
        }
    }

    /// Returns the assembly signed with `public_key`.
    #[must_use]
    pub fn with_public_key(mut self, public_key: &[u8]) -> Self {
        self.public_key = public_key.to_vec();
        self
    }

    /// Returns the assembly granting internals visibility to `friend`.
    #[must_use]
    pub fn with_internals_visible_to(mut self, friend: &str) -> Self {
        self.internals_visible_to.push(friend.to_string());
        self
    }

    /// Returns the assembly with an assembly-level custom attribute.
    #[must_use]
    pub fn with_custom_attribute(mut self, attribute: CustomAttributeInfo) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Returns the assembly with a type.
    #[must_use]
    pub fn with_type(mut self, type_descriptor: TypeDescriptor) -> Self {
        self.types.push(Arc::new(type_descriptor));
        self
    }

    /// Returns the assembly with an already shared type.
    #[must_use]
    pub fn with_shared_type(mut self, type_descriptor: &Arc<TypeDescriptor>) -> Self {
        self.types.push(Arc::clone(type_descriptor));
        self
    }

    /// Returns the assembly with a type that fails to load.
    #[must_use]
    pub fn with_broken_type(mut self, full_name: &str) -> Self {
        self.broken_types.push(full_name.to_string());
        self
    }
}

impl AssemblyInformation for AssemblyDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    fn internals_visible_to(&self) -> &[String] {
        &self.internals_visible_to
    }

    fn custom_attributes(&self) -> &[CustomAttributeInfo] {
        &self.custom_attributes
    }

    fn types(&self) -> Vec<Result<Arc<dyn TypeInformation>>> {
        let mut types: Vec<Result<Arc<dyn TypeInformation>>> = self
            .types
            .iter()
            .map(|t| Ok(Arc::clone(t) as Arc<dyn TypeInformation>))
            .collect();
        types.extend(self.broken_types.iter().map(|name| {
            Err(Error::Provider(format!(
                "failed to load type {name} from {}",
                self.name
            )))
        }));
        types
    }
}

/// A [`MetadataProvider`] over facts already held in memory.
///
/// Every path opens the same set of assemblies. Useful for tests and for embedders whose
/// reflection happens out of process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    target_assembly_name: String,
    assemblies: Vec<Arc<AssemblyDescriptor>>,
    broken_assemblies: Vec<String>,
}

impl InMemoryProvider {
    /// Create a provider whose target assembly has the given display name.
    #[must_use]
    pub fn new(target_assembly_name: &str, assemblies: Vec<AssemblyDescriptor>) -> Self {
        Self {
            target_assembly_name: target_assembly_name.to_string(),
            assemblies: assemblies.into_iter().map(Arc::new).collect(),
            broken_assemblies: Vec::new(),
        }
    }

    /// Returns the provider with an assembly that fails to load.
    #[must_use]
    pub fn with_broken_assembly(mut self, name: &str) -> Self {
        self.broken_assemblies.push(name.to_string());
        self
    }
}

impl MetadataProvider for InMemoryProvider {
    fn open(&self, _path: &Path) -> Result<Box<dyn ReflectionSession>> {
        Ok(Box::new(self.clone()))
    }
}

impl ReflectionSession for InMemoryProvider {
    fn target_assembly_name(&self) -> &str {
        &self.target_assembly_name
    }

    fn assemblies(&self) -> Vec<Result<Arc<dyn AssemblyInformation>>> {
        let mut assemblies: Vec<Result<Arc<dyn AssemblyInformation>>> = self
            .assemblies
            .iter()
            .map(|a| Ok(Arc::clone(a) as Arc<dyn AssemblyInformation>))
            .collect();
        assemblies.extend(
            self.broken_assemblies
                .iter()
                .map(|name| Err(Error::Provider(format!("failed to load assembly {name}")))),
        );
        assemblies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_descriptor_names() {
        let t = TypeDescriptor::new("App", "App.Views", "MainView");
        assert_eq!(t.full_name, "App.Views.MainView");
        assert_eq!(t.assembly_qualified_name, "App.Views.MainView, App");

        let global = TypeDescriptor::new("App", "", "Program");
        assert_eq!(global.full_name(), "Program");
        assert!(global.base_type().is_none());
    }

    #[test]
    fn test_base_chain() {
        let base = Arc::new(TypeDescriptor::new("Fx", "Fx", "Control"));
        let derived = TypeDescriptor::new("Fx", "Fx", "Button").with_base(&base);
        let chain = derived.base_type().unwrap();
        assert_eq!(chain.full_name(), "Fx.Control");
    }

    #[test]
    fn test_broken_entries() {
        let assembly = AssemblyDescriptor::new("Fx")
            .with_type(TypeDescriptor::new("Fx", "Fx", "Ok"))
            .with_broken_type("Fx.Broken");
        let types = assembly.types();
        assert_eq!(types.len(), 2);
        assert!(types[0].is_ok());
        assert!(matches!(types[1], Err(Error::Provider(_))));

        let provider = InMemoryProvider::new("App", vec![assembly]).with_broken_assembly("Gone");
        let session = provider.open(Path::new("App.dll")).unwrap();
        let assemblies = session.assemblies();
        assert_eq!(assemblies.len(), 2);
        assert!(assemblies[1].is_err());
    }
}

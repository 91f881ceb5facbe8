//! Metadata model builder.
//!
//! [`MetadataBuilder`] turns the raw facts of a [`ReflectionSession`] into a [`Metadata`] model
//! in four passes:
//!
//! 1. **Seed** - language intrinsics that no assembly declares: `x:Class`, `x:Name`, `x:Key`,
//!    `x:DataType`, `x:CompileBindings`, a few parameterless extensions and the `Boolean` / `Type`
//!    primitives.
//! 2. **Register** - every type an assembly exposes to the target becomes a [`MetadataType`] and
//!    is registered under `clr-namespace:<ns>;assembly=<asm>`, `using:<ns>` and every XML
//!    namespace the assembly maps to `<ns>`.
//! 3. **Walk** - each registered type collects members along its base-type chain; attached
//!    members are synthesized at the declaring level only.
//! 4. **Post-process** - framework conventions that reflection cannot reveal: the binding-path
//!    pseudo type, `{x:Type}` retyping, settable `Style.TargetType`, hint values from static
//!    constant containers and the `x:TypeArguments` directive.
//!
//! A type or assembly the provider fails to load is logged and skipped; building never fails.

use std::{collections::HashMap, sync::Arc};

use rayon::prelude::*;

use crate::{
    metadata::{
        identity::{AssemblyIdentity, InternalsVisibleTo},
        members::{MetadataEvent, MetadataField, MetadataProperty},
        model::Metadata,
        profile::{FrameworkProfile, HintMembers},
        provider::{
            AssemblyInformation, FieldInfo, MethodInfo, ReflectionSession, TypeAttributes,
            TypeInformation, Visibility,
        },
        token::TypeToken,
        types::{CtorArgument, HintValuesFn, MetadataType, TemplatePart, TypeFlags},
    },
    Result,
};

/// Full name of the reserved binding-path pseudo type.
pub const BINDING_PATH_TYPE: &str = "{BindingPath}";

const BOOLEAN_TYPE: &str = "System.Boolean";
pub(crate) const TYPE_TYPE: &str = "System.Type";
const OBJECT_TYPE: &str = "System.Object";
const STRING_TYPE: &str = "System.String";
const NULLABLE_PREFIX: &str = "System.Nullable`1";
const MARKUP_EXTENSION_INTERFACE: &str = "IMarkupExtension";
const PLATFORM_EXTENSIONS: &[&str] = &["OnPlatformExtension", "OnFormFactorExtension"];
const BINDING_PATH_PROPERTIES: &[&str] = &["Path", "FallbackValue", "TargetNullValue"];

/// Hint values a markup extension takes over from its constructor parameter type.
type CtorHints = (Vec<String>, Option<HintValuesFn>);

/// Builds a [`Metadata`] model from a reflection session.
///
/// # Examples
///
/// ```rust
/// use xamlscope::metadata::{
///     provider::{
///         AssemblyDescriptor, InMemoryProvider, MetadataProvider, TypeAttributes, TypeDescriptor,
///     },
///     FrameworkProfile, MetadataBuilder,
/// };
///
/// let provider = InMemoryProvider::new(
///     "App",
///     vec![AssemblyDescriptor::new("App").with_type(
///         TypeDescriptor::new("App", "App", "MainPage").with_attributes(TypeAttributes::PUBLIC),
///     )],
/// );
/// let session = provider.open("App.dll".as_ref())?;
/// let metadata = MetadataBuilder::new(FrameworkProfile::default()).build(session.as_ref());
///
/// assert!(metadata.namespace("using:App").is_some());
/// assert_eq!(metadata.target_assembly_name(), Some("App"));
/// # Ok::<(), xamlscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataBuilder {
    profile: FrameworkProfile,
}

impl MetadataBuilder {
    /// Create a builder for the given framework conventions.
    #[must_use]
    pub fn new(profile: FrameworkProfile) -> Self {
        Self { profile }
    }

    /// Build the model of everything the session exposes.
    #[must_use]
    pub fn build(&self, session: &dyn ReflectionSession) -> Metadata {
        let mut state = BuildState::new(self.profile);
        state.seed();

        let assemblies: Vec<Arc<dyn AssemblyInformation>> = session
            .assemblies()
            .into_iter()
            .filter_map(|assembly| match assembly {
                Ok(assembly) => Some(assembly),
                Err(error) => {
                    log::warn!("Skipping assembly: {error}");
                    None
                }
            })
            .collect();

        let target_name = AssemblyIdentity::parse(session.target_assembly_name())
            .map_or_else(|_| session.target_assembly_name().to_string(), |id| id.name);
        state.metadata.set_target_assembly_name(target_name.clone());

        let target_key = assemblies
            .iter()
            .find(|assembly| assembly.name() == target_name)
            .map(|assembly| assembly.public_key().to_vec())
            .unwrap_or_default();

        let loaded: Vec<(Arc<dyn AssemblyInformation>, Vec<Result<Arc<dyn TypeInformation>>>)> =
            assemblies
                .par_iter()
                .map(|assembly| (Arc::clone(assembly), assembly.types()))
                .collect();

        for (assembly, types) in loaded {
            let exposes_internals = assembly.name() == target_name
                || assembly.display_name() == session.target_assembly_name()
                || grants_internals(assembly.as_ref(), &target_name, &target_key);
            state.register_assembly(assembly.as_ref(), types, exposes_internals);
        }

        state.walk_types();
        state.post_process();

        log::debug!(
            "Built metadata for {}: {} types in {} namespaces",
            target_name,
            state.metadata.len(),
            state.metadata.namespaces().count()
        );
        state.metadata
    }
}

fn grants_internals(assembly: &dyn AssemblyInformation, target: &str, target_key: &[u8]) -> bool {
    assembly.internals_visible_to().iter().any(|grant| {
        match InternalsVisibleTo::parse(grant) {
            Ok(grant) => grant.grants(target, target_key),
            Err(error) => {
                log::debug!("Ignoring grant '{grant}' of {}: {error}", assembly.name());
                false
            }
        }
    })
}

fn is_markup_extension(info: &dyn TypeInformation) -> bool {
    let implements = |t: &dyn TypeInformation| {
        t.interfaces()
            .iter()
            .any(|i| i.rsplit('.').next() == Some(MARKUP_EXTENSION_INTERFACE))
    };

    if implements(info) {
        return true;
    }
    let mut current = info.base_type();
    while let Some(def) = current {
        if implements(def.as_ref()) {
            return true;
        }
        current = def.base_type();
    }

    (info.full_name().ends_with("Extension")
        && info.methods().iter().any(|m| m.name == "ProvideValue"))
        || PLATFORM_EXTENSIONS.contains(&info.name())
}

fn resource_uris(assembly: &str) -> Vec<String> {
    vec![format!("avares://{assembly}/")]
}

fn generic_only(element: &MetadataType) -> bool {
    element.is_generic()
}

/// Type argument of a nullable type name, in angle-bracket or reflection notation.
fn nullable_argument(name: &str) -> Option<&str> {
    let prefix = name.get(..NULLABLE_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(NULLABLE_PREFIX) {
        return None;
    }
    let rest = &name[NULLABLE_PREFIX.len()..];
    if let Some(inner) = rest.strip_prefix('<') {
        return inner.strip_suffix('>').map(str::trim);
    }
    let inner = rest.strip_prefix("[[")?;
    let end = inner.find("]]")?;
    inner[..end].split(',').next().map(str::trim)
}

struct BuildState {
    profile: FrameworkProfile,
    metadata: Metadata,
    seeded: usize,
    definitions: Vec<(TypeToken, Arc<dyn TypeInformation>, bool)>,
    nullables: HashMap<String, TypeToken>,
}

impl BuildState {
    fn new(profile: FrameworkProfile) -> Self {
        Self {
            profile,
            metadata: Metadata::new(profile),
            seeded: 0,
            definitions: Vec::new(),
            nullables: HashMap::new(),
        }
    }

    fn token(&self, full_name: &str) -> Option<TypeToken> {
        self.metadata.token_by_full_name(full_name)
    }

    fn seed(&mut self) {
        let boolean = self.metadata.push_type(
            MetadataType::new("Boolean")
                .with_full_name(BOOLEAN_TYPE)
                .with_hint_values(["True", "False"]),
        );
        let type_type = self
            .metadata
            .push_type(MetadataType::new("Type").with_full_name(TYPE_TYPE));

        let directive = |name: &str| MetadataType::new(name).with_flags(TypeFlags::XAML_DIRECTIVE);
        let extension =
            |name: &str| MetadataType::new(name).with_flags(TypeFlags::MARKUP_EXTENSION);
        let intrinsics = [
            extension("NullExtension").with_flags(TypeFlags::HAS_SET_PROPERTIES),
            directive("Class"),
            directive("Name"),
            directive("Key"),
            directive("DataType").with_property(
                MetadataProperty::new("", Some(type_type), None).with_accessors(false, true),
            ),
            directive("CompileBindings").with_property(
                MetadataProperty::new("", Some(boolean), None).with_accessors(false, true),
            ),
            extension("True"),
            extension("False"),
            extension("String"),
        ];

        let xaml = self.profile.xaml_namespace;
        for intrinsic in intrinsics {
            let token = self.metadata.push_type(intrinsic);
            self.metadata.add_type(xaml, token);
        }
        self.seeded = self.metadata.len();
    }

    fn namespace_aliases(
        &self,
        assembly: &dyn AssemblyInformation,
    ) -> HashMap<String, Vec<String>> {
        let mut aliases: HashMap<String, Vec<String>> = HashMap::new();
        for attribute in assembly
            .custom_attributes()
            .iter()
            .filter(|a| a.type_full_name == self.profile.xmlns_definition_attribute)
        {
            let (Some(xml_namespace), Some(clr_namespace)) =
                (attribute.arguments.first(), attribute.arguments.get(1))
            else {
                continue;
            };
            let entry = aliases.entry(clr_namespace.clone()).or_default();
            if !entry.contains(xml_namespace) {
                entry.push(xml_namespace.clone());
            }
        }
        aliases
    }

    fn register_assembly(
        &mut self,
        assembly: &dyn AssemblyInformation,
        types: Vec<Result<Arc<dyn TypeInformation>>>,
        exposes_internals: bool,
    ) {
        let mut aliases = self.namespace_aliases(assembly);

        for info in types {
            let info = match info {
                Ok(info) => info,
                Err(error) => {
                    log::warn!("Skipping type of {}: {error}", assembly.name());
                    continue;
                }
            };

            let attributes = info.attributes();
            let exposed = if exposes_internals {
                info.name() != "<Module>"
                    && !attributes.contains(TypeAttributes::INTERFACE)
                    && !attributes.contains(TypeAttributes::ABSTRACT)
            } else {
                attributes.contains(TypeAttributes::PUBLIC)
                    && !attributes.contains(TypeAttributes::INTERFACE)
            };
            if !exposed {
                continue;
            }

            let token = self.convert(info.as_ref());
            self.definitions
                .push((token, Arc::clone(&info), exposes_internals));

            let namespace = info.namespace();
            self.metadata.add_type(
                &format!("clr-namespace:{namespace};assembly={}", assembly.name()),
                token,
            );

            let using = format!("using:{namespace}");
            let ns_aliases = aliases.entry(namespace.to_string()).or_default();
            if !ns_aliases.contains(&using) {
                ns_aliases.push(using);
            }
            for alias in ns_aliases.iter() {
                self.metadata.add_type(alias, token);
            }
        }
    }

    fn convert(&mut self, info: &dyn TypeInformation) -> TypeToken {
        let attributes = info.attributes();
        let mut flags = TypeFlags::empty();
        flags.set(TypeFlags::STATIC, attributes.contains(TypeAttributes::STATIC));
        flags.set(TypeFlags::ABSTRACT, attributes.contains(TypeAttributes::ABSTRACT));
        flags.set(TypeFlags::ENUM, attributes.contains(TypeAttributes::ENUM));
        flags.set(TypeFlags::GENERIC, attributes.contains(TypeAttributes::GENERIC));
        flags.set(TypeFlags::MARKUP_EXTENSION, is_markup_extension(info));
        flags.set(
            TypeFlags::COMPOSITE_VALUE,
            self.profile.composite_value_types.contains(&info.full_name()),
        );

        // Reflected primitives complete the seeded ones
        if let Some(token) = self.token(info.full_name()) {
            if token.index() < self.seeded {
                if let Some(seeded) = self.metadata.get_mut(token) {
                    seeded.assembly_qualified_name = info.assembly_qualified_name().to_string();
                    seeded.flags |= flags;
                }
                return token;
            }
        }

        let mut metadata_type = MetadataType::new(info.name()).with_full_name(info.full_name());
        metadata_type.assembly_qualified_name = info.assembly_qualified_name().to_string();
        metadata_type.flags = flags;
        if flags.contains(TypeFlags::ENUM) {
            metadata_type.hint_values = info.enum_values().to_vec();
        }
        if self.profile.resource_uri_types.contains(&info.full_name()) {
            metadata_type.hint_values_fn = Some(resource_uris);
        }
        self.metadata.push_type(metadata_type)
    }

    /// Resolve a reflected type name, creating a cached nullable wrapper when needed.
    fn resolve(&mut self, name: &str) -> Option<TypeToken> {
        if let Some(token) = self.token(name) {
            return Some(token);
        }
        if let Some(token) = self.nullables.get(name) {
            return Some(*token);
        }

        let underlying = self.token(nullable_argument(name)?)?;
        let inner = self.metadata.get(underlying)?;
        let mut wrapper = MetadataType::new(name)
            .with_full_name(format!("{NULLABLE_PREFIX}<{}>", inner.full_name))
            .with_flags(TypeFlags::NULLABLE);
        wrapper.assembly_qualified_name = inner.assembly_qualified_name.clone();
        wrapper.underlying_type = Some(underlying);

        let token = self.metadata.push_type(wrapper);
        self.nullables.insert(name.to_string(), token);
        Some(token)
    }

    fn walk_types(&mut self) {
        let definitions = std::mem::take(&mut self.definitions);
        for (token, info, exposes_internals) in &definitions {
            self.walk_type(*token, info, *exposes_internals);
        }
        self.definitions = definitions;
    }

    #[allow(clippy::too_many_lines)]
    fn walk_type(&mut self, token: TypeToken, info: &Arc<dyn TypeInformation>, internals: bool) {
        let is_static = info.attributes().contains(TypeAttributes::STATIC);
        let mut properties = Vec::new();
        let mut events = Vec::new();
        let mut fields = Vec::new();
        let mut pseudo_classes: Vec<String> = Vec::new();
        let mut bindable = false;

        if info.attributes().contains(TypeAttributes::ENUM) {
            for value in info.enum_values() {
                properties.push(
                    MetadataProperty::new(value.as_str(), Some(token), Some(token))
                        .with_static(true)
                        .with_accessors(true, false),
                );
            }
        }

        let template_parts = info
            .template_parts()
            .iter()
            .map(|part| TemplatePart {
                name: part.name.clone(),
                type_name: part.type_name.clone(),
                type_full_name: part.type_full_name.clone(),
                assembly_qualified_name: part.assembly_qualified_name.clone(),
            })
            .collect();

        let mut level = 0;
        let mut current = Some(Arc::clone(info));
        while let Some(def) = current {
            for pseudo_class in def.pseudo_classes() {
                if !pseudo_classes.contains(pseudo_class) {
                    pseudo_classes.push(pseudo_class.clone());
                }
            }

            let declaring = self.token(def.full_name());
            for property in def.properties() {
                let visible = match property.visibility {
                    Visibility::Public => true,
                    Visibility::Internal => internals,
                    Visibility::Private => false,
                };
                if !visible {
                    continue;
                }
                properties.push(
                    MetadataProperty::new(
                        property.name.as_str(),
                        self.resolve(&property.type_full_name),
                        declaring,
                    )
                    .with_static(property.is_static)
                    .with_accessors(property.has_getter, property.has_setter),
                );
            }

            events.extend(
                def.events()
                    .iter()
                    .filter(|e| e.is_public)
                    .map(|e| MetadataEvent {
                        name: e.name.clone(),
                        is_attached: false,
                        handler_parameters: e.handler_parameters.clone(),
                    }),
            );

            for field in def.fields().iter().filter(|f| f.is_public) {
                fields.push(MetadataField {
                    name: field.name.clone(),
                    type_token: self.resolve(&field.type_full_name),
                    declaring_type: declaring,
                    is_static: field.is_static,
                });
            }

            if level == 0 {
                for field in def.fields().iter().filter(|f| f.is_public && f.is_static) {
                    if let Some(property) = self.attached_property(def.as_ref(), field, declaring) {
                        properties.push(property);
                    } else if let Some(event) = self.attached_event(def.as_ref(), field) {
                        events.push(event);
                    } else if is_static && !self.is_member_descriptor(field) {
                        properties.push(
                            MetadataProperty::new(field.name.as_str(), None, Some(token))
                                .with_static(true)
                                .with_accessors(true, false),
                        );
                    }
                }
            }

            if def.full_name() == self.profile.bindable_base_type {
                bindable = true;
            }

            current = def.base_type();
            level += 1;
        }

        let ctor_argument = self.ctor_argument(info.methods());

        let Some(metadata_type) = self.metadata.get_mut(token) else {
            return;
        };
        metadata_type.properties = properties;
        metadata_type.events = events;
        metadata_type.fields = fields;
        metadata_type.pseudo_classes = pseudo_classes;
        metadata_type.template_parts = template_parts;
        metadata_type.flags.set(TypeFlags::BINDABLE_OBJECT, bindable);
        metadata_type.refresh_member_flags();

        if let Some((argument, hints)) = ctor_argument {
            metadata_type.ctor_argument = argument;
            if let Some((values, values_fn)) = hints {
                metadata_type.hint_values = values;
                metadata_type.hint_values_fn = values_fn;
            }
        }
    }

    fn is_member_descriptor(&self, field: &FieldInfo) -> bool {
        self.profile.is_attached_property_field(&field.type_full_name)
            || self.profile.is_routed_event_field(&field.type_full_name)
    }

    /// `<Name>Property` descriptor field plus a static `Get<Name>` accessor.
    fn attached_property(
        &mut self,
        def: &dyn TypeInformation,
        field: &FieldInfo,
        declaring: Option<TypeToken>,
    ) -> Option<MetadataProperty> {
        if !self.profile.is_attached_property_field(&field.type_full_name) {
            return None;
        }
        let name = strip_suffix_ignore_case(&field.name, "Property")?;
        let getter_name = format!("Get{name}");
        let setter_name = format!("Set{name}");

        let getter = def.methods().iter().find(|m| {
            m.is_static
                && m.is_public
                && m.name.eq_ignore_ascii_case(&getter_name)
                && m.parameters.len() == 1
                && m.return_type_full_name.as_deref().is_some_and(|r| !r.is_empty())
        })?;
        let has_setter = def.methods().iter().any(|m| {
            m.is_static
                && m.is_public
                && m.name.eq_ignore_ascii_case(&setter_name)
                && m.parameters.len() == 2
        });

        let return_type = getter.return_type_full_name.clone().unwrap_or_default();
        Some(
            MetadataProperty::new(name, self.resolve(&return_type), declaring)
                .attached()
                .with_accessors(true, has_setter),
        )
    }

    /// `<Name>Event` routed-event field plus a static `Add<Name>Handler` method.
    fn attached_event(
        &self,
        def: &dyn TypeInformation,
        field: &FieldInfo,
    ) -> Option<MetadataEvent> {
        if !self.profile.is_routed_event_field(&field.type_full_name) {
            return None;
        }
        let name = strip_suffix_ignore_case(&field.name, "Event")?;
        let adder = format!("Add{name}Handler");
        let method = def
            .methods()
            .iter()
            .find(|m| m.is_static && m.is_public && m.name == adder)?;

        let handler_parameters = if method.parameters.len() >= 2 {
            vec![
                ("object".to_string(), "sender".to_string()),
                ("RoutedEventArgs".to_string(), "e".to_string()),
            ]
        } else {
            Vec::new()
        };
        Some(MetadataEvent {
            name: name.to_string(),
            is_attached: true,
            handler_parameters,
        })
    }

    /// Positional argument support from public single-parameter instance constructors.
    fn ctor_argument(
        &mut self,
        methods: &[MethodInfo],
    ) -> Option<(CtorArgument, Option<CtorHints>)> {
        let ctors: Vec<&MethodInfo> = methods
            .iter()
            .filter(|m| {
                m.is_public && !m.is_static && m.is_constructor() && m.parameters.len() == 1
            })
            .collect();
        let first = ctors.first()?;

        let first_type = first.parameters[0].type_full_name.clone();
        if let Some(parameter_type) = self.resolve(&first_type).and_then(|t| self.metadata.get(t)) {
            if parameter_type.has_hint_values() {
                return Some((
                    CtorArgument::HintValues,
                    Some((
                        parameter_type.hint_values.clone(),
                        parameter_type.hint_values_fn,
                    )),
                ));
            }
        }

        let support_type = ctors
            .iter()
            .any(|m| m.parameters[0].type_full_name == TYPE_TYPE);
        let support_object = ctors.iter().any(|m| {
            let name = &m.parameters[0].type_full_name;
            name == OBJECT_TYPE || name == STRING_TYPE
        });

        let argument = match (support_type, support_object) {
            (true, true) => CtorArgument::TypeAndObject,
            (true, false) => CtorArgument::Type,
            (false, true) => CtorArgument::Object,
            (false, false) => return None,
        };
        Some((argument, None))
    }

    fn post_process(&mut self) {
        let type_type = self.token(TYPE_TYPE);

        let binding_path = self.metadata.push_type(
            MetadataType::new(BINDING_PATH_TYPE).with_flags(TypeFlags::BINDING_PATH),
        );

        for name in self.profile.binding_extensions {
            let Some(token) = self.token(name) else {
                continue;
            };
            if let Some(binding) = self.metadata.get_mut(token) {
                binding.ctor_argument = CtorArgument::None;
                for property in &mut binding.properties {
                    if BINDING_PATH_PROPERTIES.contains(&property.name.as_str()) {
                        property.type_token = Some(binding_path);
                    }
                }
                binding
                    .properties
                    .push(MetadataProperty::new("", Some(binding_path), Some(token)));
            }
        }

        if let Some(token) = self.token(self.profile.type_extension) {
            if let Some(type_extension) = self.metadata.get_mut(token) {
                if type_extension.properties.len() == 1
                    && type_extension.properties[0].name == "TypeName"
                {
                    type_extension.properties[0] =
                        MetadataProperty::new("TypeName", type_type, Some(token));
                }
            }
        }

        if let Some(token) = self.token(self.profile.style_type) {
            if let Some(style) = self.metadata.get_mut(token) {
                if let Some(index) = style.properties.iter().position(|p| p.name == "TargetType") {
                    let mut target_type = style.properties.remove(index);
                    target_type.has_setter = true;
                    style.properties.push(target_type);
                    style.refresh_member_flags();
                }
            }
        }

        for source in self.profile.hint_sources {
            let (Some(target), Some(container)) = (
                self.token(source.target),
                self.metadata.type_by_full_name(source.source),
            ) else {
                continue;
            };
            let hints: Vec<String> = match source.members {
                HintMembers::StaticFields => container
                    .fields
                    .iter()
                    .filter(|f| f.is_static)
                    .map(|f| f.name.clone())
                    .collect(),
                HintMembers::StaticProperties => container
                    .properties
                    .iter()
                    .filter(|p| p.is_static)
                    .map(|p| p.name.clone())
                    .collect(),
            };
            if let Some(target) = self.metadata.get_mut(target) {
                target.hint_values = hints;
            }
        }

        if type_type.is_some() {
            let mut type_arguments = MetadataType::new("TypeArguments")
                .with_flags(TypeFlags::XAML_DIRECTIVE)
                .with_property(
                    MetadataProperty::new("", type_type, None).with_accessors(false, true),
                );
            type_arguments.directive_filter = Some(generic_only);
            let token = self.metadata.push_type(type_arguments);
            self.metadata.add_type(self.profile.xaml_namespace, token);
        }
    }
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    let tail = name.get(split..)?;
    if split > 0 && tail.eq_ignore_ascii_case(suffix) {
        name.get(..split)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::provider::{
        AssemblyDescriptor, CustomAttributeInfo, EventInfo, InMemoryProvider,
        MetadataProvider, PropertyInfo, TypeDescriptor,
    };
    use std::path::Path;

    fn build(provider: &InMemoryProvider, profile: FrameworkProfile) -> Metadata {
        let session = provider.open(Path::new("App.dll")).unwrap();
        MetadataBuilder::new(profile).build(session.as_ref())
    }

    #[test]
    fn test_nullable_argument() {
        assert_eq!(
            nullable_argument("System.Nullable`1<System.Int32>"),
            Some("System.Int32")
        );
        assert_eq!(
            nullable_argument("System.Nullable`1[[App.Dock, App, Version=1.0.0.0]]"),
            Some("App.Dock")
        );
        assert_eq!(nullable_argument("System.Int32"), None);
        assert_eq!(nullable_argument("Sys"), None);
    }

    #[test]
    fn test_strip_suffix() {
        assert_eq!(strip_suffix_ignore_case("RowProperty", "Property"), Some("Row"));
        assert_eq!(strip_suffix_ignore_case("Rowproperty", "Property"), Some("Row"));
        assert_eq!(strip_suffix_ignore_case("Property", "Property"), None);
        assert_eq!(strip_suffix_ignore_case("Row", "Property"), None);
    }

    #[test]
    fn test_seeded_intrinsics() {
        let metadata = build(&InMemoryProvider::default(), FrameworkProfile::default());
        let xaml = metadata
            .namespace("http://schemas.microsoft.com/winfx/2006/xaml")
            .unwrap();
        for name in ["Class", "Name", "Key", "DataType", "CompileBindings", "TypeArguments"] {
            let t = metadata.get(xaml[name]).unwrap();
            assert!(t.is_xaml_directive(), "{name}");
        }
        for name in ["NullExtension", "True", "False", "String"] {
            assert!(metadata.get(xaml[name]).unwrap().is_markup_extension(), "{name}");
        }
        let type_arguments = metadata.get(xaml["TypeArguments"]).unwrap();
        assert!(type_arguments.directive_filter.is_some());
        assert_eq!(
            metadata.type_by_full_name("System.Boolean").unwrap().hint_values,
            vec!["True", "False"]
        );
        assert!(metadata.type_by_full_name(BINDING_PATH_TYPE).unwrap().is_binding_path());
    }

    #[test]
    fn test_visibility_filter() {
        let lib = AssemblyDescriptor::new("Lib")
            .with_type(
                TypeDescriptor::new("Lib", "Lib", "Public").with_attributes(TypeAttributes::PUBLIC),
            )
            .with_type(TypeDescriptor::new("Lib", "Lib", "Hidden"))
            .with_type(
                TypeDescriptor::new("Lib", "Lib", "IThing")
                    .with_attributes(TypeAttributes::PUBLIC | TypeAttributes::INTERFACE),
            );
        let app = AssemblyDescriptor::new("App")
            .with_type(TypeDescriptor::new("App", "App", "Internal"))
            .with_type(
                TypeDescriptor::new("App", "App", "Base").with_attributes(TypeAttributes::ABSTRACT),
            )
            .with_type(TypeDescriptor::new("App", "", "<Module>"));
        let metadata = build(
            &InMemoryProvider::new("App", vec![app, lib]),
            FrameworkProfile::default(),
        );

        let lib_ns = metadata.namespace("clr-namespace:Lib;assembly=Lib").unwrap();
        assert!(lib_ns.contains_key("Public"));
        assert!(!lib_ns.contains_key("Hidden"));
        assert!(!lib_ns.contains_key("IThing"));

        let app_ns = metadata.namespace("using:App").unwrap();
        assert!(app_ns.contains_key("Internal"));
        assert!(!app_ns.contains_key("Base"));
        assert!(metadata.type_by_full_name("<Module>").is_none());
    }

    #[test]
    fn test_internals_visible_to() {
        let key = [1u8, 2, 3];
        let friendly = AssemblyDescriptor::new("Friend")
            .with_internals_visible_to("App, PublicKey=010203")
            .with_type(TypeDescriptor::new("Friend", "Friend", "Secret"));
        let wrong_key = AssemblyDescriptor::new("Other")
            .with_internals_visible_to("App, PublicKey=0a0b")
            .with_type(TypeDescriptor::new("Other", "Other", "Secret"));
        let app = AssemblyDescriptor::new("App").with_public_key(&key);

        let metadata = build(
            &InMemoryProvider::new("App", vec![app, friendly, wrong_key]),
            FrameworkProfile::default(),
        );
        assert!(metadata.type_by_full_name("Friend.Secret").is_some());
        assert!(metadata.type_by_full_name("Other.Secret").is_none());
    }

    /// A key-bound grant needs the target's own key, not that of another loaded assembly.
    #[test]
    fn test_internals_visible_to_without_target() {
        let dependency = AssemblyDescriptor::new("Dep").with_public_key(&[1, 2, 3]);
        let friendly = AssemblyDescriptor::new("Friend")
            .with_internals_visible_to("App, PublicKey=010203")
            .with_type(TypeDescriptor::new("Friend", "Friend", "Secret"));

        let provider = InMemoryProvider::new("App", vec![dependency, friendly])
            .with_broken_assembly("App");
        let metadata = build(&provider, FrameworkProfile::default());
        assert!(metadata.type_by_full_name("Friend.Secret").is_none());
    }

    #[test]
    fn test_xmlns_definition_aliases() {
        let profile = FrameworkProfile::avalonia();
        let lib = AssemblyDescriptor::new("Avalonia.Controls")
            .with_custom_attribute(CustomAttributeInfo::new(
                profile.xmlns_definition_attribute,
                &["https://github.com/avaloniaui", "Avalonia.Controls"],
            ))
            .with_type(
                TypeDescriptor::new("Avalonia.Controls", "Avalonia.Controls", "Button")
                    .with_attributes(TypeAttributes::PUBLIC),
            );
        let metadata = build(
            &InMemoryProvider::new("App", vec![AssemblyDescriptor::new("App"), lib]),
            profile,
        );

        let button = metadata.token_by_full_name("Avalonia.Controls.Button").unwrap();
        for ns in [
            "https://github.com/avaloniaui",
            "using:Avalonia.Controls",
            "clr-namespace:Avalonia.Controls;assembly=Avalonia.Controls",
        ] {
            assert_eq!(
                metadata.namespace(ns).and_then(|n| n.get("Button")),
                Some(&button),
                "{ns}"
            );
        }
    }

    #[test]
    fn test_member_walk() {
        let profile = FrameworkProfile::avalonia();
        let object = Arc::new(
            TypeDescriptor::new("Avalonia.Base", "Avalonia", "AvaloniaObject")
                .with_attributes(TypeAttributes::PUBLIC)
                .with_property(
                    PropertyInfo::new("Secret", "System.String")
                        .with_visibility(Visibility::Internal),
                ),
        );
        let control = Arc::new(
            TypeDescriptor::new("Avalonia.Base", "Avalonia.Controls", "Control")
                .with_attributes(TypeAttributes::PUBLIC)
                .with_base(&object)
                .with_pseudo_classes(&[":pointerover", ":focus"])
                .with_property(PropertyInfo::new("Width", "System.Double"))
                .with_event(EventInfo::new("Tapped"))
                .with_field(FieldInfo::public_static(
                    "WidthProperty",
                    "Avalonia.StyledProperty`1<System.Double>",
                )),
        );
        let button = TypeDescriptor::new("Avalonia.Base", "Avalonia.Controls", "Button")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_base(&control)
            .with_pseudo_classes(&[":pressed", ":pointerover"])
            .with_property(PropertyInfo::new("IsDefault", "System.Boolean"))
            .with_property(
                PropertyInfo::new("Hidden", "System.Boolean").with_visibility(Visibility::Private),
            );
        let assembly = AssemblyDescriptor::new("Avalonia.Base")
            .with_shared_type(&object)
            .with_shared_type(&control)
            .with_type(button);
        let metadata = build(
            &InMemoryProvider::new("App", vec![AssemblyDescriptor::new("App"), assembly]),
            profile,
        );

        let button = metadata.type_by_full_name("Avalonia.Controls.Button").unwrap();
        let names: Vec<&str> = button.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["IsDefault", "Width"]);
        assert_eq!(button.pseudo_classes, vec![":pressed", ":pointerover", ":focus"]);
        assert!(button.is_bindable_object());
        assert!(button.has_set_properties());
        assert_eq!(button.events.len(), 1);
        assert_eq!(button.fields.len(), 1);

        let is_default = button.property("IsDefault").unwrap();
        assert_eq!(
            metadata.get(is_default.type_token.unwrap()).unwrap().hint_values,
            vec!["True", "False"]
        );
        assert_eq!(
            is_default.declaring_type,
            metadata.token_by_full_name("Avalonia.Controls.Button")
        );
    }

    #[test]
    fn test_attached_members() {
        let profile = FrameworkProfile::avalonia();
        let grid = TypeDescriptor::new("Avalonia.Controls", "Avalonia.Controls", "Grid")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_field(FieldInfo::public_static(
                "RowProperty",
                "Avalonia.AttachedProperty`1<System.Int32>",
            ))
            .with_method(
                MethodInfo::new("GetRow")
                    .with_static()
                    .with_parameter("element", "Avalonia.Controls.Control")
                    .returning("System.Int32"),
            )
            .with_method(
                MethodInfo::new("SetRow")
                    .with_static()
                    .with_parameter("element", "Avalonia.Controls.Control")
                    .with_parameter("value", "System.Int32"),
            )
            .with_field(FieldInfo::public_static(
                "IsSharedSizeScopeProperty",
                "Avalonia.AttachedProperty`1<System.Boolean>",
            ))
            .with_method(
                MethodInfo::new("GetIsSharedSizeScope")
                    .with_static()
                    .with_parameter("element", "Avalonia.Controls.Control")
                    .returning("System.Boolean"),
            )
            .with_field(FieldInfo::public_static(
                "OrphanProperty",
                "Avalonia.AttachedProperty`1<System.Int32>",
            ));
        let gestures = TypeDescriptor::new("Avalonia.Base", "Avalonia.Input", "Gestures")
            .with_attributes(TypeAttributes::PUBLIC | TypeAttributes::STATIC)
            .with_field(FieldInfo::public_static(
                "TappedEvent",
                "Avalonia.Interactivity.RoutedEvent`1<X>",
            ))
            .with_method(
                MethodInfo::new("AddTappedHandler")
                    .with_static()
                    .with_parameter("element", "Avalonia.Interactivity.Interactive")
                    .with_parameter("handler", "System.EventHandler"),
            )
            .with_field(FieldInfo::public_static("Threshold", "System.Double"));
        let metadata = build(
            &InMemoryProvider::new(
                "App",
                vec![
                    AssemblyDescriptor::new("App"),
                    AssemblyDescriptor::new("Avalonia.Controls")
                        .with_type(grid)
                        .with_type(gestures),
                ],
            ),
            profile,
        );

        let grid = metadata.type_by_full_name("Avalonia.Controls.Grid").unwrap();
        assert!(grid.has_attached_properties());
        let row = grid.property("Row").unwrap();
        assert!(row.is_attached && row.has_setter);
        let scope = grid.property("IsSharedSizeScope").unwrap();
        assert!(scope.is_attached && !scope.has_setter);
        assert!(grid.property("Orphan").is_none());

        let gestures = metadata.type_by_full_name("Avalonia.Input.Gestures").unwrap();
        assert!(gestures.has_attached_events());
        assert!(gestures.event("Tapped").unwrap().is_attached);
        let threshold = gestures.property("Threshold").unwrap();
        assert!(threshold.is_static && threshold.type_token.is_none());
        assert!(gestures.property("TappedEvent").is_none());
    }

    #[test]
    fn test_markup_extension_and_ctor() {
        let dock = TypeDescriptor::new("Lib", "Lib", "Dock")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_enum_values(&["Left", "Right"]);
        let by_interface = TypeDescriptor::new("Lib", "Lib", "Dynamic")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_interface("Lib.Xaml.IMarkupExtension")
            .with_method(MethodInfo::constructor(&["System.Type"]))
            .with_method(MethodInfo::constructor(&["System.String"]));
        let by_convention = TypeDescriptor::new("Lib", "Lib", "StaticExtension")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_method(MethodInfo::new("ProvideValue"))
            .with_method(MethodInfo::constructor(&["System.String"]));
        let with_hints = TypeDescriptor::new("Lib", "Lib", "DockExtension")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_method(MethodInfo::new("ProvideValue"))
            .with_method(MethodInfo::constructor(&["Lib.Dock"]));
        let platform = TypeDescriptor::new("Lib", "Lib", "OnPlatformExtension")
            .with_attributes(TypeAttributes::PUBLIC);
        let plain =
            TypeDescriptor::new("Lib", "Lib", "Border").with_attributes(TypeAttributes::PUBLIC);

        let lib = AssemblyDescriptor::new("Lib")
            .with_type(dock)
            .with_type(by_interface)
            .with_type(by_convention)
            .with_type(with_hints)
            .with_type(platform)
            .with_type(plain);
        let metadata = build(
            &InMemoryProvider::new("App", vec![AssemblyDescriptor::new("App"), lib]),
            FrameworkProfile::default(),
        );

        let get = |name: &str| metadata.type_by_full_name(name).unwrap();
        assert!(get("Lib.Dynamic").is_markup_extension());
        assert_eq!(get("Lib.Dynamic").ctor_argument, CtorArgument::TypeAndObject);
        assert_eq!(get("Lib.StaticExtension").ctor_argument, CtorArgument::Object);
        assert_eq!(get("Lib.DockExtension").ctor_argument, CtorArgument::HintValues);
        assert_eq!(get("Lib.DockExtension").hint_values, vec!["Left", "Right"]);
        assert!(get("Lib.OnPlatformExtension").is_markup_extension());
        assert!(!get("Lib.Border").is_markup_extension());

        let dock = get("Lib.Dock");
        assert!(dock.is_enum());
        let left = dock.property("Left").unwrap();
        assert!(left.is_static && !left.has_setter);
        assert_eq!(left.type_token, Some(dock.token));
    }

    #[test]
    fn test_nullable_wrapper_cached() {
        let dock = TypeDescriptor::new("Lib", "Lib", "Dock")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_enum_values(&["Left"]);
        let panel = TypeDescriptor::new("Lib", "Lib", "Panel")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_property(PropertyInfo::new("Dock", "System.Nullable`1<Lib.Dock>"))
            .with_property(PropertyInfo::new("Fallback", "System.Nullable`1<Lib.Dock>"));
        let lib = AssemblyDescriptor::new("Lib").with_type(dock).with_type(panel);
        let metadata = build(
            &InMemoryProvider::new("App", vec![AssemblyDescriptor::new("App"), lib]),
            FrameworkProfile::default(),
        );

        let panel = metadata.type_by_full_name("Lib.Panel").unwrap();
        let first = panel.property("Dock").unwrap().type_token.unwrap();
        let second = panel.property("Fallback").unwrap().type_token.unwrap();
        assert_eq!(first, second);

        let wrapper = metadata.get(first).unwrap();
        assert!(wrapper.is_nullable());
        assert_eq!(wrapper.underlying_type, metadata.token_by_full_name("Lib.Dock"));
    }

    #[test]
    fn test_post_processing() {
        const GRAPHICS: &str = "Microsoft.Maui.Graphics";
        const CONTROLS: &str = "Microsoft.Maui.Controls";
        const XAML: &str = "Microsoft.Maui.Controls.Xaml";

        let colors = TypeDescriptor::new(GRAPHICS, GRAPHICS, "Colors")
            .with_attributes(TypeAttributes::PUBLIC | TypeAttributes::STATIC)
            .with_field(FieldInfo::public_static("Red", "Microsoft.Maui.Graphics.Color"))
            .with_field(FieldInfo::public_static("Blue", "Microsoft.Maui.Graphics.Color"));
        let color = TypeDescriptor::new(GRAPHICS, GRAPHICS, "Color")
            .with_attributes(TypeAttributes::PUBLIC);
        let binding = TypeDescriptor::new(CONTROLS, XAML, "BindingExtension")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_method(MethodInfo::new("ProvideValue"))
            .with_method(MethodInfo::constructor(&["System.String"]))
            .with_property(PropertyInfo::new("Path", "System.String"))
            .with_property(PropertyInfo::new("Mode", "System.String"));
        let type_ext = TypeDescriptor::new(CONTROLS, XAML, "TypeExtension")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_method(MethodInfo::new("ProvideValue"))
            .with_property(PropertyInfo::new("TypeName", "System.String"));
        let style = TypeDescriptor::new(CONTROLS, CONTROLS, "Style")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_property(PropertyInfo::new("TargetType", "System.Type").read_only())
            .with_property(PropertyInfo::new("Class", "System.String"));
        let metadata = build(
            &InMemoryProvider::new(
                "App",
                vec![
                    AssemblyDescriptor::new("App"),
                    AssemblyDescriptor::new(GRAPHICS).with_type(colors).with_type(color),
                    AssemblyDescriptor::new(CONTROLS)
                        .with_type(binding)
                        .with_type(type_ext)
                        .with_type(style),
                ],
            ),
            FrameworkProfile::maui(),
        );

        let get = |name: &str| metadata.type_by_full_name(name).unwrap();
        assert_eq!(get("Microsoft.Maui.Graphics.Color").hint_values, vec!["Red", "Blue"]);

        let binding = get("Microsoft.Maui.Controls.Xaml.BindingExtension");
        let binding_path = metadata.token_by_full_name(BINDING_PATH_TYPE);
        assert_eq!(binding.ctor_argument, CtorArgument::None);
        assert_eq!(binding.property("Path").unwrap().type_token, binding_path);
        assert_ne!(binding.property("Mode").unwrap().type_token, binding_path);
        assert_eq!(binding.default_property().unwrap().type_token, binding_path);

        let type_ext = get("Microsoft.Maui.Controls.Xaml.TypeExtension");
        assert_eq!(
            type_ext.property("TypeName").unwrap().type_token,
            metadata.token_by_full_name("System.Type")
        );

        let style = get("Microsoft.Maui.Controls.Style");
        assert_eq!(style.properties.last().unwrap().name, "TargetType");
        assert!(style.property("TargetType").unwrap().has_setter);
    }

    #[test]
    fn test_skips_failed_entries() {
        let lib = AssemblyDescriptor::new("Lib")
            .with_type(
                TypeDescriptor::new("Lib", "Lib", "Good").with_attributes(TypeAttributes::PUBLIC),
            )
            .with_broken_type("Lib.Bad");
        let provider = InMemoryProvider::new("App", vec![AssemblyDescriptor::new("App"), lib])
            .with_broken_assembly("Gone");
        let metadata = build(&provider, FrameworkProfile::default());
        assert!(metadata.type_by_full_name("Lib.Good").is_some());
    }

    #[test]
    fn test_resource_uri_hints() {
        let uri =
            TypeDescriptor::new("System", "System", "Uri").with_attributes(TypeAttributes::PUBLIC);
        let include = TypeDescriptor::new("Lib", "Lib", "IncludeExtension")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_method(MethodInfo::new("ProvideValue"))
            .with_method(MethodInfo::constructor(&["System.Uri"]));
        let assemblies = vec![
            AssemblyDescriptor::new("App"),
            AssemblyDescriptor::new("System").with_type(uri),
            AssemblyDescriptor::new("Lib").with_type(include),
        ];
        let metadata = build(
            &InMemoryProvider::new("App", assemblies),
            FrameworkProfile::avalonia(),
        );
        let uri = metadata.type_by_full_name("System.Uri").unwrap();
        let hints = uri.hint_values_fn.map(|f| f("App")).unwrap();
        assert_eq!(hints, vec!["avares://App/"]);

        // Dynamic hints of the constructor parameter carry over to the extension
        let include = metadata.type_by_full_name("Lib.IncludeExtension").unwrap();
        assert_eq!(include.ctor_argument, CtorArgument::HintValues);
        assert!(include.has_hint_values());
        let hints = include.hint_values_fn.map(|f| f("App")).unwrap();
        assert_eq!(hints, vec!["avares://App/"]);
    }
}

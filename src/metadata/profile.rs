//! Framework conventions for metadata building and completion
//!
//! The markup vocabulary is defined by a host UI framework, and a few of its conventions cannot
//! be discovered through reflection: the namespace URIs, the base class of everything that takes
//! part in the attached-member system, which static containers list named constants, and so on.
//! [`FrameworkProfile`] collects them in one value that is handed to the builder and stored in the
//! built [`crate::metadata::Metadata`].

/// Which static members of a container type become hint values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintMembers {
    /// Public static fields (`Colors.Red`, `LayoutOptions.Fill`)
    StaticFields,
    /// Public static properties (`Brush.Red`)
    StaticProperties,
}

/// A static container whose member names are the legal literal values of another type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintSource {
    /// Full name of the type that receives the hint values
    pub target: &'static str,
    /// Full name of the type whose static members are listed
    pub source: &'static str,
    /// Member kind to list
    pub members: HintMembers,
}

/// Conventions of one markup framework
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkProfile {
    /// Human-readable profile name
    pub name: &'static str,

    /// Namespace used when a document declares no default `xmlns`
    pub default_namespace: &'static str,

    /// Namespace of the language intrinsics (`x:Class`, `x:Name`, ...)
    pub xaml_namespace: &'static str,

    /// Assembly attribute mapping an XML namespace URI to a CLR namespace
    pub xmlns_definition_attribute: &'static str,

    /// Base type of everything that participates in the attached-member system
    pub bindable_base_type: &'static str,

    /// Field type prefixes that mark a static field as an attached-property descriptor
    pub attached_property_field_prefixes: &'static [&'static str],

    /// Field type prefixes that mark a static field as a routed-event descriptor.
    /// Empty if the framework has no attached events.
    pub routed_event_field_prefixes: &'static [&'static str],

    /// Full names of the binding markup extensions whose path is data-context aware
    pub binding_extensions: &'static [&'static str],

    /// Full name of the `{x:Type}` markup extension
    pub type_extension: &'static str,

    /// Full name of the style type whose `TargetType` is always settable
    pub style_type: &'static str,

    /// Full name of the selector value type, if the framework styles with selectors
    pub selector_type: Option<&'static str>,

    /// Full names of types whose values are space or comma separated lists
    pub composite_value_types: &'static [&'static str],

    /// Short name of the element type assumed by a `Setter` without any resolvable target
    pub fallback_setter_type: &'static str,

    /// Short names never offered as types
    pub hidden_type_names: &'static [&'static str],

    /// Static containers that provide hint values
    pub hint_sources: &'static [HintSource],

    /// Full names of types whose hint values are `avares://` resource URIs of the target
    /// assembly
    pub resource_uri_types: &'static [&'static str],
}

const HIDDEN_TYPE_NAMES: &[&str] = &["ControlTemplateResult", "DataTemplateExtensions"];

const MAUI_HINT_SOURCES: &[HintSource] = &[
    HintSource {
        target: "Microsoft.Maui.Graphics.Color",
        source: "Microsoft.Maui.Graphics.Colors",
        members: HintMembers::StaticFields,
    },
    HintSource {
        target: "Microsoft.Maui.Controls.Brush",
        source: "Microsoft.Maui.Controls.Brush",
        members: HintMembers::StaticProperties,
    },
    HintSource {
        target: "Microsoft.Maui.Easing",
        source: "Microsoft.Maui.Easing",
        members: HintMembers::StaticFields,
    },
    HintSource {
        target: "Microsoft.Maui.Controls.LayoutOptions",
        source: "Microsoft.Maui.Controls.LayoutOptions",
        members: HintMembers::StaticFields,
    },
];

const AVALONIA_HINT_SOURCES: &[HintSource] = &[
    HintSource {
        target: "Avalonia.Media.Color",
        source: "Avalonia.Media.Colors",
        members: HintMembers::StaticProperties,
    },
    HintSource {
        target: "Avalonia.Media.IBrush",
        source: "Avalonia.Media.Brushes",
        members: HintMembers::StaticProperties,
    },
];

impl Default for FrameworkProfile {
    fn default() -> Self {
        Self::maui()
    }
}

impl FrameworkProfile {
    /// Conventions of .NET MAUI
    #[must_use]
    pub fn maui() -> Self {
        Self {
            name: "maui",
            default_namespace: "http://schemas.microsoft.com/dotnet/2021/maui",
            xaml_namespace: "http://schemas.microsoft.com/winfx/2006/xaml",
            xmlns_definition_attribute: "Microsoft.Maui.Controls.XmlnsDefinitionAttribute",
            bindable_base_type: "Microsoft.Maui.Controls.BindableObject",
            attached_property_field_prefixes: &["Microsoft.Maui.Controls.BindableProperty"],
            routed_event_field_prefixes: &[],
            binding_extensions: &["Microsoft.Maui.Controls.Xaml.BindingExtension"],
            type_extension: "Microsoft.Maui.Controls.Xaml.TypeExtension",
            style_type: "Microsoft.Maui.Controls.Style",
            selector_type: None,
            composite_value_types: &[],
            fallback_setter_type: "VisualElement",
            hidden_type_names: HIDDEN_TYPE_NAMES,
            hint_sources: MAUI_HINT_SOURCES,
            resource_uri_types: &[],
        }
    }

    /// Conventions of Avalonia UI
    #[must_use]
    pub fn avalonia() -> Self {
        Self {
            name: "avalonia",
            default_namespace: "https://github.com/avaloniaui",
            xaml_namespace: "http://schemas.microsoft.com/winfx/2006/xaml",
            xmlns_definition_attribute: "Avalonia.Metadata.XmlnsDefinitionAttribute",
            bindable_base_type: "Avalonia.AvaloniaObject",
            attached_property_field_prefixes: &["Avalonia.AttachedProperty"],
            routed_event_field_prefixes: &["Avalonia.Interactivity.RoutedEvent"],
            binding_extensions: &[
                "Avalonia.Markup.Xaml.MarkupExtensions.BindingExtension",
                "Avalonia.Markup.Xaml.MarkupExtensions.CompiledBindingExtension",
                "Avalonia.Data.Binding",
            ],
            type_extension: "Avalonia.Markup.Xaml.MarkupExtensions.TypeExtension",
            style_type: "Avalonia.Styling.Style",
            selector_type: Some("Avalonia.Styling.Selector"),
            composite_value_types: &["Avalonia.Styling.Selector", "Avalonia.Controls.Classes"],
            fallback_setter_type: "Control",
            hidden_type_names: HIDDEN_TYPE_NAMES,
            hint_sources: AVALONIA_HINT_SOURCES,
            resource_uri_types: &["System.Uri", "Avalonia.Media.IImage"],
        }
    }

    /// Whether a static field of this type declares an attached property
    #[must_use]
    pub fn is_attached_property_field(&self, field_type: &str) -> bool {
        self.attached_property_field_prefixes
            .iter()
            .any(|prefix| field_type.starts_with(prefix))
    }

    /// Whether a static field of this type declares a routed event
    #[must_use]
    pub fn is_routed_event_field(&self, field_type: &str) -> bool {
        self.routed_event_field_prefixes
            .iter()
            .any(|prefix| field_type.starts_with(prefix))
    }

    /// Whether a type is one of the binding markup extensions
    #[must_use]
    pub fn is_binding_extension(&self, full_name: &str) -> bool {
        self.binding_extensions.contains(&full_name)
    }

    /// Whether a short type name is never offered
    #[must_use]
    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden_type_names.contains(&name)
    }
}

//! Shared fixtures for unit tests.
//!
//! [`sample_metadata`] builds a small Avalonia-flavoured model through the regular builder:
//!
//! - `System.Runtime` with the primitives used by member types
//! - `Avalonia` mapping `https://github.com/avaloniaui` onto its controls, styling and markup
//!   extension namespaces
//! - `Sample.App`, the target assembly, with a view and two view models

use std::{path::Path, sync::Arc};

use crate::metadata::{
    provider::{
        AssemblyDescriptor, CustomAttributeInfo, EventInfo, FieldInfo, InMemoryProvider,
        MetadataProvider, MethodInfo, PropertyInfo, TypeAttributes, TypeDescriptor,
    },
    FrameworkProfile, Metadata, MetadataBuilder,
};

const FRAMEWORK: &str = "Avalonia";
const AVALONIA_NS: &str = "https://github.com/avaloniaui";
const XMLNS_DEFINITION: &str = "Avalonia.Metadata.XmlnsDefinitionAttribute";

fn public(assembly: &str, namespace: &str, name: &str) -> TypeDescriptor {
    TypeDescriptor::new(assembly, namespace, name).with_attributes(TypeAttributes::PUBLIC)
}

fn framework(namespace: &str, name: &str) -> TypeDescriptor {
    public(FRAMEWORK, namespace, name)
}

/// Attached property `name` of type `value_type` declared through a descriptor field and
/// static accessors.
fn with_attached(owner: TypeDescriptor, name: &str, value_type: &str) -> TypeDescriptor {
    owner
        .with_field(FieldInfo::public_static(
            format!("{name}Property"),
            format!("Avalonia.AttachedProperty`1<{value_type}>"),
        ))
        .with_method(
            MethodInfo::new(format!("Get{name}"))
                .with_static()
                .with_parameter("element", "Avalonia.Controls.Control")
                .returning(value_type),
        )
        .with_method(
            MethodInfo::new(format!("Set{name}"))
                .with_static()
                .with_parameter("element", "Avalonia.Controls.Control")
                .with_parameter("value", value_type),
        )
}

fn system_assembly() -> AssemblyDescriptor {
    ["Object", "String", "Int32", "Double", "Uri"]
        .iter()
        .fold(AssemblyDescriptor::new("System.Runtime"), |assembly, name| {
            assembly.with_type(public("System.Runtime", "System", name))
        })
}

#[allow(clippy::too_many_lines)]
fn framework_assembly() -> AssemblyDescriptor {
    let object = Arc::new(framework("Avalonia", "AvaloniaObject"));
    let control = Arc::new(
        framework("Avalonia.Controls", "Control")
            .with_base(&object)
            .with_property(PropertyInfo::new("Width", "System.Double"))
            .with_property(PropertyInfo::new("IsEnabled", "System.Boolean"))
            .with_property(PropertyInfo::new("Name", "System.String"))
            .with_property(PropertyInfo::new("DataContext", "System.Object"))
            .with_property(PropertyInfo::new("Classes", "Avalonia.Controls.Classes"))
            .with_property(PropertyInfo::new("Dock", "Avalonia.Controls.Dock"))
            .with_event(EventInfo::new("PointerPressed"))
            .with_pseudo_classes(&[":pointerover", ":focus", ":disabled"]),
    );
    let presenter = Arc::new(
        framework("Avalonia.Controls", "ContentPresenter")
            .with_base(&control)
            .with_property(PropertyInfo::new("Content", "System.Object")),
    );
    let button = Arc::new(
        framework("Avalonia.Controls", "Button")
            .with_base(&control)
            .with_property(PropertyInfo::new("Content", "System.Object"))
            .with_property(PropertyInfo::new("IsPressed", "System.Boolean").read_only())
            .with_property(PropertyInfo::new("Foreground", "Avalonia.Media.Color"))
            .with_event(EventInfo::new("Click"))
            .with_pseudo_classes(&[":pressed", ":PointerOver"])
            .with_template_part("PART_ContentPresenter", &presenter),
    );
    let grid = with_attached(
        with_attached(framework("Avalonia.Controls", "Grid").with_base(&control), "Column", "System.Int32"),
        "Row",
        "System.Int32",
    )
    .with_property(PropertyInfo::new("RowDefinitions", "System.String"));
    let dock_panel = with_attached(
        framework("Avalonia.Controls", "DockPanel").with_base(&control),
        "Dock",
        "Avalonia.Controls.Dock",
    );
    let gestures = framework("Avalonia.Input", "Gestures")
        .with_attributes(TypeAttributes::STATIC)
        .with_field(FieldInfo::public_static(
            "TappedEvent",
            "Avalonia.Interactivity.RoutedEvent`1<Avalonia.Interactivity.RoutedEventArgs>",
        ))
        .with_method(
            MethodInfo::new("AddTappedHandler")
                .with_static()
                .with_parameter("element", "Avalonia.Controls.Control")
                .with_parameter("handler", "System.EventHandler"),
        );
    let extension = |name: &str| {
        framework("Avalonia.Markup.Xaml.MarkupExtensions", name)
            .with_method(MethodInfo::new("ProvideValue").returning("System.Object"))
    };

    AssemblyDescriptor::new(FRAMEWORK)
        .with_custom_attribute(CustomAttributeInfo::new(XMLNS_DEFINITION, &[AVALONIA_NS, "Avalonia"]))
        .with_custom_attribute(CustomAttributeInfo::new(
            XMLNS_DEFINITION,
            &[AVALONIA_NS, "Avalonia.Controls"],
        ))
        .with_custom_attribute(CustomAttributeInfo::new(XMLNS_DEFINITION, &[AVALONIA_NS, "Avalonia.Input"]))
        .with_custom_attribute(CustomAttributeInfo::new(XMLNS_DEFINITION, &[AVALONIA_NS, "Avalonia.Media"]))
        .with_custom_attribute(CustomAttributeInfo::new(
            XMLNS_DEFINITION,
            &[AVALONIA_NS, "Avalonia.Styling"],
        ))
        .with_custom_attribute(CustomAttributeInfo::new(
            XMLNS_DEFINITION,
            &[AVALONIA_NS, "Avalonia.Collections"],
        ))
        .with_custom_attribute(CustomAttributeInfo::new(
            XMLNS_DEFINITION,
            &[AVALONIA_NS, "Avalonia.Markup.Xaml.MarkupExtensions"],
        ))
        .with_shared_type(&object)
        .with_shared_type(&control)
        .with_shared_type(&presenter)
        .with_shared_type(&button)
        .with_type(grid)
        .with_type(dock_panel)
        .with_type(gestures)
        .with_type(
            framework("Avalonia.Controls", "Window")
                .with_base(&control)
                .with_property(PropertyInfo::new("Title", "System.String"))
                .with_property(PropertyInfo::new("Content", "System.Object")),
        )
        .with_type(framework("Avalonia.Controls", "UserControl").with_base(&control))
        .with_type(
            framework("Avalonia.Controls", "TextBlock")
                .with_base(&control)
                .with_property(PropertyInfo::new("Text", "System.String")),
        )
        .with_type(
            framework("Avalonia.Controls", "Panel")
                .with_base(&control)
                .with_attributes(TypeAttributes::ABSTRACT),
        )
        .with_type(framework("Avalonia.Controls", "Dock").with_enum_values(&["Left", "Top", "Right", "Bottom"]))
        .with_type(framework("Avalonia.Controls", "Classes"))
        .with_type(framework("Avalonia.Media", "Color"))
        .with_type(
            ["Red", "Green", "Blue"]
                .iter()
                .fold(
                    framework("Avalonia.Media", "Colors").with_attributes(TypeAttributes::STATIC),
                    |colors, name| {
                        colors.with_property(
                            PropertyInfo::new(*name, "Avalonia.Media.Color")
                                .read_only()
                                .with_static(),
                        )
                    },
                ),
        )
        .with_type(
            framework("Avalonia.Collections", "AvaloniaList`1").with_attributes(TypeAttributes::GENERIC),
        )
        .with_type(framework("Avalonia.Styling", "Selector"))
        .with_type(
            framework("Avalonia.Styling", "Style")
                .with_base(&object)
                .with_property(PropertyInfo::new("Selector", "Avalonia.Styling.Selector")),
        )
        .with_type(
            framework("Avalonia.Styling", "ControlTheme")
                .with_base(&object)
                .with_property(PropertyInfo::new("TargetType", "System.Type")),
        )
        .with_type(
            framework("Avalonia.Styling", "Setter")
                .with_property(PropertyInfo::new("Property", "Avalonia.AvaloniaProperty"))
                .with_property(PropertyInfo::new("Value", "System.Object")),
        )
        .with_type(
            framework("Avalonia.Data", "BindingMode").with_enum_values(&["Default", "OneWay", "TwoWay", "OneTime"]),
        )
        .with_type(
            extension("BindingExtension")
                .with_property(PropertyInfo::new("Path", "System.String"))
                .with_property(PropertyInfo::new("Mode", "Avalonia.Data.BindingMode"))
                .with_property(PropertyInfo::new("ElementName", "System.String"))
                .with_method(MethodInfo::constructor(&[]))
                .with_method(MethodInfo::constructor(&["System.String"])),
        )
        .with_type(
            extension("StaticResourceExtension")
                .with_property(PropertyInfo::new("ResourceKey", "System.Object"))
                .with_method(MethodInfo::constructor(&["System.Object"])),
        )
        .with_type(
            extension("OnPlatformExtension").with_property(PropertyInfo::new("Default", "System.Object")),
        )
}

fn app_assembly() -> AssemblyDescriptor {
    let item = public("Sample.App", "Sample.App", "ItemViewModel")
        .with_property(PropertyInfo::new("Name", "System.String"))
        .with_property(PropertyInfo::new("Count", "System.Int32").read_only());
    let view_model = public("Sample.App", "Sample.App", "MainViewModel")
        .with_property(PropertyInfo::new("Title", "System.String"))
        .with_property(PropertyInfo::new("Child", "Sample.App.ItemViewModel"))
        .with_property(PropertyInfo::new("Dock", "Avalonia.Controls.Dock"));
    let object = Arc::new(framework("Avalonia", "AvaloniaObject"));
    let control = Arc::new(framework("Avalonia.Controls", "Control").with_base(&object));

    AssemblyDescriptor::new("Sample.App")
        .with_type(item)
        .with_type(view_model)
        .with_type(public("Sample.App", "Sample.App", "MainView").with_base(&control))
}

/// Model of the sample application, built with the Avalonia profile.
pub fn sample_metadata() -> Arc<Metadata> {
    let provider = InMemoryProvider::new(
        "Sample.App, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null",
        vec![app_assembly(), framework_assembly(), system_assembly()],
    );
    let session = provider.open(Path::new("Sample.App.dll")).unwrap();
    Arc::new(MetadataBuilder::new(FrameworkProfile::avalonia()).build(session.as_ref()))
}

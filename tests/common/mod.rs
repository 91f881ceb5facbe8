//! Fixtures shared by the integration tests.
//!
//! Both models are built through the public provider interface, the way an embedder that
//! reflects out of process would feed the engine.

#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use xamlscope::prelude::*;

pub const AVALONIA_NS: &str = "https://github.com/avaloniaui";
pub const MAUI_NS: &str = "http://schemas.microsoft.com/dotnet/2021/maui";
pub const XAML_NS: &str = "http://schemas.microsoft.com/winfx/2006/xaml";

/// Root start tag of an Avalonia document with the default, `x` and `local` aliases.
pub const AVALONIA_ROOT: &str = concat!(
    r#"<Window xmlns="https://github.com/avaloniaui" "#,
    r#"xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml" "#,
    r#"xmlns:local="using:Sample.App">"#,
);

/// Root start tag of a MAUI page bound to `MainViewModel` through a project-relative alias.
pub const MAUI_ROOT: &str = concat!(
    r#"<ContentPage xmlns="http://schemas.microsoft.com/dotnet/2021/maui" "#,
    r#"xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml" "#,
    r#"xmlns:vm="clr-namespace:MauiApp.ViewModels" "#,
    r#"x:DataType="vm:MainViewModel">"#,
);

fn public(assembly: &str, namespace: &str, name: &str) -> TypeDescriptor {
    TypeDescriptor::new(assembly, namespace, name).with_attributes(TypeAttributes::PUBLIC)
}

fn build(provider: &InMemoryProvider, profile: FrameworkProfile) -> Arc<Metadata> {
    let session = provider.open(Path::new("App.dll")).unwrap();
    Arc::new(MetadataBuilder::new(profile).build(session.as_ref()))
}

fn runtime() -> AssemblyDescriptor {
    ["Object", "String", "Int32", "Double"]
        .iter()
        .fold(AssemblyDescriptor::new("System.Runtime"), |assembly, name| {
            assembly.with_type(public("System.Runtime", "System", name))
        })
}

fn avalonia_framework() -> AssemblyDescriptor {
    const ASM: &str = "Avalonia";
    const XMLNS: &str = "Avalonia.Metadata.XmlnsDefinitionAttribute";

    let object = Arc::new(public(ASM, "Avalonia", "AvaloniaObject"));
    let control = Arc::new(
        public(ASM, "Avalonia.Controls", "Control")
            .with_base(&object)
            .with_property(PropertyInfo::new("Name", "System.String"))
            .with_property(PropertyInfo::new("Classes", "Avalonia.Controls.Classes"))
            .with_property(PropertyInfo::new("Dock", "Avalonia.Controls.Dock"))
            .with_pseudo_classes(&[":pointerover", ":focus", ":disabled"]),
    );
    let presenter = Arc::new(public(ASM, "Avalonia.Controls.Presenters", "ContentPresenter").with_base(&control));
    let button = public(ASM, "Avalonia.Controls", "Button")
        .with_base(&control)
        .with_property(PropertyInfo::new("Foreground", "Avalonia.Media.Color"))
        .with_property(PropertyInfo::new("Content", "System.Object"))
        .with_event(EventInfo::new("Click"))
        .with_pseudo_classes(&[":pressed", ":PointerOver"])
        .with_template_part("PART_ContentPresenter", &presenter);
    let grid = ["Row", "Column"].iter().fold(
        public(ASM, "Avalonia.Controls", "Grid").with_base(&control),
        |grid, name| {
            grid.with_field(FieldInfo::public_static(
                format!("{name}Property"),
                "Avalonia.AttachedProperty`1<System.Int32>",
            ))
            .with_method(
                MethodInfo::new(format!("Get{name}"))
                    .with_static()
                    .with_parameter("element", "Avalonia.Controls.Control")
                    .returning("System.Int32"),
            )
            .with_method(
                MethodInfo::new(format!("Set{name}"))
                    .with_static()
                    .with_parameter("element", "Avalonia.Controls.Control")
                    .with_parameter("value", "System.Int32"),
            )
        },
    );
    let colors = ["Red", "Green", "Blue"].iter().fold(
        public(ASM, "Avalonia.Media", "Colors").with_attributes(TypeAttributes::STATIC),
        |colors, name| {
            colors.with_property(
                PropertyInfo::new(*name, "Avalonia.Media.Color")
                    .read_only()
                    .with_static(),
            )
        },
    );
    let extension = |name: &str| {
        public(ASM, "Avalonia.Markup.Xaml.MarkupExtensions", name)
            .with_method(MethodInfo::new("ProvideValue").returning("System.Object"))
    };

    [
        "Avalonia.Controls",
        "Avalonia.Controls.Presenters",
        "Avalonia.Media",
        "Avalonia.Styling",
        "Avalonia.Collections",
        "Avalonia.Markup.Xaml.MarkupExtensions",
    ]
    .iter()
    .fold(AssemblyDescriptor::new(ASM), |assembly, namespace| {
        assembly.with_custom_attribute(CustomAttributeInfo::new(XMLNS, &[AVALONIA_NS, namespace]))
    })
    .with_shared_type(&object)
    .with_shared_type(&control)
    .with_shared_type(&presenter)
    .with_type(button)
    .with_type(grid)
    .with_type(colors)
    .with_type(public(ASM, "Avalonia.Controls", "UserControl").with_base(&control))
    .with_type(
        public(ASM, "Avalonia.Controls", "TextBlock")
            .with_base(&control)
            .with_property(PropertyInfo::new("Text", "System.String")),
    )
    .with_type(
        public(ASM, "Avalonia.Controls", "Window")
            .with_base(&control)
            .with_property(PropertyInfo::new("Title", "System.String")),
    )
    .with_type(public(ASM, "Avalonia.Controls", "Dock").with_enum_values(&["Left", "Top", "Right", "Bottom"]))
    .with_type(public(ASM, "Avalonia.Controls", "Classes"))
    .with_type(public(ASM, "Avalonia.Media", "Color"))
    .with_type(public(ASM, "Avalonia.Collections", "AvaloniaList`1").with_attributes(TypeAttributes::GENERIC))
    .with_type(public(ASM, "Avalonia.Collections", "AvaloniaDictionary`2").with_attributes(TypeAttributes::GENERIC))
    .with_type(public(ASM, "Avalonia.Styling", "Selector"))
    .with_type(
        public(ASM, "Avalonia.Styling", "Style")
            .with_base(&object)
            .with_property(PropertyInfo::new("Selector", "Avalonia.Styling.Selector")),
    )
    .with_type(
        public(ASM, "Avalonia.Styling", "ControlTheme")
            .with_base(&object)
            .with_property(PropertyInfo::new("TargetType", "System.Type")),
    )
    .with_type(
        public(ASM, "Avalonia.Styling", "Setter")
            .with_property(PropertyInfo::new("Property", "Avalonia.AvaloniaProperty"))
            .with_property(PropertyInfo::new("Value", "System.Object")),
    )
    .with_type(
        extension("BindingExtension")
            .with_property(PropertyInfo::new("Path", "System.String"))
            .with_property(PropertyInfo::new("Mode", "System.Object"))
            .with_method(MethodInfo::constructor(&[]))
            .with_method(MethodInfo::constructor(&["System.String"])),
    )
    .with_type(
        extension("StaticResourceExtension")
            .with_property(PropertyInfo::new("ResourceKey", "System.Object"))
            .with_method(MethodInfo::constructor(&["System.Object"])),
    )
    .with_type(extension("OnPlatformExtension").with_property(PropertyInfo::new("Default", "System.Object")))
}

fn avalonia_app() -> AssemblyDescriptor {
    const ASM: &str = "Sample.App";

    let object = Arc::new(public("Avalonia", "Avalonia", "AvaloniaObject"));
    let control = Arc::new(public("Avalonia", "Avalonia.Controls", "Control").with_base(&object));

    AssemblyDescriptor::new(ASM)
        .with_type(
            public(ASM, ASM, "ItemViewModel")
                .with_property(PropertyInfo::new("Name", "System.String"))
                .with_property(PropertyInfo::new("Count", "System.Int32").read_only()),
        )
        .with_type(
            public(ASM, ASM, "MainViewModel")
                .with_property(PropertyInfo::new("Title", "System.String"))
                .with_property(PropertyInfo::new("Child", "Sample.App.ItemViewModel")),
        )
        .with_type(public(ASM, ASM, "MainView").with_base(&control))
}

/// An Avalonia application, `Sample.App`, with a handful of controls and two view models.
pub fn avalonia() -> Arc<Metadata> {
    let provider = InMemoryProvider::new(
        "Sample.App, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null",
        vec![avalonia_app(), avalonia_framework(), runtime()],
    );
    build(&provider, FrameworkProfile::avalonia())
}

fn maui_framework() -> AssemblyDescriptor {
    const ASM: &str = "Microsoft.Maui.Controls";
    const XMLNS: &str = "Microsoft.Maui.Controls.XmlnsDefinitionAttribute";

    let bindable = Arc::new(public(ASM, ASM, "BindableObject"));
    let element = Arc::new(
        public(ASM, ASM, "VisualElement")
            .with_base(&bindable)
            .with_property(PropertyInfo::new("IsVisible", "System.Boolean"))
            .with_property(PropertyInfo::new("BackgroundColor", "Microsoft.Maui.Graphics.Color")),
    );
    let view = Arc::new(public(ASM, ASM, "View").with_base(&element));
    let grid = ["Row", "Column"].iter().fold(
        public(ASM, ASM, "Grid").with_base(&view),
        |grid, name| {
            grid.with_field(FieldInfo::public_static(
                format!("{name}Property"),
                "Microsoft.Maui.Controls.BindableProperty",
            ))
            .with_method(
                MethodInfo::new(format!("Get{name}"))
                    .with_static()
                    .with_parameter("bindable", "Microsoft.Maui.Controls.BindableObject")
                    .returning("System.Int32"),
            )
            .with_method(
                MethodInfo::new(format!("Set{name}"))
                    .with_static()
                    .with_parameter("bindable", "Microsoft.Maui.Controls.BindableObject")
                    .with_parameter("value", "System.Int32"),
            )
        },
    );
    let colors = ["Red", "Blue"].iter().fold(
        public("Microsoft.Maui.Graphics", "Microsoft.Maui.Graphics", "Colors")
            .with_attributes(TypeAttributes::STATIC),
        |colors, name| colors.with_field(FieldInfo::public_static(*name, "Microsoft.Maui.Graphics.Color")),
    );
    let xaml_extension = |name: &str| {
        public(ASM, "Microsoft.Maui.Controls.Xaml", name)
            .with_interface("Microsoft.Maui.Controls.Xaml.IMarkupExtension")
    };

    AssemblyDescriptor::new(ASM)
        .with_custom_attribute(CustomAttributeInfo::new(XMLNS, &[MAUI_NS, ASM]))
        .with_custom_attribute(CustomAttributeInfo::new(XMLNS, &[MAUI_NS, "Microsoft.Maui.Graphics"]))
        .with_custom_attribute(CustomAttributeInfo::new(XMLNS, &[MAUI_NS, "Microsoft.Maui.Controls.Xaml"]))
        .with_custom_attribute(CustomAttributeInfo::new(XMLNS, &[XAML_NS, "Microsoft.Maui.Controls.Xaml"]))
        .with_shared_type(&bindable)
        .with_shared_type(&element)
        .with_shared_type(&view)
        .with_type(grid)
        .with_type(colors)
        .with_type(public("Microsoft.Maui.Graphics", "Microsoft.Maui.Graphics", "Color"))
        .with_type(
            public(ASM, ASM, "Label")
                .with_base(&view)
                .with_property(PropertyInfo::new("Text", "System.String"))
                .with_property(PropertyInfo::new("TextColor", "Microsoft.Maui.Graphics.Color")),
        )
        .with_type(
            public(ASM, ASM, "Button")
                .with_base(&view)
                .with_property(PropertyInfo::new("Text", "System.String"))
                .with_event(EventInfo::new("Clicked")),
        )
        .with_type(
            public(ASM, ASM, "ContentPage")
                .with_base(&element)
                .with_property(PropertyInfo::new("Title", "System.String"))
                .with_property(PropertyInfo::new("Content", "Microsoft.Maui.Controls.View")),
        )
        .with_type(
            public(ASM, ASM, "Style")
                .with_property(PropertyInfo::new("TargetType", "System.Type").read_only()),
        )
        .with_type(
            public(ASM, ASM, "Setter")
                .with_property(PropertyInfo::new("Property", "Microsoft.Maui.Controls.BindableProperty"))
                .with_property(PropertyInfo::new("Value", "System.Object")),
        )
        .with_type(
            xaml_extension("BindingExtension")
                .with_property(PropertyInfo::new("Path", "System.String"))
                .with_property(PropertyInfo::new("StringFormat", "System.String")),
        )
        .with_type(
            xaml_extension("TypeExtension")
                .with_property(PropertyInfo::new("TypeName", "System.String"))
                .with_method(MethodInfo::constructor(&[])),
        )
        .with_type(
            xaml_extension("StaticExtension")
                .with_property(PropertyInfo::new("Member", "System.String"))
                .with_method(MethodInfo::constructor(&["System.String"])),
        )
}

fn maui_app() -> AssemblyDescriptor {
    const ASM: &str = "MauiApp";

    let page = Arc::new(public("Microsoft.Maui.Controls", "Microsoft.Maui.Controls", "ContentPage"));
    let item = public(ASM, "MauiApp.ViewModels", "ItemViewModel")
        .with_property(PropertyInfo::new("Caption", "System.String"));
    AssemblyDescriptor::new(ASM)
        .with_type(public(ASM, "MauiApp.Views", "MainPage").with_base(&page))
        .with_type(item)
        .with_type(
            public(ASM, "MauiApp.ViewModels", "MainViewModel")
                .with_property(PropertyInfo::new("Title", "System.String"))
                .with_property(PropertyInfo::new("Selected", "MauiApp.ViewModels.ItemViewModel")),
        )
}

/// A MAUI application, `MauiApp`, with views and view models in separate namespaces.
pub fn maui_provider() -> InMemoryProvider {
    InMemoryProvider::new(
        "MauiApp, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null",
        vec![maui_app(), maui_framework(), runtime()],
    )
}

/// Model of [`maui_provider`], built with the MAUI profile.
pub fn maui() -> Arc<Metadata> {
    build(&maui_provider(), FrameworkProfile::maui())
}

/// Completions with the cursor at the end of `text`.
pub fn complete(metadata: &Arc<Metadata>, text: &str) -> Option<CompletionSet> {
    CompletionEngine::new()
        .unwrap()
        .get_completions(metadata, text, text.len())
}

/// Display texts of a completion set, in ranked order.
pub fn displays(set: &CompletionSet) -> Vec<&str> {
    set.display_texts().collect()
}

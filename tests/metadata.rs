//! Integration tests for building, loading and caching type metadata.

mod common;

use std::{fs, path::PathBuf, sync::Arc};

use xamlscope::{
    metadata::identity::{AssemblyIdentity, AssemblyVersion, InternalsVisibleTo},
    prelude::*,
};

fn scratch_binary(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("xamlscope-it-{}-{name}", std::process::id()));
    fs::write(&path, b"MZ").unwrap();
    path
}

/// Types are reachable through every namespace identifier a document may use.
#[test]
fn test_namespace_identifiers() {
    let metadata = common::maui();

    let label = "Microsoft.Maui.Controls.Label";
    for namespace in [
        common::MAUI_NS,
        "using:Microsoft.Maui.Controls",
        "clr-namespace:Microsoft.Maui.Controls;assembly=Microsoft.Maui.Controls",
    ] {
        let types = metadata.namespace(namespace).expect(namespace);
        let token = types.get("Label").expect(namespace);
        assert_eq!(metadata.get(*token).unwrap().full_name, label);
    }

    assert!(metadata
        .namespace("clr-namespace:MauiApp.ViewModels;assembly=MauiApp")
        .is_some_and(|types| types.contains_key("MainViewModel")));
    assert_eq!(metadata.inverse_namespace(label), Some("using:Microsoft.Maui.Controls"));
    assert_eq!(metadata.target_assembly_name(), Some("MauiApp"));
}

#[test]
fn test_member_model() {
    let metadata = common::maui();

    let label = metadata
        .type_by_full_name("Microsoft.Maui.Controls.Label")
        .unwrap();
    assert!(label.is_bindable_object());
    assert!(label.property("IsVisible").is_some());
    assert!(label.property("TextColor").is_some());

    let grid = metadata
        .type_by_full_name("Microsoft.Maui.Controls.Grid")
        .unwrap();
    assert!(grid.has_attached_properties());
    let row = grid.property("Row").unwrap();
    assert!(row.is_attached);
    assert!(row.has_setter);

    let color = metadata
        .type_by_full_name("Microsoft.Maui.Graphics.Color")
        .unwrap();
    assert_eq!(color.hint_values, ["Red", "Blue"]);

    let style = metadata
        .type_by_full_name("Microsoft.Maui.Controls.Style")
        .unwrap();
    assert!(style.property("TargetType").unwrap().has_setter);
}

#[test]
fn test_markup_extensions() {
    let metadata = common::maui();

    let binding = metadata
        .type_by_full_name("Microsoft.Maui.Controls.Xaml.BindingExtension")
        .unwrap();
    assert!(binding.is_markup_extension());
    assert_eq!(binding.ctor_argument, CtorArgument::None);
    let path = binding.property("Path").unwrap();
    let path_type = metadata.get(path.type_token.unwrap()).unwrap();
    assert!(path_type.is_binding_path());
    assert!(binding.default_property().is_some());

    let type_extension = metadata
        .type_by_full_name("Microsoft.Maui.Controls.Xaml.TypeExtension")
        .unwrap();
    let type_name = type_extension.property("TypeName").unwrap();
    assert_eq!(
        metadata.get(type_name.type_token.unwrap()).unwrap().full_name,
        "System.Type"
    );

    let static_extension = metadata
        .type_by_full_name("Microsoft.Maui.Controls.Xaml.StaticExtension")
        .unwrap();
    assert_eq!(static_extension.ctor_argument, CtorArgument::Object);
}

/// Assemblies and types the provider fails to load are skipped.
#[test]
fn test_build_skips_broken_entries() {
    let provider = common::maui_provider().with_broken_assembly("Broken.Controls");
    let path = scratch_binary("broken.dll");

    let reader = MetadataReader::with_profile(Box::new(provider), FrameworkProfile::maui());
    let metadata = reader.for_target_assembly(&path).unwrap();
    assert!(metadata.type_by_full_name("Microsoft.Maui.Controls.Label").is_some());

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_store_shares_and_rebuilds() {
    let path = scratch_binary("store.dll");
    let store = MetadataStore::new(MetadataReader::with_profile(
        Box::new(common::maui_provider()),
        FrameworkProfile::maui(),
    ));

    let first = store.get(&path).unwrap();
    assert!(Arc::ptr_eq(&first, &store.get(&path).unwrap()));

    store.invalidate(&path);
    let rebuilt = store.get(&path).unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(store.len(), 1);

    fs::remove_file(&path).unwrap();
    assert!(matches!(store.get(&path), Err(Error::TargetMissing(p)) if p == path));
    assert!(store.is_empty());
}

/// Internal types of a friend assembly are exposed to the target.
#[test]
fn test_internals_visible_to_target() {
    let friend = AssemblyDescriptor::new("App.Controls")
        .with_internals_visible_to("App")
        .with_type(TypeDescriptor::new("App.Controls", "App.Controls", "Badge"));
    let stranger = AssemblyDescriptor::new("Other.Controls")
        .with_type(TypeDescriptor::new("Other.Controls", "Other.Controls", "Hidden"));
    let provider = InMemoryProvider::new("App", vec![AssemblyDescriptor::new("App"), friend, stranger]);

    let path = scratch_binary("friends.dll");
    let metadata = MetadataReader::new(Box::new(provider))
        .for_target_assembly(&path)
        .unwrap();
    assert!(metadata.type_by_full_name("App.Controls.Badge").is_some());
    assert!(metadata.type_by_full_name("Other.Controls.Hidden").is_none());

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_assembly_identity() {
    let identity: AssemblyIdentity =
        "Sample.App, Version=1.2.3.4, Culture=neutral, PublicKeyToken=b77a5c561934e089"
            .parse()
            .unwrap();
    assert_eq!(identity.name, "Sample.App");
    assert_eq!(identity.version, AssemblyVersion::new(1, 2, 3, 4));
    assert!(identity.culture.is_none());
    assert_eq!(
        identity.public_key_token,
        Some([0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89])
    );
    assert_eq!(
        identity.display_name(),
        "Sample.App, Version=1.2.3.4, Culture=neutral, PublicKeyToken=b77a5c561934e089"
    );

    assert!(AssemblyIdentity::parse("").is_err());
    assert!(AssemblyIdentity::parse("App, PublicKeyToken=abc").is_err());

    let grant = InternalsVisibleTo::parse("Sample.App").unwrap();
    assert!(grant.grants("Sample.App", &[]));
    assert!(!grant.grants("Other", &[]));
}

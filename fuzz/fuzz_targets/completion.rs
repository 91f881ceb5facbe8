#![no_main]

use std::{path::Path, sync::{Arc, OnceLock}};

use libfuzzer_sys::fuzz_target;
use xamlscope::prelude::*;

fn metadata() -> &'static Arc<Metadata> {
    static METADATA: OnceLock<Arc<Metadata>> = OnceLock::new();
    METADATA.get_or_init(|| {
        let control = TypeDescriptor::new("Avalonia", "Avalonia.Controls", "Button")
            .with_attributes(TypeAttributes::PUBLIC)
            .with_property(PropertyInfo::new("Content", "System.Object"))
            .with_pseudo_classes(&[":pressed"]);
        let framework = AssemblyDescriptor::new("Avalonia")
            .with_custom_attribute(CustomAttributeInfo::new(
                "Avalonia.Metadata.XmlnsDefinitionAttribute",
                &["https://github.com/avaloniaui", "Avalonia.Controls"],
            ))
            .with_type(control);
        let provider = InMemoryProvider::new("Fuzz", vec![AssemblyDescriptor::new("Fuzz"), framework]);
        let session = provider.open(Path::new("Fuzz.dll")).unwrap();
        Arc::new(MetadataBuilder::new(FrameworkProfile::avalonia()).build(session.as_ref()))
    })
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = XmlParser::parse(text);
    let _ = SelectorParser::parse(text);
    let _ = MarkupExtensionParser::parse(text);

    let engine = CompletionEngine::new().unwrap();
    for pos in [text.len(), text.len() / 2, 1] {
        if let Some(set) = engine.get_completions(metadata(), text, pos) {
            assert!(set.start_position <= pos.min(text.len()));
        }
    }
});

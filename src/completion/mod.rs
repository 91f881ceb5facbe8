//! Completion candidates for a cursor position.
//!
//! [`CompletionEngine`] parses the document up to the cursor, resolves the document's namespace
//! aliases through [`MetadataHelper`] and branches on where the cursor sits. Inside an attribute
//! value, the candidates depend on what the attribute means:
//!
//! | Value | Candidates |
//! |-------|------------|
//! | `{Extension ...}` | extension names, their properties, positional arguments, property values |
//! | event attribute | a `<New Event Handler>` snippet |
//! | enum or constant-backed property | literal values |
//! | `Selector` | pseudo-classes, types, names, template parts, property conditions |
//! | `System.Type` property | type names |
//! | `xmlns` / `xmlns:*` | namespace identifiers |
//! | `x:Class` | classes of the assembly being edited |
//! | `Setter.Property` / `Setter.Value` | members and values of the styled type |
//! | binding path | properties reachable from the data type |
//!
//! The returned [`CompletionSet`] carries candidates in presentation order (see [`ranking`])
//! and the byte offset where the replaced token begins.

mod binding;
mod engine;
mod markup;
mod selector;
mod values;

pub mod helper;
pub mod item;
pub mod ranking;

pub use engine::CompletionEngine;
pub use helper::{
    filter_properties, get_insert_text, namespace_aliases, typed_prefix_len, MetadataHelper,
    ResolutionContext, TypeFilter,
};
pub use item::{Completion, CompletionData, CompletionKind, CompletionSet};
pub use ranking::sort_completions;

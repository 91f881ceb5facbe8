// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # xamlscope
//!
//! Context-aware completion for XAML markup, driven by the type metadata of a compiled .NET
//! application and its dependencies.
//!
//! Given a document and a cursor offset, `xamlscope` works out what is being typed (an element
//! name, an attribute name, an attribute value, a style selector, a markup extension, a binding
//! path) and offers the types, members and literal values that fit there, ranked and with the
//! text to insert.
//!
//! ## Features
//!
//! - **Error-tolerant parsers** - classify the cursor inside incomplete tags, selectors and
//!   `{Extension ...}` values without ever failing
//! - **Namespace-indexed metadata** - built once per target binary from reflection facts, with
//!   attached members, markup extensions, pseudo-classes, template parts and hint values
//! - **Framework profiles** - the conventions of .NET MAUI and Avalonia UI as plain data
//! - **Pluggable reflection** - binary metadata is read through the [`metadata::provider`]
//!   traits; an in-memory implementation is included
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use xamlscope::prelude::*;
//!
//! let framework = AssemblyDescriptor::new("Fx")
//!     .with_custom_attribute(CustomAttributeInfo::new(
//!         "Microsoft.Maui.Controls.XmlnsDefinitionAttribute",
//!         &["http://schemas.microsoft.com/dotnet/2021/maui", "Fx.Controls"],
//!     ))
//!     .with_type(
//!         TypeDescriptor::new("Fx", "Fx.Controls", "Button")
//!             .with_attributes(TypeAttributes::PUBLIC)
//!             .with_property(PropertyInfo::new("Text", "System.String")),
//!     );
//! let provider = InMemoryProvider::new("App", vec![AssemblyDescriptor::new("App"), framework]);
//! let session = provider.open("App.dll".as_ref())?;
//! let metadata = Arc::new(MetadataBuilder::new(FrameworkProfile::maui()).build(session.as_ref()));
//!
//! let engine = CompletionEngine::new()?;
//! let text = r#"<ContentPage xmlns="http://schemas.microsoft.com/dotnet/2021/maui"><Bu"#;
//! let set = engine.get_completions(&metadata, text, text.len()).unwrap();
//!
//! assert_eq!(set.start_position, text.len() - 2);
//! assert!(set.find("Button").is_some());
//! # Ok::<(), xamlscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`syntax`] - the tag/attribute, selector and markup-extension parsers
//! - [`metadata`] - the model, its builder, the reflection provider interface and loaders
//! - [`completion`] - namespace resolution, candidate generation and ranking
//!
//! A host usually keeps one [`metadata::MetadataStore`] per process and one
//! [`completion::CompletionEngine`] per open document.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use xamlscope::prelude::*;
///
/// let _engine = CompletionEngine::new()?;
/// assert!(CompletionEngine::should_trigger_on('<'));
/// # Ok::<(), xamlscope::Error>(())
/// ```
pub mod prelude;

/// Error-tolerant parsers for markup, style selectors and markup extensions
///
/// Every parser takes the document prefix up to the cursor and reports a state describing what
/// the last character belongs to, together with the fragments typed so far. None of them ever
/// fails: incomplete input is what they are made for.
///
/// # Key Types
///
/// - [`syntax::XmlParser`] - tags, attributes and values, plus ancestor lookups
/// - [`syntax::SelectorParser`] - `Selector="..."` values
/// - [`syntax::MarkupExtensionParser`] - `{Extension ...}` values
/// - [`syntax::Patterns`] - compiled searches over the whole document
pub mod syntax;

/// The type metadata model and how it is built
///
/// # Key Components
///
/// - [`metadata::Metadata`] - types indexed by namespace identifier
/// - [`metadata::MetadataBuilder`] - reflection facts to model
/// - [`metadata::FrameworkProfile`] - framework conventions
/// - [`metadata::provider`] - the reflection interface
/// - [`metadata::MetadataReader`] / [`metadata::MetadataStore`] - loading and caching per binary
pub mod metadata;

/// Completion candidates for a cursor position
///
/// [`completion::CompletionEngine`] is the entry point; [`completion::MetadataHelper`] holds the
/// per-document namespace resolution it works with.
pub mod completion;

/// `xamlscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `xamlscope` Error type
///
/// Errors only arise when loading metadata; completion itself reports misses as `None`.
pub use error::Error;

//! Type metadata for markup completion.
//!
//! This module turns what a reflection provider knows about a compiled application and its
//! dependencies into the model the completion engine queries: which types can appear as
//! elements, which members they expose as attributes, and which literal values those members
//! accept.
//!
//! # Key Components
//!
//! - [`Metadata`] - Immutable per-binary model, types indexed by namespace identifier
//! - [`MetadataType`], [`MetadataProperty`], [`MetadataEvent`], [`MetadataField`] - Model records
//! - [`MetadataBuilder`] - Converts reflection facts into a model
//! - [`MetadataReader`] / [`MetadataStore`] - Path to model, with a per-binary cache
//! - [`FrameworkProfile`] - Framework conventions reflection cannot reveal
//! - [`provider`] - The reflection provider interface and an in-memory implementation
//! - [`identity`] - Assembly display names and friend-assembly grants
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xamlscope::metadata::{provider::InMemoryProvider, MetadataReader, MetadataStore};
//!
//! let store = MetadataStore::new(MetadataReader::new(Box::new(InMemoryProvider::default())));
//! let metadata = store.get(Path::new("bin/Debug/net8.0/App.dll"))?;
//! for (namespace, types) in metadata.namespaces() {
//!     println!("{namespace}: {} types", types.len());
//! }
//! # Ok::<(), xamlscope::Error>(())
//! ```

/// Conversion of reflection facts into the model
pub mod builder;
/// Assembly identities and friend-assembly grants
pub mod identity;
/// Path to model, with caching
pub mod loader;
/// Members of a type
pub mod members;
/// The namespace-indexed model
pub mod model;
/// Framework conventions
pub mod profile;
/// Reflection provider interface
pub mod provider;
/// Arena keys of types
pub mod token;
/// The type record
pub mod types;

pub use builder::{MetadataBuilder, BINDING_PATH_TYPE};
pub use loader::{MetadataReader, MetadataStore};
pub use members::{MetadataEvent, MetadataField, MetadataProperty};
pub use model::{Metadata, NamespaceTypes};
pub use profile::{FrameworkProfile, HintMembers, HintSource};
pub use token::TypeToken;
pub use types::{CtorArgument, DirectiveFilter, HintValuesFn, MetadataType, TemplatePart, TypeFlags};

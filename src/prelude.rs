//! # xamlscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the xamlscope library. Import this module to get quick access to everything needed to
//! build a metadata model and ask for completions.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all xamlscope operations
pub use crate::Error;

/// The result type used throughout xamlscope
pub use crate::Result;

// ================================================================================================
// Completion
// ================================================================================================

/// Entry point for completion requests
pub use crate::completion::CompletionEngine;

/// Candidates and their classification
pub use crate::completion::{Completion, CompletionData, CompletionKind, CompletionSet};

/// Per-document namespace resolution
pub use crate::completion::{MetadataHelper, ResolutionContext, TypeFilter};

// ================================================================================================
// Metadata Model
// ================================================================================================

/// The model and its records
pub use crate::metadata::{
    CtorArgument, Metadata, MetadataEvent, MetadataField, MetadataProperty, MetadataType,
    TemplatePart, TypeFlags, TypeToken,
};

/// Building and loading
pub use crate::metadata::{FrameworkProfile, MetadataBuilder, MetadataReader, MetadataStore};

// ================================================================================================
// Reflection Providers
// ================================================================================================

/// Provider interface
pub use crate::metadata::provider::{
    AssemblyInformation, MetadataProvider, ReflectionSession, TypeInformation,
};

/// Owned reflection facts
pub use crate::metadata::provider::{
    AssemblyDescriptor, CustomAttributeInfo, EventInfo, FieldInfo, InMemoryProvider, MethodInfo,
    PropertyInfo, TypeAttributes, TypeDescriptor, Visibility,
};

// ================================================================================================
// Parsers
// ================================================================================================

/// Cursor classification
pub use crate::syntax::{
    MarkupExtensionParser, MarkupState, Patterns, SelectorParser, SelectorStatement, XmlParser,
    XmlState,
};

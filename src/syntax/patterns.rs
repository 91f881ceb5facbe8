//! Compiled search patterns shared by all completion requests.
//!
//! Two lookups are easier to express as regular expressions than as grammar states: collecting
//! the element names a document declares through `Name="..."` / `x:Name="..."`, and picking the
//! type names out of a style selector to find the type a `Setter` applies to. [`Patterns`]
//! compiles both once; the engine holds it behind an [`std::sync::Arc`] so any number of engines
//! can share one compiled set.

use regex::Regex;

use crate::Result;

/// Matches `Name="..."` and `x:Name="..."` attributes.
const ELEMENT_NAME: &str = r#"\s(?:(x:)?Name)="(?<value>[\w:\s|.]+)""#;

/// Splits a selector into type names and `:`, `.`, `#`, `/` prefixed segments.
const SELECTOR_TYPES: &str = r"(?<type>[\w|]+)|([:.#/]\w+)";

/// Process-wide compiled patterns.
#[derive(Debug, Clone)]
pub struct Patterns {
    element_name: Regex,
    selector_types: Regex,
}

impl Patterns {
    /// Compile the pattern set.
    ///
    /// # Errors
    /// Returns [`crate::Error::Pattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Patterns {
            element_name: Regex::new(ELEMENT_NAME)?,
            selector_types: Regex::new(SELECTOR_TYPES)?,
        })
    }

    /// Element names declared anywhere in `text`, in document order.
    #[must_use]
    pub fn element_names<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.element_name
            .captures_iter(text)
            .filter_map(|captures| captures.name("value"))
            .map(|value| value.as_str())
            .collect()
    }

    /// Type names mentioned in a selector, in `alias:Name` form.
    #[must_use]
    pub fn selector_types(&self, selector: &str) -> Vec<String> {
        self.selector_types
            .captures_iter(selector)
            .filter_map(|captures| captures.name("type"))
            .map(|name| name.as_str().replace('|', ":"))
            .collect()
    }
}

use std::fmt;

/// Stable key of a [`crate::metadata::MetadataType`] inside a [`crate::metadata::Metadata`] model.
///
/// Types reference each other (property types, declaring types, nullable underlying types)
/// through tokens rather than through pointers, so a model is a flat, immutable arena that can
/// be shared between threads without reference cycles. A token is only meaningful for the model
/// that issued it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeToken(pub u32);

impl TypeToken {
    /// Creates a new token from a raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        TypeToken(value)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Position of the referenced type in the model's arena
    #[must_use]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TypeToken {
    fn from(value: u32) -> Self {
        TypeToken(value)
    }
}

impl From<TypeToken> for u32 {
    fn from(token: TypeToken) -> Self {
        token.0
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.0)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_token_index() {
        let token = TypeToken::new(42);
        assert_eq!(token.value(), 42);
        assert_eq!(token.index(), 42);
    }

    #[test]
    fn test_token_from_conversion() {
        let token: TypeToken = 7u32.into();
        let back: u32 = token.into();
        assert_eq!(back, 7);
    }

    #[test]
    fn test_token_formatting() {
        let token = TypeToken(3);
        assert_eq!(format!("{}", token), "#3");
        assert_eq!(format!("{:?}", token), "TypeToken(3)");
    }

    #[test]
    fn test_token_ordering_and_hash() {
        assert!(TypeToken(1) < TypeToken(2));

        let mut map = HashMap::new();
        map.insert(TypeToken(1), "a");
        map.insert(TypeToken(1), "b");
        assert_eq!(map.len(), 1);
        assert_eq!(map[&TypeToken(1)], "b");
    }
}

//! Assembly identities and visibility grants.
//!
//! Reflection providers describe assemblies by their display name
//! (`Name, Version=1.0.0.0, Culture=neutral, PublicKeyToken=...`) and friend-assembly grants by
//! the argument of `InternalsVisibleToAttribute` (`Name` or `Name, PublicKey=...`). The builder
//! needs two facts from them: the simple name of the assembly being edited, and whether another
//! assembly exposes its internal types to it.
//!
//! # Key Types
//! - [`AssemblyIdentity`] - Parsed display name
//! - [`AssemblyVersion`] - Four-part version number
//! - [`InternalsVisibleTo`] - Parsed friend-assembly grant
//!
//! # Example
//! ```rust
//! use xamlscope::metadata::identity::{AssemblyIdentity, InternalsVisibleTo};
//!
//! let target = AssemblyIdentity::parse("MyApp, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null")?;
//! assert_eq!(target.name, "MyApp");
//!
//! let grant = InternalsVisibleTo::parse("MyApp")?;
//! assert!(grant.grants(&target.name, &[]));
//! # Ok::<(), xamlscope::Error>(())
//! ```

use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// Four-part assembly version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyVersion {
    /// Major version component
    pub major: u16,
    /// Minor version component
    pub minor: u16,
    /// Build version component
    pub build: u16,
    /// Revision version component
    pub revision: u16,
}

impl AssemblyVersion {
    /// Create a version from its four components.
    #[must_use]
    pub fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Parse dotted notation with one to four components; missing components are zero.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] for more than four components or a non-numeric component.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split('.').collect();

        if parts.is_empty() || parts.len() > 4 {
            return Err(malformed_error!("Invalid version format: {}", version_str));
        }

        let mut components = [0u16; 4];
        for (i, part) in parts.iter().enumerate() {
            components[i] = part
                .trim()
                .parse::<u16>()
                .map_err(|_| malformed_error!("Invalid version component: {}", part))?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Identity of an assembly as given by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    /// Simple assembly name
    pub name: String,
    /// Version, `0.0.0.0` if not given
    pub version: AssemblyVersion,
    /// Culture, `None` for culture-neutral assemblies
    pub culture: Option<String>,
    /// Public key token of strong-named assemblies
    pub public_key_token: Option<[u8; 8]>,
}

impl AssemblyIdentity {
    /// Create an identity from a simple name only.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: AssemblyVersion::default(),
            culture: None,
            public_key_token: None,
        }
    }

    /// Parse an assembly display name.
    ///
    /// Unknown components are ignored.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the name is empty, the version cannot be parsed, or the
    /// public key token is not 8 hex-encoded bytes.
    pub fn parse(display_name: &str) -> Result<Self> {
        let mut parts = display_name.split(',').map(str::trim);

        let name = parts.next().unwrap_or_default().to_string();
        if name.is_empty() {
            return Err(malformed_error!("Assembly name cannot be empty"));
        }

        let mut identity = Self::new(name);
        for part in parts {
            if let Some(value) = part.strip_prefix("Version=") {
                identity.version = AssemblyVersion::parse(value)?;
            } else if let Some(value) = part.strip_prefix("Culture=") {
                if value != "neutral" && !value.is_empty() {
                    identity.culture = Some(value.to_string());
                }
            } else if let Some(value) = part.strip_prefix("PublicKeyToken=") {
                if value != "null" && !value.is_empty() {
                    let bytes = hex::decode(value).map_err(|e| {
                        malformed_error!("Invalid hex in PublicKeyToken '{}': {}", value, e)
                    })?;
                    let token: [u8; 8] = bytes.try_into().map_err(|_| {
                        malformed_error!(
                            "PublicKeyToken must be exactly 8 bytes (16 hex characters), got '{}'",
                            value
                        )
                    })?;
                    identity.public_key_token = Some(token);
                }
            }
        }

        Ok(identity)
    }

    /// Display name of this identity.
    #[must_use]
    pub fn display_name(&self) -> String {
        let token = self
            .public_key_token
            .map_or_else(|| "null".to_string(), hex::encode);
        format!(
            "{}, Version={}, Culture={}, PublicKeyToken={}",
            self.name,
            self.version,
            self.culture.as_deref().unwrap_or("neutral"),
            token
        )
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AssemblyIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A friend-assembly grant, the argument of `InternalsVisibleToAttribute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalsVisibleTo {
    /// Simple name of the friend assembly
    pub name: String,
    /// Full public key the friend must be signed with, if the grant names one
    pub public_key: Option<Vec<u8>>,
}

impl InternalsVisibleTo {
    /// Parse `Name` or `Name, PublicKey=<hex>`.
    ///
    /// The key may be separated from `PublicKey` by any run of spaces and `=`.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the name is empty or the key is not valid hex.
    pub fn parse(value: &str) -> Result<Self> {
        let (name, rest) = match value.split_once(',') {
            Some((name, rest)) => (name.trim(), Some(rest)),
            None => (value.trim(), None),
        };

        if name.is_empty() {
            return Err(malformed_error!("Friend assembly name cannot be empty"));
        }

        let public_key = match rest.and_then(|rest| rest.split_once("PublicKey")) {
            Some((_, key)) => {
                let key = key.trim_start_matches([' ', '=']).trim();
                Some(hex::decode(key).map_err(|e| {
                    malformed_error!("Invalid hex in PublicKey '{}': {}", key, e)
                })?)
            }
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            public_key,
        })
    }

    /// Whether this grant exposes internals to an assembly with the given name and key.
    ///
    /// The name must match exactly. If the grant names a key, the full key bytes must match
    /// exactly as well.
    #[must_use]
    pub fn grants(&self, name: &str, public_key: &[u8]) -> bool {
        if self.name != name {
            return false;
        }
        self.public_key
            .as_deref()
            .map_or(true, |key| key == public_key)
    }
}

//! Loading metadata for target binaries.
//!
//! [`MetadataReader`] goes from a path to a freshly built [`Metadata`]; [`MetadataStore`] keeps
//! one shared model per path and rebuilds it only when the file's modification time changes.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use dashmap::DashMap;

use crate::{
    metadata::{
        builder::MetadataBuilder, model::Metadata, profile::FrameworkProfile,
        provider::MetadataProvider,
    },
    Error, Result,
};

/// Builds metadata for a target binary through a reflection provider.
pub struct MetadataReader {
    provider: Box<dyn MetadataProvider>,
    profile: FrameworkProfile,
}

impl MetadataReader {
    /// Create a reader with the default framework profile.
    #[must_use]
    pub fn new(provider: Box<dyn MetadataProvider>) -> Self {
        Self::with_profile(provider, FrameworkProfile::default())
    }

    /// Create a reader for the given framework conventions.
    #[must_use]
    pub fn with_profile(provider: Box<dyn MetadataProvider>, profile: FrameworkProfile) -> Self {
        Self { provider, profile }
    }

    /// Framework conventions used for building.
    #[must_use]
    pub fn profile(&self) -> &FrameworkProfile {
        &self.profile
    }

    /// Build the model for the binary at `path`.
    ///
    /// # Errors
    /// Returns [`Error::TargetMissing`] if there is no file at `path`, or the provider's error if
    /// the session cannot be opened.
    pub fn for_target_assembly(&self, path: &Path) -> Result<Metadata> {
        if !path.is_file() {
            return Err(Error::TargetMissing(path.to_path_buf()));
        }

        let session = self.provider.open(path)?;
        Ok(MetadataBuilder::new(self.profile).build(session.as_ref()))
    }
}

/// Per-binary cache of built models.
///
/// Safe to share between threads; concurrent requests for the same stale path may both build,
/// and the last one wins.
pub struct MetadataStore {
    reader: MetadataReader,
    entries: DashMap<PathBuf, (SystemTime, Arc<Metadata>)>,
}

impl MetadataStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(reader: MetadataReader) -> Self {
        Self {
            reader,
            entries: DashMap::new(),
        }
    }

    /// Model of the binary at `path`, rebuilt if the file changed since the last call.
    ///
    /// # Errors
    /// Returns [`Error::TargetMissing`] if the binary does not exist (the cached model, if any,
    /// is dropped), or any error of [`MetadataReader::for_target_assembly`].
    pub fn get(&self, path: &Path) -> Result<Arc<Metadata>> {
        let modified = match fs::metadata(path) {
            Ok(file) => file.modified()?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                self.entries.remove(path);
                return Err(Error::TargetMissing(path.to_path_buf()));
            }
            Err(error) => return Err(error.into()),
        };

        let cached = self
            .entries
            .get(path)
            .filter(|entry| entry.0 == modified)
            .map(|entry| Arc::clone(&entry.1));
        if let Some(metadata) = cached {
            log::debug!("Metadata cache hit for {}", path.display());
            return Ok(metadata);
        }

        log::debug!("Building metadata for {}", path.display());
        let metadata = Arc::new(self.reader.for_target_assembly(path)?);
        self.entries
            .insert(path.to_path_buf(), (modified, Arc::clone(&metadata)));
        Ok(metadata)
    }

    /// Drop the cached model of `path`.
    pub fn invalidate(&self, path: &Path) {
        self.entries.remove(path);
    }

    /// Number of cached models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

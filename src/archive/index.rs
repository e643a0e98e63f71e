use std::collections::HashMap;

use tracing::debug;

use super::{ArchiveEntry, ArchiveSource};
use crate::error::{Result, ViewerError};

/// Name-keyed lookup over the files of a loaded archive
///
/// Built once after the archive is opened; read-only afterwards. Directory entries are
/// left out.
pub struct ArchiveIndex {
    source: Box<dyn ArchiveSource>,
    entries: HashMap<String, ArchiveEntry>,
}

impl ArchiveIndex {
    pub fn build(source: Box<dyn ArchiveSource>) -> Result<Self> {
        let entries: HashMap<String, ArchiveEntry> = source
            .list_entries()?
            .into_iter()
            .filter(|entry| !entry.is_directory)
            .map(|entry| (entry.name.clone(), entry))
            .collect();

        debug!(files = entries.len(), "built archive index");
        Ok(Self { source, entries })
    }

    pub fn resolve(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read the bytes of an indexed file
    ///
    /// # Errors
    ///
    /// `ViewerError::Resource` if the name is not in the index, or whatever the underlying
    /// source reports when the read itself fails.
    pub fn read_binary(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self.resolve(name).ok_or_else(|| ViewerError::Resource { name: name.into() })?;
        self.source.read_entry_binary(&entry.name)
    }

    pub fn read_text(&self, name: &str) -> Result<String> {
        let entry = self.resolve(name).ok_or_else(|| ViewerError::Resource { name: name.into() })?;
        self.source.read_entry_text(&entry.name)
    }
}

impl std::fmt::Debug for ArchiveIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveIndex").field("files", &self.entries.len()).finish()
    }
}

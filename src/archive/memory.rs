use std::collections::BTreeMap;

use super::{ArchiveEntry, ArchiveSource};
use crate::error::{Result, ViewerError};

/// Archive whose entries live in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, name: &str, text: &str) -> Self {
        self.with_binary(name, text.as_bytes().to_vec())
    }

    pub fn with_binary(mut self, name: &str, bytes: Vec<u8>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&mut self, name: &str, bytes: Vec<u8>) {
        self.entries.insert(name.to_string(), bytes);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ArchiveSource for MemoryArchive {
    fn list_entries(&self) -> Result<Vec<ArchiveEntry>> {
        Ok(self
            .entries
            .iter()
            .map(|(name, bytes)| ArchiveEntry::file(name.clone(), bytes.len() as u64))
            .collect())
    }

    fn read_entry_binary(&self, name: &str) -> Result<Vec<u8>> {
        self.entries.get(name).cloned().ok_or_else(|| ViewerError::Resource { name: name.into() })
    }
}

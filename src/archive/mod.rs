//! Access to the files of an exported chat archive.
//!
//! An export is a bag of named entries: one transcript text file plus any media that was
//! attached to messages. [`ArchiveSource`] abstracts where those entries come from:
//!
//! - [`DirectoryArchive`] - an export that has already been extracted to a folder
//! - [`ZipArchive`] - the `.zip` file the chat app exports
//! - [`MemoryArchive`] - entries held in memory (tests, benchmarks, embedding)
//!
//! [`ArchiveIndex`] is the read-only name lookup the renderer uses to resolve attachments,
//! and [`selection`] picks which text entry is the transcript.

pub mod directory;
pub mod index;
pub mod memory;
pub mod selection;
pub mod zip_file;

use std::fmt;

pub use directory::DirectoryArchive;
pub use index::ArchiveIndex;
pub use memory::MemoryArchive;
pub use selection::{ChatFileChoice, find_chat_file};
pub use zip_file::ZipArchive;

use crate::error::Result;

/// One named entry as listed by an archive source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `/`-separated path relative to the archive root
    pub name: String,
    pub size_hint: u64,
    pub is_directory: bool,
}

impl ArchiveEntry {
    pub fn file(name: impl Into<String>, size_hint: u64) -> Self {
        Self { name: name.into(), size_hint, is_directory: false }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self { name: name.into(), size_hint: 0, is_directory: true }
    }

    pub fn is_text_file(&self) -> bool {
        !self.is_directory && self.name.to_lowercase().ends_with(".txt")
    }
}

/// Source of archive entries
pub trait ArchiveSource: fmt::Debug {
    fn list_entries(&self) -> Result<Vec<ArchiveEntry>>;

    /// Read an entry as text. Invalid UTF-8 is replaced rather than rejected.
    fn read_entry_text(&self, name: &str) -> Result<String> {
        let bytes = self.read_entry_binary(name)?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    fn read_entry_binary(&self, name: &str) -> Result<Vec<u8>>;
}

impl<T: ArchiveSource + ?Sized> ArchiveSource for Box<T> {
    fn list_entries(&self) -> Result<Vec<ArchiveEntry>> {
        (**self).list_entries()
    }

    fn read_entry_text(&self, name: &str) -> Result<String> {
        (**self).read_entry_text(name)
    }

    fn read_entry_binary(&self, name: &str) -> Result<Vec<u8>> {
        (**self).read_entry_binary(name)
    }
}

use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zip::ZipArchive as ZipReader;
use zip::result::ZipError;

use super::{ArchiveEntry, ArchiveSource};
use crate::error::{Result, ViewerError};
use crate::utils::{MAX_ENTRY_SIZE_BYTES, validate_entry_name};

/// Maximum number of entries accepted in one zip export (security: resource exhaustion)
const MAX_ENTRIES: usize = 100_000;

/// A chat export as the app hands it out: one `.zip` file
///
/// Entries are decompressed on demand. Directory entries are left out of the listing, as
/// are names that are absolute or climb out of the archive with `..`.
pub struct ZipArchive {
    path: PathBuf,
    reader: RefCell<ZipReader<BufReader<File>>>,
}

impl fmt::Debug for ZipArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipArchive").field("path", &self.path).finish_non_exhaustive()
    }
}

impl ZipArchive {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(ViewerError::io(
                format!("Export archive not found: {}", path.display()),
                io::Error::from(io::ErrorKind::NotFound),
            ));
        }

        let file = File::open(&path)
            .map_err(|e| ViewerError::io(format!("Failed to open {}", path.display()), e))?;
        let reader = ZipReader::new(BufReader::new(file)).map_err(|e| {
            ViewerError::Format(format!("Not a readable zip archive: {}: {}", path.display(), e))
        })?;
        if reader.len() > MAX_ENTRIES {
            return Err(ViewerError::Format(format!(
                "Export archive has more than {} entries: {}",
                MAX_ENTRIES,
                path.display()
            )));
        }

        debug!(path = %path.display(), entries = reader.len(), "opened zip export");
        Ok(Self { path, reader: RefCell::new(reader) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_error(&self, name: &str, e: ZipError) -> ViewerError {
        match e {
            ZipError::FileNotFound => ViewerError::Resource { name: name.to_string() },
            ZipError::Io(source) => ViewerError::io(
                format!("Failed to read {} from {}", name, self.path.display()),
                source,
            ),
            other => ViewerError::io(
                format!("Failed to read {} from {}", name, self.path.display()),
                io::Error::other(other),
            ),
        }
    }
}

fn too_large(name: &str, size: u64) -> ViewerError {
    ViewerError::io(
        format!("File too large: {} ({} bytes, max {} bytes)", name, size, MAX_ENTRY_SIZE_BYTES),
        io::Error::from(io::ErrorKind::FileTooLarge),
    )
}

impl ArchiveSource for ZipArchive {
    fn list_entries(&self) -> Result<Vec<ArchiveEntry>> {
        let mut reader = self.reader.borrow_mut();
        let mut entries = Vec::with_capacity(reader.len());

        for index in 0..reader.len() {
            let file = match reader.by_index(index) {
                Ok(file) => file,
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable zip entry");
                    continue;
                }
            };
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_string();
            if let Err(e) = validate_entry_name(&name) {
                warn!(error = %e, "skipping unsafe zip entry");
                continue;
            }
            entries.push(ArchiveEntry::file(name, file.size()));
        }

        Ok(entries)
    }

    fn read_entry_binary(&self, name: &str) -> Result<Vec<u8>> {
        validate_entry_name(name)
            .map_err(|e| ViewerError::Resource { name: format!("{} ({})", name, e) })?;

        let mut reader = self.reader.borrow_mut();
        let file = reader.by_name(name).map_err(|e| self.read_error(name, e))?;
        if file.is_dir() {
            return Err(ViewerError::Resource { name: name.to_string() });
        }
        if file.size() > MAX_ENTRY_SIZE_BYTES {
            return Err(too_large(name, file.size()));
        }

        // The declared size is not trusted; stop one byte past the limit
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.take(MAX_ENTRY_SIZE_BYTES + 1).read_to_end(&mut bytes).map_err(|e| {
            ViewerError::io(format!("Failed to read {} from {}", name, self.path.display()), e)
        })?;
        if bytes.len() as u64 > MAX_ENTRY_SIZE_BYTES {
            return Err(too_large(name, bytes.len() as u64));
        }
        Ok(bytes)
    }
}

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::{ArchiveEntry, ArchiveSource};
use crate::error::{Result, ViewerError};
use crate::utils::{resolve_entry_path, validate_file_size};

/// Maximum number of entries listed from one export folder (security: resource exhaustion)
const MAX_ENTRIES: usize = 100_000;

/// An export that has already been unpacked into a folder
///
/// Entry names are paths relative to the root, joined with `/`. Symlinks are not followed
/// and are left out of the listing, so an export cannot point the viewer at files outside
/// its own folder.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ViewerError::io(
                format!("Export folder not found: {}", root.display()),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, name: &str) -> Result<PathBuf> {
        resolve_entry_path(&self.root, name).map_err(|e| ViewerError::Resource {
            name: format!("{} ({})", name, e),
        })
    }
}

fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> =
        relative.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
    if parts.is_empty() { None } else { Some(parts.join("/")) }
}

impl ArchiveSource for DirectoryArchive {
    fn list_entries(&self) -> Result<Vec<ArchiveEntry>> {
        let mut entries = Vec::new();

        for item in WalkDir::new(&self.root).min_depth(1).follow_links(false).sort_by_file_name()
        {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable export entry");
                    continue;
                }
            };

            if item.path_is_symlink() {
                warn!(path = %item.path().display(), "skipping symlink in export folder");
                continue;
            }

            let Some(name) = relative_name(&self.root, item.path()) else {
                continue;
            };

            if item.file_type().is_dir() {
                entries.push(ArchiveEntry::directory(name));
            } else {
                let size = item.metadata().map(|m| m.len()).unwrap_or(0);
                entries.push(ArchiveEntry::file(name, size));
            }

            if entries.len() > MAX_ENTRIES {
                return Err(ViewerError::Format(format!(
                    "Export folder has more than {} entries: {}",
                    MAX_ENTRIES,
                    self.root.display()
                )));
            }
        }

        Ok(entries)
    }

    fn read_entry_binary(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.entry_path(name)?;
        if path.is_symlink() {
            return Err(ViewerError::Resource { name: name.to_string() });
        }

        let mut file = File::open(&path)
            .map_err(|e| ViewerError::io(format!("Failed to open {}", path.display()), e))?;
        validate_file_size(&file, &path).map_err(|e| {
            ViewerError::io(e.to_string(), std::io::Error::from(std::io::ErrorKind::FileTooLarge))
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| ViewerError::io(format!("Failed to read {}", path.display()), e))?;
        Ok(bytes)
    }
}

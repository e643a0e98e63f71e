use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{MediaStore, ResourceHandle};
use crate::error::{Result, ViewerError};
use crate::utils::file_url;

/// Extracts attachments into a private temporary directory
///
/// Each materialized attachment becomes its own file (unique per call, so a batch that is
/// evicted and reloaded never shares files with its earlier incarnation). Releasing a handle
/// deletes the file; dropping the store removes the directory and anything left in it.
#[derive(Debug)]
pub struct TempMediaStore {
    dir: TempDir,
    live: HashMap<Uuid, PathBuf>,
}

impl TempMediaStore {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("chat-export-media-")
            .tempdir()
            .map_err(|e| ViewerError::io("Failed to create media directory", e))?;
        Ok(Self { dir, live: HashMap::new() })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn path_of(&self, handle: &ResourceHandle) -> Option<&Path> {
        self.live.get(&handle.id()).map(PathBuf::as_path)
    }
}

/// Last path segment of an entry name with anything but a conservative set of characters
/// replaced, so the extracted file keeps a recognisable name and its extension
fn safe_file_name(name: &str) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if cleaned.trim_matches('.').is_empty() { "attachment".to_string() } else { cleaned }
}

impl MediaStore for TempMediaStore {
    fn materialize(&mut self, name: &str, bytes: &[u8]) -> Result<ResourceHandle> {
        let id = Uuid::new_v4();
        let path = self.dir.path().join(format!("{}-{}", id.simple(), safe_file_name(name)));
        fs::write(&path, bytes)
            .map_err(|e| ViewerError::io(format!("Failed to extract {}", name), e))?;

        debug!(entry = name, path = %path.display(), "extracted attachment");
        let handle = ResourceHandle::new(id, name, file_url(&path));
        self.live.insert(id, path);
        Ok(handle)
    }

    fn release(&mut self, handle: ResourceHandle) {
        let Some(path) = self.live.remove(&handle.id()) else {
            return;
        };
        if let Err(e) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "failed to remove extracted attachment");
        }
    }
}

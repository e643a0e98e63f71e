use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Maximum size of a single archive entry we are willing to read: 64MB
pub const MAX_ENTRY_SIZE_BYTES: u64 = 64 * 1024 * 1024;

// Characters escaped inside a file:// URL path (slashes stay literal)
const URL_PATH_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'[')
    .add(b']');

/// Builds a `file://` URL for an extracted attachment
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use chat_export_explorer::utils::file_url;
///
/// assert_eq!(file_url(Path::new("/tmp/media/IMG 01.jpg")), "file:///tmp/media/IMG%2001.jpg");
/// ```
pub fn file_url(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    let normalized = path_str.replace('\\', "/");
    let with_root =
        if normalized.starts_with('/') { normalized } else { format!("/{}", normalized) };
    format!("file://{}", utf8_percent_encode(&with_root, URL_PATH_SET))
}

/// Validates an archive entry name before it is joined onto the archive root
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The name is absolute or carries a drive/root prefix
/// - The name contains '..' components (path traversal)
pub fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Archive entry name is empty");
    }

    for component in Path::new(name).components() {
        match component {
            Component::ParentDir => bail!("Archive entry contains '..' component: {}", name),
            Component::RootDir | Component::Prefix(_) => {
                bail!("Archive entry must be relative: {}", name)
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    Ok(())
}

/// Joins a validated entry name onto an archive root
pub fn resolve_entry_path(root: &Path, name: &str) -> Result<PathBuf> {
    validate_entry_name(name)?;
    Ok(root.join(name))
}

/// Validates that a file's size is within [`MAX_ENTRY_SIZE_BYTES`]
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be swapped between the size check
/// and the read.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 64MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_ENTRY_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_ENTRY_SIZE_BYTES
        );
    }

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use chat_export_explorer::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/Downloads/chat");
/// // Returns "~/Downloads/chat" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

//! Error types shared by the library modules.
//!
//! Loading a chat can fail in a few distinct ways that callers need to tell apart:
//!
//! - **Format**: the archive has no usable transcript. Fatal to the load.
//! - **Ambiguity**: the transcript (or principal) could not be chosen automatically and no
//!   choice was supplied. Callers should prompt, not crash.
//! - **Resource**: an attachment name is not present in the archive. Local to one message;
//!   the renderer falls back to plain text.
//!
//! Window bookkeeping conditions (loading a resident batch, unloading a missing one) are
//! not errors at all; those operations are no-ops.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("Ambiguous choice, one of: {}", candidates.join(", "))]
    Ambiguity { candidates: Vec<String> },

    #[error("Attachment not found in archive: {name}")]
    Resource { name: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ViewerError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// True for errors that should be answered with a user choice rather than reported
    pub fn is_ambiguity(&self) -> bool {
        matches!(self, Self::Ambiguity { .. })
    }
}

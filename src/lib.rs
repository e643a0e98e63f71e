//! Chat Export Explorer - Browse, search and export chat transcripts
//!
//! This library reads the plain-text transcript of an exported chat, together with the
//! media files exported next to it, and shows it without rendering everything at once:
//!
//! - Parsing the `d/m/yyyy, time - Sender: text` transcript format into messages
//! - Choosing the transcript file and the "me" participant, asking the caller when needed
//! - Rendering a bounded window of fixed-size message batches, loaded and evicted as the
//!   user scrolls
//! - Searching the whole transcript and jumping between matches, re-windowing as needed
//!
//! # Example
//!
//! ```
//! use chat_export_explorer::archive::MemoryArchive;
//! use chat_export_explorer::session::ChatLoader;
//!
//! let archive = MemoryArchive::new().with_text("_chat.txt", "1/2/2023, 10:00 - Alice: hi");
//! let chat = ChatLoader::new(Box::new(archive), "export").start()?.into_ready()?;
//! assert_eq!(chat.transcript().principal(), Some("Alice"));
//! # Ok::<(), chat_export_explorer::ViewerError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod media;
pub mod models;
pub mod parsers;
pub mod render;
pub mod search;
pub mod session;
pub mod tui;
pub mod utils;
pub mod window;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use parsers::transcript::parse_transcript;
pub use search::{SearchNavigator, TermMatcher};
pub use session::{ChatLoader, ChatSession, LoadStep, LoadedChat};
pub use window::{Presentation, WindowManager};

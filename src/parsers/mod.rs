//! Parser for plain-text chat exports
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach:
//!
//! - **Unrecognised lines**: Anything that is not a message start line is treated as a
//!   continuation of the message in progress. A malformed start line therefore never aborts
//!   parsing; its text is kept.
//!
//! - **No messages at all**: The parser returns an empty transcript. Deciding that an empty
//!   transcript is a format error is the caller's job (see [`crate::session`]).
//!
//! - **Diagnostics**: A summary (message count, participants, orphaned lines before the first
//!   message) is emitted at `debug` level via `tracing`.

pub mod transcript;

pub use transcript::{looks_like_transcript, parse_transcript};

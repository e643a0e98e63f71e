//! Data models for exported chat transcripts.
//!
//! This module defines the data structures used throughout the application:
//!
//! - [`Message`] - One chat message (possibly spanning several physical lines)
//! - [`ParticipantSet`] - Sender names in first-seen order
//! - [`ParsedTranscript`] / [`Transcript`] - Parser output before and after the
//!   principal participant is chosen
//! - [`AttachmentKind`] - Media category of an attached file
//!
//! Messages use serde for JSON export.

pub mod attachment;
pub mod message;
pub mod participants;
pub mod transcript;

pub use attachment::AttachmentKind;
pub use message::{Message, MessageKind, Sender};
pub use participants::ParticipantSet;
pub use transcript::{ParsedTranscript, Transcript};

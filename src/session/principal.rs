//! Choosing the principal participant, the one whose messages render as outgoing.
//!
//! Only the first two participants seen in the transcript are offered. In group chats
//! everyone after them always renders as incoming.

use super::LoadedChat;
use super::loader::PendingChat;
use crate::error::{Result, ViewerError};
use crate::models::message::same_participant;

/// How many participants a principal prompt offers
pub const PRINCIPAL_OPTIONS: usize = 2;

/// Pending choice of "which participant am I"
#[derive(Debug)]
pub struct PrincipalRequest {
    pending: PendingChat,
    options: Vec<String>,
}

impl PrincipalRequest {
    pub(crate) fn new(pending: PendingChat) -> Self {
        let participants = pending.parsed.participants();
        let options = participants.iter().take(PRINCIPAL_OPTIONS).map(String::from).collect();
        Self { pending, options }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Every participant of the transcript, including those not offered
    pub fn participants(&self) -> &[String] {
        self.pending.parsed.participants().as_slice()
    }

    /// Finish the load with `name` as the principal (case-insensitive)
    ///
    /// # Errors
    ///
    /// `ViewerError::Ambiguity` if `name` is not one of the options.
    pub fn resolve(self, name: &str) -> Result<LoadedChat> {
        let Some(chosen) = self.options.iter().find(|option| same_participant(option, name)) else {
            return Err(ViewerError::Ambiguity { candidates: self.options });
        };
        let chosen = chosen.clone();
        Ok(self.pending.finish(Some(&chosen)))
    }

    pub fn decline(self) -> ViewerError {
        ViewerError::Ambiguity { candidates: self.options }
    }
}

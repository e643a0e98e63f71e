use std::sync::Arc;

use super::{Message, MessageKind, ParticipantSet};

/// Parser output: messages in file order, participant directionality not yet known
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTranscript {
    pub(crate) messages: Vec<Message>,
    pub(crate) participants: ParticipantSet,
}

impl ParsedTranscript {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn participants(&self) -> &ParticipantSet {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Tag every message as outgoing/incoming/system. Consumes the parse result so the
    /// assignment can only happen once.
    pub fn assign_principal(mut self, principal: Option<&str>) -> Transcript {
        for message in &mut self.messages {
            message.assign_kind(principal);
        }
        Transcript {
            messages: self.messages.into(),
            participants: self.participants,
            principal: principal.map(str::to_string),
        }
    }
}

/// Immutable, principal-resolved transcript shared by the window and search index
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Arc<[Message]>,
    participants: ParticipantSet,
    principal: Option<String>,
}

impl Transcript {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Cheap shared handle to the message sequence
    pub fn shared_messages(&self) -> Arc<[Message]> {
        Arc::clone(&self.messages)
    }

    pub fn participants(&self) -> &ParticipantSet {
        &self.participants
    }

    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn count_kind(&self, kind: MessageKind) -> usize {
        self.messages.iter().filter(|m| m.kind == kind).count()
    }
}

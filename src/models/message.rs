use serde::{Deserialize, Serialize};

/// Who wrote a message: a named participant or the export's own system notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum Sender {
    Participant(String),
    System,
}

impl Sender {
    pub fn name(&self) -> Option<&str> {
        match self {
            Sender::Participant(name) => Some(name),
            Sender::System => None,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Sender::System)
    }
}

/// Directionality of a message relative to the principal participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Participant message whose principal has not been chosen yet
    Unassigned,
    Outgoing,
    Incoming,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    pub date: String,
    pub time: String,
    pub kind: MessageKind,
}

/// Participant names compare case-insensitively, including non-ASCII letters
pub(crate) fn same_participant(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl Message {
    pub fn from_participant(
        name: impl Into<String>,
        content: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            sender: Sender::Participant(name.into()),
            content: content.into(),
            date: date.into(),
            time: time.into(),
            kind: MessageKind::Unassigned,
        }
    }

    pub fn system(content: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            sender: Sender::System,
            content: content.into(),
            date: date.into(),
            time: String::new(),
            kind: MessageKind::System,
        }
    }

    /// Resolve directionality against the principal (case-insensitive name match)
    pub(crate) fn assign_kind(&mut self, principal: Option<&str>) {
        self.kind = match (&self.sender, principal) {
            (Sender::System, _) => MessageKind::System,
            (Sender::Participant(name), Some(principal)) if same_participant(name, principal) => {
                MessageKind::Outgoing
            }
            (Sender::Participant(_), _) => MessageKind::Incoming,
        };
    }

    /// Rebuild the first physical line of this message as it appeared in the export
    pub fn start_line(&self) -> String {
        let first = self.content.lines().next().unwrap_or("");
        match &self.sender {
            Sender::Participant(name) => {
                format!("{}, {} - {}: {}", self.date, self.time, name, first)
            }
            Sender::System => format!("{} - {}", self.date, first),
        }
    }
}

use tracing::{debug, info};

use super::principal::PrincipalRequest;
use super::LoadedChat;
use crate::archive::{ArchiveSource, ChatFileChoice, find_chat_file};
use crate::error::{Result, ViewerError};
use crate::models::ParsedTranscript;
use crate::parsers::parse_transcript;

/// Where a load stands: done, or waiting on a choice only the user can make
#[derive(Debug)]
pub enum LoadStep {
    Ready(LoadedChat),
    /// Several text files look like transcripts
    ChooseFile(FileRequest),
    /// The transcript has two or more participants and one of them is "me"
    ChoosePrincipal(PrincipalRequest),
}

impl LoadStep {
    /// The loaded chat, or an ambiguity error listing the pending choice
    pub fn into_ready(self) -> Result<LoadedChat> {
        match self {
            LoadStep::Ready(chat) => Ok(chat),
            LoadStep::ChooseFile(request) => Err(request.decline()),
            LoadStep::ChoosePrincipal(request) => Err(request.decline()),
        }
    }
}

/// Loads a chat from an archive, one step at a time
///
/// # Examples
///
/// ```
/// use chat_export_explorer::archive::MemoryArchive;
/// use chat_export_explorer::session::{ChatLoader, LoadStep};
///
/// let archive = MemoryArchive::new()
///     .with_text("_chat.txt", "1/2/2023, 10:00 - Alice: Hi\n1/2/2023, 10:01 - Bob: Hey");
///
/// let LoadStep::ChoosePrincipal(request) = ChatLoader::new(Box::new(archive), "chat.zip").start()?
/// else {
///     panic!("two participants need a choice");
/// };
/// assert_eq!(request.options(), ["Alice", "Bob"]);
///
/// let chat = request.resolve("Bob")?;
/// assert_eq!(chat.transcript().principal(), Some("Bob"));
/// # Ok::<(), chat_export_explorer::ViewerError>(())
/// ```
#[derive(Debug)]
pub struct ChatLoader {
    source: Box<dyn ArchiveSource>,
    archive_name: String,
    preferred_file: Option<String>,
}

impl ChatLoader {
    pub fn new(source: Box<dyn ArchiveSource>, archive_name: impl Into<String>) -> Self {
        Self { source, archive_name: archive_name.into(), preferred_file: None }
    }

    /// Skip transcript selection and load this entry
    pub fn with_preferred_file(mut self, name: impl Into<String>) -> Self {
        self.preferred_file = Some(name.into());
        self
    }

    pub fn start(mut self) -> Result<LoadStep> {
        if let Some(name) = self.preferred_file.take() {
            return self.load_file(name);
        }

        match find_chat_file(self.source.as_ref(), &self.archive_name)? {
            ChatFileChoice::Resolved(name) => self.load_file(name),
            ChatFileChoice::Ambiguous(options) => {
                debug!(candidates = options.len(), "transcript choice needed");
                Ok(LoadStep::ChooseFile(FileRequest { loader: self, options }))
            }
        }
    }

    fn load_file(self, file_name: String) -> Result<LoadStep> {
        let text = self.source.read_entry_text(&file_name)?;
        let parsed = parse_transcript(&text);
        if parsed.is_empty() {
            return Err(ViewerError::Format(format!("No messages found in {}", file_name)));
        }

        info!(
            file = %file_name,
            messages = parsed.len(),
            participants = parsed.participants().len(),
            "parsed transcript"
        );

        let pending = PendingChat { source: self.source, file_name, parsed };
        let principal = match pending.parsed.participants().len() {
            0 => None,
            1 => pending.parsed.participants().iter().next().map(str::to_string),
            _ => return Ok(LoadStep::ChoosePrincipal(PrincipalRequest::new(pending))),
        };
        Ok(LoadStep::Ready(pending.finish(principal.as_deref())))
    }
}

/// Parsed transcript still waiting for its principal
#[derive(Debug)]
pub(crate) struct PendingChat {
    source: Box<dyn ArchiveSource>,
    file_name: String,
    pub(crate) parsed: ParsedTranscript,
}

impl PendingChat {
    pub(crate) fn finish(self, principal: Option<&str>) -> LoadedChat {
        debug!(principal = ?principal, "principal resolved");
        LoadedChat {
            source: self.source,
            file_name: self.file_name,
            transcript: self.parsed.assign_principal(principal),
        }
    }
}

/// Pending choice between several candidate transcript files
#[derive(Debug)]
pub struct FileRequest {
    loader: ChatLoader,
    options: Vec<String>,
}

impl FileRequest {
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Continue loading with the chosen file
    ///
    /// # Errors
    ///
    /// `ViewerError::Ambiguity` if `name` is not one of the options; the load is abandoned
    /// in that case.
    pub fn resolve(self, name: &str) -> Result<LoadStep> {
        if !self.options.iter().any(|option| option == name) {
            return Err(ViewerError::Ambiguity { candidates: self.options });
        }
        self.loader.load_file(name.to_string())
    }

    /// Give up on the load
    pub fn decline(self) -> ViewerError {
        ViewerError::Ambiguity { candidates: self.options }
    }
}

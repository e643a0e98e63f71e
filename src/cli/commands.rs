use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::archive::{ArchiveIndex, ArchiveSource, DirectoryArchive, ZipArchive};
use crate::config::ViewerConfig;
use crate::export;
use crate::logging::{LogTarget, init_logging};
use crate::media::TempMediaStore;
use crate::models::{MessageKind, Sender};
use crate::search::{TermMatcher, find_matches};
use crate::session::{ChatLoader, LoadStep, LoadedChat};
use crate::tui::{self, TerminalManager};
use crate::utils::{format_path_with_tilde, sanitize_for_terminal};

const FILE_PROMPT: &str = "Several transcripts found. Which one is the chat?";
const PRINCIPAL_PROMPT: &str = "Which participant are you?";

#[derive(Parser)]
#[command(name = "chat-export-explorer")]
#[command(version = "0.1.0")]
#[command(about = "Browse and search exported chat transcripts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Which export to open and how to answer the questions loading may ask
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Exported .zip, extracted export folder, or the transcript .txt inside it
    pub path: PathBuf,

    /// Participant whose messages are shown as outgoing
    #[arg(long)]
    pub me: Option<String>,

    /// Transcript file to open when the export holds several
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Messages per rendered batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Most batches kept rendered at once
    #[arg(long)]
    pub max_batches: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Html,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a chat in the terminal viewer
    View {
        #[command(flatten)]
        load: LoadArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Write diagnostic logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Show statistics about a chat
    Stats {
        #[command(flatten)]
        load: LoadArgs,
    },
    /// Print every message containing a term
    Search {
        #[command(flatten)]
        load: LoadArgs,
        /// Text to look for (case-insensitive)
        term: String,
    },
    /// Export a chat as JSON or a standalone HTML page
    Export {
        #[command(flatten)]
        load: LoadArgs,
        #[arg(long, value_enum, default_value_t)]
        format: ExportFormat,
        /// Highlight this term in the HTML output
        #[arg(long)]
        highlight: Option<String>,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::View { load, window, log_file }) => {
            let target = log_file.map(LogTarget::File).unwrap_or(LogTarget::Off);
            init_logging(target)?;
            view_chat(&load, &window)?;
        }
        Some(Commands::Stats { load }) => {
            init_logging(LogTarget::Stderr)?;
            show_stats(&load)?;
        }
        Some(Commands::Search { load, term }) => {
            init_logging(LogTarget::Stderr)?;
            search_chat(&load, &term)?;
        }
        Some(Commands::Export { load, format, highlight, output }) => {
            init_logging(LogTarget::Stderr)?;
            export_chat(&load, format, highlight.as_deref(), output.as_deref())?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Where the export named by a PATH argument lives
#[derive(Debug, PartialEq, Eq)]
enum ExportInput {
    /// The `.zip` file as exported by the chat app
    Zip(PathBuf),
    /// An extracted folder, optionally with the transcript named by the path
    Folder { folder: PathBuf, file: Option<String> },
}

fn is_zip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// A `.zip` path is opened as an archive. Any other file path names the transcript and its
/// folder is the archive.
fn resolve_input(path: &Path) -> ExportInput {
    if path.is_file() && is_zip(path) {
        ExportInput::Zip(path.to_path_buf())
    } else if path.is_file() {
        let folder = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file = path.file_name().map(|name| name.to_string_lossy().into_owned());
        ExportInput::Folder { folder, file }
    } else {
        ExportInput::Folder { folder: path.to_path_buf(), file: None }
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.canonicalize().ok()?.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn start_loading(load: &LoadArgs) -> Result<LoadStep> {
    let archive: Box<dyn ArchiveSource>;
    let (archive_name, file_from_path) = match resolve_input(&load.path) {
        ExportInput::Zip(path) => {
            archive = Box::new(ZipArchive::open(&path)?);
            (file_name_of(&path), None)
        }
        ExportInput::Folder { folder, file } => {
            archive = Box::new(DirectoryArchive::open(&folder)?);
            (file_name_of(&folder), file)
        }
    };
    let archive_name = archive_name.unwrap_or_else(|| "export".to_string());

    let mut loader = ChatLoader::new(archive, archive_name);
    if let Some(file) = load.file.clone().or(file_from_path) {
        loader = loader.with_preferred_file(file);
    }
    Ok(loader.start()?)
}

/// Answer every pending load question, from `me` or from `choose`
///
/// `choose` gets a title and the options and returns the pick, or `None` to give up.
pub fn finish_loading(
    mut step: LoadStep,
    me: Option<&str>,
    choose: &mut dyn FnMut(&str, &[String]) -> Result<Option<String>>,
) -> Result<LoadedChat> {
    loop {
        step = match step {
            LoadStep::Ready(chat) => return Ok(chat),
            LoadStep::ChooseFile(request) => match choose(FILE_PROMPT, request.options())? {
                Some(name) => request.resolve(&name)?,
                None => return Err(request.decline()).context("Choose the transcript with --file"),
            },
            LoadStep::ChoosePrincipal(request) => {
                let answer = match me {
                    Some(me) => Some(me.to_string()),
                    None => choose(PRINCIPAL_PROMPT, request.options())?,
                };
                match answer {
                    Some(name) => LoadStep::Ready(request.resolve(&name)?),
                    None => {
                        return Err(request.decline())
                            .context("Say which participant you are with --me");
                    }
                }
            }
        };
    }
}

/// Load without asking anything; ambiguity becomes an error listing the candidates
fn load_non_interactive(load: &LoadArgs) -> Result<LoadedChat> {
    finish_loading(start_loading(load)?, load.me.as_deref(), &mut |_, _| Ok(None))
}

fn view_chat(load: &LoadArgs, window: &WindowArgs) -> Result<()> {
    let config = ViewerConfig::load()?.with_overrides(window.batch_size, window.max_batches)?;
    let step = start_loading(load)?;
    let media = TempMediaStore::new()?;

    let mut terminal = TerminalManager::new()?;
    let chat = finish_loading(step, load.me.as_deref(), &mut |title, options| {
        tui::choose(terminal.terminal_mut(), title, options)
    })?;
    tui::run_viewer(terminal.terminal_mut(), chat, Box::new(media), config)?;
    terminal.restore()
}

fn show_stats(load: &LoadArgs) -> Result<()> {
    let chat = load_non_interactive(load)?;
    let transcript = chat.transcript();
    let config = ViewerConfig::load()?;

    println!("Chat Export Statistics");
    println!("======================");
    println!("Transcript: {}", sanitize_for_terminal(chat.file_name()));
    println!("Export: {}", format_path_with_tilde(&load.path));
    println!("Total messages: {}", transcript.len());
    println!("  Outgoing: {}", transcript.count_kind(MessageKind::Outgoing));
    println!("  Incoming: {}", transcript.count_kind(MessageKind::Incoming));
    println!("  System: {}", transcript.count_kind(MessageKind::System));

    let participants: Vec<String> =
        transcript.participants().iter().map(sanitize_for_terminal).collect();
    println!("Participants: {}", participants.join(", "));
    println!("You: {}", transcript.principal().map(sanitize_for_terminal).unwrap_or_default());
    println!(
        "Batches: {} of {} messages",
        transcript.len().div_ceil(config.batch_size),
        config.batch_size
    );

    Ok(())
}

fn search_chat(load: &LoadArgs, term: &str) -> Result<()> {
    let Some(matcher) = TermMatcher::new(term) else {
        bail!("Search term is empty");
    };
    let chat = load_non_interactive(load)?;
    let messages = chat.transcript().messages();
    let hits = find_matches(messages, &matcher);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for &index in &hits {
        let message = &messages[index];
        let sender = match &message.sender {
            Sender::Participant(name) => name.as_str(),
            Sender::System => "*",
        };
        let first_line = message.content.lines().next().unwrap_or("");
        writeln!(
            out,
            "[{}] {} {} {}: {}",
            index,
            sanitize_for_terminal(&message.date),
            sanitize_for_terminal(&message.time),
            sanitize_for_terminal(sender),
            sanitize_for_terminal(first_line)
        )?;
    }
    writeln!(out, "{} matches for \"{}\"", hits.len(), sanitize_for_terminal(term))?;

    Ok(())
}

fn export_chat(
    load: &LoadArgs,
    format: ExportFormat,
    highlight: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let chat = load_non_interactive(load)?;
    let file_name = chat.file_name().to_string();
    let (transcript, source) = chat.into_parts();

    let rendered = match format {
        ExportFormat::Json => export::to_json(&file_name, &transcript)?,
        ExportFormat::Html => {
            let archive = ArchiveIndex::build(source)?;
            let matcher = highlight.and_then(TermMatcher::new);
            export::to_html(&file_name, &transcript, &archive, matcher.as_ref())
        }
    };

    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::archive::MemoryArchive;

    const TWO_PARTY: &str = "1/2/2023, 10:00 - Alice: hi\n1/2/2023, 10:01 - Bob: hey";

    fn step(archive: MemoryArchive) -> LoadStep {
        ChatLoader::new(Box::new(archive), "export").start().unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::try_parse_from([
            "chat-export-explorer",
            "export",
            "chat",
            "--format",
            "html",
            "--highlight",
            "hi",
            "--me",
            "Alice",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Export { load, format, highlight, output }) => {
                assert_eq!(load.path, PathBuf::from("chat"));
                assert_eq!(load.me.as_deref(), Some("Alice"));
                assert_eq!(format, ExportFormat::Html);
                assert_eq!(highlight.as_deref(), Some("hi"));
                assert!(output.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_finish_loading_uses_me() {
        let archive = MemoryArchive::new().with_text("_chat.txt", TWO_PARTY);
        let chat = finish_loading(step(archive), Some("bob"), &mut |_, _| Ok(None)).unwrap();
        assert_eq!(chat.transcript().principal(), Some("Bob"));
    }

    #[test]
    fn test_finish_loading_asks_chooser() {
        let archive = MemoryArchive::new()
            .with_text("chat a.txt", TWO_PARTY)
            .with_text("chat b.txt", "1/2/2023, 10:00 - Carol: solo");

        let mut asked = Vec::new();
        let chat = finish_loading(step(archive), None, &mut |title, options| {
            asked.push(title.to_string());
            Ok(options.last().cloned())
        })
        .unwrap();

        assert_eq!(asked, vec![FILE_PROMPT.to_string()]);
        assert_eq!(chat.file_name(), "chat b.txt");
        assert_eq!(chat.transcript().principal(), Some("Carol"));
    }

    #[test]
    fn test_finish_loading_declined_lists_candidates() {
        let archive = MemoryArchive::new().with_text("_chat.txt", TWO_PARTY);
        let err = finish_loading(step(archive), None, &mut |_, _| Ok(None)).unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("--me"));
        assert!(message.contains("Alice, Bob"));
    }

    #[test]
    fn test_resolve_input_for_text_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("_chat.txt");
        fs::write(&file, TWO_PARTY).unwrap();

        assert_eq!(
            resolve_input(&file),
            ExportInput::Folder { folder: dir.path().to_path_buf(), file: Some("_chat.txt".into()) }
        );
        assert_eq!(
            resolve_input(dir.path()),
            ExportInput::Folder { folder: dir.path().to_path_buf(), file: None }
        );
    }

    #[test]
    fn test_resolve_input_for_zip_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let zip = dir.path().join("Chat with Bob.ZIP");
        fs::write(&zip, b"PK").unwrap();
        assert_eq!(resolve_input(&zip), ExportInput::Zip(zip.clone()));

        // A folder whose name ends in .zip is still a folder
        let folder = dir.path().join("extracted.zip");
        fs::create_dir(&folder).unwrap();
        assert_eq!(resolve_input(&folder), ExportInput::Folder { folder, file: None });
    }
}

// TUI module: transcript viewer and list prompts
mod app;
mod events;
mod layout;
mod prompt;
mod rendering;
mod terminal;
mod view;

use anyhow::Result;
pub use app::App;
pub use events::{Action, InputMode, key_to_action};
pub use prompt::{ListPrompt, PromptOutcome};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
pub use terminal::{TerminalManager, ViewerTerminal};
pub use view::{BlockId, TranscriptView};

use crate::config::ViewerConfig;
use crate::media::MediaStore;
use crate::session::LoadedChat;

/// Ask the user to pick one of `options`; `None` if they cancel
pub fn choose<B: Backend>(
    terminal: &mut Terminal<B>,
    title: &str,
    options: &[String],
) -> Result<Option<String>> {
    ListPrompt::new(title, options.to_vec()).run(terminal)
}

/// Open `chat` in the viewer and run it until the user quits
pub fn run_viewer<B: Backend>(
    terminal: &mut Terminal<B>,
    chat: LoadedChat,
    media: Box<dyn MediaStore>,
    config: ViewerConfig,
) -> Result<()> {
    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let (width, height) = layout::AppLayout::new(area).transcript_inner();

    let session = chat.open(TranscriptView::new(width, height), media, config)?;
    let mut app = App::new(session);
    let result = app.run(terminal);
    app.into_session().close();

    result
}

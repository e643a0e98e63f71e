use std::time::Duration;

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;

use super::events::{Action, InputMode, poll_event};
use super::rendering::render_prompt;

/// A full-screen single-choice list
pub struct ListPrompt {
    title: String,
    options: Vec<String>,
    selected: usize,
}

/// Result of feeding one action to a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Chosen(String),
    Cancelled,
}

impl ListPrompt {
    pub fn new(title: impl Into<String>, options: Vec<String>) -> Self {
        Self { title: title.into(), options, selected: 0 }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle_action(&mut self, action: Action) -> PromptOutcome {
        match action {
            Action::ScrollUp | Action::PreviousMatch => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::ScrollDown | Action::NextMatch => {
                if self.selected + 1 < self.options.len() {
                    self.selected += 1;
                }
            }
            Action::Home => self.selected = 0,
            Action::End => self.selected = self.options.len().saturating_sub(1),
            Action::Submit => {
                if let Some(choice) = self.options.get(self.selected) {
                    return PromptOutcome::Chosen(choice.clone());
                }
            }
            Action::Back | Action::Quit => return PromptOutcome::Cancelled,
            _ => {}
        }
        PromptOutcome::Pending
    }

    /// Show the list until the user chooses (`Some`) or cancels (`None`)
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<Option<String>> {
        if self.options.is_empty() {
            return Ok(None);
        }

        loop {
            terminal.draw(|f| render_prompt(f, &self.title, &self.options, self.selected))?;

            let action = poll_event(Duration::from_millis(100), InputMode::Normal)?;
            match self.handle_action(action) {
                PromptOutcome::Pending => {}
                PromptOutcome::Chosen(choice) => return Ok(Some(choice)),
                PromptOutcome::Cancelled => return Ok(None),
            }
        }
    }
}

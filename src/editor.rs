use anyhow::{Context, Result};
use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{
    Cmd, CompletionType, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, KeyEvent,
    RepeatCount,
};
use std::path::PathBuf;
use crate::completion::{CompletionMode, GadbHelper};

pub enum Input {
    Line(String),
    /// Ctrl+C on a non-empty line: the line is dropped
    Interrupted,
    /// Ctrl+D, or Ctrl+C on an empty line
    Eof,
}

/// Ctrl+C abandons the line being edited; on an empty line it ends the session.
struct InterruptOrQuit;

impl ConditionalEventHandler for InterruptOrQuit {
    fn handle(&self, _evt: &Event, _n: RepeatCount, _positive: bool, ctx: &EventContext) -> Option<Cmd> {
        if ctx.line().is_empty() {
            Some(Cmd::EndOfFile)
        } else {
            Some(Cmd::Interrupt)
        }
    }
}

/// rustyline editor with file-backed history and gadb's completer.
pub struct LineEditor {
    editor: Editor<GadbHelper, FileHistory>,
    history_path: PathBuf,
}

impl LineEditor {
    pub fn new(mode: CompletionMode, history_path: PathBuf, history_limit: usize) -> Result<Self> {
        let config = Config::builder()
            .max_history_size(history_limit)
            .context("Invalid history size")?
            .history_ignore_dups(true)
            .context("Invalid history settings")?
            .auto_add_history(false)
            .completion_type(CompletionType::List)
            .build();

        let mut editor: Editor<GadbHelper, FileHistory> =
            Editor::with_config(config).context("Failed to initialise line editor")?;
        editor.set_helper(Some(GadbHelper::new(mode)));
        editor.bind_sequence(KeyEvent::ctrl('C'), EventHandler::Conditional(Box::new(InterruptOrQuit)));

        if let Err(e) = editor.load_history(&history_path) {
            // Missing on first run
            debug!("No history loaded from {}: {}", history_path.display(), e);
        }

        Ok(Self { editor, history_path })
    }

    pub fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }

    /// Adds a line to history and persists it right away.
    pub fn remember(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!("Failed to record history: {}", e);
            return;
        }
        if let Err(e) = self.editor.save_history(&self.history_path) {
            debug!("Failed to save history to {}: {}", self.history_path.display(), e);
        }
    }
}

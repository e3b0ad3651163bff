//! Session engine: turns key presses into session transitions.
//!
//! The engine owns a [`SessionState`] and the keymap it was configured with.
//! Every key press is classified once into a [`KeyAction`] and dispatched;
//! per-file failures become a [`Notice`] and the loop carries on.

use crate::domain::{FileEntry, FsRelocator, Relocator, SessionState};
use crate::error::UndoError;
use crate::keymap::{classify, KeyAction, Keymap, ReservedKeys};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    AwaitingInput,
    Completed,
    Cancelled,
}

impl EngineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, EngineState::Completed | EngineState::Cancelled)
    }
}

/// One unit of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(char),
    /// A key with no character, by name
    Other(String),
    /// Re-present without changing anything (e.g. terminal resize)
    Redraw,
    /// Input ended; handled like the quit key
    Closed,
}

pub trait InputSource {
    /// Blocks until the next event is available
    fn next_event(&mut self) -> io::Result<InputEvent>;
}

pub trait PresentationSink {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()>;
}

/// Hands a file to the system's default application
pub trait Opener {
    fn open(&mut self, path: &Path) -> crate::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message shown to the user after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Everything the engine needs besides the file list
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub keymap: Keymap,
    pub reserved: ReservedKeys,
    /// Directory being sorted, for display
    pub working_dir: PathBuf,
}

/// Read-only view handed to the presentation sink
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: EngineState,
    pub current_file: Option<&'a FileEntry>,
    /// `(cursor, total)`
    pub progress: (usize, usize),
    pub message: Option<&'a Notice>,
    pub last_key: Option<char>,
    pub keymap: &'a Keymap,
    pub reserved: &'a ReservedKeys,
    pub working_dir: &'a Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: Outcome,
    pub cursor: usize,
    pub total: usize,
    pub moved: usize,
    pub skipped: usize,
}

pub struct SessionEngine<R = FsRelocator> {
    session: SessionState<R>,
    config: EngineConfig,
    state: EngineState,
    message: Option<Notice>,
    last_key: Option<char>,
}

impl<R: Relocator> SessionEngine<R> {
    pub fn new(session: SessionState<R>, config: EngineConfig) -> Self {
        let mut engine = Self {
            session,
            config,
            state: EngineState::Running,
            message: None,
            last_key: None,
        };
        engine.settle();
        engine
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn session(&self) -> &SessionState<R> {
        &self.session
    }

    pub fn message(&self) -> Option<&Notice> {
        self.message.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            current_file: self.session.current_file(),
            progress: self.session.progress(),
            message: self.message.as_ref(),
            last_key: self.last_key,
            keymap: &self.config.keymap,
            reserved: &self.config.reserved,
            working_dir: &self.config.working_dir,
        }
    }

    /// Presents, waits for input and dispatches until the session is
    /// completed or cancelled. A failing input source counts as closed input;
    /// only presentation errors end the loop early.
    pub fn run<I, P, O>(
        &mut self,
        input: &mut I,
        sink: &mut P,
        opener: &mut O,
    ) -> io::Result<SessionReport>
    where
        I: InputSource + ?Sized,
        P: PresentationSink + ?Sized,
        O: Opener + ?Sized,
    {
        let (_, total) = self.session.progress();
        info!(total, dir = %self.config.working_dir.display(), "session started");

        loop {
            sink.present(&self.snapshot())?;
            if self.state.is_terminal() {
                break;
            }

            let event = input.next_event().unwrap_or_else(|e| {
                warn!(error = %e, "input failed, treating as closed");
                InputEvent::Closed
            });
            self.handle_event(event, opener);
        }

        let report = self.report();
        info!(?report, "session finished");
        Ok(report)
    }

    /// Applies a single input event. Ignored once the session has ended.
    pub fn handle_event<O: Opener + ?Sized>(&mut self, event: InputEvent, opener: &mut O) {
        if self.state.is_terminal() {
            return;
        }

        match event {
            InputEvent::Key(key) => {
                self.last_key = Some(key);
                let notice = self.dispatch(key, opener);
                self.message = Some(notice);
            }
            InputEvent::Other(name) => {
                self.last_key = None;
                self.message = Some(Notice::warning(format!("Unrecognized key '{}'", name)));
            }
            InputEvent::Redraw => {}
            InputEvent::Closed => {
                info!("input closed, cancelling");
                self.state = EngineState::Cancelled;
                self.message = Some(Notice::info("Input closed. Canceling image sorting"));
            }
        }

        self.settle();
    }

    pub fn report(&self) -> SessionReport {
        let (cursor, total) = self.session.progress();
        let stats = self.session.statistics();
        SessionReport {
            outcome: match self.state {
                EngineState::Cancelled => Outcome::Cancelled,
                _ if self.session.is_complete() => Outcome::Completed,
                _ => Outcome::Cancelled,
            },
            cursor,
            total,
            moved: stats.moved,
            skipped: stats.skipped,
        }
    }

    fn dispatch<O: Opener + ?Sized>(&mut self, key: char, opener: &mut O) -> Notice {
        match classify(key, &self.config.keymap, &self.config.reserved) {
            KeyAction::Quit => {
                info!(key = %key, "quit requested");
                self.state = EngineState::Cancelled;
                Notice::info(format!("Key '{}' pressed. Canceling image sorting", key))
            }
            KeyAction::Skip => match self.session.skip() {
                Ok(()) => Notice::info("Skipped image"),
                Err(e) => Notice::warning(e.to_string()),
            },
            KeyAction::Undo => match self.session.undo() {
                Ok(()) => Notice::info("Undone last action"),
                Err(UndoError::NothingToUndo) => Notice::warning("Nothing to undo!"),
                Err(e) => {
                    error!(error = %e, "undo could not restore file");
                    Notice::error(format!("UNDO FAILED: {}. The file was left in place.", e))
                }
            },
            KeyAction::Open => {
                let Some(file) = self.session.current_file() else {
                    return Notice::warning("No file to open");
                };
                match opener.open(file.current_path()) {
                    Ok(()) => Notice::info(format!("Opening {} with default application", file.name)),
                    Err(e) => {
                        warn!(path = %file.current_path().display(), error = %e, "open failed");
                        Notice::error(format!("Could not open {}: {}", file.name, e))
                    }
                }
            }
            KeyAction::Bound { key, destination } => {
                let name = self
                    .session
                    .current_file()
                    .map(|f| f.name.clone())
                    .unwrap_or_default();
                match self.session.move_to(key, destination) {
                    Ok(_) => Notice::info(format!("Moved image to {}", destination.display())),
                    Err(e) => {
                        warn!(file = %name, error = %e, "move failed");
                        Notice::error(format!(
                            "ERROR: Failed to move '{}' to '{}': {}",
                            name,
                            destination.display(),
                            e
                        ))
                    }
                }
            }
            KeyAction::Unrecognized(key) => {
                debug!(key = %key, "unrecognized key");
                Notice::warning(format!("Unrecognized key '{}'", key))
            }
        }
    }

    fn settle(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state = if self.session.current_file().is_some() {
            EngineState::AwaitingInput
        } else {
            EngineState::Completed
        };
    }
}

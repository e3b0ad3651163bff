//! imgsort - keyboard-driven image triage for the terminal
//!
//! Every file in a directory is shown once. A single key press moves it to
//! the directory bound to that key, skips it, or undoes the last decision.

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod file_opener;
pub mod keymap;
pub mod logging;
pub mod preview;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    discover_files, Decision, DiscoveryOptions, FileEntry, FileType, FsRelocator, Relocator,
    SessionState, SessionStatistics,
};
pub use engine::{
    EngineConfig, EngineState, InputEvent, InputSource, Notice, NoticeLevel, Opener, Outcome,
    PresentationSink, SessionEngine, SessionReport, Snapshot,
};
pub use error::{ImgsortError, MoveError, Result, SessionComplete, UndoError};
pub use file_opener::{open_file, SystemOpener};
pub use keymap::{classify, KeyAction, Keymap, ReservedKeys};

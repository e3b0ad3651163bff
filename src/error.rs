//! Error types for imgsort

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Startup and I/O errors. Anything surfacing as this type before the session
/// loop starts is fatal to the run.
#[derive(Debug, Error)]
pub enum ImgsortError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid key binding '{key}': {reason}")]
    InvalidKeyBinding { key: String, reason: String },

    #[error("Destination is not a directory: {} (use --create-dirs to create it)", .0.display())]
    MissingDirectory(PathBuf),

    #[error("No key bindings configured (add some with --bind KEY=DIR or a config file)")]
    NoBindings,

    #[error("Cannot read working directory {}: {source}", path.display())]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ImgsortError>;

/// Every file already has a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session already complete")]
pub struct SessionComplete;

/// Relocating the current file failed. The cursor has not moved.
#[derive(Debug, Error)]
pub enum MoveError {
    #[error(transparent)]
    Complete(#[from] SessionComplete),

    #[error("file no longer exists: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("destination is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("a file named {} already exists", .0.display())]
    Collision(PathBuf),

    #[error("could not move {} to {}: {source}", from.display(), to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum UndoError {
    #[error("Nothing to undo!")]
    NothingToUndo,

    /// The file could not be moved back; it stays where it was and the cursor
    /// is left after it.
    #[error("could not restore {} to {}: {reason}", current.display(), original.display())]
    RestoreFailed {
        current: PathBuf,
        original: PathBuf,
        reason: String,
    },
}

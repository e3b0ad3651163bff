//! Opens files with the system's default application

use crate::engine::Opener;
use crate::error::{ImgsortError, Result};
use std::io;
use std::path::Path;
use tracing::info;

/// Opens `path` with the default handler (xdg-open, open, start).
///
/// Blocks until the launcher returns; the application it starts keeps
/// running on its own.
pub fn open_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ImgsortError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    info!(path = %path.display(), "opening with default application");
    open::that(path)?;
    Ok(())
}

/// [`Opener`] backed by [`open_file`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open(&mut self, path: &Path) -> Result<()> {
        open_file(path)
    }
}

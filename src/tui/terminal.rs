use crate::engine::{PresentationSink, Snapshot};
use crate::preview::PreviewCache;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use tracing::debug;

type Cleanup = Box<dyn FnOnce() + Send + 'static>;

/// Restores the terminal when dropped, or from the panic hook, whichever
/// comes first.
pub struct TerminalGuard {
    cleanup: Arc<Mutex<Option<Cleanup>>>,
}

impl TerminalGuard {
    fn new<F: FnOnce() + Send + 'static>(cleanup: F) -> Self {
        Self {
            cleanup: Arc::new(Mutex::new(Some(Box::new(cleanup)))),
        }
    }

    fn install_panic_hook(&self) {
        let cleanup = Arc::clone(&self.cleanup);
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Ok(mut slot) = cleanup.lock() {
                if let Some(cleanup) = slot.take() {
                    cleanup();
                }
            }
            default_hook(info);
        }));
    }

    fn restore(&self) {
        if let Ok(mut slot) = self.cleanup.lock() {
            if let Some(cleanup) = slot.take() {
                cleanup();
                debug!("terminal restored");
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Enters raw mode and the alternate screen. The returned guard undoes both,
/// including when a later setup step fails.
pub fn setup_terminal() -> io::Result<(Terminal<CrosstermBackend<Stdout>>, TerminalGuard)> {
    enable_raw_mode()?;
    let guard = TerminalGuard::new(restore_terminal);
    guard.install_panic_hook();

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok((terminal, guard))
}

/// Draws every snapshot with ratatui
pub struct TuiSink<B: Backend> {
    terminal: Terminal<B>,
    previews: PreviewCache,
}

impl<B: Backend> TuiSink<B> {
    pub fn new(terminal: Terminal<B>, decode_previews: bool) -> Self {
        Self {
            terminal,
            previews: PreviewCache::new(decode_previews),
        }
    }
}

impl<B: Backend> PresentationSink for TuiSink<B> {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let previews = &mut self.previews;
        self.terminal
            .draw(|frame| super::render(frame, snapshot, previews))?;
        Ok(())
    }
}

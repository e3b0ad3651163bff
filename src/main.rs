use imgsort::cli::{AppConfig, Args};
use imgsort::config::UserConfig;
use imgsort::domain::{discover_files, DiscoveryOptions, SessionState};
use imgsort::engine::{EngineConfig, Outcome, SessionEngine, SessionReport};
use imgsort::error::{ImgsortError, Result};
use imgsort::file_opener::SystemOpener;
use imgsort::logging::init_tracing;
use imgsort::tui::{setup_terminal, CrosstermInput, TuiSink};

use std::process::ExitCode;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let config: AppConfig = args.into();

    if let Err(e) = init_tracing(config.log_file.as_deref(), config.log_level.as_deref()) {
        eprintln!("Warning: Failed to open log file: {}", e);
    }

    match run_app_with_config(&config) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "imgsort failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads the key bindings, lists the directory and runs one sorting session.
/// The terminal is restored before this returns, on success or failure.
pub fn run_app_with_config(config: &AppConfig) -> Result<SessionReport> {
    let mut user_config = UserConfig::load(config.config_name.as_deref())?;
    user_config.merge_bindings(config.bindings.iter().cloned());
    if !config.open_enabled {
        user_config.reserved.open = None;
    }

    if let Some(name) = &config.save_config {
        let path = user_config.save_as(name)?;
        println!("Saved key bindings to {}", path.display());
    }

    let keymap = user_config.keymap(&config.sort_root)?;
    keymap.ensure_directories(config.create_dirs)?;

    let options = DiscoveryOptions {
        skip_hidden: config.skip_hidden,
    };
    let files = discover_files(&config.directory, &options).map_err(|source| {
        ImgsortError::WorkingDirectory {
            path: config.directory.clone(),
            source,
        }
    })?;
    info!(
        dir = %config.directory.display(),
        files = files.len(),
        bindings = keymap.len(),
        "starting imgsort"
    );

    let mut engine = SessionEngine::new(
        SessionState::new(files),
        EngineConfig {
            keymap,
            reserved: user_config.reserved,
            working_dir: config.directory.clone(),
        },
    );

    if engine.state().is_terminal() {
        println!("No files found in {}", config.directory.display());
        return Ok(engine.report());
    }

    let report = {
        let (terminal, _guard) = setup_terminal()?;
        let mut sink = TuiSink::new(terminal, config.preview);
        engine.run(&mut CrosstermInput, &mut sink, &mut SystemOpener)
    };

    report.map_err(|e| {
        warn!(error = %e, "session ended by I/O error");
        ImgsortError::Io(e)
    })
}

fn print_summary(report: &SessionReport) {
    if report.total == 0 {
        return;
    }

    match report.outcome {
        Outcome::Completed => println!("\nAll done!"),
        Outcome::Cancelled => println!("\nCancelled."),
    }
    println!("   Moved:     {} files", report.moved);
    println!("   Skipped:   {} files", report.skipped);
    println!(
        "   Remaining: {} files",
        report.total.saturating_sub(report.cursor)
    );
    println!("Quitting imgsort {}", env!("CARGO_PKG_VERSION"));
}

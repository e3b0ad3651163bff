// CLI module for argument parsing and configuration

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// imgsort - sort images into directories, one key press per file
///
/// Every file in DIRECTORY is shown in turn; pressing a bound key moves it
/// into that key's directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgsort")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory with the files to sort
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Config file path, or name of a config in $IMGSORT_CONFIG_DIR or
    /// $XDG_CONFIG_HOME/imgsort
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Root for relative destination directories (defaults to DIRECTORY)
    #[arg(short = 'i', long = "sort-dir")]
    pub sort_dir: Option<PathBuf>,

    /// Bind a key to a destination directory, e.g. --bind 1=keep
    ///
    /// Can be given multiple times; overrides config entries for the same key.
    #[arg(short = 'b', long = "bind", value_name = "KEY=DIR")]
    pub bindings: Vec<String>,

    /// Create destination directories that do not exist
    #[arg(long = "create-dirs", action = ArgAction::SetTrue)]
    pub create_dirs: bool,

    /// Disable the open key
    #[arg(long = "no-open", action = ArgAction::SetTrue)]
    pub no_open: bool,

    /// Leave out files starting with .
    #[arg(long = "skip-hidden", action = ArgAction::SetTrue)]
    pub skip_hidden: bool,

    /// Do not decode images for the in-terminal preview
    #[arg(long = "no-preview", action = ArgAction::SetTrue)]
    pub no_preview: bool,

    /// Save the effective bindings as a named config before starting
    #[arg(long = "save-config", value_name = "NAME")]
    pub save_config: Option<String>,

    /// Write logs to this file (or set IMGSORT_LOG)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "imgsort=trace" (defaults to RUST_LOG, then info)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Splits a `KEY=DIR` binding at the first '='
    pub fn parse_binding(raw: &str) -> Option<(String, PathBuf)> {
        let (key, dir) = raw.split_once('=')?;
        if key.is_empty() || dir.trim().is_empty() {
            return None;
        }
        Some((key.to_string(), PathBuf::from(dir)))
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if !self.directory.exists() {
            return Err(format!(
                "Directory does not exist: {}",
                self.directory.display()
            ));
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Path is not a directory: {}",
                self.directory.display()
            ));
        }

        if let Some(ref sort_dir) = self.sort_dir {
            if sort_dir.exists() && !sort_dir.is_dir() {
                return Err(format!(
                    "Sort root is not a directory: {}",
                    sort_dir.display()
                ));
            }
        }

        for raw in &self.bindings {
            if Self::parse_binding(raw).is_none() {
                return Err(format!(
                    "Invalid binding '{}'. Use the form KEY=DIR, e.g. '1=keep'",
                    raw
                ));
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub config_name: Option<String>,
    pub sort_root: PathBuf,
    pub bindings: Vec<(String, PathBuf)>,
    pub create_dirs: bool,
    pub open_enabled: bool,
    pub skip_hidden: bool,
    pub preview: bool,
    pub save_config: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        let directory = std::path::absolute(&args.directory).unwrap_or(args.directory);
        let sort_root = args
            .sort_dir
            .map(|dir| std::path::absolute(&dir).unwrap_or(dir))
            .unwrap_or_else(|| directory.clone());

        AppConfig {
            bindings: args
                .bindings
                .iter()
                .filter_map(|raw| Args::parse_binding(raw))
                .collect(),
            directory,
            config_name: args.config,
            sort_root,
            create_dirs: args.create_dirs,
            open_enabled: !args.no_open,
            skip_hidden: args.skip_hidden,
            preview: !args.no_preview,
            save_config: args.save_config,
            log_file: args.log_file,
            log_level: args.log_level,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: PathBuf::from("."),
            config_name: None,
            sort_root: PathBuf::from("."),
            bindings: Vec::new(),
            create_dirs: false,
            open_enabled: true,
            skip_hidden: false,
            preview: true,
            save_config: None,
            log_file: None,
            log_level: None,
        }
    }
}

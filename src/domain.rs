pub mod session;

pub use session::{FsRelocator, Relocator, SessionState, SessionStatistics};

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Image,
    Other,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tif" | "tiff" | "ico" | "tga"
            | "pnm" | "qoi" => FileType::Image,
            _ => FileType::Other,
        }
    }
}

/// The decision recorded for a file the cursor has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skipped,
    /// Moved with the destination bound to this key
    Moved(char),
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    original_path: PathBuf,
    current_path: PathBuf,
    decision: Option<Decision>,
    pub name: String,
    pub size: u64,
    pub modified_date: DateTime<Utc>,
    pub file_type: FileType,
}

impl FileEntry {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified_date: DateTime<Utc> = metadata.modified()?.into();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        Ok(FileEntry {
            original_path: path.to_path_buf(),
            current_path: path.to_path_buf(),
            decision: None,
            name,
            size: metadata.len(),
            modified_date,
            file_type: FileType::from_extension(extension),
        })
    }

    /// Where the file was when the session started
    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    /// Where the file is now
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn decision(&self) -> Option<Decision> {
        self.decision
    }

    /// Key of the binding that last moved this file
    pub fn destination_key(&self) -> Option<char> {
        match self.decision {
            Some(Decision::Moved(key)) => Some(key),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        self.file_type == FileType::Image
    }
}

/// Options for file discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Leave out names starting with '.'
    pub skip_hidden: bool,
}

/// Lists the regular files directly inside `dir_path`, sorted by path.
///
/// Directories and other non-regular entries are left out and the listing
/// does not recurse. Entries that cannot be inspected are skipped; failing to
/// read the directory itself is an error.
pub fn discover_files(dir_path: &Path, options: &DiscoveryOptions) -> io::Result<Vec<FileEntry>> {
    let mut files = Vec::new();

    for entry_result in fs::read_dir(dir_path)? {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir_path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();

        if options.skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        // Follows symlinks, so a link to a regular file is listed
        match fs::metadata(&path) {
            Ok(m) if m.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping entry without metadata");
                continue;
            }
        }

        match FileEntry::from_path(&path) {
            Ok(fe) => files.push(fe),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping file"),
        }
    }

    files.sort_by(|a, b| a.original_path.cmp(&b.original_path));

    debug!(dir = %dir_path.display(), count = files.len(), "discovered files");
    Ok(files)
}

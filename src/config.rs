//! User configuration: key bindings and reserved keys

use crate::error::{ImgsortError, Result};
use crate::keymap::{Keymap, ReservedKeys};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Overrides the config directory
pub const CONFIG_DIR_ENV: &str = "IMGSORT_CONFIG_DIR";

const DEFAULT_CONFIG_NAME: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Key to destination directory. Relative paths are taken from the sort
    /// root.
    pub bindings: BTreeMap<String, PathBuf>,
    pub reserved: ReservedKeys,
}

impl UserConfig {
    /// `$IMGSORT_CONFIG_DIR`, else `<config dir>/imgsort`
    pub fn config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir));
        }
        dirs::config_dir().map(|dir| dir.join("imgsort"))
    }

    /// Finds the config file to use.
    ///
    /// `name` may be a path to an existing file, or a name looked up in
    /// `config_dir` with or without the `.json` extension. Without a name the
    /// default `config.json` is used if present.
    pub fn resolve_path(config_dir: Option<&Path>, name: Option<&str>) -> Result<Option<PathBuf>> {
        let Some(name) = name else {
            return Ok(config_dir
                .map(|dir| dir.join(DEFAULT_CONFIG_NAME))
                .filter(|path| path.is_file()));
        };

        let direct = PathBuf::from(name);
        if direct.is_file() {
            return Ok(Some(direct));
        }

        if let Some(dir) = config_dir {
            let candidates = [dir.join(name), dir.join(format!("{}.json", name))];
            if let Some(found) = candidates.into_iter().find(|path| path.is_file()) {
                return Ok(Some(found));
            }
        }

        Err(ImgsortError::Config(format!(
            "config '{}' not found here or in {}",
            name,
            config_dir
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "the config directory".to_string())
        )))
    }

    /// Loads the named config, or the default one, or an empty config when
    /// no file exists.
    pub fn load(name: Option<&str>) -> Result<Self> {
        let dir = Self::config_dir();
        match Self::resolve_path(dir.as_deref(), name)? {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ImgsortError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            ImgsortError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), bindings = config.bindings.len(), "loaded config");
        Ok(config)
    }

    /// Saves under `name` in the config directory and returns the path
    pub fn save_as(&self, name: &str) -> Result<PathBuf> {
        let dir = Self::config_dir().ok_or_else(|| {
            ImgsortError::Config("Could not determine config directory".to_string())
        })?;
        let file_name = if name.ends_with(".json") {
            name.to_string()
        } else {
            format!("{}.json", name)
        };
        let path = dir.join(file_name);
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ImgsortError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ImgsortError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            ImgsortError::Config(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Adds bindings on top of this config, replacing same-key entries
    pub fn merge_bindings<I>(&mut self, bindings: I)
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        self.bindings.extend(bindings);
    }

    /// Validates the reserved keys and bindings and resolves relative
    /// destinations against `sort_root`.
    pub fn keymap(&self, sort_root: &Path) -> Result<Keymap> {
        self.reserved.validate()?;

        let keymap = Keymap::new(&self.reserved, self.bindings.clone())?;
        if keymap.is_empty() {
            return Err(ImgsortError::NoBindings);
        }

        Ok(keymap.resolve_relative(sort_root))
    }
}

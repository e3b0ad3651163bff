//! Reserved keys, destination bindings and key classification

use crate::error::{ImgsortError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Keys with built-in meaning. None of them may be bound to a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservedKeys {
    pub quit: char,
    pub skip: char,
    pub undo: char,
    /// `None` disables the open action
    pub open: Option<char>,
}

impl Default for ReservedKeys {
    fn default() -> Self {
        Self {
            quit: 'q',
            skip: 's',
            undo: 'u',
            open: Some('o'),
        }
    }
}

impl ReservedKeys {
    /// Key/label pairs in display order
    pub fn actions(&self) -> Vec<(char, &'static str)> {
        let mut actions = vec![
            (self.quit, "quit"),
            (self.skip, "skip"),
            (self.undo, "undo"),
        ];
        if let Some(open) = self.open {
            actions.push((open, "open"));
        }
        actions
    }

    /// Returns the action label if `key` is reserved
    pub fn label(&self, key: char) -> Option<&'static str> {
        self.actions()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, label)| label)
    }

    pub fn contains(&self, key: char) -> bool {
        self.label(key).is_some()
    }

    /// Checks that no two actions share a key
    pub fn validate(&self) -> Result<()> {
        let actions = self.actions();
        for (i, (key, label)) in actions.iter().enumerate() {
            if let Some((_, other)) = actions[i + 1..].iter().find(|(k, _)| k == key) {
                return Err(ImgsortError::Config(format!(
                    "reserved key '{}' is assigned to both {} and {}",
                    key, label, other
                )));
            }
        }
        Ok(())
    }
}

/// Mapping from a single key to a destination directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    bindings: BTreeMap<char, PathBuf>,
}

impl Keymap {
    /// Builds a keymap, rejecting malformed keys, reserved keys and empty
    /// destinations.
    pub fn new<I>(reserved: &ReservedKeys, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        let mut bindings = BTreeMap::new();

        for (raw_key, destination) in entries {
            let key = parse_key(&raw_key)?;

            if let Some(action) = reserved.label(key) {
                return Err(ImgsortError::InvalidKeyBinding {
                    key: raw_key,
                    reason: format!("key is reserved for {}", action),
                });
            }

            if destination.as_os_str().is_empty() {
                return Err(ImgsortError::InvalidKeyBinding {
                    key: raw_key,
                    reason: "destination directory is empty".to_string(),
                });
            }

            bindings.insert(key, destination);
        }

        Ok(Self { bindings })
    }

    pub fn get(&self, key: char) -> Option<&Path> {
        self.bindings.get(&key).map(PathBuf::as_path)
    }

    /// Bindings ordered by key
    pub fn iter(&self) -> impl Iterator<Item = (char, &Path)> + '_ {
        self.bindings.iter().map(|(k, v)| (*k, v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Joins every relative destination onto `root`
    pub fn resolve_relative(mut self, root: &Path) -> Self {
        for destination in self.bindings.values_mut() {
            if destination.is_relative() {
                *destination = root.join(&*destination);
            }
        }
        self
    }

    /// Ensures every destination is a directory. Missing ones are created
    /// when `create` is set, otherwise the first one found is an error.
    pub fn ensure_directories(&self, create: bool) -> Result<()> {
        for (key, destination) in self.iter() {
            if destination.is_dir() {
                continue;
            }

            if destination.exists() || !create {
                return Err(ImgsortError::MissingDirectory(destination.to_path_buf()));
            }

            fs::create_dir_all(destination)?;
            info!(key = %key, path = %destination.display(), "created destination directory");
        }
        Ok(())
    }
}

fn parse_key(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() && !c.is_whitespace() => Ok(c),
        _ => Err(ImgsortError::InvalidKeyBinding {
            key: raw.to_string(),
            reason: "key must be a single printable character".to_string(),
        }),
    }
}

/// What a key press means for the current file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction<'a> {
    Quit,
    Skip,
    Undo,
    Open,
    Bound { key: char, destination: &'a Path },
    Unrecognized(char),
}

/// Classifies a key against the reserved keys first, then the keymap.
pub fn classify<'a>(key: char, keymap: &'a Keymap, reserved: &ReservedKeys) -> KeyAction<'a> {
    let action = if key == reserved.quit {
        KeyAction::Quit
    } else if key == reserved.skip {
        KeyAction::Skip
    } else if key == reserved.undo {
        KeyAction::Undo
    } else if reserved.open == Some(key) {
        KeyAction::Open
    } else if let Some(destination) = keymap.get(key) {
        KeyAction::Bound { key, destination }
    } else {
        KeyAction::Unrecognized(key)
    };
    debug!(key = %key, ?action, "classified key");
    action
}

use crate::error::{LogbossError, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const STATE_DIR: &str = ".logboss";
const STATE_FILE: &str = "state.json";

/// Persisted per-file flags. A file that was never touched reads as all-false.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FileToggleState {
    #[serde(default)]
    pub is_commented: bool,
    #[serde(default)]
    pub is_highlighted: bool,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Partial update merged into the stored state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub is_commented: Option<bool>,
    pub is_highlighted: Option<bool>,
}

impl StateUpdate {
    pub fn commented(value: bool) -> Self {
        Self {
            is_commented: Some(value),
            ..Self::default()
        }
    }

    pub fn highlighted(value: bool) -> Self {
        Self {
            is_highlighted: Some(value),
            ..Self::default()
        }
    }
}

pub trait StateStore {
    fn get(&self, path: &Path) -> FileToggleState;
    fn set(&mut self, path: &Path, update: StateUpdate) -> Result<FileToggleState>;
    fn clear(&mut self, path: &Path) -> Result<()>;
    fn active_file(&self) -> Option<PathBuf>;
    fn set_active_file(&mut self, path: Option<&Path>) -> Result<()>;
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct StateFile {
    #[serde(default)]
    active: Option<PathBuf>,
    #[serde(default)]
    files: BTreeMap<String, FileToggleState>,
}

/// State kept as JSON at `<root>/.logboss/state.json`, rewritten on every change.
#[derive(Debug)]
pub struct JsonStateStore {
    file_path: Option<PathBuf>,
    data: StateFile,
}

impl JsonStateStore {
    /// Uses the nearest `.logboss` directory above the working directory, or
    /// creates one in the working directory.
    pub fn discover() -> Result<Self> {
        let dir = discover_state_dir().map_err(|err| LogbossError::State(err.to_string()))?;
        Self::open_dir(&dir)
    }

    pub fn open_dir(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| LogbossError::FileAccess {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_path = dir.join(STATE_FILE);

        let data = match fs::read_to_string(&file_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(data) => data,
                Err(err) => {
                    warn!(
                        "Ignoring malformed state file {}: {}",
                        file_path.display(),
                        err
                    );
                    StateFile::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StateFile::default(),
            Err(source) => {
                return Err(LogbossError::FileAccess {
                    path: file_path,
                    source,
                });
            }
        };

        Ok(Self {
            file_path: Some(file_path),
            data,
        })
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            file_path: None,
            data: StateFile::default(),
        }
    }

    fn persist(&self) -> Result<()> {
        let Some(file_path) = &self.file_path else {
            return Ok(());
        };
        let contents = serde_json::to_string_pretty(&self.data)
            .map_err(|err| LogbossError::State(err.to_string()))?;
        fs::write(file_path, contents).map_err(|source| LogbossError::FileAccess {
            path: file_path.clone(),
            source,
        })?;
        debug!("state persisted to {}", file_path.display());
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn get(&self, path: &Path) -> FileToggleState {
        self.data
            .files
            .get(&state_key(path))
            .cloned()
            .unwrap_or_default()
    }

    fn set(&mut self, path: &Path, update: StateUpdate) -> Result<FileToggleState> {
        let mut state = self.get(path);
        if let Some(value) = update.is_commented {
            state.is_commented = value;
        }
        if let Some(value) = update.is_highlighted {
            state.is_highlighted = value;
        }
        state.last_modified = Some(Utc::now());

        self.data.files.insert(state_key(path), state.clone());
        self.persist()?;
        Ok(state)
    }

    fn clear(&mut self, path: &Path) -> Result<()> {
        if self.data.files.remove(&state_key(path)).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn active_file(&self) -> Option<PathBuf> {
        self.data.active.clone()
    }

    fn set_active_file(&mut self, path: Option<&Path>) -> Result<()> {
        self.data.active = path.map(normalize_path);
        self.persist()
    }
}

fn state_key(path: &Path) -> String {
    normalize_path(path).to_string_lossy().to_string()
}

/// Absolute path with `.` and `..` resolved lexically.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

pub fn discover_state_dir() -> std::io::Result<PathBuf> {
    let start_dir = std::env::current_dir()?;

    let mut current = Some(start_dir.as_path());
    while let Some(dir) = current {
        let candidate = dir.join(STATE_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        current = dir.parent();
    }

    Ok(start_dir.join(STATE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir()
            .join("logboss_unit")
            .join(Uuid::new_v4().to_string())
            .join(STATE_DIR)
    }

    #[test]
    fn unknown_file_reads_as_defaults() {
        let store = JsonStateStore::in_memory();
        let state = store.get(Path::new("/work/a.js"));
        assert_eq!(state, FileToggleState::default());
        assert!(state.last_modified.is_none());
    }

    #[test]
    fn set_merges_and_refreshes_timestamp() {
        let mut store = JsonStateStore::in_memory();
        let path = Path::new("/work/a.js");
        let first = store.set(path, StateUpdate::commented(true)).unwrap();
        let second = store.set(path, StateUpdate::highlighted(true)).unwrap();

        assert!(second.is_commented);
        assert!(second.is_highlighted);
        assert!(second.last_modified >= first.last_modified);
        assert!(second.last_modified.is_some());
    }

    #[test]
    fn keys_are_normalized() {
        let mut store = JsonStateStore::in_memory();
        store
            .set(Path::new("/work/src/../a.js"), StateUpdate::commented(true))
            .unwrap();
        assert!(store.get(Path::new("/work/./a.js")).is_commented);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = temp_dir();
        let path = Path::new("/work/b.ts");
        {
            let mut store = JsonStateStore::open_dir(&dir).unwrap();
            store.set(path, StateUpdate::commented(true)).unwrap();
            store.set_active_file(Some(path)).unwrap();
        }
        let store = JsonStateStore::open_dir(&dir).unwrap();
        assert!(store.get(path).is_commented);
        assert_eq!(store.active_file(), Some(PathBuf::from("/work/b.ts")));
    }

    #[test]
    fn clear_forgets_file() {
        let mut store = JsonStateStore::in_memory();
        let path = Path::new("/work/c.js");
        store.set(path, StateUpdate::highlighted(true)).unwrap();
        store.clear(path).unwrap();
        assert_eq!(store.get(path), FileToggleState::default());
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STATE_FILE), "{not json").unwrap();
        let store = JsonStateStore::open_dir(&dir).unwrap();
        assert!(!store.get(Path::new("/x.js")).is_commented);
    }
}

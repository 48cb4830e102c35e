use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A string-valued key-value store. Each `set` replaces the whole value of one key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// In-memory store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for DirectoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let io_err = |source| PersistenceError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Write beside the target and rename over it, so readers see the old or the new value.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(io_err)?;
        fs::rename(&staging, &path).map_err(io_err)?;
        debug!(key, path = %path.display(), bytes = value.len(), "wrote key");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_clones_share_entries() -> Result<(), PersistenceError> {
        let mut store = MemoryStore::new();
        let view = store.clone();
        assert!(view.is_empty());

        store.set("recipeState", "[]")?;
        assert_eq!(view.get("recipeState")?, Some("[]".to_string()));
        assert_eq!(view.len(), 1);
        Ok(())
    }

    #[test]
    fn test_directory_store_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::new(dir.path());
        assert!(store.get("recipeState").unwrap().is_none());
    }

    #[test]
    fn test_directory_store_creates_dir_and_overwrites() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("data");
        let mut store = DirectoryStore::new(&nested);

        store.set("recipeTemplates", "{}").unwrap();
        store.set("recipeTemplates", "{\"a\":[]}").unwrap();

        assert!(nested.join("recipeTemplates.json").exists());
        assert_eq!(
            store.get("recipeTemplates").unwrap().as_deref(),
            Some("{\"a\":[]}")
        );
    }

    #[test]
    fn test_directory_store_replaces_file_without_leftovers() {
        let dir = tempdir().unwrap();
        let mut store = DirectoryStore::new(dir.path());
        fs::write(dir.path().join("recipeState.json"), "[{\"name\":\"old\"").unwrap();

        store.set("recipeState", "[]").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["recipeState.json"]);
        assert_eq!(fs::read_to_string(dir.path().join("recipeState.json")).unwrap(), "[]");
    }

    #[test]
    fn test_directory_store_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let mut store = DirectoryStore::new(dir.path());
        let result = store.set("../escape", "x");
        assert!(matches!(result, Err(PersistenceError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(PersistenceError::InvalidKey(_))));
    }
}

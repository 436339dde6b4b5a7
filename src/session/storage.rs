// file: src/session/storage.rs
// description: synchronous key-value storage backends for the persisted session
// reference: Persistent storage for dashboard session metadata

use crate::error::{DashboardError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Durable string storage addressed by key.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten in full on every change.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    cache: HashMap<String, String>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                DashboardError::Storage(format!(
                    "Failed to create session directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let cache = Self::read(&path)?;
        Ok(Self { path, cache })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            debug!("No session file found at {:?}", path);
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            DashboardError::Storage(format!("Failed to read session file: {}", e))
        })?;

        match serde_json::from_str(&contents) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!("Ignoring unreadable session file {:?}: {}", path, e);
                Ok(HashMap::new())
            }
        }
    }

    fn flush(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.cache)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, contents).map_err(|e| {
            DashboardError::Storage(format!("Failed to write session file: {}", e))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                DashboardError::Storage(format!("Failed to restrict session file: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            DashboardError::Storage(format!("Failed to replace session file: {}", e))
        })?;

        debug!("Saved {} session keys to {:?}", self.cache.len(), self.path);
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.cache.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.cache.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

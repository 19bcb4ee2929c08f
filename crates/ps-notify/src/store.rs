//! Durable storage capability for dispatch state and e-mail overrides

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::StoreError;

/// Load/save capability. A store that has never been written loads as `T::default()`.
pub trait PersistentStore<T>: Send + Sync {
    fn load(&self) -> Result<T, StoreError>;

    fn save(&self, value: &T) -> Result<(), StoreError>;
}

/// Store backed by a pretty-printed JSON file
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> PersistentStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> Result<T, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Store file missing, using defaults");
            return Ok(T::default());
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(value)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// In-memory store
pub struct MemoryStore<T> {
    value: RwLock<Option<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PersistentStore<T> for MemoryStore<T>
where
    T: Clone + Default + Send + Sync,
{
    fn load(&self) -> Result<T, StoreError> {
        Ok(self.value.read().clone().unwrap_or_default())
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        *self.value.write() = Some(value.clone());
        Ok(())
    }
}

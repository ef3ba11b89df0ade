//! Persistence of the scene's durable state.

mod autosave;
mod file;
mod memory;

pub use autosave::{AutoSave, DEFAULT_AUTOSAVE_INTERVAL_MS};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::element::Element;
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Key the editor state is stored under.
pub const STORAGE_KEY: &str = "doodle-storage";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The persisted record: elements plus the dark-mode flag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub elements: Vec<Element>,
    pub dark_mode: bool,
}

impl PersistedState {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            elements: scene.elements().to_vec(),
            dark_mode: scene.app_state().dark_mode,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Drop elements that cannot be drawn (non-finite coordinates, lines without two points).
    pub fn sanitize(mut self) -> Self {
        let before = self.elements.len();
        self.elements.retain(Element::is_well_formed);
        let dropped = before - self.elements.len();
        if dropped > 0 {
            log::warn!("Dropped {} malformed elements from persisted state", dropped);
        }
        self
    }
}

/// Key-value storage backend for [`PersistedState`].
pub trait Storage: Send + Sync {
    /// Save state under `key`.
    fn save(&self, key: &str, state: &PersistedState) -> BoxFuture<'_, StorageResult<()>>;

    /// Load state stored under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<PersistedState>>;

    /// Delete whatever is stored under `key`.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Check if anything is stored under `key`.
    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Read persisted state once, falling back to an empty default on any error.
pub async fn load_persisted<S: Storage + ?Sized>(storage: &S, key: &str) -> PersistedState {
    match storage.load(key).await {
        Ok(state) => {
            log::info!("Loaded {} elements from '{}'", state.elements.len(), key);
            state.sanitize()
        }
        Err(StorageError::NotFound(_)) => {
            log::info!("No saved state under '{}', starting empty", key);
            PersistedState::default()
        }
        Err(e) => {
            log::warn!("Failed to load '{}', starting empty: {}", key, e);
            PersistedState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ElementStyle};
    use kurbo::Point;

    #[test]
    fn test_partial_json_uses_defaults() {
        let state = PersistedState::from_json(r#"{"darkMode": true}"#).unwrap();
        assert!(state.dark_mode);
        assert!(state.elements.is_empty());
    }

    #[test]
    fn test_sanitize_drops_unfinished_lines() {
        let line = Element::new(ElementKind::Line, Point::new(0.0, 0.0), ElementStyle::default());
        let rect = Element::new(
            ElementKind::Rectangle,
            Point::new(0.0, 0.0),
            ElementStyle::default(),
        );
        let state = PersistedState {
            elements: vec![line, rect.clone()],
            dark_mode: false,
        }
        .sanitize();
        assert_eq!(state.elements, vec![rect]);
    }

    #[test]
    fn test_load_persisted_falls_back() {
        let storage = MemoryStorage::new();
        let state = pollster::block_on(load_persisted(&storage, STORAGE_KEY));
        assert_eq!(state, PersistedState::default());
    }
}

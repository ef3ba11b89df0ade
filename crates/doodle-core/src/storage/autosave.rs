//! Throttled persistence of the editor state.
//!
//! Changes only mark the state dirty; a write happens at most once per
//! interval, so a continuous drag produces one write per second rather than
//! one per pointer event.

use super::{PersistedState, STORAGE_KEY, Storage, StorageResult, load_persisted};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Minimum time between two writes.
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 1000;

pub struct AutoSave<S: Storage> {
    storage: Arc<S>,
    key: String,
    interval: Duration,
    last_save: Option<Instant>,
    dirty: bool,
}

impl<S: Storage> AutoSave<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
            interval: Duration::from_millis(DEFAULT_AUTOSAVE_INTERVAL_MS),
            last_save: None,
            dirty: false,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Dirty and at least one interval since the last write.
    pub fn should_save_at(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Write `state` if [`should_save_at`](Self::should_save_at) allows it.
    /// Returns true if a write happened.
    pub async fn maybe_save_at(
        &mut self,
        state: &PersistedState,
        now: Instant,
    ) -> StorageResult<bool> {
        if !self.should_save_at(now) {
            return Ok(false);
        }
        self.write(state, now).await?;
        Ok(true)
    }

    pub async fn maybe_save(&mut self, state: &PersistedState) -> StorageResult<bool> {
        self.maybe_save_at(state, Instant::now()).await
    }

    /// Write `state` immediately.
    pub async fn save(&mut self, state: &PersistedState) -> StorageResult<()> {
        self.write(state, Instant::now()).await
    }

    /// Write pending changes regardless of the interval.
    pub async fn flush(&mut self, state: &PersistedState) -> StorageResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save(state).await?;
        Ok(true)
    }

    /// Read the persisted state, or an empty default when missing or corrupt.
    pub async fn load(&mut self) -> PersistedState {
        let state = load_persisted(self.storage.as_ref(), &self.key).await;
        self.dirty = false;
        state
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    async fn write(&mut self, state: &PersistedState, now: Instant) -> StorageResult<()> {
        self.storage.save(&self.key, state).await?;
        log::info!("Saved {} elements to '{}'", state.elements.len(), self.key);
        self.last_save = Some(now);
        self.dirty = false;
        Ok(())
    }
}

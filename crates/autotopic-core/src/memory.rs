//! In-memory store used by the test suites.
//!
//! The memory store models a backend without an exclusion constraint: it
//! accepts overlapping windows if asked to. Keeping the no-overlap rule out
//! of here lets tests seed data that violates it and observe how the
//! resolver copes.

use std::collections::BTreeMap;

use autotopic_types::{DescriptionWindow, EventId, EventRecord, NewEvent, NewWindow, WindowId};
use tokio::sync::RwLock;

use crate::interval::RangeQuery;
use crate::store::{EventStore, StoreError, WindowStore};

/// A [`WindowStore`] and [`EventStore`] backed by ordered maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    windows: RwLock<BTreeMap<WindowId, DescriptionWindow>>,
    events: RwLock<Vec<EventRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored event, in insertion order.
    pub async fn events(&self) -> Vec<EventRecord> {
        self.events.read().await.clone()
    }

    /// Number of stored windows.
    pub async fn window_count(&self) -> usize {
        self.windows.read().await.len()
    }
}

impl WindowStore for MemoryStore {
    async fn query_windows(
        &self,
        query: &RangeQuery,
    ) -> Result<Vec<DescriptionWindow>, StoreError> {
        let windows = self.windows.read().await;
        let mut matched: Vec<DescriptionWindow> = windows
            .values()
            .filter(|w| query.matches(w))
            .cloned()
            .collect();
        matched.sort_by_key(|w| (w.start_time, w.id));
        Ok(matched)
    }

    async fn get_window(&self, id: WindowId) -> Result<Option<DescriptionWindow>, StoreError> {
        Ok(self.windows.read().await.get(&id).cloned())
    }

    async fn insert_window(&self, window: &NewWindow) -> Result<DescriptionWindow, StoreError> {
        let stored = window.clone().with_id(WindowId::new());
        self.windows.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_window(&self, window: &DescriptionWindow) -> Result<(), StoreError> {
        let mut windows = self.windows.write().await;
        let slot = windows
            .get_mut(&window.id)
            .ok_or(StoreError::NotFound(window.id))?;
        *slot = window.clone();
        Ok(())
    }

    async fn delete_window(&self, id: WindowId) -> Result<bool, StoreError> {
        Ok(self.windows.write().await.remove(&id).is_some())
    }
}

impl EventStore for MemoryStore {
    async fn insert_event(&self, event: &NewEvent) -> Result<EventRecord, StoreError> {
        let stored = event.clone().with_id(EventId::new());
        self.events.write().await.push(stored.clone());
        Ok(stored)
    }
}

//! Combined store handed to the write pipeline.
//!
//! [`autotopic_core::WritePipeline`] writes both windows and events through a
//! single store value; [`PgStore`] bundles the two table stores over one pool.

use autotopic_core::{EventStore, RangeQuery, StoreError, WindowStore};
use autotopic_types::{DescriptionWindow, EventRecord, NewEvent, NewWindow, WindowId};
use sqlx::PgPool;

use crate::event_store::PgEventStore;
use crate::window_store::PgWindowStore;

/// Window and event stores sharing one connection pool.
pub struct PgStore<'a> {
    windows: PgWindowStore<'a>,
    events: PgEventStore<'a>,
}

impl<'a> PgStore<'a> {
    /// Create a combined store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            windows: PgWindowStore::new(pool),
            events: PgEventStore::new(pool),
        }
    }

    /// The `description_windows` table store.
    pub const fn windows(&self) -> &PgWindowStore<'a> {
        &self.windows
    }

    /// The `events` table store.
    pub const fn events(&self) -> &PgEventStore<'a> {
        &self.events
    }
}

impl WindowStore for PgStore<'_> {
    async fn query_windows(
        &self,
        query: &RangeQuery,
    ) -> Result<Vec<DescriptionWindow>, StoreError> {
        self.windows.query_windows(query).await
    }

    async fn get_window(&self, id: WindowId) -> Result<Option<DescriptionWindow>, StoreError> {
        self.windows.get_window(id).await
    }

    async fn insert_window(&self, window: &NewWindow) -> Result<DescriptionWindow, StoreError> {
        self.windows.insert_window(window).await
    }

    async fn update_window(&self, window: &DescriptionWindow) -> Result<(), StoreError> {
        self.windows.update_window(window).await
    }

    async fn delete_window(&self, id: WindowId) -> Result<bool, StoreError> {
        self.windows.delete_window(id).await
    }
}

impl EventStore for PgStore<'_> {
    async fn insert_event(&self, event: &NewEvent) -> Result<EventRecord, StoreError> {
        self.events.insert_event(event).await
    }
}

//! Storage traits for description windows and event records.
//!
//! The validator and the resolver only ever need [`WindowStore::query_windows`];
//! the remaining methods exist so the write pipeline can persist what they
//! approved. Implementations live in `autotopic-db` (`PostgreSQL`) and in
//! [`crate::memory`] (tests).
//!
//! Query results must be ordered by `(start_time, id)` so that "the first
//! match" means the same thing on every backend.

use std::future::Future;

use autotopic_types::{DescriptionWindow, EventRecord, NewEvent, NewWindow, WindowId};

use crate::interval::RangeQuery;

/// Errors reported by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The window to update or delete does not exist.
    #[error("description window not found: {0}")]
    NotFound(WindowId),

    /// The store's own exclusion constraint rejected an overlapping window.
    #[error("store rejected overlapping window: {message}")]
    ExclusionViolation {
        /// Backend-supplied detail.
        message: String,
    },

    /// The store's own check constraint rejected a reversed interval.
    #[error("store rejected reversed interval: {message}")]
    CheckViolation {
        /// Backend-supplied detail.
        message: String,
    },

    /// Any other backend failure.
    #[error("store backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

/// Persistent collection of description windows.
pub trait WindowStore: Send + Sync {
    /// Return every window matching `query`, ordered by `(start_time, id)`.
    fn query_windows(
        &self,
        query: &RangeQuery,
    ) -> impl Future<Output = Result<Vec<DescriptionWindow>, StoreError>> + Send;

    /// Fetch a single window by ID.
    fn get_window(
        &self,
        id: WindowId,
    ) -> impl Future<Output = Result<Option<DescriptionWindow>, StoreError>> + Send;

    /// Insert a window and return it with its assigned identity.
    fn insert_window(
        &self,
        window: &NewWindow,
    ) -> impl Future<Output = Result<DescriptionWindow, StoreError>> + Send;

    /// Overwrite an existing window in place.
    ///
    /// Returns [`StoreError::NotFound`] if no window has `window.id`.
    fn update_window(
        &self,
        window: &DescriptionWindow,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete a window. Returns `true` if a row was removed.
    fn delete_window(&self, id: WindowId) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Persistent collection of event records.
pub trait EventStore: Send + Sync {
    /// Insert an event and return it with its assigned identity.
    fn insert_event(
        &self,
        event: &NewEvent,
    ) -> impl Future<Output = Result<EventRecord, StoreError>> + Send;
}

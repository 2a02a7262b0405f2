//! The write pipeline: explicit pre-save steps for windows and events.
//!
//! Every write goes through [`WritePipeline`], which runs the matching
//! pre-save step before touching the store:
//!
//! ```text
//! save_window(draft) --> validate_window --> insert / update
//! save_event(draft)  --> resolve_description(clock.now()) --> insert
//! ```
//!
//! Either step can abort the write by returning an error. The validator is a
//! pre-check; two concurrent writers can both pass it against a stale read.
//! The `PostgreSQL` schema carries an exclusion constraint on
//! `(site, interval)` as the real enforcement point, and constraint
//! violations reported by the store come back as the same
//! [`ValidationError`] variants the validator would have produced.

use autotopic_types::{
    DescriptionWindow, EventDraft, EventRecord, NewEvent, SiteId, WindowDraft, WindowId,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::resolver::{Resolution, resolve_description};
use crate::store::{EventStore, StoreError, WindowStore};
use crate::validation::{ValidationError, validate_window};

/// Errors that abort a write.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The window failed validation.
    #[error("{source}")]
    Validation {
        /// The underlying validation error.
        #[from]
        source: ValidationError,
    },

    /// The draft is missing a field and cannot be persisted.
    #[error("cannot save window: {field} is not set")]
    Incomplete {
        /// The first missing field.
        field: &'static str,
    },

    /// The store failed.
    #[error("write failed: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// Runs pre-save steps and persists windows and events.
pub struct WritePipeline<'a, S, C> {
    store: &'a S,
    clock: &'a C,
}

impl<'a, S, C> WritePipeline<'a, S, C>
where
    S: WindowStore + EventStore,
    C: Clock,
{
    /// Create a pipeline over a store and a clock source.
    pub const fn new(store: &'a S, clock: &'a C) -> Self {
        Self { store, clock }
    }

    /// Validate and persist a window.
    ///
    /// A draft without an `id` is inserted; a draft with one replaces the
    /// existing window in place.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Validation`] if the validator or the store's
    /// constraints reject the window, [`WriteError::Incomplete`] if a field
    /// is unset, and [`WriteError::Store`] for any other store failure.
    pub async fn save_window(&self, draft: &WindowDraft) -> Result<DescriptionWindow, WriteError> {
        validate_window(draft, self.store).await?;

        let Some(new_window) = draft.to_new_window() else {
            let field = draft.missing_field().unwrap_or("unknown");
            return Err(WriteError::Incomplete { field });
        };
        let site = new_window.site;
        let (start, end) = (new_window.start_time, new_window.end_time);

        let saved = match draft.id {
            None => self.store.insert_window(&new_window).await,
            Some(id) => {
                let window = new_window.with_id(id);
                self.store.update_window(&window).await.map(|()| window)
            }
        }
        .map_err(|e| constraint_to_validation(e, site, start, end))?;

        info!(
            window = %saved.id,
            site = %saved.site,
            start = %saved.start_time,
            end = %saved.end_time,
            updated = draft.id.is_some(),
            "Saved description window"
        );
        Ok(saved)
    }

    /// Resolve the event's description, then persist the event.
    ///
    /// The event's creation time is the clock's current time, the same
    /// instant used for the window lookup. An empty description that no
    /// window replaced is stored as none.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Store`] if the lookup or the insert fails.
    pub async fn save_event(&self, draft: &mut EventDraft) -> Result<EventRecord, WriteError> {
        let now = self.clock.now();
        let resolution = resolve_description(draft, now, self.store).await?;

        let record = self
            .store
            .insert_event(&NewEvent {
                site: draft.site,
                description: draft.description.clone().filter(|d| !d.is_empty()),
                created_at: now,
            })
            .await?;

        info!(
            event = %record.id,
            site = %record.site,
            matched_window = ?matched_window(resolution),
            "Saved event"
        );
        Ok(record)
    }

    /// Delete a window.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Store`] if the store fails.
    pub async fn delete_window(&self, id: WindowId) -> Result<bool, WriteError> {
        let removed = self.store.delete_window(id).await?;
        if removed {
            info!(window = %id, "Deleted description window");
        } else {
            warn!(window = %id, "Delete requested for unknown description window");
        }
        Ok(removed)
    }
}

const fn matched_window(resolution: Resolution) -> Option<WindowId> {
    match resolution {
        Resolution::Matched(id) => Some(id),
        Resolution::AlreadyDescribed | Resolution::AlreadyResolved | Resolution::NoMatch => None,
    }
}

/// Map a store constraint violation onto the validator's error vocabulary.
fn constraint_to_validation(
    err: StoreError,
    site: SiteId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> WriteError {
    match err {
        StoreError::ExclusionViolation { message } => {
            warn!(%site, %message, "Exclusion constraint caught an overlap the pre-check missed");
            WriteError::Validation {
                source: ValidationError::OverlappingInterval {
                    site,
                    conflicting: None,
                },
            }
        }
        StoreError::CheckViolation { .. } => WriteError::Validation {
            source: ValidationError::InvalidInterval { start, end },
        },
        other => WriteError::Store { source: other },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;
    use crate::clock::FixedClock;
    use crate::memory::MemoryStore;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0).unwrap()
    }

    fn draft(site: SiteId, start: DateTime<Utc>, end: DateTime<Utc>, text: &str) -> WindowDraft {
        WindowDraft::new()
            .with_site(site)
            .with_start_time(start)
            .with_end_time(end)
            .with_description(text)
    }

    #[tokio::test]
    async fn saves_new_window_and_rejects_overlapping_second() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(at(9, 0));
        let pipeline = WritePipeline::new(&store, &clock);
        let site = SiteId::new();

        let first = pipeline
            .save_window(&draft(site, at(10, 0), at(11, 0), "A"))
            .await
            .unwrap();

        let err = pipeline
            .save_window(&draft(site, at(10, 59), at(12, 0), "B"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WriteError::Validation {
                source: ValidationError::OverlappingInterval { conflicting, .. }
            } if conflicting == Some(first.id)
        ));
        assert_eq!(store.window_count().await, 1);
    }

    #[tokio::test]
    async fn reversed_window_is_not_stored() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(at(9, 0));
        let pipeline = WritePipeline::new(&store, &clock);

        let err = pipeline
            .save_window(&draft(SiteId::new(), at(11, 0), at(10, 0), "A"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WriteError::Validation {
                source: ValidationError::InvalidInterval { .. }
            }
        ));
        assert_eq!(store.window_count().await, 0);
    }

    #[tokio::test]
    async fn incomplete_window_is_not_stored() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(at(9, 0));
        let pipeline = WritePipeline::new(&store, &clock);

        let partial = WindowDraft::new().with_site(SiteId::new());
        let err = pipeline.save_window(&partial).await.unwrap_err();
        assert!(matches!(err, WriteError::Incomplete { field: "end_time" }));
    }

    #[tokio::test]
    async fn updating_a_window_in_place_keeps_identity() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(at(9, 0));
        let pipeline = WritePipeline::new(&store, &clock);
        let site = SiteId::new();

        let saved = pipeline
            .save_window(&draft(site, at(10, 0), at(11, 0), "A"))
            .await
            .unwrap();

        let edited = WindowDraft::from_window(&saved)
            .with_start_time(at(10, 30))
            .with_end_time(at(11, 30))
            .with_description("A, later");
        let updated = pipeline.save_window(&edited).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(store.window_count().await, 1);
        let stored = store.get_window(saved.id).await.unwrap().unwrap();
        assert_eq!(stored.description, "A, later");
        assert_eq!(stored.start_time, at(10, 30));
    }

    #[tokio::test]
    async fn updating_an_unknown_window_fails() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(at(9, 0));
        let pipeline = WritePipeline::new(&store, &clock);

        let ghost = WindowDraft {
            id: Some(WindowId::new()),
            ..draft(SiteId::new(), at(10, 0), at(11, 0), "ghost")
        };
        let err = pipeline.save_window(&ghost).await.unwrap_err();
        assert!(matches!(
            err,
            WriteError::Store {
                source: StoreError::NotFound(_)
            }
        ));
    }

    #[tokio::test]
    async fn event_inherits_description_of_open_window() {
        let store = MemoryStore::new();
        let mut clock = FixedClock::new(at(9, 0));
        let site = SiteId::new();

        WritePipeline::new(&store, &clock)
            .save_window(&draft(site, at(10, 0), at(11, 0), "A"))
            .await
            .unwrap();
        WritePipeline::new(&store, &clock)
            .save_window(&draft(site, at(11, 1), at(12, 0), "B"))
            .await
            .unwrap();

        clock.advance(TimeDelta::minutes(90)).unwrap();
        let mut event = EventDraft::new(site);
        let record = WritePipeline::new(&store, &clock)
            .save_event(&mut event)
            .await
            .unwrap();

        assert_eq!(record.description.as_deref(), Some("A"));
        assert_eq!(record.created_at, at(10, 30));
        assert_eq!(store.events().await.len(), 1);
    }

    #[tokio::test]
    async fn event_outside_every_window_is_saved_without_description() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(at(15, 0));
        let pipeline = WritePipeline::new(&store, &clock);
        let site = SiteId::new();

        pipeline
            .save_window(&draft(site, at(10, 0), at(11, 0), "A"))
            .await
            .unwrap();

        let mut event = EventDraft::new(site);
        let record = pipeline.save_event(&mut event).await.unwrap();
        assert!(record.description.is_none());
        assert!(event.description_resolved);
    }

    #[tokio::test]
    async fn empty_description_without_a_window_is_stored_as_none() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(at(15, 0));
        let pipeline = WritePipeline::new(&store, &clock);

        let mut event = EventDraft::new(SiteId::new()).with_description("");
        let record = pipeline.save_event(&mut event).await.unwrap();

        assert!(record.description.is_none());
        assert!(store.events().await.first().unwrap().description.is_none());
    }

    #[tokio::test]
    async fn resaving_an_event_draft_does_not_look_up_again() {
        let store = MemoryStore::new();
        let mut clock = FixedClock::new(at(9, 0));
        let site = SiteId::new();

        let mut event = EventDraft::new(site);
        let first = WritePipeline::new(&store, &clock)
            .save_event(&mut event)
            .await
            .unwrap();
        assert!(first.description.is_none());

        WritePipeline::new(&store, &clock)
            .save_window(&draft(site, at(10, 0), at(11, 0), "A"))
            .await
            .unwrap();
        clock.set(at(10, 30));

        let second = WritePipeline::new(&store, &clock)
            .save_event(&mut event)
            .await
            .unwrap();
        assert!(second.description.is_none());
    }

    #[tokio::test]
    async fn delete_removes_window() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(at(9, 0));
        let pipeline = WritePipeline::new(&store, &clock);

        let saved = pipeline
            .save_window(&draft(SiteId::new(), at(10, 0), at(11, 0), "A"))
            .await
            .unwrap();
        assert!(pipeline.delete_window(saved.id).await.unwrap());
        assert!(!pipeline.delete_window(saved.id).await.unwrap());
    }

    #[test]
    fn exclusion_violation_maps_to_overlap() {
        let site = SiteId::new();
        let err = constraint_to_validation(
            StoreError::ExclusionViolation {
                message: "description_windows_no_overlap".to_owned(),
            },
            site,
            at(10, 0),
            at(11, 0),
        );
        assert!(matches!(
            err,
            WriteError::Validation {
                source: ValidationError::OverlappingInterval { conflicting: None, .. }
            }
        ));
    }

    #[test]
    fn check_violation_maps_to_invalid_interval() {
        let err = constraint_to_validation(
            StoreError::CheckViolation {
                message: "description_windows_ordered".to_owned(),
            },
            SiteId::new(),
            at(11, 0),
            at(10, 0),
        );
        assert!(matches!(
            err,
            WriteError::Validation {
                source: ValidationError::InvalidInterval { .. }
            }
        ));
    }
}

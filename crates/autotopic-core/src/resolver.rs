//! Description lookup for events that arrive without one.
//!
//! Before an event is first persisted, the resolver looks for the window on
//! the event's site that contains the current time and copies its text onto
//! the event. It runs at most once per [`EventDraft`]: the draft's
//! `description_resolved` flag is set on the first pass, whether or not a
//! window matched, and later passes return immediately.

use autotopic_types::{EventDraft, WindowId};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::interval::RangeQuery;
use crate::store::{StoreError, WindowStore};

/// What a call to [`resolve_description`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The event already carried a description; nothing was looked up.
    AlreadyDescribed,
    /// The lookup already ran for this draft.
    AlreadyResolved,
    /// A window matched and its description was copied.
    Matched(WindowId),
    /// No window on the site contains the given time.
    NoMatch,
}

/// Fill in `event.description` from the window containing `now`.
///
/// When more than one window matches (which means the no-overlap rule was
/// broken somewhere upstream), the earliest-starting window wins and a
/// warning is logged.
///
/// # Errors
///
/// Returns [`StoreError`] if the window query fails. The one-shot flag is
/// left unset in that case so a retried save performs the lookup again.
pub async fn resolve_description<S: WindowStore>(
    event: &mut EventDraft,
    now: DateTime<Utc>,
    store: &S,
) -> Result<Resolution, StoreError> {
    if event.has_description() {
        return Ok(Resolution::AlreadyDescribed);
    }
    if event.description_resolved {
        return Ok(Resolution::AlreadyResolved);
    }

    let matches = store
        .query_windows(&RangeQuery::containing(event.site, now))
        .await?;

    if matches.len() > 1 {
        warn!(
            site = %event.site,
            match_count = matches.len(),
            at = %now,
            "Multiple description windows contain the same instant; using the earliest"
        );
    }

    let resolution = match matches.into_iter().next() {
        Some(window) => {
            debug!(site = %event.site, window = %window.id, "Description resolved from window");
            event.description = Some(window.description);
            Resolution::Matched(window.id)
        }
        None => {
            debug!(site = %event.site, at = %now, "No description window for event");
            Resolution::NoMatch
        }
    };

    event.mark_description_resolved();
    Ok(resolution)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use autotopic_types::{NewWindow, SiteId};
    use chrono::TimeZone;

    use super::*;
    use crate::memory::MemoryStore;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0).unwrap()
    }

    async fn seed(store: &MemoryStore, site: SiteId, start: u32, end: u32, text: &str) -> WindowId {
        store
            .insert_window(&NewWindow {
                site,
                start_time: at(start, 0),
                end_time: at(end, 0),
                description: text.to_owned(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn copies_description_from_containing_window() {
        let store = MemoryStore::new();
        let site = SiteId::new();
        let a = seed(&store, site, 10, 11, "A").await;

        let mut event = EventDraft::new(site);
        let outcome = resolve_description(&mut event, at(10, 30), &store).await.unwrap();

        assert_eq!(outcome, Resolution::Matched(a));
        assert_eq!(event.description.as_deref(), Some("A"));
        assert!(event.description_resolved);
    }

    #[tokio::test]
    async fn start_boundary_is_inclusive() {
        let store = MemoryStore::new();
        let site = SiteId::new();
        let b = seed(&store, site, 11, 12, "B").await;

        let mut event = EventDraft::new(site);
        let outcome = resolve_description(&mut event, at(11, 0), &store).await.unwrap();
        assert_eq!(outcome, Resolution::Matched(b));
        assert_eq!(event.description.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn end_boundary_is_inclusive() {
        let store = MemoryStore::new();
        let site = SiteId::new();
        let a = seed(&store, site, 10, 11, "A").await;

        let mut event = EventDraft::new(site);
        let outcome = resolve_description(&mut event, at(11, 0), &store).await.unwrap();
        assert_eq!(outcome, Resolution::Matched(a));
        assert_eq!(event.description.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn shared_boundary_picks_earliest_window() {
        // Touching windows overlap at 11:00 and would never pass validation;
        // the memory store accepts them so the tie can be observed.
        let store = MemoryStore::new();
        let site = SiteId::new();
        let a = seed(&store, site, 10, 11, "A").await;
        seed(&store, site, 11, 12, "B").await;

        let mut event = EventDraft::new(site);
        let outcome = resolve_description(&mut event, at(11, 0), &store).await.unwrap();
        assert_eq!(outcome, Resolution::Matched(a));
        assert_eq!(event.description.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn no_match_leaves_description_unset() {
        let store = MemoryStore::new();
        let site = SiteId::new();
        seed(&store, site, 10, 11, "A").await;

        let mut event = EventDraft::new(site);
        let outcome = resolve_description(&mut event, at(13, 0), &store).await.unwrap();
        assert_eq!(outcome, Resolution::NoMatch);
        assert!(event.description.is_none());
        assert!(event.description_resolved);
    }

    #[tokio::test]
    async fn second_invocation_is_a_no_op() {
        let store = MemoryStore::new();
        let site = SiteId::new();

        let mut event = EventDraft::new(site);
        let first = resolve_description(&mut event, at(10, 30), &store).await.unwrap();
        assert_eq!(first, Resolution::NoMatch);

        // A window appearing between the two passes must not be picked up.
        seed(&store, site, 10, 11, "A").await;
        let second = resolve_description(&mut event, at(10, 30), &store).await.unwrap();
        assert_eq!(second, Resolution::AlreadyResolved);
        assert!(event.description.is_none());
    }

    #[tokio::test]
    async fn repeated_resolution_keeps_first_result() {
        let store = MemoryStore::new();
        let site = SiteId::new();
        seed(&store, site, 10, 11, "A").await;

        let mut once = EventDraft::new(site);
        resolve_description(&mut once, at(10, 30), &store).await.unwrap();

        let mut twice = EventDraft::new(site);
        resolve_description(&mut twice, at(10, 30), &store).await.unwrap();
        resolve_description(&mut twice, at(10, 30), &store).await.unwrap();

        assert_eq!(once.description, twice.description);
    }

    #[tokio::test]
    async fn explicit_description_is_kept() {
        let store = MemoryStore::new();
        let site = SiteId::new();
        seed(&store, site, 10, 11, "A").await;

        let mut event = EventDraft::new(site).with_description("Custom");
        let outcome = resolve_description(&mut event, at(10, 30), &store).await.unwrap();
        assert_eq!(outcome, Resolution::AlreadyDescribed);
        assert_eq!(event.description.as_deref(), Some("Custom"));
    }

    #[tokio::test]
    async fn empty_description_is_filled_in() {
        let store = MemoryStore::new();
        let site = SiteId::new();
        seed(&store, site, 10, 11, "A").await;

        let mut event = EventDraft::new(site).with_description("");
        resolve_description(&mut event, at(10, 30), &store).await.unwrap();
        assert_eq!(event.description.as_deref(), Some("A"));
    }
}

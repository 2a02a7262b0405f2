//! Core entity structs: description windows and event records.
//!
//! A [`DescriptionWindow`] attaches a free-text description to a closed
//! time interval on one site. Events created on that site while the window
//! is open inherit its description. Drafts ([`WindowDraft`], [`EventDraft`])
//! are the editable, not-yet-persisted forms that flow through the write
//! pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, SiteId, WindowId};

/// Maximum length of a window description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Description windows
// ---------------------------------------------------------------------------

/// A persisted description window.
///
/// Both `start_time` and `end_time` are inclusive. For a given site no two
/// windows may overlap; that rule is enforced at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionWindow {
    /// Store-assigned identity.
    pub id: WindowId,
    /// The site this window applies to.
    pub site: SiteId,
    /// Events started at or after this instant match.
    pub start_time: DateTime<Utc>,
    /// Events started at or before this instant match.
    pub end_time: DateTime<Utc>,
    /// Text copied onto matching events.
    pub description: String,
}

impl core::fmt::Display for DescriptionWindow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Description window for {} (site: {})",
            self.start_time.format("%Y-%m-%d %H:%M"),
            self.site
        )
    }
}

/// A fully populated window that has not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWindow {
    /// The site this window applies to.
    pub site: SiteId,
    /// Inclusive start of the interval.
    pub start_time: DateTime<Utc>,
    /// Inclusive end of the interval.
    pub end_time: DateTime<Utc>,
    /// Text copied onto matching events.
    pub description: String,
}

impl NewWindow {
    /// Attach a store-assigned identity, producing the persisted form.
    pub fn with_id(self, id: WindowId) -> DescriptionWindow {
        DescriptionWindow {
            id,
            site: self.site,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
        }
    }
}

/// An editable window that may be only partially filled in.
///
/// `id` is `None` for a window that has never been saved and `Some` when
/// editing an existing one. The four data fields start out unset until the
/// administrator (or the defaults factory) fills them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDraft {
    /// Identity of the window being edited, if it already exists.
    pub id: Option<WindowId>,
    /// The site this window applies to.
    pub site: Option<SiteId>,
    /// Inclusive start of the interval.
    pub start_time: Option<DateTime<Utc>>,
    /// Inclusive end of the interval.
    pub end_time: Option<DateTime<Utc>>,
    /// Text copied onto matching events.
    pub description: Option<String>,
}

impl WindowDraft {
    /// Create an empty draft for a brand-new window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing an existing window.
    pub fn from_window(window: &DescriptionWindow) -> Self {
        Self {
            id: Some(window.id),
            site: Some(window.site),
            start_time: Some(window.start_time),
            end_time: Some(window.end_time),
            description: Some(window.description.clone()),
        }
    }

    /// Set the site.
    #[must_use]
    pub const fn with_site(mut self, site: SiteId) -> Self {
        self.site = Some(site);
        self
    }

    /// Set the inclusive start time.
    #[must_use]
    pub const fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set the inclusive end time.
    #[must_use]
    pub const fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Set the description text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name of the first data field that is still unset, if any.
    pub const fn missing_field(&self) -> Option<&'static str> {
        if self.site.is_none() {
            Some("site")
        } else if self.end_time.is_none() {
            Some("end_time")
        } else if self.start_time.is_none() {
            Some("start_time")
        } else if self.description.is_none() {
            Some("description")
        } else {
            None
        }
    }

    /// Whether every data field has been set.
    pub const fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// Convert into a [`NewWindow`] if every data field is set.
    ///
    /// The draft's `id` is not carried over; callers that are updating an
    /// existing window reattach it with [`NewWindow::with_id`].
    pub fn to_new_window(&self) -> Option<NewWindow> {
        match (&self.site, &self.start_time, &self.end_time, &self.description) {
            (Some(site), Some(start_time), Some(end_time), Some(description)) => {
                Some(NewWindow {
                    site: *site,
                    start_time: *start_time,
                    end_time: *end_time,
                    description: description.clone(),
                })
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// The construction context of an event that is about to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// The site on which the event happens.
    pub site: SiteId,
    /// Description supplied by the caller, if any.
    pub description: Option<String>,
    /// Set once the description lookup has run for this draft.
    pub description_resolved: bool,
}

impl EventDraft {
    /// Create a draft with no description.
    pub const fn new(site: SiteId) -> Self {
        Self {
            site,
            description: None,
            description_resolved: false,
        }
    }

    /// Set an explicit description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether a non-empty description is present. An empty string counts
    /// as unset.
    pub fn has_description(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Record that the description lookup has run.
    pub const fn mark_description_resolved(&mut self) {
        self.description_resolved = true;
    }
}

/// A fully prepared event ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// The site on which the event happens.
    pub site: SiteId,
    /// Description, possibly filled in from a window.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A persisted event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Store-assigned identity.
    pub id: EventId,
    /// The site on which the event happened.
    pub site: SiteId,
    /// Description, possibly filled in from a window.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewEvent {
    /// Attach a store-assigned identity, producing the persisted form.
    pub fn with_id(self, id: EventId) -> EventRecord {
        EventRecord {
            id,
            site: self.site,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn empty_draft_is_incomplete() {
        let draft = WindowDraft::new();
        assert!(!draft.is_complete());
        assert_eq!(draft.missing_field(), Some("site"));
        assert!(draft.to_new_window().is_none());
    }

    #[test]
    fn draft_reports_first_missing_field() {
        let draft = WindowDraft::new()
            .with_site(SiteId::new())
            .with_end_time(at(11))
            .with_start_time(at(10));
        assert_eq!(draft.missing_field(), Some("description"));

        let draft = draft.with_description("Morning round");
        assert!(draft.is_complete());
        assert!(draft.to_new_window().is_some());
    }

    #[test]
    fn from_window_keeps_identity() {
        let window = NewWindow {
            site: SiteId::new(),
            start_time: at(10),
            end_time: at(11),
            description: "Morning round".to_owned(),
        }
        .with_id(WindowId::new());

        let draft = WindowDraft::from_window(&window);
        assert_eq!(draft.id, Some(window.id));
        assert_eq!(draft.to_new_window().unwrap().with_id(window.id), window);
    }

    #[test]
    fn window_display_shows_start_and_site() {
        let site = SiteId::new();
        let window = NewWindow {
            site,
            start_time: at(10),
            end_time: at(11),
            description: "Morning round".to_owned(),
        }
        .with_id(WindowId::new());

        assert_eq!(
            window.to_string(),
            format!("Description window for 2026-03-01 10:00 (site: {site})")
        );
    }

    #[test]
    fn empty_event_description_counts_as_unset() {
        let site = SiteId::new();
        assert!(!EventDraft::new(site).has_description());
        assert!(!EventDraft::new(site).with_description("").has_description());
        assert!(EventDraft::new(site).with_description("Quiz").has_description());
    }
}

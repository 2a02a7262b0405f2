//! Interval validation for description windows.
//!
//! Runs before a window is created or updated. Checks, in order:
//!
//! 1. Ordering -- the end must not precede the start.
//! 2. Length -- the description must fit the 255-character column.
//! 3. Overlap -- no other window on the same site may share an instant
//!    with the candidate.
//!
//! A draft that is still missing any of its four data fields is not
//! validated at all; see [`Validation::Skipped`].

use autotopic_types::{MAX_DESCRIPTION_LEN, SiteId, WindowDraft, WindowId};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::interval::{Interval, IntervalError, RangeQuery};
use crate::store::{StoreError, WindowStore};

/// Reasons a window may not be saved.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The end time lies before the start time.
    #[error("end time is before start time")]
    InvalidInterval {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },

    /// The description does not fit the storage column.
    #[error("description is {len} characters long, the limit is {max}")]
    DescriptionTooLong {
        /// Length of the submitted description, in characters.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Another window on the same site shares at least one instant.
    #[error("interval overlaps with another description")]
    OverlappingInterval {
        /// The site both windows belong to.
        site: SiteId,
        /// An existing window the candidate collides with. `None` when the
        /// collision was reported by the store's constraint rather than
        /// found by the pre-check.
        conflicting: Option<WindowId>,
    },

    /// The overlap query itself failed.
    #[error("overlap check failed: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

impl From<IntervalError> for ValidationError {
    fn from(err: IntervalError) -> Self {
        match err {
            IntervalError::EndBeforeStart { start, end } => Self::InvalidInterval { start, end },
        }
    }
}

/// Outcome of a successful validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Every check passed.
    Valid,
    /// The draft is not fully constructed yet; nothing was checked.
    Skipped {
        /// The first field that is still unset.
        missing: &'static str,
    },
}

/// Validate a window draft against the windows already in `store`.
///
/// The candidate's own identity is excluded from the overlap check, so
/// re-saving or shifting an existing window never conflicts with itself.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInterval`] when the end precedes the
/// start, [`ValidationError::DescriptionTooLong`] when the text exceeds
/// [`MAX_DESCRIPTION_LEN`], [`ValidationError::OverlappingInterval`] when a
/// distinct window on the same site overlaps, and
/// [`ValidationError::Store`] if the overlap query fails.
pub async fn validate_window<S: WindowStore>(
    draft: &WindowDraft,
    store: &S,
) -> Result<Validation, ValidationError> {
    let (Some(site), Some(start), Some(end), Some(description)) = (
        draft.site,
        draft.start_time,
        draft.end_time,
        draft.description.as_deref(),
    ) else {
        let missing = draft.missing_field().unwrap_or("unknown");
        debug!(missing, "Skipping validation of incomplete window draft");
        return Ok(Validation::Skipped { missing });
    };

    let interval = Interval::new(start, end)?;

    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong {
            len,
            max: MAX_DESCRIPTION_LEN,
        });
    }

    let overlapping = store
        .query_windows(&RangeQuery::overlapping(site, &interval))
        .await?;

    if let Some(conflict) = overlapping.iter().find(|w| Some(w.id) != draft.id) {
        debug!(
            %site,
            conflicting = %conflict.id,
            candidate = ?draft.id,
            "Window overlaps an existing window"
        );
        return Err(ValidationError::OverlappingInterval {
            site,
            conflicting: Some(conflict.id),
        });
    }

    Ok(Validation::Valid)
}

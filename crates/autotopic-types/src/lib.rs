//! Shared type definitions for automatic event descriptions.
//!
//! This crate is the single source of truth for the entities used across
//! the workspace: description windows, event records, and their drafts.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for site, window, and event IDs
//! - [`structs`] -- Windows, events, and the drafts that precede them

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{EventId, SiteId, WindowId};
pub use structs::{
    DescriptionWindow, EventDraft, EventRecord, MAX_DESCRIPTION_LEN, NewEvent, NewWindow,
    WindowDraft,
};

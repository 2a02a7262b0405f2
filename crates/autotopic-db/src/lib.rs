//! `PostgreSQL` storage for description windows and events.
//!
//! Implements the [`autotopic_core::WindowStore`] and
//! [`autotopic_core::EventStore`] traits on top of [`sqlx`].
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration, and migrations
//! - [`window_store`] -- `description_windows` table operations
//! - [`event_store`] -- `events` table operations
//! - [`store`] -- Combined store for the write pipeline
//! - [`error`] -- Shared error types

pub mod error;
pub mod event_store;
pub mod postgres;
pub mod store;
pub mod window_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use event_store::{EventRow, PgEventStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::PgStore;
pub use window_store::{PgWindowStore, WindowRow};

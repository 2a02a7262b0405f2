//! Error types for the admin binary.

use autotopic_types::WindowId;

/// Top-level error for the admin binary.
///
/// Each variant wraps a specific subsystem error so `main` can propagate
/// with `?` and attach context via `anyhow`.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: autotopic_core::ConfigError,
    },

    /// Connecting to or migrating the database failed.
    #[error("database error: {source}")]
    Db {
        /// The underlying database error.
        #[from]
        source: autotopic_db::DbError,
    },

    /// A write was rejected or failed.
    #[error("{source}")]
    Write {
        /// The underlying write error.
        #[from]
        source: autotopic_core::WriteError,
    },

    /// A read from the store failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: autotopic_core::StoreError,
    },

    /// The window to edit does not exist.
    #[error("no description window with id {0}")]
    UnknownWindow(WindowId),
}

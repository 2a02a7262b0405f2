//! Error types for the data layer.
//!
//! Operations return [`DbError`], which wraps the underlying [`sqlx`]
//! errors. When a store method is called through the
//! [`autotopic_core::WindowStore`] or [`autotopic_core::EventStore`] traits,
//! the error is converted into a [`StoreError`], and the schema's constraint
//! violations are lifted into their own variants.

use autotopic_core::StoreError;

/// SQLSTATE for `exclusion_violation`.
const EXCLUSION_VIOLATION: &str = "23P01";

/// SQLSTATE for `check_violation`.
const CHECK_VIOLATION: &str = "23514";

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        if let DbError::Postgres(sqlx::Error::Database(db_err)) = &err {
            let message = db_err.constraint().unwrap_or_else(|| db_err.message()).to_owned();
            match db_err.code().as_deref() {
                Some(EXCLUSION_VIOLATION) => return Self::ExclusionViolation { message },
                Some(CHECK_VIOLATION) => return Self::CheckViolation { message },
                _ => {}
            }
        }
        Self::Backend {
            message: err.to_string(),
        }
    }
}

//! Description window persistence.
//!
//! Implements [`WindowStore`] over the `description_windows` table. The
//! range query maps directly onto SQL; the `(site_id, start_time)` index
//! serves it, and the table's exclusion constraint rejects overlapping
//! windows that slip past the application pre-check.

use autotopic_core::{RangeQuery, StoreError, WindowStore};
use autotopic_types::{DescriptionWindow, NewWindow, SiteId, WindowId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Operations on the `description_windows` table.
pub struct PgWindowStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgWindowStore<'a> {
    /// Create a new window store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Windows matching `query`, ordered by `(start_time, id)`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find(&self, query: &RangeQuery) -> Result<Vec<WindowRow>, DbError> {
        let rows = sqlx::query_as::<_, WindowRow>(
            r"SELECT id, site_id, start_time, end_time, description
              FROM description_windows
              WHERE site_id = $1 AND start_time <= $2 AND end_time >= $3
              ORDER BY start_time, id",
        )
        .bind(query.site.into_inner())
        .bind(query.start_lte)
        .bind(query.end_gte)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Every window on a site, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_for_site(&self, site: SiteId) -> Result<Vec<WindowRow>, DbError> {
        let rows = sqlx::query_as::<_, WindowRow>(
            r"SELECT id, site_id, start_time, end_time, description
              FROM description_windows
              WHERE site_id = $1
              ORDER BY start_time, id",
        )
        .bind(site.into_inner())
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetch one window by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn fetch(&self, id: WindowId) -> Result<Option<WindowRow>, DbError> {
        let row = sqlx::query_as::<_, WindowRow>(
            r"SELECT id, site_id, start_time, end_time, description
              FROM description_windows
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Insert a window, returning its generated ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails, including when the
    /// exclusion or check constraint rejects the row.
    pub async fn insert(&self, window: &NewWindow) -> Result<WindowId, DbError> {
        let row: (Uuid,) = sqlx::query_as(
            r"INSERT INTO description_windows (site_id, start_time, end_time, description)
              VALUES ($1, $2, $3, $4)
              RETURNING id",
        )
        .bind(window.site.into_inner())
        .bind(window.start_time)
        .bind(window.end_time)
        .bind(&window.description)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(window = %row.0, site = %window.site, "Inserted description window");
        Ok(WindowId::from(row.0))
    }

    /// Overwrite a window. Returns `false` if no row has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn update(&self, window: &DescriptionWindow) -> Result<bool, DbError> {
        let result = sqlx::query(
            r"UPDATE description_windows
              SET site_id = $2, start_time = $3, end_time = $4, description = $5, updated_at = now()
              WHERE id = $1",
        )
        .bind(window.id.into_inner())
        .bind(window.site.into_inner())
        .bind(window.start_time)
        .bind(window.end_time)
        .bind(&window.description)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a window by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete(&self, id: WindowId) -> Result<bool, DbError> {
        let result = sqlx::query(r"DELETE FROM description_windows WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl WindowStore for PgWindowStore<'_> {
    async fn query_windows(
        &self,
        query: &RangeQuery,
    ) -> Result<Vec<DescriptionWindow>, StoreError> {
        let rows = self.find(query).await?;
        Ok(rows.into_iter().map(WindowRow::into_window).collect())
    }

    async fn get_window(&self, id: WindowId) -> Result<Option<DescriptionWindow>, StoreError> {
        Ok(self.fetch(id).await?.map(WindowRow::into_window))
    }

    async fn insert_window(&self, window: &NewWindow) -> Result<DescriptionWindow, StoreError> {
        let id = self.insert(window).await?;
        Ok(window.clone().with_id(id))
    }

    async fn update_window(&self, window: &DescriptionWindow) -> Result<(), StoreError> {
        if self.update(window).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound(window.id))
        }
    }

    async fn delete_window(&self, id: WindowId) -> Result<bool, StoreError> {
        Ok(self.delete(id).await?)
    }
}

/// A row from the `description_windows` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WindowRow {
    /// Window ID.
    pub id: Uuid,
    /// Owning site.
    pub site_id: Uuid,
    /// Inclusive start.
    pub start_time: DateTime<Utc>,
    /// Inclusive end.
    pub end_time: DateTime<Utc>,
    /// Description text.
    pub description: String,
}

impl WindowRow {
    /// Convert into the shared domain type.
    pub fn into_window(self) -> DescriptionWindow {
        DescriptionWindow {
            id: WindowId::from(self.id),
            site: SiteId::from(self.site_id),
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
        }
    }
}

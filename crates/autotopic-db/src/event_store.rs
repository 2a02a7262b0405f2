//! Event record persistence.

use autotopic_core::{EventStore, StoreError};
use autotopic_types::{EventId, EventRecord, NewEvent, SiteId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Operations on the `events` table.
pub struct PgEventStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgEventStore<'a> {
    /// Create a new event store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an event, returning its generated ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, event: &NewEvent) -> Result<EventId, DbError> {
        let row: (Uuid,) = sqlx::query_as(
            r"INSERT INTO events (site_id, description, created_at)
              VALUES ($1, $2, $3)
              RETURNING id",
        )
        .bind(event.site.into_inner())
        .bind(event.description.as_deref())
        .bind(event.created_at)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(event = %row.0, site = %event.site, "Inserted event");
        Ok(EventId::from(row.0))
    }

    /// The most recent events on a site, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn recent_for_site(&self, site: SiteId, limit: i64) -> Result<Vec<EventRow>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"SELECT id, site_id, description, created_at
              FROM events
              WHERE site_id = $1
              ORDER BY created_at DESC, id
              LIMIT $2",
        )
        .bind(site.into_inner())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

impl EventStore for PgEventStore<'_> {
    async fn insert_event(&self, event: &NewEvent) -> Result<EventRecord, StoreError> {
        let id = self.insert(event).await?;
        Ok(event.clone().with_id(id))
    }
}

/// A row from the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Event ID.
    pub id: Uuid,
    /// Site the event happened on.
    pub site_id: Uuid,
    /// Description, if any.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl EventRow {
    /// Convert into the shared domain type.
    pub fn into_record(self) -> EventRecord {
        EventRecord {
            id: EventId::from(self.id),
            site: SiteId::from(self.site_id),
            description: self.description,
            created_at: self.created_at,
        }
    }
}

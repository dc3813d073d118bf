//! Event repository for database operations.

use domain::models::{Event, EventInput, PublicEvent};
use sqlx::PgPool;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

/// Repository for event (tenant) database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public events, newest first.
    pub async fn list_public(&self) -> Result<Vec<PublicEvent>, sqlx::Error> {
        let timer = QueryTimer::new("list_public_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, slug, name, description, event_date, location, is_public, created_at, updated_at
            FROM events
            WHERE is_public = true
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result?
            .into_iter()
            .map(|entity| PublicEvent::from(Event::from(entity)))
            .collect())
    }

    /// Every event regardless of visibility, newest first.
    pub async fn list_all(&self) -> Result<Vec<Event>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_events");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, slug, name, description, event_date, location, is_public, created_at, updated_at
            FROM events
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(result?.into_iter().map(Into::into).collect())
    }

    /// Find event by slug. Private events are returned too.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_slug");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, slug, name, description, event_date, location, is_public, created_at, updated_at
            FROM events
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }

    /// Check if slug is already taken.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
    }

    /// Check if slug belongs to an event other than `event_id`.
    pub async fn slug_taken_by_other(&self, slug: &str, event_id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1 AND id <> $2)",
        )
        .bind(slug)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Create a new event. Visibility defaults to public.
    pub async fn create(&self, input: &EventInput) -> Result<Event, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (slug, name, description, event_date, location, is_public)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, slug, name, description, event_date, location, is_public, created_at, updated_at
            "#,
        )
        .bind(&input.slug)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.event_date)
        .bind(&input.location)
        .bind(input.is_public_or_default())
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result?.into())
    }

    /// Replace an event's fields. An absent `is_public` keeps the stored flag.
    ///
    /// The id never changes, so registrations stay attached across slug renames.
    pub async fn update(&self, event_id: i64, input: &EventInput) -> Result<Option<Event>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET
                slug = $2,
                name = $3,
                description = $4,
                event_date = $5,
                location = $6,
                is_public = COALESCE($7, is_public),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, name, description, event_date, location, is_public, created_at, updated_at
            "#,
        )
        .bind(event_id)
        .bind(&input.slug)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.event_date)
        .bind(&input.location)
        .bind(input.is_public)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        Ok(result?.map(Into::into))
    }
}

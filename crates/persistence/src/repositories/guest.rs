//! Guest identity repository.

use domain::models::Guest;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::entities::GuestEntity;
use crate::metrics::QueryTimer;

/// Repository for global guest identities. Runs on the caller's transaction.
pub struct GuestRepository;

impl GuestRepository {
    /// Returns the identity for `email`, creating it on first sight.
    ///
    /// An existing identity is returned untouched; later submissions never
    /// overwrite the stored name or phone. The conflicting row is locked for
    /// the rest of the surrounding transaction.
    pub async fn find_or_create(
        conn: &mut PgConnection,
        full_name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Guest, sqlx::Error> {
        let timer = QueryTimer::new("find_or_create_guest");
        let result = sqlx::query_as::<_, GuestEntity>(
            r#"
            INSERT INTO guests (id, full_name, email, phone)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, full_name, email, phone, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .fetch_one(conn)
        .await;
        timer.record();

        Ok(result?.into())
    }
}

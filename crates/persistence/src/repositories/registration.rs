//! Registration repository: per-event guest records.
//!
//! Every query is scoped by `event_id` in addition to the guest id or email,
//! so a lookup can never reach a registration that belongs to another event.

use domain::models::{
    GuestStatus, NewRegistration, RegistrationCredentials, RegistrationDetail, RegistrationReceipt,
    RegistrationSummary, VerificationState,
};
use domain::services::{plan_transition, StateTransition, TransitionError, TransitionPolicy};
use shared::pagination::PageRequest;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::registration::decode_state;
use crate::entities::{CredentialsEntity, RegistrationDetailEntity, RegistrationSummaryEntity};
use crate::metrics::QueryTimer;
use crate::repositories::GuestRepository;

/// Result of a registration attempt.
#[derive(Debug, Clone)]
pub enum RegisterOutcome {
    Registered(RegistrationReceipt),
    /// The email already holds a registration for this event.
    AlreadyRegistered,
}

/// Result of an admin state change.
#[derive(Debug, Clone)]
pub enum StateUpdateOutcome {
    Applied(StateTransition),
    NotFound,
    Rejected(TransitionError),
}

/// Repository for event registrations.
#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a guest for an event in a single transaction.
    ///
    /// A concurrent duplicate that passes the pre-check still fails on the
    /// `(guest_id, event_id)` primary key with a unique violation.
    pub async fn register(
        &self,
        event_id: i64,
        registration: &NewRegistration,
        access_code: &str,
    ) -> Result<RegisterOutcome, sqlx::Error> {
        let timer = QueryTimer::new("register_guest");
        let mut tx = self.pool.begin().await?;

        let guest = GuestRepository::find_or_create(
            &mut *tx,
            &registration.full_name,
            &registration.email,
            registration.phone.as_deref(),
        )
        .await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM event_registrations WHERE guest_id = $1 AND event_id = $2)",
        )
        .bind(guest.id)
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        if exists {
            tx.rollback().await?;
            timer.record();
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        let state = VerificationState::INITIAL;
        sqlx::query(
            r#"
            INSERT INTO event_registrations
                (guest_id, event_id, id_number, id_document_url, dietary_restrictions, current_state, access_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(guest.id)
        .bind(event_id)
        .bind(&registration.id_number)
        .bind(&registration.id_document_url)
        .bind(&registration.dietary_restrictions)
        .bind(state.code())
        .bind(access_code)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(RegisterOutcome::Registered(RegistrationReceipt {
            guest_id: guest.id,
            state,
            access_code: access_code.to_string(),
        }))
    }

    /// Login projection for `(email, event)`, including the stored code.
    pub async fn find_credentials(
        &self,
        event_id: i64,
        email: &str,
    ) -> Result<Option<RegistrationCredentials>, sqlx::Error> {
        let timer = QueryTimer::new("find_registration_credentials");
        let result = sqlx::query_as::<_, CredentialsEntity>(
            r#"
            SELECT g.id AS guest_id, g.full_name, g.email, g.phone,
                   r.current_state, r.id_document_url, r.dietary_restrictions, r.error_log, r.access_code
            FROM event_registrations r
            JOIN guests g ON g.id = r.guest_id
            WHERE r.event_id = $1 AND g.email = $2
            "#,
        )
        .bind(event_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result?.map(TryInto::try_into).transpose()
    }

    /// Current state only, for dashboard polling.
    pub async fn find_status(
        &self,
        event_id: i64,
        guest_id: Uuid,
    ) -> Result<Option<GuestStatus>, sqlx::Error> {
        let timer = QueryTimer::new("find_registration_status");
        let result = sqlx::query_scalar::<_, i16>(
            "SELECT current_state FROM event_registrations WHERE guest_id = $1 AND event_id = $2",
        )
        .bind(guest_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result?
            .map(|code| decode_state(code).map(|current_state| GuestStatus { current_state }))
            .transpose()
    }

    /// Full record for the admin inspect view.
    pub async fn find_detail(
        &self,
        event_id: i64,
        guest_id: Uuid,
    ) -> Result<Option<RegistrationDetail>, sqlx::Error> {
        let timer = QueryTimer::new("find_registration_detail");
        let result = sqlx::query_as::<_, RegistrationDetailEntity>(
            r#"
            SELECT g.id AS guest_id, g.full_name, g.email, g.phone,
                   r.id_number, r.id_document_url, r.dietary_restrictions,
                   r.current_state, r.error_log, r.registered_at, r.updated_at
            FROM event_registrations r
            JOIN guests g ON g.id = r.guest_id
            WHERE r.guest_id = $1 AND r.event_id = $2
            "#,
        )
        .bind(guest_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result?.map(TryInto::try_into).transpose()
    }

    /// One page of an event's registrations, newest first, plus the total
    /// matching the same filter.
    pub async fn list(
        &self,
        event_id: i64,
        state: Option<VerificationState>,
        page: &PageRequest,
    ) -> Result<(Vec<RegistrationSummary>, i64), sqlx::Error> {
        let state_code = state.map(VerificationState::code);

        let timer = QueryTimer::new("list_registrations");
        let rows = sqlx::query_as::<_, RegistrationSummaryEntity>(
            r#"
            SELECT g.id AS guest_id, g.full_name, g.email, g.phone, r.current_state, r.registered_at
            FROM event_registrations r
            JOIN guests g ON g.id = r.guest_id
            WHERE r.event_id = $1
              AND ($2::SMALLINT IS NULL OR r.current_state = $2)
            ORDER BY r.registered_at DESC, g.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(event_id)
        .bind(state_code)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await;
        timer.record();
        let rows = rows?;

        let timer = QueryTimer::new("count_registrations");
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM event_registrations r
            WHERE r.event_id = $1
              AND ($2::SMALLINT IS NULL OR r.current_state = $2)
            "#,
        )
        .bind(event_id)
        .bind(state_code)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        let summaries = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<RegistrationSummary>, sqlx::Error>>()?;

        Ok((summaries, total?))
    }

    /// Applies an admin state change under `policy`.
    ///
    /// The row is locked while the transition is planned so the reported old
    /// state is the one actually replaced. Concurrent admins are still
    /// last-write-wins.
    pub async fn update_state<P: TransitionPolicy + ?Sized>(
        &self,
        policy: &P,
        event_id: i64,
        guest_id: Uuid,
        to: VerificationState,
        error_log: Option<&str>,
    ) -> Result<StateUpdateOutcome, sqlx::Error> {
        let timer = QueryTimer::new("update_registration_state");
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, i16>(
            r#"
            SELECT current_state FROM event_registrations
            WHERE guest_id = $1 AND event_id = $2
            FOR UPDATE
            "#,
        )
        .bind(guest_id)
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(code) = current else {
            tx.rollback().await?;
            timer.record();
            return Ok(StateUpdateOutcome::NotFound);
        };

        let transition = match plan_transition(policy, decode_state(code)?, to, error_log) {
            Ok(transition) => transition,
            Err(rejected) => {
                tx.rollback().await?;
                timer.record();
                return Ok(StateUpdateOutcome::Rejected(rejected));
            }
        };

        sqlx::query(
            r#"
            UPDATE event_registrations
            SET current_state = $3, error_log = $4, updated_at = $5
            WHERE guest_id = $1 AND event_id = $2
            "#,
        )
        .bind(guest_id)
        .bind(event_id)
        .bind(transition.to.code())
        .bind(&transition.error_log)
        .bind(transition.changed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(StateUpdateOutcome::Applied(transition))
    }
}

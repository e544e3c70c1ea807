use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lodgekeep_application::StatusEventRepository;
use lodgekeep_core::{AppError, AppResult};
use lodgekeep_domain::{StaffId, StaffStatus, StatusEvent};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed append-only store for staff status transitions.
#[derive(Clone)]
pub struct PostgresStatusEventRepository {
    pool: PgPool,
}

impl PostgresStatusEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StatusEventRow {
    staff_id: Uuid,
    status: String,
    changed_at: DateTime<Utc>,
}

#[async_trait]
impl StatusEventRepository for PostgresStatusEventRepository {
    async fn append(&self, event: StatusEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO staff_status_log (staff_id, status, changed_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(event.staff_id().as_uuid())
        .bind(event.status().as_str())
        .bind(event.changed_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to append status event for staff member '{}': {error}",
                event.staff_id()
            ))
        })?;

        Ok(())
    }

    async fn list_up_to(
        &self,
        staff_id: StaffId,
        up_to: DateTime<Utc>,
    ) -> AppResult<Vec<StatusEvent>> {
        let rows = sqlx::query_as::<_, StatusEventRow>(
            r#"
            SELECT staff_id, status, changed_at
            FROM staff_status_log
            WHERE staff_id = $1 AND changed_at <= $2
            ORDER BY changed_at
            "#,
        )
        .bind(staff_id.as_uuid())
        .bind(up_to)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list status events for staff member '{}': {error}",
                staff_id
            ))
        })?;

        rows.into_iter().map(event_from_row).collect()
    }
}

fn event_from_row(row: StatusEventRow) -> AppResult<StatusEvent> {
    let status = StaffStatus::parse(row.status.as_str())?;

    Ok(StatusEvent::new(
        StaffId::from_uuid(row.staff_id),
        status,
        row.changed_at,
    ))
}

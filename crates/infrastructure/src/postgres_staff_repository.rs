use async_trait::async_trait;
use chrono::{DateTime, Utc};

use lodgekeep_application::StaffRepository;
use lodgekeep_core::{AppError, AppResult, OwnerId};
use lodgekeep_domain::{StaffId, StaffMember, StaffMemberParts, StaffRecord, StaffStatus};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed repository for staff members.
#[derive(Clone)]
pub struct PostgresStaffRepository {
    pool: PgPool,
}

impl PostgresStaffRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StaffRow {
    staff_id: Uuid,
    name: String,
    role: String,
    email: String,
    phone: String,
    status: String,
    performance: i16,
    transaction_count: i64,
    last_active_at: Option<DateTime<Utc>>,
    recent_activity: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct StaffRecordRow {
    staff_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl StaffRepository for PostgresStaffRepository {
    async fn create(&self, owner_id: OwnerId, member: &StaffMember) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO staff (
                staff_id,
                owner_id,
                name,
                role,
                email,
                phone,
                status,
                performance,
                transaction_count,
                last_active_at,
                recent_activity,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(member.staff_id().as_uuid())
        .bind(owner_id.as_uuid())
        .bind(member.name().as_str())
        .bind(member.role().as_str())
        .bind(member.email().as_str())
        .bind(member.phone().as_str())
        .bind(member.status().as_str())
        .bind(i16::from(member.performance()))
        .bind(i64::from(member.transaction_count()))
        .bind(member.last_active_at())
        .bind(member.recent_activity())
        .bind(member.created_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "staff member with email '{}' already exists",
                        member.email().as_str()
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to create staff member '{}' for owner '{}': {error}",
                    member.staff_id(),
                    owner_id
                )))
            }
        }
    }

    async fn list(&self, owner_id: OwnerId) -> AppResult<Vec<StaffMember>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            r#"
            SELECT
                staff_id,
                name,
                role,
                email,
                phone,
                status,
                performance,
                transaction_count,
                last_active_at,
                recent_activity,
                created_at
            FROM staff
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list staff members for owner '{}': {error}",
                owner_id
            ))
        })?;

        rows.into_iter().map(member_from_row).collect()
    }

    async fn find(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<Option<StaffMember>> {
        let row = sqlx::query_as::<_, StaffRow>(
            r#"
            SELECT
                staff_id,
                name,
                role,
                email,
                phone,
                status,
                performance,
                transaction_count,
                last_active_at,
                recent_activity,
                created_at
            FROM staff
            WHERE owner_id = $1 AND staff_id = $2
            "#,
        )
        .bind(owner_id.as_uuid())
        .bind(staff_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find staff member '{}' for owner '{}': {error}",
                staff_id, owner_id
            ))
        })?;

        row.map(member_from_row).transpose()
    }

    async fn find_record(&self, staff_id: StaffId) -> AppResult<Option<StaffRecord>> {
        let row = sqlx::query_as::<_, StaffRecordRow>(
            r#"
            SELECT staff_id, status, created_at
            FROM staff
            WHERE staff_id = $1
            "#,
        )
        .bind(staff_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load staff record '{}': {error}",
                staff_id
            ))
        })?;

        row.map(record_from_row).transpose()
    }

    async fn update_status(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        status: StaffStatus,
    ) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE staff
            SET status = $1
            WHERE owner_id = $2 AND staff_id = $3
            "#,
        )
        .bind(status.as_str())
        .bind(owner_id.as_uuid())
        .bind(staff_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update status for staff member '{}': {error}",
                staff_id
            ))
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "staff member '{}' does not exist for owner '{}'",
                staff_id, owner_id
            )));
        }

        Ok(())
    }

    async fn update_transaction_count(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        count: u32,
    ) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE staff
            SET transaction_count = $1
            WHERE owner_id = $2 AND staff_id = $3
            "#,
        )
        .bind(i64::from(count))
        .bind(owner_id.as_uuid())
        .bind(staff_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update transaction count for staff member '{}': {error}",
                staff_id
            ))
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "staff member '{}' does not exist for owner '{}'",
                staff_id, owner_id
            )));
        }

        Ok(())
    }

    async fn save_performance(&self, staff_id: StaffId, score: u8) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE staff
            SET performance = $1
            WHERE staff_id = $2
            "#,
        )
        .bind(i16::from(score))
        .bind(staff_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save performance for staff member '{}': {error}",
                staff_id
            ))
        })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "staff member '{}' does not exist",
                staff_id
            )));
        }

        Ok(())
    }

    async fn delete(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<()> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM staff
            WHERE owner_id = $1 AND staff_id = $2
            "#,
        )
        .bind(owner_id.as_uuid())
        .bind(staff_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to delete staff member '{}': {error}",
                staff_id
            ))
        })?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "staff member '{}' does not exist for owner '{}'",
                staff_id, owner_id
            )));
        }

        Ok(())
    }
}

fn member_from_row(row: StaffRow) -> AppResult<StaffMember> {
    let performance = u8::try_from(row.performance).map_err(|error| {
        AppError::Internal(format!(
            "stored performance for staff member '{}' is out of range: {error}",
            row.staff_id
        ))
    })?;
    let transaction_count = u32::try_from(row.transaction_count).map_err(|error| {
        AppError::Internal(format!(
            "stored transaction count for staff member '{}' is out of range: {error}",
            row.staff_id
        ))
    })?;

    StaffMember::from_parts(StaffMemberParts {
        staff_id: StaffId::from_uuid(row.staff_id),
        name: row.name,
        role: row.role,
        email: row.email,
        phone: row.phone,
        status: row.status,
        performance,
        transaction_count,
        last_active_at: row.last_active_at,
        recent_activity: row.recent_activity,
        created_at: row.created_at,
    })
}

fn record_from_row(row: StaffRecordRow) -> AppResult<StaffRecord> {
    let status = StaffStatus::parse(row.status.as_str())?;

    Ok(StaffRecord::new(
        StaffId::from_uuid(row.staff_id),
        row.created_at,
        status,
    ))
}

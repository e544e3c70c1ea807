//! Persistence ports consumed by the staff service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lodgekeep_core::{AppResult, OwnerId};
use lodgekeep_domain::{StaffId, StaffMember, StaffRecord, StaffStatus, StatusEvent};

/// Payload for adding a staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaffInput {
    /// Member display name.
    pub name: String,
    /// Member job role.
    pub role: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
}

/// Repository port for staff member persistence.
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Creates one staff member owned by an account.
    async fn create(&self, owner_id: OwnerId, member: &StaffMember) -> AppResult<()>;

    /// Lists an owner's staff members, newest first.
    async fn list(&self, owner_id: OwnerId) -> AppResult<Vec<StaffMember>>;

    /// Returns one staff member when it exists and belongs to the owner.
    async fn find(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<Option<StaffMember>>;

    /// Returns the scoring seed for one staff member, regardless of owner.
    /// The record carries the stored status, which equals the creation status
    /// whenever the member's log is empty.
    async fn find_record(&self, staff_id: StaffId) -> AppResult<Option<StaffRecord>>;

    /// Replaces the status of an owner's staff member.
    async fn update_status(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        status: StaffStatus,
    ) -> AppResult<()>;

    /// Replaces the handled-transaction count of an owner's staff member.
    async fn update_transaction_count(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        count: u32,
    ) -> AppResult<()>;

    /// Stores a freshly computed performance score for one staff member.
    async fn save_performance(&self, staff_id: StaffId, score: u8) -> AppResult<()>;

    /// Removes an owner's staff member. The member's status log is kept.
    async fn delete(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<()>;
}

/// Repository port for the append-only status-change log.
#[async_trait]
pub trait StatusEventRepository: Send + Sync {
    /// Appends one status transition to a member's log.
    async fn append(&self, event: StatusEvent) -> AppResult<()>;

    /// Lists a member's transitions up to an inclusive bound, oldest first.
    async fn list_up_to(
        &self,
        staff_id: StaffId,
        up_to: DateTime<Utc>,
    ) -> AppResult<Vec<StatusEvent>>;
}

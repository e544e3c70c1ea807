//! Staff management ports and application service.
//!
//! Owns staff lifecycle operations: adding and removing members, status
//! changes, transaction counts, and monthly activity scoring. Every mutation
//! that can affect a member's standing recomputes and persists the score for
//! the current month; the read-side scoring operations never write anything.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, info};

use lodgekeep_core::{AppError, AppResult, OwnerId};
use lodgekeep_domain::{
    MonthWindow, MonthlyActivity, StaffId, StaffMember, StaffStatus, StatusEvent,
    active_days_in_window,
};

use crate::staff_ports::{NewStaffInput, StaffRepository, StatusEventRepository};

/// Application service for staff management and activity scoring.
#[derive(Clone)]
pub struct StaffService {
    staff_repository: Arc<dyn StaffRepository>,
    status_event_repository: Arc<dyn StatusEventRepository>,
}

impl StaffService {
    /// Creates a new staff service from repository implementations.
    #[must_use]
    pub fn new(
        staff_repository: Arc<dyn StaffRepository>,
        status_event_repository: Arc<dyn StatusEventRepository>,
    ) -> Self {
        Self {
            staff_repository,
            status_event_repository,
        }
    }

    /// Adds a staff member, logs the opening status transition, and scores
    /// the member's first month.
    pub async fn add_member(
        &self,
        owner_id: OwnerId,
        input: NewStaffInput,
    ) -> AppResult<StaffMember> {
        self.add_member_at(owner_id, input, Utc::now()).await
    }

    /// Variant of [`Self::add_member`] that treats `now` as the current
    /// moment.
    pub async fn add_member_at(
        &self,
        owner_id: OwnerId,
        input: NewStaffInput,
        now: DateTime<Utc>,
    ) -> AppResult<StaffMember> {
        let mut member = StaffMember::new(input.name, input.role, input.email, input.phone, now)?;
        self.staff_repository.create(owner_id, &member).await?;
        self.status_event_repository
            .append(StatusEvent::new(
                member.staff_id(),
                member.status(),
                member.created_at(),
            ))
            .await?;

        let score = self.refresh_performance(member.staff_id(), now).await?;
        member.record_performance(score);

        info!(
            owner_id = %owner_id,
            staff_id = %member.staff_id(),
            "added staff member"
        );

        Ok(member)
    }

    /// Lists an owner's staff members, newest first, re-scoring each one for
    /// the current month along the way.
    pub async fn list_members(&self, owner_id: OwnerId) -> AppResult<Vec<StaffMember>> {
        self.list_members_at(owner_id, Utc::now()).await
    }

    /// Variant of [`Self::list_members`] that treats `now` as the current
    /// moment.
    pub async fn list_members_at(
        &self,
        owner_id: OwnerId,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<StaffMember>> {
        let mut members = self.staff_repository.list(owner_id).await?;
        for member in &mut members {
            let score = self.refresh_performance(member.staff_id(), now).await?;
            member.record_performance(score);
        }
        Ok(members)
    }

    /// Switches a staff member between active and inactive, appends the
    /// transition to the member's log, and re-scores the current month.
    pub async fn change_status(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        status: StaffStatus,
    ) -> AppResult<StaffMember> {
        self.change_status_at(owner_id, staff_id, status, Utc::now())
            .await
    }

    /// Variant of [`Self::change_status`] that treats `now` as the current
    /// moment and stamps the logged transition with it.
    pub async fn change_status_at(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        status: StaffStatus,
        now: DateTime<Utc>,
    ) -> AppResult<StaffMember> {
        self.staff_repository
            .update_status(owner_id, staff_id, status)
            .await?;
        self.status_event_repository
            .append(StatusEvent::new(staff_id, status, now))
            .await?;
        self.refresh_performance(staff_id, now).await?;

        info!(
            owner_id = %owner_id,
            staff_id = %staff_id,
            status = status.as_str(),
            "changed staff status"
        );

        self.require_member(owner_id, staff_id).await
    }

    /// Records the latest handled-transaction count for a staff member and
    /// re-scores the current month.
    pub async fn record_transactions(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        count: u32,
    ) -> AppResult<StaffMember> {
        self.record_transactions_at(owner_id, staff_id, count, Utc::now())
            .await
    }

    /// Variant of [`Self::record_transactions`] that treats `now` as the
    /// current moment.
    pub async fn record_transactions_at(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        count: u32,
        now: DateTime<Utc>,
    ) -> AppResult<StaffMember> {
        self.staff_repository
            .update_transaction_count(owner_id, staff_id, count)
            .await?;
        self.refresh_performance(staff_id, now).await?;

        info!(
            owner_id = %owner_id,
            staff_id = %staff_id,
            count = count,
            "recorded staff transactions"
        );

        self.require_member(owner_id, staff_id).await
    }

    /// Removes an owner's staff member.
    ///
    /// The member's status log is left in place so already-computed months
    /// stay reconstructible.
    pub async fn remove_member(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<()> {
        self.staff_repository.delete(owner_id, staff_id).await?;

        info!(
            owner_id = %owner_id,
            staff_id = %staff_id,
            "removed staff member"
        );

        Ok(())
    }

    /// Counts the days a staff member was active in one calendar month.
    ///
    /// A pure read: nothing is persisted, and repeated calls over an
    /// unchanged log return identical results for any past month.
    pub async fn active_days_in_month(
        &self,
        staff_id: StaffId,
        year: i32,
        month: u32,
    ) -> AppResult<u32> {
        self.active_days_in_month_at(staff_id, year, month, Utc::now())
            .await
    }

    /// Variant of [`Self::active_days_in_month`] that treats `now` as the
    /// current moment when clamping an in-progress month.
    pub async fn active_days_in_month_at(
        &self,
        staff_id: StaffId,
        year: i32,
        month: u32,
        now: DateTime<Utc>,
    ) -> AppResult<u32> {
        let window = MonthWindow::new(year, month)?;
        Ok(self
            .monthly_activity(staff_id, window, now)
            .await?
            .active_days())
    }

    /// Scores a staff member's activity for one calendar month, 0-100.
    ///
    /// A pure read, like [`Self::active_days_in_month`].
    pub async fn monthly_performance(
        &self,
        staff_id: StaffId,
        year: i32,
        month: u32,
    ) -> AppResult<u8> {
        self.monthly_performance_at(staff_id, year, month, Utc::now())
            .await
    }

    /// Variant of [`Self::monthly_performance`] that treats `now` as the
    /// current moment when clamping an in-progress month.
    pub async fn monthly_performance_at(
        &self,
        staff_id: StaffId,
        year: i32,
        month: u32,
        now: DateTime<Utc>,
    ) -> AppResult<u8> {
        let window = MonthWindow::new(year, month)?;
        Ok(self
            .monthly_activity(staff_id, window, now)
            .await?
            .performance())
    }

    async fn monthly_activity(
        &self,
        staff_id: StaffId,
        window: MonthWindow,
        now: DateTime<Utc>,
    ) -> AppResult<MonthlyActivity> {
        let record = self
            .staff_repository
            .find_record(staff_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("staff member {staff_id} not found")))?;
        let events = self
            .status_event_repository
            .list_up_to(staff_id, window.end())
            .await?;
        let active_days = active_days_in_window(&record, &events, window, now);
        Ok(MonthlyActivity::new(active_days, window.days_in_month()))
    }

    /// Recomputes and persists the score for the month `now` falls in.
    async fn refresh_performance(&self, staff_id: StaffId, now: DateTime<Utc>) -> AppResult<u8> {
        let window = MonthWindow::new(now.year(), now.month())?;
        let activity = self.monthly_activity(staff_id, window, now).await?;
        let score = activity.performance();
        self.staff_repository
            .save_performance(staff_id, score)
            .await?;

        debug!(
            staff_id = %staff_id,
            active_days = activity.active_days(),
            score = score,
            "stored monthly performance"
        );

        Ok(score)
    }

    async fn require_member(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<StaffMember> {
        self.staff_repository
            .find(owner_id, staff_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("staff member {staff_id} not found")))
    }
}

#[cfg(test)]
mod tests;

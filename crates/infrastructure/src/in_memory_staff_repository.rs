use std::collections::HashMap;

use async_trait::async_trait;
use lodgekeep_application::StaffRepository;
use lodgekeep_core::{AppError, AppResult, OwnerId};
use lodgekeep_domain::{StaffId, StaffMember, StaffRecord, StaffStatus};
use tokio::sync::RwLock;

/// In-memory staff repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryStaffRepository {
    members: RwLock<HashMap<(OwnerId, StaffId), StaffMember>>,
}

impl InMemoryStaffRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    async fn create(&self, owner_id: OwnerId, member: &StaffMember) -> AppResult<()> {
        let mut members = self.members.write().await;

        // Email is unique across every owner, matching the column constraint.
        if members
            .values()
            .any(|existing| existing.email() == member.email())
        {
            return Err(AppError::Conflict(format!(
                "staff member with email '{}' already exists",
                member.email().as_str()
            )));
        }

        members.insert((owner_id, member.staff_id()), member.clone());
        Ok(())
    }

    async fn list(&self, owner_id: OwnerId) -> AppResult<Vec<StaffMember>> {
        let members = self.members.read().await;

        let mut values: Vec<StaffMember> = members
            .iter()
            .filter_map(|((stored_owner_id, _), member)| {
                (stored_owner_id == &owner_id).then_some(member.clone())
            })
            .collect();
        values.sort_by_key(|member| std::cmp::Reverse(member.created_at()));

        Ok(values)
    }

    async fn find(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<Option<StaffMember>> {
        let members = self.members.read().await;

        Ok(members.get(&(owner_id, staff_id)).cloned())
    }

    async fn find_record(&self, staff_id: StaffId) -> AppResult<Option<StaffRecord>> {
        let members = self.members.read().await;

        Ok(members
            .iter()
            .find(|((_, stored_staff_id), _)| *stored_staff_id == staff_id)
            .map(|(_, member)| {
                StaffRecord::new(member.staff_id(), member.created_at(), member.status())
            }))
    }

    async fn update_status(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        status: StaffStatus,
    ) -> AppResult<()> {
        let mut members = self.members.write().await;

        match members.get_mut(&(owner_id, staff_id)) {
            Some(member) => {
                member.set_status(status);
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "staff member '{}' does not exist for owner '{}'",
                staff_id, owner_id
            ))),
        }
    }

    async fn update_transaction_count(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        count: u32,
    ) -> AppResult<()> {
        let mut members = self.members.write().await;

        match members.get_mut(&(owner_id, staff_id)) {
            Some(member) => {
                member.record_transactions(count);
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "staff member '{}' does not exist for owner '{}'",
                staff_id, owner_id
            ))),
        }
    }

    async fn save_performance(&self, staff_id: StaffId, score: u8) -> AppResult<()> {
        let mut members = self.members.write().await;

        match members
            .iter_mut()
            .find(|((_, stored_staff_id), _)| *stored_staff_id == staff_id)
        {
            Some((_, member)) => {
                member.record_performance(score);
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "staff member '{}' does not exist",
                staff_id
            ))),
        }
    }

    async fn delete(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<()> {
        let mut members = self.members.write().await;

        if members.remove(&(owner_id, staff_id)).is_none() {
            return Err(AppError::NotFound(format!(
                "staff member '{}' does not exist for owner '{}'",
                staff_id, owner_id
            )));
        }

        Ok(())
    }
}

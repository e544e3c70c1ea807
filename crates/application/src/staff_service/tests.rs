use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

use lodgekeep_core::{AppError, AppResult, OwnerId};
use lodgekeep_domain::{StaffId, StaffMember, StaffRecord, StaffStatus, StatusEvent};

use crate::staff_ports::{NewStaffInput, StaffRepository, StatusEventRepository};

use super::StaffService;

#[derive(Default)]
struct FakeStaffRepository {
    members: Mutex<HashMap<StaffId, (OwnerId, StaffMember)>>,
}

#[async_trait]
impl StaffRepository for FakeStaffRepository {
    async fn create(&self, owner_id: OwnerId, member: &StaffMember) -> AppResult<()> {
        let mut members = self.members.lock().await;
        if members
            .values()
            .any(|(_, existing)| existing.email() == member.email())
        {
            return Err(AppError::Conflict("email already exists".to_owned()));
        }
        members.insert(member.staff_id(), (owner_id, member.clone()));
        Ok(())
    }

    async fn list(&self, owner_id: OwnerId) -> AppResult<Vec<StaffMember>> {
        let mut members: Vec<StaffMember> = self
            .members
            .lock()
            .await
            .values()
            .filter(|(stored_owner, _)| *stored_owner == owner_id)
            .map(|(_, member)| member.clone())
            .collect();
        members.sort_by_key(|member| std::cmp::Reverse(member.created_at()));
        Ok(members)
    }

    async fn find(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<Option<StaffMember>> {
        Ok(self
            .members
            .lock()
            .await
            .get(&staff_id)
            .filter(|(stored_owner, _)| *stored_owner == owner_id)
            .map(|(_, member)| member.clone()))
    }

    async fn find_record(&self, staff_id: StaffId) -> AppResult<Option<StaffRecord>> {
        Ok(self.members.lock().await.get(&staff_id).map(|(_, member)| {
            StaffRecord::new(member.staff_id(), member.created_at(), member.status())
        }))
    }

    async fn update_status(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        status: StaffStatus,
    ) -> AppResult<()> {
        let mut members = self.members.lock().await;
        match members.get_mut(&staff_id) {
            Some((stored_owner, member)) if *stored_owner == owner_id => {
                member.set_status(status);
                Ok(())
            }
            _ => Err(AppError::NotFound("staff member not found".to_owned())),
        }
    }

    async fn update_transaction_count(
        &self,
        owner_id: OwnerId,
        staff_id: StaffId,
        count: u32,
    ) -> AppResult<()> {
        let mut members = self.members.lock().await;
        match members.get_mut(&staff_id) {
            Some((stored_owner, member)) if *stored_owner == owner_id => {
                member.record_transactions(count);
                Ok(())
            }
            _ => Err(AppError::NotFound("staff member not found".to_owned())),
        }
    }

    async fn save_performance(&self, staff_id: StaffId, score: u8) -> AppResult<()> {
        let mut members = self.members.lock().await;
        match members.get_mut(&staff_id) {
            Some((_, member)) => {
                member.record_performance(score);
                Ok(())
            }
            None => Err(AppError::NotFound("staff member not found".to_owned())),
        }
    }

    async fn delete(&self, owner_id: OwnerId, staff_id: StaffId) -> AppResult<()> {
        let mut members = self.members.lock().await;
        match members.get(&staff_id) {
            Some((stored_owner, _)) if *stored_owner == owner_id => {
                members.remove(&staff_id);
                Ok(())
            }
            _ => Err(AppError::NotFound("staff member not found".to_owned())),
        }
    }
}

#[derive(Default)]
struct FakeStatusEventRepository {
    events: Mutex<Vec<StatusEvent>>,
}

#[async_trait]
impl StatusEventRepository for FakeStatusEventRepository {
    async fn append(&self, event: StatusEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }

    async fn list_up_to(
        &self,
        staff_id: StaffId,
        up_to: DateTime<Utc>,
    ) -> AppResult<Vec<StatusEvent>> {
        let mut events: Vec<StatusEvent> = self
            .events
            .lock()
            .await
            .iter()
            .filter(|event| event.staff_id() == staff_id && event.changed_at() <= up_to)
            .cloned()
            .collect();
        events.sort_by_key(StatusEvent::changed_at);
        Ok(events)
    }
}

fn build_service(
    staff_repository: Arc<FakeStaffRepository>,
    status_event_repository: Arc<FakeStatusEventRepository>,
) -> StaffService {
    StaffService::new(staff_repository, status_event_repository)
}

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|| unreachable!())
}

fn sample_input(email: &str) -> NewStaffInput {
    NewStaffInput {
        name: "Imani Okafor".to_owned(),
        role: "Concierge".to_owned(),
        email: email.to_owned(),
        phone: "4155550100".to_owned(),
    }
}

#[tokio::test]
async fn add_member_logs_the_opening_transition() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(staff_repository.clone(), status_event_repository.clone());
    let owner_id = OwnerId::new();
    let now = utc(2024, 2, 10, 0);

    let member = service
        .add_member_at(owner_id, sample_input("imani@lodgekeep.test"), now)
        .await;
    assert!(member.is_ok());
    let member = member.unwrap_or_else(|_| unreachable!());
    assert_eq!(member.status(), StaffStatus::Active);
    assert_eq!(member.created_at(), now);
    // No time has elapsed inside the creation month yet.
    assert_eq!(member.performance(), 0);

    let events = status_event_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].staff_id(), member.staff_id());
    assert_eq!(events[0].status(), StaffStatus::Active);
    assert_eq!(events[0].changed_at(), now);
}

#[tokio::test]
async fn add_member_rejects_duplicate_email() {
    let service = build_service(
        Arc::new(FakeStaffRepository::default()),
        Arc::new(FakeStatusEventRepository::default()),
    );
    let owner_id = OwnerId::new();
    let now = utc(2024, 2, 10, 0);

    let first = service
        .add_member_at(owner_id, sample_input("imani@lodgekeep.test"), now)
        .await;
    assert!(first.is_ok());

    let second = service
        .add_member_at(owner_id, sample_input("imani@lodgekeep.test"), now)
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn add_member_rejects_malformed_phone() {
    let service = build_service(
        Arc::new(FakeStaffRepository::default()),
        Arc::new(FakeStatusEventRepository::default()),
    );

    let mut input = sample_input("imani@lodgekeep.test");
    input.phone = "555-0100".to_owned();
    let added = service
        .add_member_at(OwnerId::new(), input, utc(2024, 2, 10, 0))
        .await;
    assert!(matches!(added, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn change_status_appends_an_event_and_rescores_the_month() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(staff_repository.clone(), status_event_repository.clone());
    let owner_id = OwnerId::new();

    let member = service
        .add_member_at(
            owner_id,
            sample_input("imani@lodgekeep.test"),
            utc(2024, 2, 10, 0),
        )
        .await;
    assert!(member.is_ok());
    let member = member.unwrap_or_else(|_| unreachable!());

    let updated = service
        .change_status_at(
            owner_id,
            member.staff_id(),
            StaffStatus::Inactive,
            utc(2024, 2, 20, 0),
        )
        .await;
    assert!(updated.is_ok());
    let updated = updated.unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.status(), StaffStatus::Inactive);
    // Active Feb 10-20 of a 29-day February.
    assert_eq!(updated.performance(), 34);

    let events = status_event_repository.events.lock().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].status(), StaffStatus::Inactive);
    assert_eq!(events[1].changed_at(), utc(2024, 2, 20, 0));
}

#[tokio::test]
async fn change_status_for_unknown_member_fails_without_logging() {
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(
        Arc::new(FakeStaffRepository::default()),
        status_event_repository.clone(),
    );

    let changed = service
        .change_status_at(
            OwnerId::new(),
            StaffId::new(),
            StaffStatus::Inactive,
            utc(2024, 2, 20, 0),
        )
        .await;
    assert!(matches!(changed, Err(AppError::NotFound(_))));
    assert!(status_event_repository.events.lock().await.is_empty());
}

#[tokio::test]
async fn record_transactions_updates_the_count_and_rescores() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(staff_repository.clone(), status_event_repository.clone());
    let owner_id = OwnerId::new();

    let member = service
        .add_member_at(
            owner_id,
            sample_input("imani@lodgekeep.test"),
            utc(2024, 2, 10, 0),
        )
        .await;
    assert!(member.is_ok());
    let member = member.unwrap_or_else(|_| unreachable!());

    let updated = service
        .record_transactions_at(owner_id, member.staff_id(), 7, utc(2024, 2, 20, 0))
        .await;
    assert!(updated.is_ok());
    let updated = updated.unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.transaction_count(), 7);
    // Still active through the 20th, so ten days of credit.
    assert_eq!(updated.performance(), 34);
}

#[tokio::test]
async fn record_transactions_for_foreign_member_fails_with_not_found() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let service = build_service(
        staff_repository.clone(),
        Arc::new(FakeStatusEventRepository::default()),
    );
    let owner_id = OwnerId::new();

    let member = service
        .add_member_at(
            owner_id,
            sample_input("imani@lodgekeep.test"),
            utc(2024, 2, 10, 0),
        )
        .await;
    assert!(member.is_ok());
    let member = member.unwrap_or_else(|_| unreachable!());

    let foreign = service
        .record_transactions_at(OwnerId::new(), member.staff_id(), 7, utc(2024, 2, 20, 0))
        .await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn list_members_rescores_each_member_newest_first() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(staff_repository.clone(), status_event_repository.clone());
    let owner_id = OwnerId::new();

    let veteran = service
        .add_member_at(
            owner_id,
            sample_input("veteran@lodgekeep.test"),
            utc(2024, 1, 1, 0),
        )
        .await;
    assert!(veteran.is_ok());
    let veteran = veteran.unwrap_or_else(|_| unreachable!());

    let newcomer = service
        .add_member_at(
            owner_id,
            sample_input("newcomer@lodgekeep.test"),
            utc(2024, 1, 20, 0),
        )
        .await;
    assert!(newcomer.is_ok());
    let newcomer = newcomer.unwrap_or_else(|_| unreachable!());
    let paused = service
        .change_status_at(
            owner_id,
            newcomer.staff_id(),
            StaffStatus::Inactive,
            utc(2024, 1, 25, 0),
        )
        .await;
    assert!(paused.is_ok());

    // A member of another owner must stay out of the listing.
    let foreign = service
        .add_member_at(
            OwnerId::new(),
            sample_input("other@lodgekeep.test"),
            utc(2024, 1, 5, 0),
        )
        .await;
    assert!(foreign.is_ok());

    let members = service.list_members_at(owner_id, utc(2024, 1, 31, 0)).await;
    assert!(members.is_ok());
    let members = members.unwrap_or_else(|_| unreachable!());
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].staff_id(), newcomer.staff_id());
    // Active Jan 20-25 of a 31-day month.
    assert_eq!(members[0].performance(), 16);
    assert_eq!(members[1].staff_id(), veteran.staff_id());
    // Active Jan 1 through the 31st, one day short of the full month.
    assert_eq!(members[1].performance(), 97);
}

#[tokio::test]
async fn remove_member_keeps_the_status_log() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(staff_repository.clone(), status_event_repository.clone());
    let owner_id = OwnerId::new();

    let member = service
        .add_member_at(
            owner_id,
            sample_input("imani@lodgekeep.test"),
            utc(2024, 2, 10, 0),
        )
        .await;
    assert!(member.is_ok());
    let member = member.unwrap_or_else(|_| unreachable!());

    let foreign_removal = service.remove_member(OwnerId::new(), member.staff_id()).await;
    assert!(matches!(foreign_removal, Err(AppError::NotFound(_))));

    let removed = service.remove_member(owner_id, member.staff_id()).await;
    assert!(removed.is_ok());
    assert!(staff_repository.members.lock().await.is_empty());
    assert_eq!(status_event_repository.events.lock().await.len(), 1);

    let removed_again = service.remove_member(owner_id, member.staff_id()).await;
    assert!(matches!(removed_again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn activity_reads_are_pure_and_persist_nothing() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(staff_repository.clone(), status_event_repository.clone());
    let owner_id = OwnerId::new();

    let member = service
        .add_member_at(
            owner_id,
            sample_input("imani@lodgekeep.test"),
            utc(2024, 2, 10, 0),
        )
        .await;
    assert!(member.is_ok());
    let member = member.unwrap_or_else(|_| unreachable!());

    let days = service
        .active_days_in_month_at(member.staff_id(), 2024, 2, utc(2024, 6, 1, 0))
        .await;
    assert_eq!(days.ok(), Some(20));

    let score = service
        .monthly_performance_at(member.staff_id(), 2024, 2, utc(2024, 6, 1, 0))
        .await;
    assert_eq!(score.ok(), Some(69));

    // The stored score still reflects the last mutation-triggered refresh.
    let stored = staff_repository
        .members
        .lock()
        .await
        .get(&member.staff_id())
        .map(|(_, stored_member)| stored_member.performance());
    assert_eq!(stored, Some(0));
}

#[tokio::test]
async fn in_progress_month_is_clamped_to_now() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(staff_repository.clone(), status_event_repository.clone());

    let member = service
        .add_member_at(
            OwnerId::new(),
            sample_input("imani@lodgekeep.test"),
            utc(2026, 1, 1, 0),
        )
        .await;
    assert!(member.is_ok());
    let member = member.unwrap_or_else(|_| unreachable!());

    let days = service
        .active_days_in_month_at(member.staff_id(), 2026, 1, utc(2026, 1, 15, 12))
        .await;
    assert_eq!(days.ok(), Some(15));
}

#[tokio::test]
async fn unknown_member_activity_fails_with_not_found() {
    let service = build_service(
        Arc::new(FakeStaffRepository::default()),
        Arc::new(FakeStatusEventRepository::default()),
    );

    let days = service
        .active_days_in_month_at(StaffId::new(), 2024, 1, utc(2024, 6, 1, 0))
        .await;
    assert!(matches!(days, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn out_of_range_month_is_rejected() {
    let staff_repository = Arc::new(FakeStaffRepository::default());
    let status_event_repository = Arc::new(FakeStatusEventRepository::default());
    let service = build_service(staff_repository.clone(), status_event_repository.clone());

    let member = service
        .add_member_at(
            OwnerId::new(),
            sample_input("imani@lodgekeep.test"),
            utc(2024, 2, 10, 0),
        )
        .await;
    assert!(member.is_ok());
    let member = member.unwrap_or_else(|_| unreachable!());

    let days = service
        .active_days_in_month_at(member.staff_id(), 2024, 13, utc(2024, 6, 1, 0))
        .await;
    assert!(matches!(days, Err(AppError::Validation(_))));
}

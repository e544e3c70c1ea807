use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lodgekeep_application::StatusEventRepository;
use lodgekeep_core::AppResult;
use lodgekeep_domain::{StaffId, StatusEvent};
use tokio::sync::RwLock;

/// In-memory append-only store for staff status transitions.
#[derive(Debug, Default)]
pub struct InMemoryStatusEventRepository {
    events: RwLock<Vec<StatusEvent>>,
}

impl InMemoryStatusEventRepository {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StatusEventRepository for InMemoryStatusEventRepository {
    async fn append(&self, event: StatusEvent) -> AppResult<()> {
        let mut events = self.events.write().await;
        events.push(event);

        Ok(())
    }

    async fn list_up_to(
        &self,
        staff_id: StaffId,
        up_to: DateTime<Utc>,
    ) -> AppResult<Vec<StatusEvent>> {
        let events = self.events.read().await;

        let mut matching: Vec<StatusEvent> = events
            .iter()
            .filter(|event| event.staff_id() == staff_id && event.changed_at() <= up_to)
            .cloned()
            .collect();
        matching.sort_by_key(StatusEvent::changed_at);

        Ok(matching)
    }
}

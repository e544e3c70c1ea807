//! Staff activity timeline and monthly performance scoring.
//!
//! A staff member's activity history is an append-only log of status
//! transitions. Walking that log against a calendar-month window yields the
//! number of days the member was active in that month, which in turn feeds
//! the 0-100 performance score shown next to each member.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use lodgekeep_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::staff::{StaffId, StaffStatus};

const MILLISECONDS_PER_DAY: u64 = 86_400_000;

/// One status transition in a staff member's activity log.
///
/// Events are append-only: once written they are never edited or deleted,
/// and new events carry later timestamps than existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    staff_id: StaffId,
    status: StaffStatus,
    changed_at: DateTime<Utc>,
}

impl StatusEvent {
    /// Creates a status transition record.
    #[must_use]
    pub fn new(staff_id: StaffId, status: StaffStatus, changed_at: DateTime<Utc>) -> Self {
        Self {
            staff_id,
            status,
            changed_at,
        }
    }

    /// Returns the staff member this event belongs to.
    #[must_use]
    pub fn staff_id(&self) -> StaffId {
        self.staff_id
    }

    /// Returns the status the member changed to.
    #[must_use]
    pub fn status(&self) -> StaffStatus {
        self.status
    }

    /// Returns when the change took effect.
    #[must_use]
    pub fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }
}

/// Creation-time facts about a staff member.
///
/// Seeds the timeline when the activity log holds no event at or before the
/// queried window, and anchors accrual for members who joined mid-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    staff_id: StaffId,
    created_at: DateTime<Utc>,
    initial_status: StaffStatus,
}

impl StaffRecord {
    /// Creates a staff record from creation-time facts.
    #[must_use]
    pub fn new(staff_id: StaffId, created_at: DateTime<Utc>, initial_status: StaffStatus) -> Self {
        Self {
            staff_id,
            created_at,
            initial_status,
        }
    }

    /// Returns the staff member identifier.
    #[must_use]
    pub fn staff_id(&self) -> StaffId {
        self.staff_id
    }

    /// Returns when the member was added.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the status the member was created with.
    #[must_use]
    pub fn initial_status(&self) -> StaffStatus {
        self.initial_status
    }
}

/// Closed calendar-month window that activity queries run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclusive_end: DateTime<Utc>,
    days_in_month: u32,
}

impl MonthWindow {
    /// Builds the window for a 1-indexed calendar month.
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        let invalid = || AppError::Validation(format!("invalid calendar month {year}-{month:02}"));

        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        let last_day = next_first.pred_opt().ok_or_else(invalid)?;

        let days_in_month = u32::try_from(next_first.signed_duration_since(first_day).num_days())
            .map_err(|_| AppError::Internal("month length out of range".to_owned()))?;

        Ok(Self {
            start: first_day.and_time(NaiveTime::MIN).and_utc(),
            end: last_day.and_time(NaiveTime::MIN).and_utc(),
            exclusive_end: next_first.and_time(NaiveTime::MIN).and_utc(),
            days_in_month,
        })
    }

    /// Returns midnight on the first day of the month.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns midnight on the last day of the month.
    ///
    /// This is the upper bound used when fetching events: a transition logged
    /// later on the final day still belongs to the following query window.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the first instant of the following month.
    ///
    /// Accrual runs to this bound so a member active through a whole past
    /// month is credited its literal last day.
    #[must_use]
    pub fn exclusive_end(&self) -> DateTime<Utc> {
        self.exclusive_end
    }

    /// Returns the number of calendar days in the month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }
}

/// Computed activity for one staff member in one calendar month.
///
/// Ephemeral: consumed to derive a performance score, never stored itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyActivity {
    active_days: u32,
    days_in_month: u32,
}

impl MonthlyActivity {
    /// Pairs an active-day count with the length of its month.
    #[must_use]
    pub fn new(active_days: u32, days_in_month: u32) -> Self {
        Self {
            active_days,
            days_in_month,
        }
    }

    /// Returns the number of days the member was active.
    #[must_use]
    pub fn active_days(&self) -> u32 {
        self.active_days
    }

    /// Returns the number of calendar days in the month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    /// Returns the 0-100 performance score for this month.
    #[must_use]
    pub fn performance(&self) -> u8 {
        performance_score(self.active_days, self.days_in_month)
    }
}

/// Counts the days a staff member was active inside one month window.
///
/// `events` is the member's transition log up to the window's end, ordered by
/// timestamp ascending. The walk reconstructs which status was in effect
/// across the window and sums the active spans at calendar-day granularity,
/// rounding partial days up:
///
/// - With no events at all the member's status is treated as constant for the
///   whole window: full credit when created active, zero otherwise, and zero
///   for any window that ends before the member existed.
/// - A member created inside the window accrues from the creation instant,
///   starting in the creation status.
/// - When the member predates the window but no event falls at or before the
///   window start, the earliest fetched event's status stands in for the
///   unobserved prefix. This is a deliberate approximation: the true status
///   before the first known event is unrecorded.
/// - An in-progress month accrues only up to `now`; a month that has not
///   started yet projects the last-known status across the whole window.
///
/// Repeated identical statuses are treated as no-ops and out-of-order
/// timestamps collapse to empty spans, so a malformed log can never
/// double-count or underflow. The result is clamped to the month length.
#[must_use]
pub fn active_days_in_window(
    record: &StaffRecord,
    events: &[StatusEvent],
    window: MonthWindow,
    now: DateTime<Utc>,
) -> u32 {
    if events.is_empty() {
        if record.created_at() > window.end() {
            return 0;
        }
        return match record.initial_status() {
            StaffStatus::Active => window.days_in_month(),
            StaffStatus::Inactive => 0,
        };
    }

    let window_start = window.start();
    let (mut current_status, mut span_start) = if record.created_at() < window_start {
        (events[0].status(), window_start)
    } else {
        (record.initial_status(), record.created_at())
    };

    let mut active_days = 0;
    for event in events {
        if event.status() == current_status {
            // No-op transition: keep the earlier span start.
            continue;
        }
        if event.changed_at() > window.end() {
            break;
        }
        if event.changed_at() < window_start {
            current_status = event.status();
            span_start = event.changed_at();
            continue;
        }
        if current_status == StaffStatus::Active {
            active_days += days_between(span_start.max(window_start), event.changed_at());
        }
        current_status = event.status();
        span_start = event.changed_at();
    }

    if current_status == StaffStatus::Active {
        let accrual_end = if now < window_start {
            window.exclusive_end()
        } else {
            window.exclusive_end().min(now)
        };
        active_days += days_between(span_start.max(window_start), accrual_end);
    }

    active_days.min(window.days_in_month())
}

/// Converts an active-day count into a 0-100 performance percentage.
///
/// Rounds to the nearest whole point, halves away from zero. A zero-length
/// month scores zero rather than dividing by it.
#[must_use]
pub fn performance_score(active_days: u32, days_in_month: u32) -> u8 {
    if days_in_month == 0 {
        return 0;
    }
    let percentage = f64::from(active_days) / f64::from(days_in_month) * 100.0;
    percentage.round().clamp(0.0, 100.0) as u8
}

/// Whole days separating two instants, rounding any partial day up.
/// An end at or before the start yields zero rather than a negative span.
fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let elapsed = end.signed_duration_since(start).num_milliseconds();
    if elapsed <= 0 {
        return 0;
    }
    u32::try_from(elapsed.unsigned_abs().div_ceil(MILLISECONDS_PER_DAY)).unwrap_or(u32::MAX)
}

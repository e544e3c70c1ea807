//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod activity;
mod staff;

pub use activity::{
    MonthWindow, MonthlyActivity, StaffRecord, StatusEvent, active_days_in_window,
    performance_score,
};
pub use staff::{EmailAddress, PhoneNumber, StaffId, StaffMember, StaffMemberParts, StaffStatus};

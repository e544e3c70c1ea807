//! Application services and ports.

#![forbid(unsafe_code)]

mod staff_ports;
mod staff_service;

pub use staff_ports::{NewStaffInput, StaffRepository, StatusEventRepository};
pub use staff_service::StaffService;

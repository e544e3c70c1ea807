//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_staff_repository;
mod in_memory_status_event_repository;
mod postgres_staff_repository;
mod postgres_status_event_repository;

pub use in_memory_staff_repository::InMemoryStaffRepository;
pub use in_memory_status_event_repository::InMemoryStatusEventRepository;
pub use postgres_staff_repository::PostgresStaffRepository;
pub use postgres_status_event_repository::PostgresStatusEventRepository;

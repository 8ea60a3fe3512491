//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod events;
pub mod guardian;
pub mod postgres;

pub use events::{TracingEventSink, TracingJobQueue};
pub use guardian::RoleGuardian;
pub use postgres::{PostgresReviewableRepository, PostgresUserRepository};

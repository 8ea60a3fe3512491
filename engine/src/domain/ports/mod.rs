//! Domain ports (traits)
//!
//! Port traits define interfaces that the engine requires.
//! Adapters provide concrete implementations of these traits.

pub mod events;
pub mod guardian;
pub mod repositories;

pub use events::{DomainEvent, EventSink, Job, JobQueue, UserEmailType};
pub use guardian::Guardian;
pub use repositories::{
    ReviewableRepository, StatusTransaction, TargetWrites, UserRepository,
};

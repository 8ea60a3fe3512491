//! Domain entities
//!
//! Pure domain models for the review workflow.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod action;
pub mod reviewable;
pub mod scope;
pub mod status;
pub mod user;

pub use action::{ActionArgs, ActionId, ActionList, PerformResult, PerformStatus};
pub use reviewable::{
    NewReviewable, Reviewable, ReviewableId, ReviewableKind, TargetRef, TargetType,
};
pub use scope::{ReviewableFilter, VisibilityScope};
pub use status::ReviewableStatus;
pub use user::{GroupId, User, UserId};

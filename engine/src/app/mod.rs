//! Application layer
//!
//! The review engine: kind registration, action dispatch, visibility and
//! bulk actions, plus the built-in `ReviewableUser` kind.

pub mod bulk;
pub mod reviewable_service;
pub mod reviewable_type;
pub mod reviewable_user;
pub mod visibility;

pub use bulk::{BulkOutcome, BulkSummary};
pub use reviewable_service::ReviewableService;
pub use reviewable_type::{ActionBuilder, ActionHandler, ReviewableType, ReviewableTypeRegistry};
pub use reviewable_user::{ApproveUser, RejectUser, ReviewableUser};
pub use visibility::scope_for;

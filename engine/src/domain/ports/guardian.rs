//! Guardian port trait
//!
//! The capability oracle for one acting user. The engine asks it questions
//! and never decides policy itself.

use std::collections::HashSet;

use crate::domain::entities::{GroupId, TargetRef, UserId};

/// Permission answers for an acting user
pub trait Guardian: Send + Sync {
    /// The acting user
    fn user_id(&self) -> UserId;

    fn is_admin(&self) -> bool;

    /// Admins and moderators
    fn is_staff(&self) -> bool;

    /// Moderation groups the actor belongs to
    fn group_ids(&self) -> HashSet<GroupId>;

    fn can_approve(&self, target: &TargetRef) -> bool;

    fn can_delete_target(&self, target: &TargetRef) -> bool;
}

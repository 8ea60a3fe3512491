//! Role-based Guardian
//!
//! Answers capability questions from the acting user's role flags and
//! moderation-group membership.

use std::collections::HashSet;

use crate::domain::entities::{GroupId, TargetRef, TargetType, User, UserId};
use crate::domain::ports::{Guardian, UserRepository};
use crate::error::DomainError;

/// Guardian for a loaded user
#[derive(Debug, Clone)]
pub struct RoleGuardian {
    user_id: UserId,
    admin: bool,
    moderator: bool,
    group_ids: HashSet<GroupId>,
}

impl RoleGuardian {
    pub fn new(user: &User, group_ids: impl IntoIterator<Item = GroupId>) -> Self {
        Self {
            user_id: user.id,
            admin: user.admin,
            moderator: user.moderator,
            group_ids: group_ids.into_iter().collect(),
        }
    }

    /// Load the user and their groups from `users`
    pub async fn load<UR>(users: &UR, id: &UserId) -> Result<Self, DomainError>
    where
        UR: UserRepository + ?Sized,
    {
        let user = users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User {}", id)))?;
        let group_ids = users.group_ids(id).await?;

        Ok(Self::new(&user, group_ids))
    }

    fn is_self(&self, target: &TargetRef) -> bool {
        target.user_id() == Some(self.user_id)
    }
}

impl Guardian for RoleGuardian {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn is_admin(&self) -> bool {
        self.admin
    }

    fn is_staff(&self) -> bool {
        self.admin || self.moderator
    }

    fn group_ids(&self) -> HashSet<GroupId> {
        self.group_ids.clone()
    }

    fn can_approve(&self, target: &TargetRef) -> bool {
        match target.target_type {
            TargetType::User => self.is_staff() && !self.is_self(target),
            TargetType::Post => self.is_staff(),
        }
    }

    fn can_delete_target(&self, target: &TargetRef) -> bool {
        match target.target_type {
            // Staff can't delete themselves
            TargetType::User => self.is_staff() && !self.is_self(target),
            TargetType::Post => self.is_staff(),
        }
    }
}

//! User domain entity
//!
//! Users raise reviewables, act on them, and can be the moderated target
//! themselves (see `ReviewableUser`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a moderation group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub Uuid);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for GroupId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A forum user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub admin: bool,
    pub moderator: bool,
    pub approved: bool,
    pub approved_by_id: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    /// Number of posts authored; a user with posts cannot be destroyed
    pub post_count: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Admins and moderators
    pub fn is_staff(&self) -> bool {
        self.admin || self.moderator
    }

    /// Mark the user approved without saving.
    ///
    /// An existing approver or approval time is kept, so users approved on
    /// creation keep their original attribution.
    pub fn setup_approval(&mut self, approved_by: UserId) {
        self.approved = true;
        self.approved_by_id.get_or_insert(approved_by);
        self.approved_at.get_or_insert_with(Utc::now);
    }
}

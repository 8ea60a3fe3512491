//! Reviewable domain entity
//!
//! A reviewable is a pending moderation decision about some target (a user,
//! a post, ...). Its status only changes through the perform protocol in
//! `app::reviewable_service`.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::ReviewableStatus;
use super::user::{GroupId, UserId};
use crate::error::DomainError;

/// Unique identifier for a reviewable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewableId(pub Uuid);

impl ReviewableId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReviewableId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ReviewableId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ReviewableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag naming the concrete reviewable kind; the dispatch key for actions
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewableKind(Cow<'static, str>);

impl ReviewableKind {
    pub const USER: ReviewableKind = ReviewableKind::from_static("ReviewableUser");

    pub const fn from_static(kind: &'static str) -> Self {
        Self(Cow::Borrowed(kind))
    }

    pub fn new(kind: impl Into<String>) -> Self {
        Self(Cow::Owned(kind.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReviewableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type of the moderated target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    User,
    Post,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::User => write!(f, "user"),
            TargetType::Post => write!(f, "post"),
        }
    }
}

impl std::str::FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(TargetType::User),
            "post" => Ok(TargetType::Post),
            _ => Err(format!("Unknown target type: {}", s)),
        }
    }
}

/// Polymorphic reference to the moderated entity.
///
/// Referential only: the target is loaded and saved by its own store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub target_type: TargetType,
    pub id: Uuid,
}

impl TargetRef {
    pub fn user(id: UserId) -> Self {
        Self {
            target_type: TargetType::User,
            id: id.0,
        }
    }

    pub fn post(id: Uuid) -> Self {
        Self {
            target_type: TargetType::Post,
            id,
        }
    }

    /// The user id, when the target is a user
    pub fn user_id(&self) -> Option<UserId> {
        (self.target_type == TargetType::User).then_some(UserId(self.id))
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.target_type, self.id)
    }
}

/// A persisted moderation decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reviewable {
    pub id: ReviewableId,
    /// Set on creation, never changes
    pub kind: ReviewableKind,
    pub status: ReviewableStatus,
    pub target: TargetRef,
    /// Actor who raised the reviewable
    pub created_by_id: UserId,
    /// Visible to staff
    pub reviewable_by_moderator: bool,
    /// Visible to members of this group
    pub reviewable_by_group_id: Option<GroupId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reviewable {
    pub fn is(&self, status: ReviewableStatus) -> bool {
        self.status == status
    }

    pub fn is_pending(&self) -> bool {
        self.is(ReviewableStatus::Pending)
    }

    pub fn is_approved(&self) -> bool {
        self.is(ReviewableStatus::Approved)
    }

    pub fn is_rejected(&self) -> bool {
        self.is(ReviewableStatus::Rejected)
    }

    pub fn is_ignored(&self) -> bool {
        self.is(ReviewableStatus::Ignored)
    }

    pub fn is_deleted(&self) -> bool {
        self.is(ReviewableStatus::Deleted)
    }
}

/// Data needed to create a new reviewable
#[derive(Debug, Clone)]
pub struct NewReviewable {
    pub kind: ReviewableKind,
    pub target: TargetRef,
    pub created_by_id: Option<UserId>,
    pub reviewable_by_moderator: bool,
    pub reviewable_by_group_id: Option<GroupId>,
}

impl NewReviewable {
    pub fn new(kind: ReviewableKind, target: TargetRef, created_by_id: UserId) -> Self {
        Self {
            kind,
            target,
            created_by_id: Some(created_by_id),
            reviewable_by_moderator: false,
            reviewable_by_group_id: None,
        }
    }

    pub fn reviewable_by_moderator(mut self) -> Self {
        self.reviewable_by_moderator = true;
        self
    }

    pub fn reviewable_by_group(mut self, group_id: GroupId) -> Self {
        self.reviewable_by_group_id = Some(group_id);
        self
    }

    /// Check the presence invariants; returns the creator on success
    pub fn validate(&self) -> Result<UserId, DomainError> {
        if self.kind.as_str().is_empty() {
            return Err(DomainError::Validation(
                "reviewable kind can't be blank".to_string(),
            ));
        }
        self.created_by_id.ok_or_else(|| {
            DomainError::Validation(format!(
                "{} for {} has no created_by_id",
                self.kind, self.target
            ))
        })
    }
}

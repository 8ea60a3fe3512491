//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    GroupId, NewReviewable, Reviewable, ReviewableFilter, ReviewableId, ReviewableKind,
    ReviewableStatus, TargetRef, User, UserId, VisibilityScope,
};
use crate::error::{DestroyError, DomainError};

/// Repository for Reviewable entities
#[async_trait]
pub trait ReviewableRepository: Send + Sync {
    /// Find a reviewable by ID
    async fn find_by_id(&self, id: &ReviewableId) -> Result<Option<Reviewable>, DomainError>;

    /// Find the reviewable of a kind raised for a target
    async fn find_by_target(
        &self,
        kind: &ReviewableKind,
        target: &TargetRef,
    ) -> Result<Option<Reviewable>, DomainError>;

    /// Create a new reviewable in `pending` status.
    ///
    /// Fails with `DomainError::Validation` when `created_by_id` is missing.
    async fn create(&self, reviewable: &NewReviewable) -> Result<Reviewable, DomainError>;

    /// Reviewables inside `scope` matching `filter`, ordered by creation time then id
    async fn find_visible(
        &self,
        scope: &VisibilityScope,
        filter: &ReviewableFilter,
    ) -> Result<Vec<Reviewable>, DomainError>;

    /// Lock a reviewable for a status transition.
    ///
    /// Until the returned transaction is committed or dropped, no other
    /// transition on the same reviewable can begin.
    async fn begin_transition(
        &self,
        id: &ReviewableId,
    ) -> Result<Box<dyn StatusTransaction>, DomainError>;
}

/// An open, locked status transition on one reviewable.
///
/// Target writes made through it commit or roll back together with the
/// status. Dropping it without calling `commit` rolls back.
#[async_trait]
pub trait StatusTransaction: TargetWrites {
    /// The reviewable as read under the lock
    fn current(&self) -> &Reviewable;

    /// Target-store writes joined to this transaction
    fn writes(&mut self) -> &mut dyn TargetWrites;

    /// Write `status` (when given) and commit, returning the stored reviewable
    async fn commit(
        self: Box<Self>,
        status: Option<ReviewableStatus>,
    ) -> Result<Reviewable, DomainError>;
}

/// Writes to target stores made by action handlers
#[async_trait]
pub trait TargetWrites: Send {
    /// Persist the user's approval fields
    async fn save_user(&mut self, user: &User) -> Result<(), DomainError>;

    /// Destroy `user`; fails with `DestroyError::PostsExist` while the user has posts
    async fn destroy_user(
        &mut self,
        user: &User,
        performed_by: &UserId,
    ) -> Result<(), DestroyError>;
}

/// Target store for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Moderation groups the user belongs to
    async fn group_ids(&self, id: &UserId) -> Result<Vec<GroupId>, DomainError>;
}

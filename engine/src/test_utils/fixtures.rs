//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;

use crate::config::SiteSettings;
use crate::domain::entities::{
    NewReviewable, Reviewable, ReviewableId, ReviewableKind, ReviewableStatus, TargetRef, User,
    UserId,
};

/// Create a regular, unapproved test user without posts
pub fn test_user() -> User {
    let id = UserId::new();
    User {
        id,
        username: format!("user-{}", &id.0.simple().to_string()[..8]),
        admin: false,
        moderator: false,
        approved: false,
        approved_by_id: None,
        approved_at: None,
        post_count: 0,
        created_at: Utc::now(),
    }
}

/// Create an approved admin
pub fn test_admin() -> User {
    User {
        username: "admin".to_string(),
        admin: true,
        approved: true,
        ..test_user()
    }
}

/// Site settings with a fresh system user
pub fn test_settings(must_approve_users: bool) -> SiteSettings {
    SiteSettings {
        system_user_id: UserId::new(),
        must_approve_users,
    }
}

/// Kind registered by `scripted_registry`
pub fn test_kind() -> ReviewableKind {
    ReviewableKind::from_static("ReviewableTest")
}

/// New reviewable on a fresh user target, visible to nobody but admins
pub fn test_new_reviewable(kind: ReviewableKind) -> NewReviewable {
    NewReviewable::new(kind, TargetRef::user(UserId::new()), UserId::new())
}

/// Create an unpersisted test reviewable in `status`
pub fn test_reviewable(status: ReviewableStatus) -> Reviewable {
    test_reviewable_of(test_kind(), status, UserId::new())
}

/// Create an unpersisted moderator-visible reviewable
pub fn test_reviewable_of(
    kind: ReviewableKind,
    status: ReviewableStatus,
    created_by_id: UserId,
) -> Reviewable {
    Reviewable {
        id: ReviewableId::new(),
        kind,
        status,
        target: TargetRef::user(UserId::new()),
        created_by_id,
        reviewable_by_moderator: true,
        reviewable_by_group_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

//! Visibility scope and reviewable queries

use serde::Serialize;
use uuid::Uuid;

use super::reviewable::{Reviewable, ReviewableKind};
use super::status::ReviewableStatus;
use super::user::GroupId;

/// Which reviewables an actor may see
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum VisibilityScope {
    /// Administrators see everything
    All,
    /// Moderator-visible reviewables when `staff`, plus the actor's groups
    Restricted { staff: bool, group_ids: Vec<GroupId> },
}

impl VisibilityScope {
    pub fn permits(&self, reviewable: &Reviewable) -> bool {
        match self {
            VisibilityScope::All => true,
            VisibilityScope::Restricted { staff, group_ids } => {
                (reviewable.reviewable_by_moderator && *staff)
                    || reviewable
                        .reviewable_by_group_id
                        .is_some_and(|group| group_ids.contains(&group))
            }
        }
    }

    /// True when no reviewable can match, so storage need not be queried
    pub fn is_empty(&self) -> bool {
        match self {
            VisibilityScope::All => false,
            VisibilityScope::Restricted { staff, group_ids } => !staff && group_ids.is_empty(),
        }
    }
}

/// Narrowing applied on top of a visibility scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewableFilter {
    pub status: Option<ReviewableStatus>,
    pub kind: Option<ReviewableKind>,
    /// Matches target ids regardless of target type; combine with `kind`
    pub target_ids: Option<Vec<Uuid>>,
}

impl ReviewableFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: ReviewableStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn kind(mut self, kind: ReviewableKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn target_ids(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.target_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn matches(&self, reviewable: &Reviewable) -> bool {
        self.status.map_or(true, |s| reviewable.status == s)
            && self.kind.as_ref().map_or(true, |k| reviewable.kind == *k)
            && self
                .target_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&reviewable.target.id))
    }
}

//! Visibility
//!
//! Which reviewables an actor may see and act on, from role and
//! moderation-group membership.

use crate::app::reviewable_service::ReviewableService;
use crate::domain::entities::{Reviewable, ReviewableFilter, ReviewableStatus, VisibilityScope};
use crate::domain::ports::{Guardian, ReviewableRepository};
use crate::error::AppError;

/// The scope of reviewables visible to `guardian`
pub fn scope_for(guardian: &dyn Guardian) -> VisibilityScope {
    if guardian.is_admin() {
        return VisibilityScope::All;
    }

    let mut group_ids: Vec<_> = guardian.group_ids().into_iter().collect();
    group_ids.sort();
    VisibilityScope::Restricted {
        staff: guardian.is_staff(),
        group_ids,
    }
}

impl<RR> ReviewableService<RR>
where
    RR: ReviewableRepository,
{
    /// Reviewables `guardian` may see, narrowed by `filter`
    pub async fn viewable_by(
        &self,
        guardian: &dyn Guardian,
        filter: &ReviewableFilter,
    ) -> Result<Vec<Reviewable>, AppError> {
        let scope = scope_for(guardian);
        if scope.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.reviewables.find_visible(&scope, filter).await?)
    }

    /// The moderation queue: pending reviewables visible to `guardian`
    pub async fn list_for(
        &self,
        guardian: Option<&dyn Guardian>,
    ) -> Result<Vec<Reviewable>, AppError> {
        self.list_for_status(guardian, ReviewableStatus::Pending)
            .await
    }

    /// Reviewables in `status` visible to `guardian`; empty without an actor
    pub async fn list_for_status(
        &self,
        guardian: Option<&dyn Guardian>,
        status: ReviewableStatus,
    ) -> Result<Vec<Reviewable>, AppError> {
        let Some(guardian) = guardian else {
            return Ok(Vec::new());
        };
        self.viewable_by(guardian, &ReviewableFilter::new().status(status))
            .await
    }
}

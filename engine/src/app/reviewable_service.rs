//! Reviewable service
//!
//! Builds action lists and runs the perform protocol: authorize, resolve the
//! handler, run it under a locked status transaction, apply the transition.

use std::sync::Arc;

use crate::app::reviewable_type::ReviewableTypeRegistry;
use crate::domain::entities::{
    ActionArgs, ActionId, ActionList, NewReviewable, PerformResult, Reviewable, ReviewableId,
    ReviewableKind, TargetRef,
};
use crate::domain::ports::{Guardian, ReviewableRepository};
use crate::error::AppError;

/// Service running actions on reviewables
pub struct ReviewableService<RR>
where
    RR: ReviewableRepository,
{
    pub(crate) reviewables: Arc<RR>,
    types: Arc<ReviewableTypeRegistry>,
}

impl<RR> ReviewableService<RR>
where
    RR: ReviewableRepository,
{
    pub fn new(reviewables: Arc<RR>, types: Arc<ReviewableTypeRegistry>) -> Self {
        Self { reviewables, types }
    }

    pub fn types(&self) -> &ReviewableTypeRegistry {
        &self.types
    }

    /// Create a reviewable in `pending` status
    pub async fn create(&self, reviewable: &NewReviewable) -> Result<Reviewable, AppError> {
        let created = self.reviewables.create(reviewable).await?;
        tracing::info!(
            reviewable_id = %created.id,
            kind = %created.kind,
            target = %created.target,
            "Reviewable created"
        );
        Ok(created)
    }

    /// Find a reviewable by ID
    pub async fn find_by_id(&self, id: &ReviewableId) -> Result<Option<Reviewable>, AppError> {
        Ok(self.reviewables.find_by_id(id).await?)
    }

    /// Find the reviewable of `kind` raised for `target`
    pub async fn find_by_target(
        &self,
        kind: &ReviewableKind,
        target: &TargetRef,
    ) -> Result<Option<Reviewable>, AppError> {
        Ok(self.reviewables.find_by_target(kind, target).await?)
    }

    /// Actions `guardian` may currently take on `reviewable`.
    ///
    /// Rebuilt on every call. A kind without a registration offers nothing.
    pub fn actions_for(
        &self,
        reviewable: &Reviewable,
        guardian: &dyn Guardian,
        args: Option<&ActionArgs>,
    ) -> ActionList {
        let empty = ActionArgs::default();
        let args = args.unwrap_or(&empty);
        let mut actions = ActionList::new(reviewable.id);

        match self.types.get(&reviewable.kind) {
            Some(reviewable_type) => {
                reviewable_type
                    .builder()
                    .build_actions(&mut actions, reviewable, guardian, args);
            }
            None => {
                tracing::warn!(
                    reviewable_id = %reviewable.id,
                    kind = %reviewable.kind,
                    "No reviewable type registered for kind"
                );
            }
        }

        actions
    }

    /// Perform `action` on `reviewable` as `performed_by`.
    ///
    /// On success `reviewable` is replaced with the stored row. Callers must
    /// check `PerformResult::is_success` before assuming a transition.
    pub async fn perform(
        &self,
        reviewable: &mut Reviewable,
        performed_by: &dyn Guardian,
        action: &ActionId,
        args: Option<&ActionArgs>,
    ) -> Result<PerformResult, AppError> {
        let empty = ActionArgs::default();
        let args = args.unwrap_or(&empty);

        if !self
            .actions_for(reviewable, performed_by, Some(args))
            .has(action)
        {
            return Err(self.access_denied(reviewable, performed_by, action));
        }

        let handler = self
            .types
            .get(&reviewable.kind)
            .and_then(|t| t.handler(action))
            .ok_or_else(|| {
                tracing::error!(
                    reviewable_id = %reviewable.id,
                    kind = %reviewable.kind,
                    action = %action,
                    "Action offered without a bound handler"
                );
                AppError::InvalidAction {
                    action: action.clone(),
                    kind: reviewable.kind.clone(),
                }
            })?;

        let mut transaction = self.reviewables.begin_transition(&reviewable.id).await?;

        // The caller's copy may be stale; authorize again against the locked row.
        let locked = transaction.current().clone();
        if !self
            .actions_for(&locked, performed_by, Some(args))
            .has(action)
        {
            return Err(self.access_denied(&locked, performed_by, action));
        }

        // An error here drops the transaction, rolling back target writes too
        let result = handler
            .perform(&locked, performed_by, args, transaction.writes())
            .await?;
        let transition = result.applied_transition();
        let stored = transaction.commit(transition).await?;

        if result.is_success() {
            handler.after_commit(&stored, performed_by, args).await;
        }

        match transition {
            Some(status) => tracing::info!(
                reviewable_id = %stored.id,
                kind = %stored.kind,
                action = %action,
                performed_by = %performed_by.user_id(),
                from = %locked.status,
                to = %status,
                "Reviewable transitioned"
            ),
            None => tracing::debug!(
                reviewable_id = %stored.id,
                action = %action,
                success = result.is_success(),
                "Action performed without transition"
            ),
        }

        *reviewable = stored;
        Ok(result)
    }

    fn access_denied(
        &self,
        reviewable: &Reviewable,
        performed_by: &dyn Guardian,
        action: &ActionId,
    ) -> AppError {
        tracing::warn!(
            reviewable_id = %reviewable.id,
            kind = %reviewable.kind,
            status = %reviewable.status,
            action = %action,
            performed_by = %performed_by.user_id(),
            "Action not permitted"
        );
        AppError::AccessDenied {
            action: action.clone(),
            kind: reviewable.kind.clone(),
        }
    }
}

//! Bulk actions
//!
//! Runs one action across the visible reviewables of a kind for a set of
//! targets. Every item runs the single-item perform protocol on its own.

use serde::Serialize;
use uuid::Uuid;

use crate::app::reviewable_service::ReviewableService;
use crate::domain::entities::{
    ActionArgs, ActionId, PerformResult, ReviewableFilter, ReviewableId, ReviewableKind,
    TargetRef,
};
use crate::domain::ports::{Guardian, ReviewableRepository};
use crate::error::AppError;

/// Outcome for one reviewable in a bulk run
#[derive(Debug)]
pub struct BulkOutcome {
    pub reviewable_id: ReviewableId,
    pub target: TargetRef,
    pub result: Result<PerformResult, AppError>,
}

impl BulkOutcome {
    /// True when the item's status changed
    pub fn transitioned(&self) -> bool {
        self.result
            .as_ref()
            .is_ok_and(|r| r.applied_transition().is_some())
    }
}

/// Counts over a bulk run, for logging and reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkSummary {
    pub attempted: usize,
    pub transitioned: usize,
    pub failed: usize,
    pub errored: usize,
}

impl BulkSummary {
    pub fn of(outcomes: &[BulkOutcome]) -> Self {
        outcomes.iter().fold(
            BulkSummary {
                attempted: outcomes.len(),
                ..Default::default()
            },
            |mut summary, outcome| {
                match &outcome.result {
                    Ok(result) if result.is_failed() => summary.failed += 1,
                    Ok(_) => {}
                    Err(_) => summary.errored += 1,
                }
                if outcome.transitioned() {
                    summary.transitioned += 1;
                }
                summary
            },
        )
    }
}

impl<RR> ReviewableService<RR>
where
    RR: ReviewableRepository,
{
    /// Perform `action` on every reviewable of `kind` targeting one of
    /// `target_ids` that `performed_by` can see.
    ///
    /// One item failing never stops the rest; each outcome is reported in
    /// (created_at, id) order. Only the candidate lookup itself can fail.
    pub async fn bulk_perform(
        &self,
        performed_by: &dyn Guardian,
        action: &ActionId,
        kind: &ReviewableKind,
        target_ids: &[Uuid],
        args: Option<&ActionArgs>,
    ) -> Result<Vec<BulkOutcome>, AppError> {
        let filter = ReviewableFilter::new()
            .kind(kind.clone())
            .target_ids(target_ids.iter().copied());
        let candidates = self.viewable_by(performed_by, &filter).await?;

        let mut outcomes = Vec::with_capacity(candidates.len());
        for mut reviewable in candidates {
            let reviewable_id = reviewable.id;
            let target = reviewable.target;
            let result = self
                .perform(&mut reviewable, performed_by, action, args)
                .await;

            if let Err(e) = &result {
                tracing::warn!(
                    error = %e,
                    reviewable_id = %reviewable_id,
                    action = %action,
                    "Bulk action failed for reviewable"
                );
            }

            outcomes.push(BulkOutcome {
                reviewable_id,
                target,
                result,
            });
        }

        let summary = BulkSummary::of(&outcomes);
        tracing::info!(
            action = %action,
            kind = %kind,
            performed_by = %performed_by.user_id(),
            attempted = summary.attempted,
            transitioned = summary.transitioned,
            failed = summary.failed,
            errored = summary.errored,
            "Bulk action finished"
        );

        Ok(outcomes)
    }
}

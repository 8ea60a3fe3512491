//! ReviewableUser kind
//!
//! A new account waiting for staff approval. Approving marks the user
//! approved and may send the signup email; rejecting destroys the account
//! unless it already has posts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::reviewable_type::{ActionBuilder, ActionHandler, ReviewableType};
use crate::config::SiteSettings;
use crate::domain::entities::{
    ActionArgs, ActionId, ActionList, NewReviewable, PerformResult, Reviewable, ReviewableKind,
    ReviewableStatus, TargetRef, User,
};
use crate::domain::ports::{
    DomainEvent, EventSink, Guardian, Job, JobQueue, ReviewableRepository, TargetWrites,
    UserEmailType, UserRepository,
};
use crate::error::{DestroyError, DomainError};

/// Argument letting invited users be approved without the approve capability
pub const APPROVED_BY_INVITE: &str = "approved_by_invite";
/// Argument asking for the signup-after-approval email
pub const SEND_EMAIL: &str = "send_email";

/// Reviewable kind for users awaiting approval
pub struct ReviewableUser;

impl ReviewableUser {
    pub const KIND: ReviewableKind = ReviewableKind::USER;

    /// New pending reviewable for `user`, raised by the system user
    pub fn new_for(user: &User, settings: &SiteSettings) -> NewReviewable {
        NewReviewable::new(Self::KIND, TargetRef::user(user.id), settings.system_user_id)
            .reviewable_by_moderator()
    }

    /// Create the pending reviewable for `user`
    pub async fn create_for<RR>(
        reviewables: &RR,
        user: &User,
        settings: &SiteSettings,
    ) -> Result<Reviewable, DomainError>
    where
        RR: ReviewableRepository + ?Sized,
    {
        let reviewable = reviewables.create(&Self::new_for(user, settings)).await?;
        tracing::info!(
            reviewable_id = %reviewable.id,
            user_id = %user.id,
            "User queued for approval"
        );
        Ok(reviewable)
    }

    /// The reviewable raised for `user`, if any
    pub async fn find_for<RR>(reviewables: &RR, user: &User) -> Result<Option<Reviewable>, DomainError>
    where
        RR: ReviewableRepository + ?Sized,
    {
        reviewables
            .find_by_target(&Self::KIND, &TargetRef::user(user.id))
            .await
    }

    /// Assemble the kind with its handlers
    pub fn reviewable_type<UR, ES, JQ>(
        users: Arc<UR>,
        events: Arc<ES>,
        jobs: Arc<JQ>,
        settings: SiteSettings,
    ) -> ReviewableType
    where
        UR: UserRepository + 'static,
        ES: EventSink + 'static,
        JQ: JobQueue + 'static,
    {
        ReviewableType::new(Self::KIND, Arc::new(ReviewableUser))
            .with_handler(
                ActionId::APPROVE,
                Arc::new(ApproveUser {
                    users: users.clone(),
                    events,
                    jobs,
                    settings,
                }),
            )
            .with_handler(ActionId::REJECT, Arc::new(RejectUser { users }))
    }
}

impl ActionBuilder for ReviewableUser {
    fn build_actions(
        &self,
        actions: &mut ActionList,
        reviewable: &Reviewable,
        guardian: &dyn Guardian,
        args: &ActionArgs,
    ) {
        if !reviewable.is_pending() {
            return;
        }

        if guardian.can_approve(&reviewable.target) || args.flag(APPROVED_BY_INVITE) {
            actions.add(ActionId::APPROVE);
        }
        if guardian.can_delete_target(&reviewable.target) {
            actions.add(ActionId::REJECT);
        }
    }
}

async fn load_target<UR>(users: &UR, reviewable: &Reviewable) -> Result<User, DomainError>
where
    UR: UserRepository + ?Sized,
{
    let user_id = reviewable.target.user_id().ok_or_else(|| {
        DomainError::Validation(format!(
            "{} {} targets {}, expected a user",
            reviewable.kind, reviewable.id, reviewable.target
        ))
    })?;

    users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("User {}", user_id)))
}

/// Approves the target user
pub struct ApproveUser<UR, ES, JQ> {
    users: Arc<UR>,
    events: Arc<ES>,
    jobs: Arc<JQ>,
    settings: SiteSettings,
}

#[async_trait]
impl<UR, ES, JQ> ActionHandler for ApproveUser<UR, ES, JQ>
where
    UR: UserRepository,
    ES: EventSink,
    JQ: JobQueue,
{
    async fn perform(
        &self,
        reviewable: &Reviewable,
        performed_by: &dyn Guardian,
        _args: &ActionArgs,
        writes: &mut dyn TargetWrites,
    ) -> Result<PerformResult, DomainError> {
        let mut user = load_target(self.users.as_ref(), reviewable).await?;

        user.setup_approval(performed_by.user_id());
        writes.save_user(&user).await?;

        Ok(PerformResult::transition(ReviewableStatus::Approved))
    }

    async fn after_commit(
        &self,
        reviewable: &Reviewable,
        performed_by: &dyn Guardian,
        args: &ActionArgs,
    ) {
        let Some(user_id) = reviewable.target.user_id() else {
            return;
        };

        self.events
            .trigger(DomainEvent::UserApproved {
                user_id,
                approved_by: performed_by.user_id(),
            })
            .await;

        if args.flag(SEND_EMAIL) && self.settings.must_approve_users {
            let job = Job::CriticalUserEmail {
                email_type: UserEmailType::SignupAfterApproval,
                user_id,
            };
            if let Err(e) = self.jobs.enqueue(job).await {
                tracing::warn!(error = %e, user_id = %user_id, "Failed to enqueue approval email");
            }
        }
    }
}

/// Rejects the target user by destroying the account
pub struct RejectUser<UR> {
    users: Arc<UR>,
}

#[async_trait]
impl<UR> ActionHandler for RejectUser<UR>
where
    UR: UserRepository,
{
    async fn perform(
        &self,
        reviewable: &Reviewable,
        performed_by: &dyn Guardian,
        _args: &ActionArgs,
        writes: &mut dyn TargetWrites,
    ) -> Result<PerformResult, DomainError> {
        let user = load_target(self.users.as_ref(), reviewable).await?;

        match writes.destroy_user(&user, &performed_by.user_id()).await {
            Ok(()) => Ok(PerformResult::transition(ReviewableStatus::Rejected)),
            Err(DestroyError::PostsExist) => {
                tracing::info!(
                    user_id = %user.id,
                    reviewable_id = %reviewable.id,
                    "User has posts, rejection refused"
                );
                Ok(PerformResult::fail())
            }
            Err(DestroyError::Domain(e)) => Err(e),
        }
    }
}

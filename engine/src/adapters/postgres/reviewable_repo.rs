//! PostgreSQL adapter for ReviewableRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::entities::{
    GroupId, NewReviewable, Reviewable, ReviewableFilter, ReviewableId, ReviewableKind,
    ReviewableStatus, TargetRef, User, UserId, VisibilityScope,
};
use crate::domain::ports::{ReviewableRepository, StatusTransaction, TargetWrites};
use crate::entity::reviewables;
use crate::error::{DestroyError, DomainError};

use super::user_repo;

/// PostgreSQL implementation of ReviewableRepository
pub struct PostgresReviewableRepository {
    db: DatabaseConnection,
}

impl PostgresReviewableRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewableRepository for PostgresReviewableRepository {
    async fn find_by_id(&self, id: &ReviewableId) -> Result<Option<Reviewable>, DomainError> {
        let result = reviewables::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Reviewable::try_from).transpose()
    }

    async fn find_by_target(
        &self,
        kind: &ReviewableKind,
        target: &TargetRef,
    ) -> Result<Option<Reviewable>, DomainError> {
        let result = reviewables::Entity::find()
            .filter(reviewables::Column::Kind.eq(kind.as_str()))
            .filter(reviewables::Column::TargetType.eq(target.target_type.to_string()))
            .filter(reviewables::Column::TargetId.eq(target.id))
            .order_by_desc(reviewables::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.map(Reviewable::try_from).transpose()
    }

    async fn create(&self, reviewable: &NewReviewable) -> Result<Reviewable, DomainError> {
        let created_by = reviewable.validate()?;
        let now = Utc::now().fixed_offset();

        let model = reviewables::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(reviewable.kind.as_str().to_string()),
            status: Set(ReviewableStatus::Pending.id()),
            target_type: Set(reviewable.target.target_type.to_string()),
            target_id: Set(reviewable.target.id),
            created_by_id: Set(Some(created_by.0)),
            reviewable_by_moderator: Set(reviewable.reviewable_by_moderator),
            reviewable_by_group_id: Set(reviewable.reviewable_by_group_id.map(|g| g.0)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.try_into()
    }

    async fn find_visible(
        &self,
        scope: &VisibilityScope,
        filter: &ReviewableFilter,
    ) -> Result<Vec<Reviewable>, DomainError> {
        if scope.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = reviewables::Entity::find();

        if let VisibilityScope::Restricted { staff, group_ids } = scope {
            let mut visible = Condition::any();
            if *staff {
                visible = visible.add(reviewables::Column::ReviewableByModerator.eq(true));
            }
            if !group_ids.is_empty() {
                visible = visible.add(
                    reviewables::Column::ReviewableByGroupId
                        .is_in(group_ids.iter().map(|g| g.0)),
                );
            }
            query = query.filter(visible);
        }

        if let Some(status) = filter.status {
            query = query.filter(reviewables::Column::Status.eq(status.id()));
        }
        if let Some(kind) = &filter.kind {
            query = query.filter(reviewables::Column::Kind.eq(kind.as_str()));
        }
        if let Some(target_ids) = &filter.target_ids {
            if target_ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(reviewables::Column::TargetId.is_in(target_ids.iter().copied()));
        }

        let results = query
            .order_by_asc(reviewables::Column::CreatedAt)
            .order_by_asc(reviewables::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Reviewable::try_from).collect()
    }

    async fn begin_transition(
        &self,
        id: &ReviewableId,
    ) -> Result<Box<dyn StatusTransaction>, DomainError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        // SELECT ... FOR UPDATE: concurrent transitions on this row wait here
        let model = reviewables::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("Reviewable {}", id)))?;

        Ok(Box::new(PostgresStatusTransaction {
            txn,
            current: model.try_into()?,
        }))
    }
}

/// Row-locked transition; rolls back when dropped uncommitted
struct PostgresStatusTransaction {
    txn: DatabaseTransaction,
    current: Reviewable,
}

#[async_trait]
impl TargetWrites for PostgresStatusTransaction {
    async fn save_user(&mut self, user: &User) -> Result<(), DomainError> {
        user_repo::save_user(&self.txn, user).await
    }

    async fn destroy_user(
        &mut self,
        user: &User,
        performed_by: &UserId,
    ) -> Result<(), DestroyError> {
        user_repo::destroy_user(&self.txn, user, performed_by).await
    }
}

#[async_trait]
impl StatusTransaction for PostgresStatusTransaction {
    fn current(&self) -> &Reviewable {
        &self.current
    }

    fn writes(&mut self) -> &mut dyn TargetWrites {
        self
    }

    async fn commit(
        self: Box<Self>,
        status: Option<ReviewableStatus>,
    ) -> Result<Reviewable, DomainError> {
        let PostgresStatusTransaction { txn, current } = *self;

        let stored = match status {
            Some(status) => {
                let updated = reviewables::ActiveModel {
                    id: Set(current.id.0),
                    status: Set(status.id()),
                    updated_at: Set(Utc::now().fixed_offset()),
                    ..Default::default()
                }
                .update(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
                Reviewable::try_from(updated)?
            }
            None => current,
        };

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(stored)
    }
}

/// Convert SeaORM model to domain entity.
///
/// Rows breaking the reviewable invariants are rejected, never repaired.
impl TryFrom<reviewables::Model> for Reviewable {
    type Error = DomainError;

    fn try_from(model: reviewables::Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let invalid = move |what: String| {
            DomainError::Validation(format!("reviewable {}: {}", id, what))
        };

        let status = ReviewableStatus::try_from(model.status).map_err(invalid)?;
        let target_type = model.target_type.parse().map_err(invalid)?;
        let created_by_id = model
            .created_by_id
            .ok_or_else(|| invalid("created_by_id can't be blank".to_string()))?;

        Ok(Reviewable {
            id: ReviewableId(model.id),
            kind: ReviewableKind::new(model.kind),
            status,
            target: TargetRef {
                target_type,
                id: model.target_id,
            },
            created_by_id: UserId(created_by_id),
            reviewable_by_moderator: model.reviewable_by_moderator,
            reviewable_by_group_id: model.reviewable_by_group_id.map(GroupId),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

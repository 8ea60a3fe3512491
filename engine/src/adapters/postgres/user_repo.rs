//! PostgreSQL adapter for UserRepository
//!
//! User writes (`save_user`, `destroy_user`) take any connection so the
//! status transaction can run them on its own `DatabaseTransaction`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, Set,
};

use crate::domain::entities::{GroupId, User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::{group_users, users};
use crate::error::{DestroyError, DomainError};

/// PostgreSQL implementation of the user target store
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn group_ids(&self, id: &UserId) -> Result<Vec<GroupId>, DomainError> {
        let results = group_users::Entity::find()
            .filter(group_users::Column::UserId.eq(id.0))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| GroupId(m.group_id)).collect())
    }
}

/// Persist the approval fields of `user`
pub(super) async fn save_user<C: ConnectionTrait>(conn: &C, user: &User) -> Result<(), DomainError> {
    users::ActiveModel {
        id: Set(user.id.0),
        approved: Set(user.approved),
        approved_by_id: Set(user.approved_by_id.map(|u| u.0)),
        approved_at: Set(user.approved_at.map(|t| t.fixed_offset())),
        ..Default::default()
    }
    .update(conn)
    .await
    .map_err(|e| DomainError::Database(e.to_string()))?;

    Ok(())
}

/// Delete `user` and its group memberships unless it owns posts
pub(super) async fn destroy_user<C: ConnectionTrait>(
    conn: &C,
    user: &User,
    performed_by: &UserId,
) -> Result<(), DestroyError> {
    // Re-read on the caller's connection; its copy may predate new posts.
    let model = users::Entity::find_by_id(user.id.0)
        .one(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?
        .ok_or_else(|| DomainError::NotFound(format!("User {}", user.id)))?;

    if model.post_count > 0 {
        return Err(DestroyError::PostsExist);
    }

    group_users::Entity::delete_many()
        .filter(group_users::Column::UserId.eq(user.id.0))
        .exec(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;
    model
        .delete(conn)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

    tracing::info!(user_id = %user.id, destroyed_by = %performed_by, "User destroyed");
    Ok(())
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            username: model.username,
            admin: model.admin,
            moderator: model.moderator,
            approved: model.approved,
            approved_by_id: model.approved_by_id.map(UserId),
            approved_at: model.approved_at.map(|dt| dt.with_timezone(&Utc)),
            post_count: model.post_count,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

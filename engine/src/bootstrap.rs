//! Engine assembly
//!
//! Connects to PostgreSQL, builds the adapters and registers the built-in
//! reviewable kinds.

use std::sync::Arc;

use sea_orm::{Database, DatabaseConnection, DbErr};
use thiserror::Error;

use crate::adapters::{
    PostgresReviewableRepository, PostgresUserRepository, RoleGuardian, TracingEventSink,
    TracingJobQueue,
};
use crate::app::{ReviewableService, ReviewableTypeRegistry, ReviewableUser};
use crate::config::{Config, SiteSettings};
use crate::domain::entities::UserId;
use crate::error::DomainError;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to connect to database")]
    Connect(#[source] DbErr),
}

/// The assembled engine backed by PostgreSQL
pub struct Engine {
    pub reviewables: ReviewableService<PostgresReviewableRepository>,
    pub users: Arc<PostgresUserRepository>,
    pub settings: SiteSettings,
}

impl Engine {
    /// Guardian for the acting user
    pub async fn guardian_for(&self, user_id: &UserId) -> Result<RoleGuardian, DomainError> {
        RoleGuardian::load(self.users.as_ref(), user_id).await
    }
}

/// Connect and assemble the engine
pub async fn connect(config: &Config) -> Result<Engine, BootstrapError> {
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .map_err(BootstrapError::Connect)?;
    tracing::info!("Database connected");

    Ok(assemble(db, config.site_settings()))
}

/// Assemble the engine over an open connection
pub fn assemble(db: DatabaseConnection, settings: SiteSettings) -> Engine {
    let reviewable_repo = Arc::new(PostgresReviewableRepository::new(db.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(db));

    let types = ReviewableTypeRegistry::new().register(ReviewableUser::reviewable_type(
        user_repo.clone(),
        Arc::new(TracingEventSink),
        Arc::new(TracingJobQueue),
        settings.clone(),
    ));
    tracing::debug!(kinds = types.kinds().count(), "Reviewable kinds registered");

    Engine {
        reviewables: ReviewableService::new(reviewable_repo, Arc::new(types)),
        users: user_repo,
        settings,
    }
}

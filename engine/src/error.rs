//! Unified error types for the reviewable engine
//!
//! This module defines error types for each layer:
//! - `DomainError`: Persistence and target-store errors raised by ports
//! - `DestroyError`: Outcome of destroying a user target
//! - `AppError`: Hard failures surfaced by the engine (`perform`, `bulk_perform`, ...)
//! - `ConfigError`: Environment configuration errors

use thiserror::Error;

use crate::domain::entities::{ActionId, ReviewableKind};

/// Domain layer errors - raised by repositories and other ports
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from destroying a user target
#[derive(Debug, Error)]
pub enum DestroyError {
    /// The user still owns posts and cannot be removed
    #[error("User has posts and cannot be destroyed")]
    PostsExist,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Engine errors - the only failures that escape `perform`
///
/// Business outcomes (e.g. a rejected user still owning posts) are never
/// reported here; they come back as a failed `PerformResult`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Can't perform `{action}` on {kind}")]
    AccessDenied {
        action: ActionId,
        kind: ReviewableKind,
    },

    #[error("Invalid reviewable action `{action}` on {kind}")]
    InvalidAction {
        action: ActionId,
        kind: ReviewableKind,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    pub fn is_access_denied(&self) -> bool {
        matches!(self, AppError::AccessDenied { .. })
    }

    pub fn is_invalid_action(&self) -> bool {
        matches!(self, AppError::InvalidAction { .. })
    }

    /// Storage or invariant failure while reading or writing state
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, AppError::Domain(_))
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

//! Event and job port traits
//!
//! Handlers emit domain events and enqueue background jobs through these
//! ports. Both are fire-and-forget from the engine's point of view.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::UserId;
use crate::error::DomainError;

/// Extensibility events triggered by action handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    UserApproved { user_id: UserId, approved_by: UserId },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::UserApproved { .. } => "user_approved",
        }
    }
}

/// Kinds of critical user email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEmailType {
    SignupAfterApproval,
}

/// Background jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum Job {
    CriticalUserEmail {
        email_type: UserEmailType,
        user_id: UserId,
    },
}

/// Sink for domain events
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Trigger an event; listeners are not awaited by the engine
    async fn trigger(&self, event: DomainEvent);
}

/// Queue for background jobs
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: Job) -> Result<(), DomainError>;
}

//! Tracing-backed event sink and job queue
//!
//! Used when the host application has not wired its own listeners or job
//! runner. Both record what would have happened in the log.

use async_trait::async_trait;

use crate::domain::ports::{DomainEvent, EventSink, Job, JobQueue};
use crate::error::DomainError;

/// Logs every triggered event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn trigger(&self, event: DomainEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => tracing::debug!(event = event.name(), %payload, "Event triggered"),
            Err(e) => tracing::warn!(error = %e, event = event.name(), "Failed to encode event"),
        }
    }
}

/// Logs every enqueued job without running it
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingJobQueue;

#[async_trait]
impl JobQueue for TracingJobQueue {
    async fn enqueue(&self, job: Job) -> Result<(), DomainError> {
        let payload =
            serde_json::to_string(&job).map_err(|e| DomainError::Internal(e.to_string()))?;
        tracing::debug!(%payload, "Job enqueued");
        Ok(())
    }
}

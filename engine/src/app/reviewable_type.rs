//! Reviewable kinds
//!
//! Each concrete kind plugs into the engine through an `ActionBuilder`
//! (which actions are offered) and one `ActionHandler` per action id.
//! Kinds are registered once, when the engine is assembled.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{ActionArgs, ActionId, ActionList, PerformResult, Reviewable, ReviewableKind};
use crate::domain::ports::{Guardian, TargetWrites};
use crate::error::DomainError;

/// Lists the actions a kind offers
pub trait ActionBuilder: Send + Sync {
    /// Add the actions `guardian` may take on `reviewable` to `actions`
    fn build_actions(
        &self,
        actions: &mut ActionList,
        reviewable: &Reviewable,
        guardian: &dyn Guardian,
        args: &ActionArgs,
    );
}

/// Performs one action
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Business-rule failures must come back as `Ok(PerformResult::fail())`;
    /// `Err` is reserved for storage failures.
    ///
    /// Target changes go through `writes` so they commit with the status.
    async fn perform(
        &self,
        reviewable: &Reviewable,
        performed_by: &dyn Guardian,
        args: &ActionArgs,
        writes: &mut dyn TargetWrites,
    ) -> Result<PerformResult, DomainError>;

    /// Runs once a successful action has been committed; events and jobs go here
    async fn after_commit(
        &self,
        _reviewable: &Reviewable,
        _performed_by: &dyn Guardian,
        _args: &ActionArgs,
    ) {
    }
}

/// A kind's builder and handlers
pub struct ReviewableType {
    kind: ReviewableKind,
    builder: Arc<dyn ActionBuilder>,
    handlers: HashMap<ActionId, Arc<dyn ActionHandler>>,
}

impl ReviewableType {
    pub fn new(kind: ReviewableKind, builder: Arc<dyn ActionBuilder>) -> Self {
        Self {
            kind,
            builder,
            handlers: HashMap::new(),
        }
    }

    /// Bind the handler for `action`
    pub fn with_handler(mut self, action: ActionId, handler: Arc<dyn ActionHandler>) -> Self {
        self.handlers.insert(action, handler);
        self
    }

    pub fn kind(&self) -> &ReviewableKind {
        &self.kind
    }

    pub fn builder(&self) -> &dyn ActionBuilder {
        self.builder.as_ref()
    }

    pub fn handler(&self, action: &ActionId) -> Option<&dyn ActionHandler> {
        self.handlers.get(action).map(|h| h.as_ref())
    }
}

/// All kinds known to the engine, keyed by kind tag
#[derive(Default)]
pub struct ReviewableTypeRegistry {
    types: HashMap<ReviewableKind, ReviewableType>,
}

impl ReviewableTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind, replacing any earlier registration of the same tag
    pub fn register(mut self, reviewable_type: ReviewableType) -> Self {
        if self
            .types
            .insert(reviewable_type.kind.clone(), reviewable_type)
            .is_some()
        {
            tracing::warn!("Reviewable kind registered twice, keeping the last one");
        }
        self
    }

    pub fn get(&self, kind: &ReviewableKind) -> Option<&ReviewableType> {
        self.types.get(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &ReviewableKind> {
        self.types.keys()
    }
}

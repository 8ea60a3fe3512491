//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

use crate::app::{ActionBuilder, ActionHandler, ReviewableType, ReviewableTypeRegistry};
use crate::domain::entities::{
    ActionArgs, ActionId, ActionList, GroupId, NewReviewable, PerformResult, Reviewable,
    ReviewableFilter, ReviewableId, ReviewableKind, ReviewableStatus, TargetRef, User, UserId,
    VisibilityScope,
};
use crate::domain::ports::{
    DomainEvent, EventSink, Guardian, Job, JobQueue, ReviewableRepository, StatusTransaction,
    TargetWrites, UserRepository,
};
use crate::error::{DestroyError, DomainError};

use super::fixtures::test_kind;

// ============================================================================
// Mock Guardian
// ============================================================================

/// Guardian with fixed answers
#[derive(Debug, Clone)]
pub struct MockGuardian {
    user_id: UserId,
    admin: bool,
    staff: bool,
    group_ids: HashSet<GroupId>,
}

impl MockGuardian {
    pub fn admin() -> Self {
        Self {
            user_id: UserId::new(),
            admin: true,
            staff: true,
            group_ids: HashSet::new(),
        }
    }

    pub fn moderator() -> Self {
        Self {
            admin: false,
            ..Self::admin()
        }
    }

    /// A regular user: no capabilities, no groups
    pub fn member() -> Self {
        Self {
            admin: false,
            staff: false,
            ..Self::admin()
        }
    }

    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_ids.insert(group_id);
        self
    }

    pub fn as_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }
}

impl Guardian for MockGuardian {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn is_admin(&self) -> bool {
        self.admin
    }

    fn is_staff(&self) -> bool {
        self.staff
    }

    fn group_ids(&self) -> HashSet<GroupId> {
        self.group_ids.clone()
    }

    fn can_approve(&self, _target: &TargetRef) -> bool {
        self.staff
    }

    fn can_delete_target(&self, _target: &TargetRef) -> bool {
        self.staff
    }
}

// ============================================================================
// Scripted Reviewable Kind
// ============================================================================

type Outcome = dyn Fn() -> Result<PerformResult, DomainError> + Send + Sync;

/// Handler returning a fixed outcome and counting its calls
#[derive(Clone)]
pub struct ScriptedHandler {
    outcome: Arc<Outcome>,
    calls: Arc<AtomicUsize>,
    after_commits: Arc<AtomicUsize>,
}

impl ScriptedHandler {
    fn with_outcome(outcome: Arc<Outcome>) -> Self {
        Self {
            outcome,
            calls: Arc::new(AtomicUsize::new(0)),
            after_commits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn returning(result: PerformResult) -> Self {
        Self::with_outcome(Arc::new(move || Ok(result)))
    }

    pub fn erroring<F>(error: F) -> Self
    where
        F: Fn() -> DomainError + Send + Sync + 'static,
    {
        Self::with_outcome(Arc::new(move || Err(error())))
    }

    /// Shared counter of `perform` calls
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Shared counter of `after_commit` calls
    pub fn after_commits(&self) -> Arc<AtomicUsize> {
        self.after_commits.clone()
    }
}

#[async_trait]
impl ActionHandler for ScriptedHandler {
    async fn perform(
        &self,
        _reviewable: &Reviewable,
        _performed_by: &dyn Guardian,
        _args: &ActionArgs,
        _writes: &mut dyn TargetWrites,
    ) -> Result<PerformResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }

    async fn after_commit(
        &self,
        _reviewable: &Reviewable,
        _performed_by: &dyn Guardian,
        _args: &ActionArgs,
    ) {
        self.after_commits.fetch_add(1, Ordering::SeqCst);
    }
}

/// Offers approve and reject on pending items per the guardian's capabilities
pub struct ScriptedBuilder;

impl ActionBuilder for ScriptedBuilder {
    fn build_actions(
        &self,
        actions: &mut ActionList,
        reviewable: &Reviewable,
        guardian: &dyn Guardian,
        _args: &ActionArgs,
    ) {
        if !reviewable.is_pending() {
            return;
        }
        if guardian.can_approve(&reviewable.target) {
            actions.add(ActionId::APPROVE);
        }
        if guardian.can_delete_target(&reviewable.target) {
            actions.add(ActionId::REJECT);
        }
    }
}

/// Registry with `test_kind()` bound to `handler` for approve only
pub fn scripted_registry(handler: ScriptedHandler) -> ReviewableTypeRegistry {
    ReviewableTypeRegistry::new().register(
        ReviewableType::new(test_kind(), Arc::new(ScriptedBuilder))
            .with_handler(ActionId::APPROVE, Arc::new(handler)),
    )
}

// ============================================================================
// In-Memory Reviewable Repository
// ============================================================================

type RowLocks = HashMap<ReviewableId, Arc<tokio::sync::Mutex<()>>>;

/// Cloning shares the underlying store.
///
/// Transactions stage user writes against the linked user store and apply
/// them only when the commit succeeds.
#[derive(Clone, Default)]
pub struct InMemoryReviewableRepository {
    reviewables: Arc<RwLock<HashMap<ReviewableId, Reviewable>>>,
    users: InMemoryUserRepository,
    locks: Arc<Mutex<RowLocks>>,
    fail_commits: Arc<AtomicBool>,
}

impl InMemoryReviewableRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write user targets to `users`
    pub fn with_users(mut self, users: &InMemoryUserRepository) -> Self {
        self.users = users.clone();
        self
    }

    /// Make every later commit fail with a database error
    pub fn fail_commits(&self) {
        self.fail_commits.store(true, Ordering::SeqCst);
    }

    pub fn restore_commits(&self) {
        self.fail_commits.store(false, Ordering::SeqCst);
    }

    fn row_lock(&self, id: &ReviewableId) -> Arc<tokio::sync::Mutex<()>> {
        self.locks.lock().unwrap().entry(*id).or_default().clone()
    }
}

#[async_trait]
impl ReviewableRepository for InMemoryReviewableRepository {
    async fn find_by_id(&self, id: &ReviewableId) -> Result<Option<Reviewable>, DomainError> {
        Ok(self.reviewables.read().unwrap().get(id).cloned())
    }

    async fn find_by_target(
        &self,
        kind: &ReviewableKind,
        target: &TargetRef,
    ) -> Result<Option<Reviewable>, DomainError> {
        let reviewables = self.reviewables.read().unwrap();
        Ok(reviewables
            .values()
            .filter(|r| r.kind == *kind && r.target == *target)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn create(&self, new: &NewReviewable) -> Result<Reviewable, DomainError> {
        let created_by_id = new.validate()?;
        let now = Utc::now();
        let reviewable = Reviewable {
            id: ReviewableId(Uuid::new_v4()),
            kind: new.kind.clone(),
            status: ReviewableStatus::Pending,
            target: new.target,
            created_by_id,
            reviewable_by_moderator: new.reviewable_by_moderator,
            reviewable_by_group_id: new.reviewable_by_group_id,
            created_at: now,
            updated_at: now,
        };

        self.reviewables
            .write()
            .unwrap()
            .insert(reviewable.id, reviewable.clone());
        Ok(reviewable)
    }

    async fn find_visible(
        &self,
        scope: &VisibilityScope,
        filter: &ReviewableFilter,
    ) -> Result<Vec<Reviewable>, DomainError> {
        let mut visible: Vec<Reviewable> = self
            .reviewables
            .read()
            .unwrap()
            .values()
            .filter(|r| scope.permits(r) && filter.matches(r))
            .cloned()
            .collect();
        visible.sort_by_key(|r| (r.created_at, r.id));
        Ok(visible)
    }

    async fn begin_transition(
        &self,
        id: &ReviewableId,
    ) -> Result<Box<dyn StatusTransaction>, DomainError> {
        let guard = self.row_lock(id).lock_owned().await;

        let current = self
            .reviewables
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Reviewable {}", id)))?;

        Ok(Box::new(InMemoryStatusTransaction {
            _guard: guard,
            current,
            reviewables: self.reviewables.clone(),
            users: self.users.clone(),
            staged: Vec::new(),
            fail_commits: self.fail_commits.clone(),
        }))
    }
}

enum StagedWrite {
    SaveUser(User),
    DestroyUser(UserId),
}

struct InMemoryStatusTransaction {
    _guard: tokio::sync::OwnedMutexGuard<()>,
    current: Reviewable,
    reviewables: Arc<RwLock<HashMap<ReviewableId, Reviewable>>>,
    users: InMemoryUserRepository,
    staged: Vec<StagedWrite>,
    fail_commits: Arc<AtomicBool>,
}

impl InMemoryStatusTransaction {
    /// The user as this transaction sees it, staged writes included
    fn visible_user(&self, id: &UserId) -> Option<User> {
        self.staged
            .iter()
            .fold(self.users.get(id), |user, write| match write {
                StagedWrite::SaveUser(saved) if saved.id == *id => Some(saved.clone()),
                StagedWrite::DestroyUser(destroyed) if destroyed == id => None,
                _ => user,
            })
    }
}

#[async_trait]
impl TargetWrites for InMemoryStatusTransaction {
    async fn save_user(&mut self, user: &User) -> Result<(), DomainError> {
        if self.visible_user(&user.id).is_none() {
            return Err(DomainError::NotFound(format!("User {}", user.id)));
        }
        self.staged.push(StagedWrite::SaveUser(user.clone()));
        Ok(())
    }

    async fn destroy_user(
        &mut self,
        user: &User,
        _performed_by: &UserId,
    ) -> Result<(), DestroyError> {
        let stored = self
            .visible_user(&user.id)
            .ok_or_else(|| DomainError::NotFound(format!("User {}", user.id)))?;
        if stored.post_count > 0 {
            return Err(DestroyError::PostsExist);
        }
        self.staged.push(StagedWrite::DestroyUser(user.id));
        Ok(())
    }
}

#[async_trait]
impl StatusTransaction for InMemoryStatusTransaction {
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
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(DomainError::Database("commit failed".to_string()));
        }

        for write in &self.staged {
            match write {
                StagedWrite::SaveUser(user) => self.users.put(user.clone()),
                StagedWrite::DestroyUser(id) => self.users.remove(id),
            }
        }

        let mut stored = self.current.clone();
        if let Some(status) = status {
            stored.status = status;
            stored.updated_at = Utc::now();
            self.reviewables
                .write()
                .unwrap()
                .insert(stored.id, stored.clone());
        }
        Ok(stored)
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

/// User store; cloning shares the underlying maps
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    memberships: Arc<RwLock<HashMap<UserId, Vec<GroupId>>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }

    pub fn with_membership(self, user_id: UserId, group_id: GroupId) -> Self {
        self.memberships
            .write()
            .unwrap()
            .entry(user_id)
            .or_default()
            .push(group_id);
        self
    }

    /// Current stored copy of a user
    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.read().unwrap().get(id).cloned()
    }

    fn put(&self, user: User) {
        self.users.write().unwrap().insert(user.id, user);
    }

    fn remove(&self, id: &UserId) {
        self.users.write().unwrap().remove(id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.get(id))
    }

    async fn group_ids(&self, id: &UserId) -> Result<Vec<GroupId>, DomainError> {
        Ok(self
            .memberships
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Recording Event Sink and Job Queue
// ============================================================================

#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingEventSink {
    async fn trigger(&self, event: DomainEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub struct RecordingJobQueue {
    jobs: Mutex<Vec<Job>>,
    fail: bool,
}

impl RecordingJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue rejecting every job
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for RecordingJobQueue {
    async fn enqueue(&self, job: Job) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::Internal("job queue unavailable".to_string()));
        }
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

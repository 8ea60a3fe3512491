//! Actions on reviewables
//!
//! An action is a named operation (approve, reject, ...) an actor may invoke
//! on a reviewable. The set of actions offered is rebuilt on every check;
//! performing one yields a `PerformResult`.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::reviewable::ReviewableId;
use super::status::ReviewableStatus;

/// Identifier of an action
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActionId(Cow<'static, str>);

impl ActionId {
    pub const APPROVE: ActionId = ActionId::from_static("approve");
    pub const REJECT: ActionId = ActionId::from_static("reject");
    pub const IGNORE: ActionId = ActionId::from_static("ignore");
    pub const DELETE: ActionId = ActionId::from_static("delete");

    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Actions currently permitted on one reviewable for one actor.
///
/// Never cached: permissions depend on the target, the actor and the
/// call-time arguments.
#[derive(Debug, Clone)]
pub struct ActionList {
    reviewable_id: ReviewableId,
    ordered: Vec<ActionId>,
    members: HashSet<ActionId>,
}

impl ActionList {
    pub fn new(reviewable_id: ReviewableId) -> Self {
        Self {
            reviewable_id,
            ordered: Vec::new(),
            members: HashSet::new(),
        }
    }

    pub fn reviewable_id(&self) -> ReviewableId {
        self.reviewable_id
    }

    /// Offer an action; adding the same id twice is a no-op
    pub fn add(&mut self, action: ActionId) -> &mut Self {
        if self.members.insert(action.clone()) {
            self.ordered.push(action);
        }
        self
    }

    pub fn has(&self, action: &ActionId) -> bool {
        self.members.contains(action)
    }

    /// Actions in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &ActionId> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Outcome flag of a perform call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformStatus {
    Success,
    Failed,
}

/// Result of performing an action
///
/// The status only changes when the result is a success that names a
/// `transition_to` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformResult {
    pub status: PerformStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_to: Option<ReviewableStatus>,
}

impl PerformResult {
    pub fn new(status: PerformStatus, transition_to: Option<ReviewableStatus>) -> Self {
        Self {
            status,
            transition_to,
        }
    }

    /// Success, moving the reviewable to `status`
    pub fn transition(status: ReviewableStatus) -> Self {
        Self::new(PerformStatus::Success, Some(status))
    }

    /// Success without a status change
    pub fn ok() -> Self {
        Self::new(PerformStatus::Success, None)
    }

    /// Business-rule failure; the status stays as it is
    pub fn fail() -> Self {
        Self::new(PerformStatus::Failed, None)
    }

    pub fn is_success(&self) -> bool {
        self.status == PerformStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        !self.is_success()
    }

    /// The status to write, if any
    pub fn applied_transition(&self) -> Option<ReviewableStatus> {
        if self.is_success() {
            self.transition_to
        } else {
            None
        }
    }
}

/// Call-time arguments for building and performing actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionArgs(Map<String, Value>);

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True only when the argument is JSON `true`.
    ///
    /// Loosely truthy values such as `"yes"`, `"true"` or `1` read as false;
    /// callers must send a real boolean.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for ActionArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

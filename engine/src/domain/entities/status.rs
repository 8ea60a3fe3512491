//! Reviewable status table
//!
//! The lifecycle states a reviewable can be in. Each state has a stable
//! integer identity used for storage.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a reviewable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum ReviewableStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
    Ignored = 3,
    /// Terminal. The reviewable row is kept.
    Deleted = 4,
}

impl ReviewableStatus {
    /// Every status, in id order
    pub const ALL: [ReviewableStatus; 5] = [
        ReviewableStatus::Pending,
        ReviewableStatus::Approved,
        ReviewableStatus::Rejected,
        ReviewableStatus::Ignored,
        ReviewableStatus::Deleted,
    ];

    /// Stored integer identity
    pub const fn id(self) -> i16 {
        self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.id() == id)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ReviewableStatus::Pending => "pending",
            ReviewableStatus::Approved => "approved",
            ReviewableStatus::Rejected => "rejected",
            ReviewableStatus::Ignored => "ignored",
            ReviewableStatus::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for ReviewableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ReviewableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.name() == lowered)
            .ok_or_else(|| format!("Unknown reviewable status: {}", s))
    }
}

impl TryFrom<i16> for ReviewableStatus {
    type Error = String;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or_else(|| format!("Unknown reviewable status id: {}", id))
    }
}

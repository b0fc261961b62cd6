//! Fetch status of one keyed request, and the fold that turns the statuses of
//! a group of concurrent requests into one display state.
//!
//! # Aggregation
//! ```text
//!  any member Pending          → Pending
//!  else any member Failed      → Failed   (resolved subset still shown)
//!  else                        → Resolved
//! ```
//! Resolved values keep the order of the input statuses, not completion
//! order, so the result is the same however the requests interleave.

use crate::error::FetchError;

/// Three-state wrapper for a value being fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus<T> {
    Pending,
    Resolved(T),
    Failed(FetchError),
}

impl<T> FetchStatus<T> {
    pub fn from_result(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(v) => Self::Resolved(v),
            Err(e) => Self::Failed(e),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Resolved(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> Default for FetchStatus<T> {
    fn default() -> Self {
        Self::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPhase {
    Pending,
    Failed,
    Resolved,
}

/// Folded state of a reference group (e.g. all films of one character).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupState {
    pub phase: GroupPhase,
    pub resolved: Vec<String>,
}

impl GroupState {
    pub fn is_pending(&self) -> bool {
        self.phase == GroupPhase::Pending
    }

    pub fn is_failed(&self) -> bool {
        self.phase == GroupPhase::Failed
    }

    /// Comma-joined resolved values, `None` when nothing resolved yet.
    pub fn joined(&self) -> Option<String> {
        if self.resolved.is_empty() {
            None
        } else {
            Some(self.resolved.join(", "))
        }
    }
}

pub fn aggregate<'a, I>(statuses: I) -> GroupState
where
    I: IntoIterator<Item = &'a FetchStatus<String>>,
{
    let mut pending = false;
    let mut failed = false;
    let mut resolved = Vec::new();

    for status in statuses {
        match status {
            FetchStatus::Pending => pending = true,
            FetchStatus::Failed(_) => failed = true,
            FetchStatus::Resolved(v) => resolved.push(v.clone()),
        }
    }

    let phase = if pending {
        GroupPhase::Pending
    } else if failed {
        GroupPhase::Failed
    } else {
        GroupPhase::Resolved
    };

    GroupState { phase, resolved }
}

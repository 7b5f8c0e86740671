//! Section status as reported by the persistence API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion flag stored against each section by the backend.
///
/// The backend spells the incomplete state `incompleted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Completed,
    Incompleted,
}

impl BackendStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, BackendStatus::Completed)
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Completed => f.write_str("completed"),
            BackendStatus::Incompleted => f.write_str("incompleted"),
        }
    }
}

// ── Asynchronous action types ──

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Opaque identifier of an in-flight controller action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ActionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Whether the controller considers an action finished.
///
/// Only `done` is terminal; `in_progress`, `pending`, or anything else
/// keeps the poller going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionState {
    Pending,
    Done,
}

impl ActionState {
    pub fn from_status(status: &str) -> Self {
        if status.trim().eq_ignore_ascii_case("done") {
            Self::Done
        } else {
            Self::Pending
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Snapshot of one action status poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStatus {
    pub id: ActionId,
    pub action: Option<String>,
    pub state: ActionState,
    /// Raw `summary.status` string as sent by the controller.
    pub status: String,
    pub succeeded: u64,
    pub failed: u64,
    pub devices: Vec<ActionDeviceStatus>,
}

impl ActionStatus {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Per-device progress row of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDeviceStatus {
    pub uuid: Option<String>,
    pub host_name: Option<String>,
    pub system_ip: Option<String>,
    pub status: Option<String>,
    pub activity: Vec<String>,
}

/// How waiting on an action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `done` with no failures.
    Succeeded { status: ActionStatus, polls: u32 },
    /// `done` with a non-zero failure count.
    Failed { status: ActionStatus, polls: u32 },
    /// The wait bound elapsed before `done` was observed.
    TimedOut {
        last: Option<ActionStatus>,
        polls: u32,
        waited: Duration,
    },
    /// The cancellation token fired; no controller-side cleanup is attempted.
    Cancelled { polls: u32 },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Number of status requests that completed.
    pub fn polls(&self) -> u32 {
        match self {
            Self::Succeeded { polls, .. }
            | Self::Failed { polls, .. }
            | Self::TimedOut { polls, .. }
            | Self::Cancelled { polls } => *polls,
        }
    }

    /// The most recent status observed, if any.
    pub fn status(&self) -> Option<&ActionStatus> {
        match self {
            Self::Succeeded { status, .. } | Self::Failed { status, .. } => Some(status),
            Self::TimedOut { last, .. } => last.as_ref(),
            Self::Cancelled { .. } => None,
        }
    }

    /// Collapse into a `Result`, turning every non-success into a typed error.
    pub fn into_result(self, action_id: &ActionId) -> Result<ActionStatus, CoreError> {
        match self {
            Self::Succeeded { status, .. } => Ok(status),
            Self::Failed { status, .. } => Err(CoreError::ActionFailed {
                action_id: action_id.to_string(),
                failed: status.failed,
            }),
            Self::TimedOut { waited, .. } => Err(CoreError::ActionTimedOut {
                action_id: action_id.to_string(),
                waited_secs: waited.as_secs(),
            }),
            Self::Cancelled { .. } => Err(CoreError::Cancelled {
                action_id: action_id.to_string(),
            }),
        }
    }
}

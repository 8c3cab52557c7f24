//! Execution state models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a single suspension point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuspensionState {
    /// The step returned the point but it has not run yet
    Created,
    /// Paused on its control value, waiting for the inner chain
    Suspended,
    /// Resumed (with a value or an error) or failed while starting
    Completed,
}

impl SuspensionState {
    /// Check if the point can no longer be resumed
    pub fn is_terminal(&self) -> bool {
        matches!(self, SuspensionState::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuspensionState::Created => "created",
            SuspensionState::Suspended => "suspended",
            SuspensionState::Completed => "completed",
        }
    }
}

impl fmt::Display for SuspensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single `then` run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// The destination ran and the stack unwound normally
    Completed,
    /// A step stopped forward progress; the destination never ran
    ShortCircuited,
    /// An error was absorbed by one of the suspended steps
    Recovered,
    /// An error escaped to the caller
    Failed,
}

impl ExecutionStatus {
    /// Check if the run produced a result
    pub fn is_success(&self) -> bool {
        !matches!(self, ExecutionStatus::Failed)
    }
}

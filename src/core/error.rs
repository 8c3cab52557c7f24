//! Error types for pipeline configuration and suspension points

use crate::core::state::SuspensionState;
use thiserror::Error;

/// Errors raised while configuring or loading a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Invalid pipeline definition: {0}")]
    Definition(#[from] serde_yaml::Error),

    #[error("Failed to read pipeline definition: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        PipelineError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Misuse of a suspension point's state machine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuspensionError {
    #[error("Cannot {operation} a suspension point in state {state}")]
    InvalidTransition {
        operation: &'static str,
        state: SuspensionState,
    },
}

/// Failure raised by stock middleware
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Step failed: {0}")]
pub struct StepFailed(pub String);

/// Failure raised by stock destinations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Destination failed: {0}")]
pub struct DestinationFailed(pub String);

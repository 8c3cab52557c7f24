//! onion - A middleware pipeline whose steps wrap around a destination

pub mod builtin;
pub mod cli;
pub mod core;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{Arguments, Around, Control, Coroutine, Invocation, Pipeline, Resumed, Step, SuspensionPoint};
pub use crate::core::{DestinationFailed, ExecutionStatus, PipelineConfig, PipelineError, StepFailed, StepRegistry};
pub use execution::{EventHandler, ExecutionEvent};

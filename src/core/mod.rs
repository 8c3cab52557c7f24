//! Core domain models for the onion pipeline
//!
//! This module defines the values that flow through a pipeline (arguments,
//! control values, suspension points, steps) and the pipeline itself.

pub mod arguments;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod state;
pub mod step;
pub mod suspension;

pub use arguments::Arguments;
pub use config::{PipelineConfig, StepConfig};
pub use error::{DestinationFailed, PipelineError, StepFailed, SuspensionError};
pub use pipeline::Pipeline;
pub use registry::{Destination, StepRegistry};
pub use state::{ExecutionStatus, SuspensionState};
pub use step::{Around, Invocation, Step};
pub use suspension::{Control, Coroutine, Resumed, SuspensionPoint};

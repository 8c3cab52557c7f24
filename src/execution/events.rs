//! Execution events - what observers see while a pipeline runs

use crate::core::ExecutionStatus;
use std::fmt;
use std::sync::Arc;

/// Events that can occur during pipeline execution
///
/// Step positions are indices into the pipeline's step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    StepStarted {
        index: usize,
    },
    StepSuspended {
        index: usize,
    },
    ShortCircuited {
        index: usize,
    },
    ArgumentsReplaced {
        index: usize,
        count: usize,
    },
    DestinationInvoked {
        arguments: usize,
    },
    StepResumed {
        index: usize,
        replaced: bool,
    },
    ErrorOffered {
        index: usize,
    },
    ErrorAbsorbed {
        index: usize,
    },
    ErrorEscaped,
    RunFinished {
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Ordered list of event handlers shared by every run of a pipeline
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Vec<EventHandler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event handler
    pub fn subscribe(&mut self, handler: EventHandler) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Emit an event to all handlers, in registration order
    pub fn emit(&self, event: ExecutionEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

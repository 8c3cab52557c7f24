//! Error offer chain - gives each suspended step a chance to absorb an error
//!
//! The chain is an ordered list of handler records built from the execution
//! stack at the moment the error surfaced, innermost step first. Offering
//! walks the list with a loop: the first point that returns a value ends the
//! run with that value and every point further out is dropped without being
//! resumed. If every point re-raises, the last error escapes to the caller.

use crate::execution::{
    events::{EventBus, ExecutionEvent},
    stack::{ExecutionStack, Frame},
};
use tracing::{debug, warn};

/// How an offered error was settled
#[derive(Debug)]
pub enum OfferOutcome<R> {
    /// The step at `index` absorbed the error and produced `result`
    Absorbed { index: usize, result: Option<R> },
    /// No step absorbed the error
    Escaped(anyhow::Error),
}

/// Handler records for one error, innermost first
pub struct OfferChain<A, R> {
    handlers: Vec<Frame<A, R>>,
}

impl<A, R> OfferChain<A, R> {
    /// Build the chain from the stack as it stands
    pub fn from_stack(stack: ExecutionStack<A, R>) -> Self {
        Self {
            handlers: stack.drain_innermost_first().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Step indices in the order they will be offered the error
    pub fn indices(&self) -> Vec<usize> {
        self.handlers.iter().map(|frame| frame.index).collect()
    }

    /// Offer `error` to each handler in turn
    pub fn offer(self, error: anyhow::Error, events: &EventBus) -> OfferOutcome<R> {
        let mut error = error;

        for Frame { index, mut point } in self.handlers {
            warn!("Offering error to step {}: {}", index, error);
            events.emit(ExecutionEvent::ErrorOffered { index });

            match point.throw(error) {
                Ok(result) => {
                    debug!("Step {} absorbed the error", index);
                    events.emit(ExecutionEvent::ErrorAbsorbed { index });
                    return OfferOutcome::Absorbed { index, result };
                }
                Err(raised) => error = raised,
            }
        }

        warn!("No step absorbed the error: {}", error);
        events.emit(ExecutionEvent::ErrorEscaped);
        OfferOutcome::Escaped(error)
    }
}

//! Suspension points - a step's paused execution
//!
//! A step that wants to run logic after the inner chain returns a
//! [`SuspensionPoint`]. The point wraps a [`Coroutine`] and drives it through
//! three states:
//!
//! ```text
//! Created --start()--> Suspended --resume(result)--> Completed
//!                                --throw(error)---> Completed
//! ```
//!
//! `start` yields the control value the pipeline acts on (continue, stop,
//! or replace the arguments). `resume` takes ownership of the inner result
//! and either hands it back or replaces it; `throw` receives an inner error
//! and may absorb it.

use crate::core::{
    arguments::Arguments,
    error::SuspensionError,
    state::SuspensionState,
};
use std::fmt;

/// The value a suspension point pauses on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control<A> {
    /// Keep going with the current arguments
    Continue,
    /// Stop forward progress; the destination is skipped
    Stop,
    /// Replace the arguments seen by every later step and the destination
    Replace(Arguments<A>),
}

impl<A> Control<A> {
    pub fn is_stop(&self) -> bool {
        matches!(self, Control::Stop)
    }
}

/// What a resumed coroutine did with the inner result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resumed<R> {
    /// Nothing new; the result it was given, handed back
    PassThrough(Option<R>),
    /// A replacement result
    Replace(R),
}

impl<R> Resumed<R> {
    pub fn is_replaced(&self) -> bool {
        matches!(self, Resumed::Replace(_))
    }

    /// The result the unwind continues with
    pub fn into_result(self) -> Option<R> {
        match self {
            Resumed::PassThrough(result) => result,
            Resumed::Replace(value) => Some(value),
        }
    }
}

/// The two halves of a step: what runs before the inner chain and what
/// runs after it
pub trait Coroutine<A, R> {
    /// Run up to the suspension and return the control value
    fn start(&mut self) -> anyhow::Result<Control<A>>;

    /// Continue with the inner chain's result
    ///
    /// The result is moved in. Hand it back with [`Resumed::PassThrough`]
    /// to leave the pipeline's result unchanged.
    fn resume(&mut self, result: Option<R>) -> anyhow::Result<Resumed<R>>;

    /// Offer an error raised by the inner chain
    ///
    /// `Ok(value)` absorbs the error and ends the run with `value`; `Err`
    /// passes an error on to the next step out. The default re-raises.
    fn throw(&mut self, error: anyhow::Error) -> anyhow::Result<Option<R>> {
        Err(error)
    }
}

/// A started (or about to start) coroutine owned by one pipeline run
pub struct SuspensionPoint<A, R> {
    coroutine: Box<dyn Coroutine<A, R>>,
    state: SuspensionState,
}

impl<A, R> SuspensionPoint<A, R> {
    pub fn new<C>(coroutine: C) -> Self
    where
        C: Coroutine<A, R> + 'static,
    {
        Self {
            coroutine: Box::new(coroutine),
            state: SuspensionState::Created,
        }
    }

    pub fn state(&self) -> SuspensionState {
        self.state
    }

    /// Run the coroutine up to its control value
    pub fn start(&mut self) -> anyhow::Result<Control<A>> {
        self.expect_state(SuspensionState::Created, "start")?;

        match self.coroutine.start() {
            Ok(control) => {
                self.state = SuspensionState::Suspended;
                Ok(control)
            }
            Err(error) => {
                self.state = SuspensionState::Completed;
                Err(error)
            }
        }
    }

    /// Resume with the inner result
    pub fn resume(&mut self, result: Option<R>) -> anyhow::Result<Resumed<R>> {
        self.expect_state(SuspensionState::Suspended, "resume")?;
        self.state = SuspensionState::Completed;
        self.coroutine.resume(result)
    }

    /// Offer an error to the coroutine
    ///
    /// A point that is not suspended has nothing left to catch with, so the
    /// error is handed straight back.
    pub fn throw(&mut self, error: anyhow::Error) -> anyhow::Result<Option<R>> {
        if self.state != SuspensionState::Suspended {
            return Err(error);
        }
        self.state = SuspensionState::Completed;
        self.coroutine.throw(error)
    }

    fn expect_state(
        &self,
        expected: SuspensionState,
        operation: &'static str,
    ) -> Result<(), SuspensionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SuspensionError::InvalidTransition {
                operation,
                state: self.state,
            })
        }
    }
}

impl<A, R> fmt::Debug for SuspensionPoint<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuspensionPoint")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

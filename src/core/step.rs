//! Step domain model

use crate::core::{
    arguments::Arguments,
    suspension::{Control, Coroutine, Resumed, SuspensionPoint},
};
use std::fmt;
use std::sync::Arc;

type StepFn<A, R> = dyn Fn(&[A]) -> anyhow::Result<Invocation<A, R>> + Send + Sync;

/// A single step in a pipeline
///
/// A step receives the current arguments and either finishes on the spot
/// ([`Invocation::Plain`]) or hands back a [`SuspensionPoint`] whose
/// control value steers the rest of the chain and whose resumption runs
/// after the inner chain completes.
pub struct Step<A, R> {
    call: Arc<StepFn<A, R>>,
}

impl<A, R> Step<A, R> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[A]) -> anyhow::Result<Invocation<A, R>> + Send + Sync + 'static,
    {
        Self { call: Arc::new(f) }
    }

    /// Invoke the step with the current arguments
    pub fn invoke(&self, arguments: &[A]) -> anyhow::Result<Invocation<A, R>> {
        (self.call)(arguments)
    }
}

impl<A, R> Clone for Step<A, R> {
    fn clone(&self) -> Self {
        Self {
            call: Arc::clone(&self.call),
        }
    }
}

impl<A, R> fmt::Debug for Step<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").finish_non_exhaustive()
    }
}

/// What a step produced when invoked
pub enum Invocation<A, R> {
    /// The step is already complete; it takes no part in the unwind
    Plain,
    /// The step paused and must be resumed once the inner chain is done
    Suspended(SuspensionPoint<A, R>),
}

impl<A, R> Invocation<A, R> {
    /// Suspend on the given coroutine
    pub fn suspend<C>(coroutine: C) -> Self
    where
        C: Coroutine<A, R> + 'static,
    {
        Invocation::Suspended(SuspensionPoint::new(coroutine))
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, Invocation::Suspended(_))
    }
}

impl<A, R> fmt::Debug for Invocation<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invocation::Plain => f.write_str("Plain"),
            Invocation::Suspended(point) => f.debug_tuple("Suspended").field(point).finish(),
        }
    }
}

type RecoverFn<R> = Box<dyn FnOnce(anyhow::Error) -> anyhow::Result<Option<R>>>;

/// The "after" half of an [`Around`]
enum After<R> {
    /// Look at the result; `Some` replaces it, `None` passes it through
    Inspect(Box<dyn FnOnce(Option<&R>) -> anyhow::Result<Option<R>>>),
    /// Transform the result by value when there is one
    Map(Box<dyn FnOnce(R) -> anyhow::Result<R>>),
}

/// A coroutine assembled from closures
///
/// The "before" half is whatever the step did before constructing it; the
/// control value is fixed up front. The "after" half and the error handler
/// are optional: without `after`/`map` the result passes through untouched,
/// and without `recover` every error is re-raised. Setting `after` or `map`
/// replaces whichever was set before.
///
/// ```
/// use onion::core::{Around, Control, Step};
///
/// let step: Step<i32, i32> = Step::new(|args| {
///     let offset = args[0];
///     Ok(Around::new(Control::Continue)
///         .map(move |n: i32| Ok(n + offset))
///         .into_invocation())
/// });
/// # let _ = step;
/// ```
pub struct Around<A, R> {
    control: Control<A>,
    after: Option<After<R>>,
    recover: Option<RecoverFn<R>>,
}

impl<A, R> Around<A, R> {
    pub fn new(control: Control<A>) -> Self {
        Self {
            control,
            after: None,
            recover: None,
        }
    }

    /// Pause without affecting the chain
    pub fn continuing() -> Self {
        Self::new(Control::Continue)
    }

    /// Pause and stop forward progress
    pub fn stopping() -> Self {
        Self::new(Control::Stop)
    }

    /// Pause and replace the arguments for the rest of the chain
    pub fn replacing(arguments: impl Into<Arguments<A>>) -> Self {
        Self::new(Control::Replace(arguments.into()))
    }

    /// Logic to run with a view of the inner result
    ///
    /// Returning `Some` replaces the result; `None` leaves it as it was.
    pub fn after<F>(mut self, f: F) -> Self
    where
        F: FnOnce(Option<&R>) -> anyhow::Result<Option<R>> + 'static,
    {
        self.after = Some(After::Inspect(Box::new(f)));
        self
    }

    /// Transform the inner result by value; skipped when there is none
    pub fn map<F>(mut self, f: F) -> Self
    where
        F: FnOnce(R) -> anyhow::Result<R> + 'static,
    {
        self.after = Some(After::Map(Box::new(f)));
        self
    }

    /// Handler for errors raised by the inner chain
    pub fn recover<F>(mut self, f: F) -> Self
    where
        F: FnOnce(anyhow::Error) -> anyhow::Result<Option<R>> + 'static,
    {
        self.recover = Some(Box::new(f));
        self
    }
}

impl<A: 'static, R: 'static> Around<A, R> {
    pub fn into_invocation(self) -> Invocation<A, R> {
        Invocation::suspend(self)
    }
}

impl<A, R> Coroutine<A, R> for Around<A, R> {
    fn start(&mut self) -> anyhow::Result<Control<A>> {
        Ok(std::mem::replace(&mut self.control, Control::Continue))
    }

    fn resume(&mut self, result: Option<R>) -> anyhow::Result<Resumed<R>> {
        match self.after.take() {
            Some(After::Inspect(f)) => Ok(match f(result.as_ref())? {
                Some(value) => Resumed::Replace(value),
                None => Resumed::PassThrough(result),
            }),
            Some(After::Map(f)) => match result {
                Some(value) => Ok(Resumed::Replace(f(value)?)),
                None => Ok(Resumed::PassThrough(None)),
            },
            None => Ok(Resumed::PassThrough(result)),
        }
    }

    fn throw(&mut self, error: anyhow::Error) -> anyhow::Result<Option<R>> {
        match self.recover.take() {
            Some(recover) => recover(error),
            None => Err(error),
        }
    }
}

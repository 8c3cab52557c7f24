//! Generic stock middleware
//!
//! Each constructor returns a [`Step`] built on [`Around`], so the step is
//! shareable across runs while every run gets a fresh suspension point.

use crate::core::{Around, Control, Invocation, Step, StepFailed};
use std::sync::Arc;

/// Observe the arguments and finish without suspending
pub fn tap<A, R, F>(f: F) -> Step<A, R>
where
    F: Fn(&[A]) + Send + Sync + 'static,
    A: 'static,
    R: 'static,
{
    Step::new(move |args| {
        f(args);
        Ok(Invocation::Plain)
    })
}

/// Stop the chain unless `predicate` accepts the arguments
pub fn guard<A, R, F>(predicate: F) -> Step<A, R>
where
    F: Fn(&[A]) -> bool + Send + Sync + 'static,
    A: 'static,
    R: 'static,
{
    Step::new(move |args| {
        let control = if predicate(args) {
            Control::Continue
        } else {
            Control::Stop
        };
        Ok(Around::new(control).into_invocation())
    })
}

/// Replace the arguments seen by the rest of the chain
pub fn rewrite<A, R, F>(f: F) -> Step<A, R>
where
    F: Fn(&[A]) -> Vec<A> + Send + Sync + 'static,
    A: 'static,
    R: 'static,
{
    Step::new(move |args| Ok(Around::replacing(f(args)).into_invocation()))
}

/// Look at the inner result while unwinding; `Some` replaces it
pub fn after<A, R, F>(f: F) -> Step<A, R>
where
    F: Fn(Option<&R>) -> anyhow::Result<Option<R>> + Send + Sync + 'static,
    A: 'static,
    R: 'static,
{
    let f = Arc::new(f);
    Step::new(move |_| {
        let f = Arc::clone(&f);
        Ok(Around::continuing()
            .after(move |result: Option<&R>| f(result))
            .into_invocation())
    })
}

/// Transform the inner result by value while unwinding
pub fn map<A, R, F>(f: F) -> Step<A, R>
where
    F: Fn(R) -> anyhow::Result<R> + Send + Sync + 'static,
    A: 'static,
    R: 'static,
{
    let f = Arc::new(f);
    Step::new(move |_| {
        let f = Arc::clone(&f);
        Ok(Around::continuing().map(move |result: R| f(result)).into_invocation())
    })
}

/// Absorb errors from the inner chain with `f`
///
/// `f` may hand the error back (or a different one) to let steps further
/// out try.
pub fn rescue<A, R, F>(f: F) -> Step<A, R>
where
    F: Fn(anyhow::Error) -> anyhow::Result<Option<R>> + Send + Sync + 'static,
    A: 'static,
    R: 'static,
{
    let f = Arc::new(f);
    Step::new(move |_| {
        let f = Arc::clone(&f);
        Ok(Around::continuing().recover(move |error| f(error)).into_invocation())
    })
}

/// Fail before suspending
pub fn fail<A, R>(message: impl Into<String>) -> Step<A, R>
where
    A: 'static,
    R: 'static,
{
    let message = message.into();
    Step::new(move |_| Err(StepFailed(message.clone()).into()))
}

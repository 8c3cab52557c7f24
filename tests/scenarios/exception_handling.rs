//! Test: Exception handling - errors are offered to suspended steps, innermost first

use crate::helpers::*;
use onion::{
    Around, Control, Coroutine, ExecutionEvent, ExecutionStatus, Invocation, Pipeline, Resumed, Step,
    StepFailed,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("payment declined: {0}")]
struct Declined(u32);

/// Absorbs any error into `value`, recording what it saw
fn absorbing(name: &'static str, value: &'static str, trace: &Trace) -> Step<i32, String> {
    let trace = Arc::clone(trace);
    Step::new(move |_| {
        let on_error = Arc::clone(&trace);
        let on_result = Arc::clone(&trace);
        Ok(Around::continuing()
            .after(move |_result: Option<&String>| {
                record(&on_result, format!("{}:after", name));
                Ok(None)
            })
            .recover(move |error| {
                record(&on_error, format!("{} absorbed {}", name, error));
                Ok(Some(value.to_string()))
            })
            .into_invocation())
    })
}

/// Appends to the result on the way out, and would show up if it leaked
fn leaky(trace: &Trace) -> Step<i32, String> {
    let trace = Arc::clone(trace);
    Step::new(move |_| {
        let trace = Arc::clone(&trace);
        Ok(Around::continuing()
            .after(move |result: Option<&String>| {
                record(&trace, "leaky:after");
                let inner = result.map(String::as_str).unwrap_or_default();
                Ok(Some(format!("{}+leaked", inner)))
            })
            .into_invocation())
    })
}

/// Fails while starting, after it has been pushed
struct BrokenStart {
    trace: Trace,
}

impl Coroutine<i32, String> for BrokenStart {
    fn start(&mut self) -> anyhow::Result<Control<i32>> {
        record(&self.trace, "broken:start");
        Err(anyhow::anyhow!("start blew up"))
    }

    fn resume(&mut self, result: Option<String>) -> anyhow::Result<Resumed<String>> {
        record(&self.trace, "broken:resume");
        Ok(Resumed::PassThrough(result))
    }

    fn throw(&mut self, error: anyhow::Error) -> anyhow::Result<Option<String>> {
        record(&self.trace, "broken:throw");
        Err(error)
    }
}

fn declining(_: &[i32]) -> anyhow::Result<String> {
    Err(Declined(402).into())
}

#[test]
fn test_outer_step_absorbs_destination_error() {
    let trace = new_trace();
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.through(vec![absorbing("s1", "fallback", &trace), leaky(&trace)]);

    let result = pipeline.then(declining).unwrap();

    assert_eq!(result, Some("fallback".to_string()));
    assert_trace(&trace, &["s1 absorbed payment declined: 402"]);
}

#[test]
fn test_innermost_handler_wins() {
    let trace = new_trace();
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.through(vec![
        absorbing("outer", "outer value", &trace),
        absorbing("inner", "inner value", &trace),
    ]);

    let result = pipeline.then(declining).unwrap();

    assert_eq!(result, Some("inner value".to_string()));
    assert_trace(&trace, &["inner absorbed payment declined: 402"]);
}

#[test]
fn test_unhandled_error_is_returned_unchanged() {
    let trace = new_trace();
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.through(vec![traced("a", &trace), traced("b", &trace)]);

    let error = pipeline.then(declining).unwrap_err();

    assert_eq!(error.downcast_ref::<Declined>(), Some(&Declined(402)));
    // Neither step is resumed with a value
    assert_trace(&trace, &["a:before", "b:before"]);
}

#[test]
fn test_failing_step_is_not_offered_its_own_error() {
    let trace = new_trace();
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.through(vec![
        absorbing("outer", "recovered", &trace),
        onion::builtin::fail("bad input"),
        traced("never", &trace),
    ]);

    let result = pipeline.then(joining(&trace)).unwrap();

    assert_eq!(result, Some("recovered".to_string()));
    assert_trace(&trace, &["outer absorbed Step failed: bad input"]);
}

#[test]
fn test_forward_failure_without_handler() {
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.push(onion::builtin::fail("no handler"));

    let error = pipeline.then(|_| Ok("unreachable".to_string())).unwrap_err();
    assert_eq!(
        error.downcast_ref::<StepFailed>(),
        Some(&StepFailed("no handler".to_string()))
    );
}

#[test]
fn test_error_while_unwinding_goes_to_outer_steps() {
    let trace = new_trace();
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.through(vec![
        absorbing("outer", "patched", &trace),
        traced("middle", &trace),
        Step::new(|_| {
            Ok(Around::continuing()
                .after(|_: Option<&String>| Err(Declined(500).into()))
                .recover(|_| Ok(Some("should not be asked".to_string())))
                .into_invocation())
        }),
    ]);

    let result = pipeline.then(joining(&trace)).unwrap();

    assert_eq!(result, Some("patched".to_string()));
    assert_trace(
        &trace,
        &[
            "middle:before",
            "destination:",
            "outer absorbed payment declined: 500",
        ],
    );
}

#[test]
fn test_handler_can_pass_a_different_error_on() {
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.push(Step::new(|_| {
        Ok(Around::continuing()
            .recover(|error| Err(error.context("while charging")))
            .into_invocation())
    }));

    let error = pipeline.then(declining).unwrap_err();

    assert_eq!(error.to_string(), "while charging");
    assert_eq!(error.root_cause().to_string(), "payment declined: 402");
}

#[test]
fn test_error_events() {
    let trace = new_trace();
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.through(vec![absorbing("outer", "ok", &trace), traced("inner", &trace)]);
    let events = capture_events(&mut pipeline);

    pipeline.then(declining).unwrap();

    let events = events.lock().unwrap();
    let tail: Vec<_> = events.iter().rev().take(4).rev().cloned().collect();
    assert_eq!(
        tail,
        vec![
            ExecutionEvent::ErrorOffered { index: 1 },
            ExecutionEvent::ErrorOffered { index: 0 },
            ExecutionEvent::ErrorAbsorbed { index: 0 },
            ExecutionEvent::RunFinished {
                status: ExecutionStatus::Recovered
            },
        ]
    );
}

#[test]
fn test_failed_start_moves_outward() {
    let trace = new_trace();
    let broken = Arc::clone(&trace);
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.through(vec![
        absorbing("outer", "outer value", &trace),
        Step::new(move |_| {
            Ok(Invocation::suspend(BrokenStart {
                trace: Arc::clone(&broken),
            }))
        }),
        traced("never", &trace),
    ]);
    let events = capture_events(&mut pipeline);

    let result = pipeline.then(joining(&trace)).unwrap();

    assert_eq!(result, Some("outer value".to_string()));
    // The broken point stays on the stack but is never resumed or asked
    assert_trace(&trace, &["broken:start", "outer absorbed start blew up"]);

    let events = events.lock().unwrap();
    assert!(events.contains(&ExecutionEvent::ErrorOffered { index: 1 }));
    assert!(events.contains(&ExecutionEvent::ErrorAbsorbed { index: 0 }));
}

#[test]
fn test_absorbing_with_no_value() {
    let trace = new_trace();
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.through(vec![
        Step::new(|_| {
            Ok(Around::continuing()
                .recover(|_| Ok(None))
                .into_invocation())
        }),
        leaky(&trace),
    ]);

    let result = pipeline.then(declining).unwrap();

    assert_eq!(result, None);
    assert!(entries(&trace).is_empty());
}

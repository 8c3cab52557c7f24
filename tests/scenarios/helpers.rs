//! Test utility functions for onion scenarios

use onion::{Around, ExecutionEvent, Invocation, Pipeline, Step};
use std::sync::{Arc, Mutex};

/// Shared, ordered record of what the steps did
pub type Trace = Arc<Mutex<Vec<String>>>;

pub fn new_trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn record(trace: &Trace, entry: impl Into<String>) {
    trace.lock().unwrap().push(entry.into());
}

pub fn entries(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().clone()
}

/// A step that records `name:before` going in and `name:after` coming out,
/// passing the result through
pub fn traced(name: &'static str, trace: &Trace) -> Step<i32, String> {
    let trace = Arc::clone(trace);
    Step::new(move |_| {
        record(&trace, format!("{}:before", name));
        let trace = Arc::clone(&trace);
        Ok(Around::continuing()
            .after(move |_result: Option<&String>| {
                record(&trace, format!("{}:after", name));
                Ok(None)
            })
            .into_invocation())
    })
}

/// A step that records `name:plain` and never suspends
pub fn plain(name: &'static str, trace: &Trace) -> Step<i32, String> {
    let trace = Arc::clone(trace);
    Step::new(move |_| {
        record(&trace, format!("{}:plain", name));
        Ok(Invocation::Plain)
    })
}

/// A step that appends `suffix` to the result while unwinding
pub fn suffix(suffix: &'static str) -> Step<i32, String> {
    Step::new(move |_| {
        Ok(Around::continuing()
            .after(move |result: Option<&String>| {
                let inner = result.map(String::as_str).unwrap_or_default();
                Ok(Some(format!("{}{}", inner, suffix)))
            })
            .into_invocation())
    })
}

/// A destination that records the arguments it saw and joins them
pub fn joining(trace: &Trace) -> impl FnOnce(&[i32]) -> anyhow::Result<String> {
    let trace = Arc::clone(trace);
    move |args: &[i32]| -> anyhow::Result<String> {
        let joined = args
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(",");
        record(&trace, format!("destination:{}", joined));
        Ok(joined)
    }
}

/// Collect every event a pipeline emits
pub fn capture_events<A, R>(pipeline: &mut Pipeline<A, R>) -> Arc<Mutex<Vec<ExecutionEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    pipeline.add_event_handler(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

pub fn assert_trace(trace: &Trace, expected: &[&str]) {
    let actual = entries(trace);
    assert_eq!(
        actual,
        expected.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        "unexpected step trace"
    );
}

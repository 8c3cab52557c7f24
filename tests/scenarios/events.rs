//! Test: Events - observers see the run as it happens

use crate::helpers::*;
use onion::{ExecutionEvent, ExecutionStatus, Pipeline};
use std::sync::{Arc, Mutex};

#[test]
fn test_events_follow_execution_order() {
    let trace = new_trace();
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.send([1, 2]).through(vec![
        traced("a", &trace),
        plain("b", &trace),
        suffix("!"),
    ]);
    let events = capture_events(&mut pipeline);

    let result = pipeline.then(joining(&trace)).unwrap();
    assert_eq!(result, Some("1,2!".to_string()));

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            ExecutionEvent::StepStarted { index: 0 },
            ExecutionEvent::StepSuspended { index: 0 },
            ExecutionEvent::StepStarted { index: 1 },
            ExecutionEvent::StepStarted { index: 2 },
            ExecutionEvent::StepSuspended { index: 2 },
            ExecutionEvent::DestinationInvoked { arguments: 2 },
            ExecutionEvent::StepResumed { index: 2, replaced: true },
            ExecutionEvent::StepResumed { index: 0, replaced: false },
            ExecutionEvent::RunFinished {
                status: ExecutionStatus::Completed
            },
        ]
    );
}

#[test]
fn test_handlers_called_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();

    let first = Arc::clone(&order);
    let second = Arc::clone(&order);
    pipeline
        .add_event_handler(move |event| {
            if let ExecutionEvent::RunFinished { .. } = event {
                first.lock().unwrap().push("first");
            }
        })
        .add_event_handler(move |event| {
            if let ExecutionEvent::RunFinished { .. } = event {
                second.lock().unwrap().push("second");
            }
        });

    pipeline.then(|_| Ok(String::new())).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn test_escaped_error_event() {
    let mut pipeline: Pipeline<i32, String> = Pipeline::new();
    pipeline.push(suffix("?"));
    let events = capture_events(&mut pipeline);

    assert!(pipeline.then(|_| Err(anyhow::anyhow!("boom"))).is_err());

    let events = events.lock().unwrap();
    assert!(events.contains(&ExecutionEvent::ErrorOffered { index: 0 }));
    assert!(events.contains(&ExecutionEvent::ErrorEscaped));
    assert_eq!(
        events.last(),
        Some(&ExecutionEvent::RunFinished {
            status: ExecutionStatus::Failed
        })
    );
}

//! Main execution engine - runs the steps forward, calls the destination,
//! and unwinds the suspended steps in reverse

use crate::{
    core::{Arguments, Control, ExecutionStatus, Invocation, Step},
    execution::{
        events::{EventBus, ExecutionEvent},
        offer::{OfferChain, OfferOutcome},
        stack::ExecutionStack,
    },
};
use tracing::{debug, error};

/// Run one pass through `steps` around `destination`
///
/// Any error raised while stepping forward, calling the destination, or
/// unwinding is offered to the suspension points still on the stack at that
/// moment, innermost first.
pub fn run<A, R, D>(
    steps: &[Step<A, R>],
    arguments: Arguments<A>,
    destination: D,
    events: &EventBus,
) -> anyhow::Result<Option<R>>
where
    D: FnOnce(&[A]) -> anyhow::Result<R>,
{
    debug!("Running pipeline: {} steps, {} arguments", steps.len(), arguments.len());

    let mut stack = ExecutionStack::new();
    let outcome = drive(steps, arguments, destination, events, &mut stack);

    match outcome {
        Ok((result, status)) => {
            debug!("Pipeline finished: {:?}", status);
            events.emit(ExecutionEvent::RunFinished { status });
            Ok(result)
        }
        Err(raised) => {
            debug!("Pipeline raised with {} suspended steps: {}", stack.len(), raised);
            match OfferChain::from_stack(stack).offer(raised, events) {
                OfferOutcome::Absorbed { result, .. } => {
                    events.emit(ExecutionEvent::RunFinished {
                        status: ExecutionStatus::Recovered,
                    });
                    Ok(result)
                }
                OfferOutcome::Escaped(escaped) => {
                    error!("Pipeline failed: {}", escaped);
                    events.emit(ExecutionEvent::RunFinished {
                        status: ExecutionStatus::Failed,
                    });
                    Err(escaped)
                }
            }
        }
    }
}

/// The normal path; leaves on the stack exactly the points that have not
/// been resumed when an error surfaces
fn drive<A, R, D>(
    steps: &[Step<A, R>],
    mut arguments: Arguments<A>,
    destination: D,
    events: &EventBus,
    stack: &mut ExecutionStack<A, R>,
) -> anyhow::Result<(Option<R>, ExecutionStatus)>
where
    D: FnOnce(&[A]) -> anyhow::Result<R>,
{
    let mut short_circuited = false;

    for (index, step) in steps.iter().enumerate() {
        debug!("Starting step {}", index);
        events.emit(ExecutionEvent::StepStarted { index });

        let point = match step.invoke(arguments.as_slice())? {
            Invocation::Plain => continue,
            Invocation::Suspended(point) => point,
        };

        events.emit(ExecutionEvent::StepSuspended { index });
        match stack.push(index, point).start()? {
            Control::Stop => {
                debug!("Step {} stopped the chain", index);
                events.emit(ExecutionEvent::ShortCircuited { index });
                short_circuited = true;
                break;
            }
            Control::Replace(replacement) => {
                debug!("Step {} replaced the arguments ({} values)", index, replacement.len());
                events.emit(ExecutionEvent::ArgumentsReplaced {
                    index,
                    count: replacement.len(),
                });
                arguments = replacement;
            }
            Control::Continue => {}
        }
    }

    let mut result = if short_circuited {
        None
    } else {
        debug!("Invoking destination with {} arguments", arguments.len());
        events.emit(ExecutionEvent::DestinationInvoked {
            arguments: arguments.len(),
        });
        Some(destination(arguments.as_slice())?)
    };

    while let Some(mut frame) = stack.pop() {
        let resumed = frame.point.resume(result)?;
        let replaced = resumed.is_replaced();
        debug!("Resumed step {} (replaced result: {})", frame.index, replaced);
        events.emit(ExecutionEvent::StepResumed {
            index: frame.index,
            replaced,
        });
        result = resumed.into_result();
    }

    let status = if short_circuited {
        ExecutionStatus::ShortCircuited
    } else {
        ExecutionStatus::Completed
    };
    Ok((result, status))
}

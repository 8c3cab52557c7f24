//! Pipeline domain model

use crate::core::{
    arguments::Arguments,
    config::PipelineConfig,
    error::PipelineError,
    registry::StepRegistry,
    step::Step,
};
use crate::execution::{self, EventBus, ExecutionEvent};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// An ordered list of steps wrapped around a destination
///
/// Steps run outermost first. Each one may pause on a suspension point,
/// which is resumed with the inner result once the destination has run:
///
/// ```
/// use onion::core::{Around, Pipeline, Step};
///
/// let mut pipeline: Pipeline<i32, i32> = Pipeline::new();
/// pipeline.send([2, 3]).push(Step::new(|_| {
///     Ok(Around::continuing()
///         .map(|n: i32| Ok(n * 10))
///         .into_invocation())
/// }));
///
/// let result = pipeline.then(|args| Ok(args.iter().sum())).unwrap();
/// assert_eq!(result, Some(50));
/// ```
pub struct Pipeline<A = Value, R = Value> {
    /// Arguments handed to the first step
    arguments: Arguments<A>,

    /// Pipeline steps, outermost first
    steps: Vec<Step<A, R>>,

    /// Observers notified during every run
    events: EventBus,
}

impl<A, R> Pipeline<A, R> {
    /// Create a pipeline with no arguments and no steps
    pub fn new() -> Self {
        Self {
            arguments: Arguments::new(Vec::new()),
            steps: Vec::new(),
            events: EventBus::new(),
        }
    }

    /// Set the arguments passed to the steps, replacing any previous ones
    pub fn send<I>(&mut self, arguments: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
    {
        self.arguments = arguments.into_iter().collect();
        self
    }

    /// Replace the step list
    pub fn through<I>(&mut self, steps: I) -> &mut Self
    where
        I: IntoIterator<Item = Step<A, R>>,
    {
        self.steps = steps.into_iter().collect();
        self
    }

    /// Replace the step list with steps looked up by name
    ///
    /// Every name is resolved before anything is stored, so a failed call
    /// leaves the current steps untouched.
    pub fn through_named<I, S>(
        &mut self,
        registry: &StepRegistry<A, R>,
        names: I,
    ) -> Result<&mut Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let steps = names
            .into_iter()
            .map(|name| registry.step(name.as_ref(), &Value::Null))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.through(steps))
    }

    /// Add a step at the innermost position
    pub fn push(&mut self, step: Step<A, R>) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Add a step at the outermost position
    pub fn unshift(&mut self, step: Step<A, R>) -> &mut Self {
        self.steps.insert(0, step);
        self
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(Arc::new(handler));
        self
    }

    /// The arguments the next run starts with
    pub fn arguments(&self) -> &[A] {
        self.arguments.as_slice()
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the steps around `destination` and return the final result
    ///
    /// `Ok(None)` means a step stopped the chain and no step supplied a
    /// value while unwinding. An error that no suspended step absorbs is
    /// returned unchanged.
    pub fn then<D>(&self, destination: D) -> anyhow::Result<Option<R>>
    where
        D: FnOnce(&[A]) -> anyhow::Result<R>,
    {
        execution::run(&self.steps, self.arguments.clone(), destination, &self.events)
    }
}

impl Pipeline<Value, Value> {
    /// Create a pipeline from a definition
    pub fn from_config(config: &PipelineConfig, registry: &StepRegistry) -> Result<Self, PipelineError> {
        let steps = config
            .steps
            .iter()
            .map(|step| registry.step(&step.uses, &step.params))
            .collect::<Result<Vec<_>, _>>()?;

        let mut pipeline = Pipeline::new();
        pipeline.send(config.arguments.iter().cloned()).through(steps);
        Ok(pipeline)
    }
}

impl<A, R> Default for Pipeline<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> Clone for Pipeline<A, R> {
    fn clone(&self) -> Self {
        Self {
            arguments: self.arguments.clone(),
            steps: self.steps.clone(),
            events: self.events.clone(),
        }
    }
}

impl<A: fmt::Debug, R> fmt::Debug for Pipeline<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("arguments", &self.arguments)
            .field("steps", &self.steps.len())
            .field("events", &self.events)
            .finish()
    }
}

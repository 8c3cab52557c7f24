//! Step registry - named step and destination factories
//!
//! Pipelines loaded from a definition refer to their steps by name. The
//! registry turns a name plus its `with:` parameters into a callable, and is
//! the one place a pipeline can be handed something that is not a step.

use crate::core::{error::PipelineError, step::Step};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A terminal handler produced by the registry
pub type Destination<A, R> = Arc<dyn Fn(&[A]) -> anyhow::Result<R> + Send + Sync>;

/// Builds a step from its parameters
pub type StepFactory<A, R> = Arc<dyn Fn(&Value) -> Result<Step<A, R>, PipelineError> + Send + Sync>;

/// Builds a destination from its parameters
pub type DestinationFactory<A, R> =
    Arc<dyn Fn(&Value) -> Result<Destination<A, R>, PipelineError> + Send + Sync>;

/// Named step and destination factories
pub struct StepRegistry<A = Value, R = Value> {
    steps: BTreeMap<String, StepFactory<A, R>>,
    destinations: BTreeMap<String, DestinationFactory<A, R>>,
}

impl<A, R> StepRegistry<A, R> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            steps: BTreeMap::new(),
            destinations: BTreeMap::new(),
        }
    }

    /// Register a step factory, replacing any previous one with that name
    pub fn register_step<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Step<A, R>, PipelineError> + Send + Sync + 'static,
    {
        self.steps.insert(name.into(), Arc::new(factory));
        self
    }

    /// Register a destination factory, replacing any previous one with that name
    pub fn register_destination<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> Result<Destination<A, R>, PipelineError> + Send + Sync + 'static,
    {
        self.destinations.insert(name.into(), Arc::new(factory));
        self
    }

    /// Build the step registered under `name`
    pub fn step(&self, name: &str, params: &Value) -> Result<Step<A, R>, PipelineError> {
        let factory = self
            .steps
            .get(name)
            .ok_or_else(|| PipelineError::invalid(format!("'{}' is not a registered step", name)))?;
        factory(params)
    }

    /// Build the destination registered under `name`
    pub fn destination(&self, name: &str, params: &Value) -> Result<Destination<A, R>, PipelineError> {
        let factory = self.destinations.get(name).ok_or_else(|| {
            PipelineError::invalid(format!("'{}' is not a registered destination", name))
        })?;
        factory(params)
    }

    pub fn has_step(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    pub fn has_destination(&self, name: &str) -> bool {
        self.destinations.contains_key(name)
    }

    /// Registered step names, sorted
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.keys().map(String::as_str).collect()
    }

    /// Registered destination names, sorted
    pub fn destination_names(&self) -> Vec<&str> {
        self.destinations.keys().map(String::as_str).collect()
    }
}

impl StepRegistry<Value, Value> {
    /// A registry holding the stock JSON middleware and destinations
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtin::json::register(&mut registry);
        registry
    }
}

impl<A, R> Default for StepRegistry<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> Clone for StepRegistry<A, R> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            destinations: self.destinations.clone(),
        }
    }
}

impl<A, R> fmt::Debug for StepRegistry<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry")
            .field("steps", &self.step_names())
            .field("destinations", &self.destination_names())
            .finish()
    }
}

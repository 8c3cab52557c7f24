//! Pipeline definitions loaded from YAML

use crate::core::{
    error::PipelineError,
    pipeline::Pipeline,
    registry::{Destination, StepRegistry},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Top-level pipeline definition loaded from YAML
///
/// ```yaml
/// name: "Checkout"
/// arguments: [2, 3]
/// steps:
///   - log
///   - uses: wrap
///     with: { key: "total" }
/// destination: sum
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Initial arguments handed to the first step
    #[serde(default)]
    pub arguments: Vec<Value>,

    /// Steps, outermost first
    #[serde(default)]
    pub steps: Vec<StepConfig>,

    /// The terminal handler
    pub destination: StepConfig,
}

/// A reference to a registered step or destination
///
/// A bare string is shorthand for `{ uses: <name> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StepConfigRepr")]
pub struct StepConfig {
    /// Registered name
    pub uses: String,

    /// Parameters handed to the factory
    #[serde(rename = "with", default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StepConfigRepr {
    Name(String),
    Full {
        uses: String,
        #[serde(rename = "with", default)]
        params: Value,
    },
}

impl From<StepConfigRepr> for StepConfig {
    fn from(repr: StepConfigRepr) -> Self {
        match repr {
            StepConfigRepr::Name(uses) => StepConfig {
                uses,
                params: Value::Null,
            },
            StepConfigRepr::Full { uses, params } => StepConfig { uses, params },
        }
    }
}

impl StepConfig {
    pub fn new(uses: impl Into<String>) -> Self {
        Self {
            uses: uses.into(),
            params: Value::Null,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

impl PipelineConfig {
    /// Load a pipeline definition from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a pipeline definition from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the definition without resolving any names
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.name.trim().is_empty() {
            return Err(PipelineError::invalid("pipeline name must not be empty"));
        }

        for (index, step) in self.steps.iter().enumerate() {
            if step.uses.trim().is_empty() {
                return Err(PipelineError::invalid(format!(
                    "step {} does not name a registered step",
                    index
                )));
            }
        }

        if self.destination.uses.trim().is_empty() {
            return Err(PipelineError::invalid("destination does not name a registered destination"));
        }

        Ok(())
    }

    /// Check that every name resolves against `registry`
    pub fn resolve(&self, registry: &StepRegistry) -> Result<(), PipelineError> {
        self.to_pipeline(registry)?;
        self.destination(registry)?;
        Ok(())
    }

    /// Convert the definition to a Pipeline with its arguments sent and its
    /// steps resolved
    pub fn to_pipeline(&self, registry: &StepRegistry) -> Result<Pipeline, PipelineError> {
        Pipeline::from_config(self, registry)
    }

    /// Resolve the destination
    pub fn destination(&self, registry: &StepRegistry) -> Result<Destination<Value, Value>, PipelineError> {
        registry.destination(&self.destination.uses, &self.destination.params)
    }
}

//! CLI command definitions

use clap::Args;
use serde_json::Value;

/// Run a pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Argument override, parsed as JSON (repeatable; replaces the file's arguments)
    #[arg(short, long, value_parser = parse_argument)]
    pub arg: Vec<Value>,

    /// Print execution events as they happen
    #[arg(long)]
    pub events: bool,
}

/// Validate a pipeline definition
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List the registered steps and destinations
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Parse an argument as JSON, falling back to a plain string
pub fn parse_argument(s: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string())))
}

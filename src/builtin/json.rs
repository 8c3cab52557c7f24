//! Stock middleware and destinations over JSON values
//!
//! These back the names a YAML pipeline definition can use. Parameters come
//! from the step's `with:` block.

use crate::builtin::middleware;
use crate::core::{Around, Destination, DestinationFailed, PipelineError, Step, StepRegistry};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogParams {
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HaltParams {
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PrependParams {
    values: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WrapParams {
    key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RescueParams {
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FailParams {
    #[serde(default)]
    message: Option<String>,
}

/// Decode a `with:` block; a missing block means all defaults
fn params<T>(name: &str, value: &Value) -> Result<T, PipelineError>
where
    T: DeserializeOwned,
{
    let value = if value.is_null() {
        Value::Object(Map::new())
    } else {
        value.clone()
    };
    serde_json::from_value(value)
        .map_err(|e| PipelineError::invalid(format!("invalid parameters for '{}': {}", name, e)))
}

fn destination<F>(f: F) -> Destination<Value, Value>
where
    F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Log the arguments on the way in and the result on the way out
fn log(with: &Value) -> Result<Step<Value, Value>, PipelineError> {
    let label = params::<LogParams>("log", with)?
        .label
        .unwrap_or_else(|| "log".to_string());

    Ok(Step::new(move |args| {
        let arguments = Value::from(args.to_vec());
        info!("[{}] arguments: {}", label, arguments);
        let label = label.clone();
        Ok(Around::continuing()
            .after(move |result: Option<&Value>| {
                match result {
                    Some(value) => info!("[{}] result: {}", label, value),
                    None => info!("[{}] no result", label),
                }
                Ok(None)
            })
            .into_invocation())
    }))
}

/// Stop the chain; optionally supply the result while unwinding
fn halt(with: &Value) -> Result<Step<Value, Value>, PipelineError> {
    let value = params::<HaltParams>("halt", with)?.value;

    Ok(Step::new(move |_| {
        let value = value.clone();
        Ok(Around::stopping()
            .after(move |_: Option<&Value>| Ok(value))
            .into_invocation())
    }))
}

/// Put fixed values in front of the arguments
fn prepend(with: &Value) -> Result<Step<Value, Value>, PipelineError> {
    let values = params::<PrependParams>("prepend", with)?.values;

    Ok(middleware::rewrite(move |args: &[Value]| {
        values.iter().chain(args).cloned().collect()
    }))
}

/// Nest the result under `key`
fn wrap(with: &Value) -> Result<Step<Value, Value>, PipelineError> {
    let key = params::<WrapParams>("wrap", with)?.key;

    Ok(middleware::map(move |value: Value| {
        let mut object = Map::new();
        object.insert(key.clone(), value);
        Ok(Value::Object(object))
    }))
}

/// Absorb any inner error, producing `value` or an error object
fn rescue(with: &Value) -> Result<Step<Value, Value>, PipelineError> {
    let value = params::<RescueParams>("rescue", with)?.value;

    Ok(middleware::rescue(move |error: anyhow::Error| {
        Ok(Some(match &value {
            Some(value) => value.clone(),
            None => json!({ "error": error.to_string() }),
        }))
    }))
}

/// Fail before suspending
fn fail(with: &Value) -> Result<Step<Value, Value>, PipelineError> {
    let message = params::<FailParams>("fail", with)?
        .message
        .unwrap_or_else(|| "fail step reached".to_string());
    Ok(middleware::fail(message))
}

/// Sum numeric arguments, staying integral when every argument is
fn sum(args: &[Value]) -> anyhow::Result<Value> {
    let mut integral: Option<i64> = Some(0);
    let mut total = 0.0;

    for (position, arg) in args.iter().enumerate() {
        let number = arg
            .as_f64()
            .ok_or_else(|| {
                DestinationFailed(format!("sum: argument {} is not a number: {}", position, arg))
            })?;
        total += number;
        integral = match (integral, arg.as_i64()) {
            (Some(acc), Some(n)) => acc.checked_add(n),
            _ => None,
        };
    }

    match integral {
        Some(n) => Ok(json!(n)),
        None if total.is_finite() => Ok(json!(total)),
        None => Err(DestinationFailed(format!("sum: total is not finite: {}", total)).into()),
    }
}

/// Register the JSON stock middleware and destinations
pub fn register(registry: &mut StepRegistry) {
    registry
        .register_step("log", log)
        .register_step("halt", halt)
        .register_step("prepend", prepend)
        .register_step("wrap", wrap)
        .register_step("rescue", rescue)
        .register_step("fail", fail);

    registry
        .register_destination("echo", |_| {
            Ok(destination(|args| Ok(Value::Array(args.to_vec()))))
        })
        .register_destination("sum", |_| Ok(destination(sum)))
        .register_destination("count", |_| Ok(destination(|args| Ok(json!(args.len())))))
        .register_destination("fail", |with| {
            let message = params::<FailParams>("fail", with)?
                .message
                .unwrap_or_else(|| "fail destination reached".to_string());
            Ok(destination(move |_| Err(DestinationFailed(message.clone()).into())))
        });
}

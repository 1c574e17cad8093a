//! Reconcile an expanded record against the model's training columns.

use serde_json::{Map, Value};

use crate::domain::FeatureVector;
use crate::error::AppError;

/// Align `record` to exactly `required`, in that order.
///
/// Columns the record lacks are filled with 0. Columns the model does not know
/// are dropped. Kept values must be numbers or booleans.
pub fn reconcile<'a>(record: &Map<String, Value>, required: &'a [String]) -> Result<FeatureVector<'a>, AppError> {
    let mut values = Vec::with_capacity(required.len());
    for name in required {
        let value = match record.get(name) {
            None => 0.0,
            Some(v) => numeric_value(name, v)?,
        };
        values.push(value);
    }
    Ok(FeatureVector::new(required, values))
}

fn numeric_value(name: &str, value: &Value) -> Result<f64, AppError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AppError::invalid_input(format!("Column `{name}` is out of range."))),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => Err(AppError::invalid_input(format!("Column `{name}` is null."))),
        Value::String(s) => Err(AppError::invalid_input(format!(
            "Column `{name}` must be numeric, got string '{s}'."
        ))),
        Value::Array(_) | Value::Object(_) => {
            Err(AppError::invalid_input(format!("Column `{name}` must be numeric.")))
        }
    }
}

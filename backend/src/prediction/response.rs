use serde::Deserialize;
use serde_json::Value;

use super::error::MalformedResponseError;

/// The `prediction` field as the inference service may send it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPrediction {
    Number(f64),
    Text(String),
}

impl RawPrediction {
    pub fn coerce(&self) -> Result<f64, MalformedResponseError> {
        let value = match self {
            RawPrediction::Number(n) => *n,
            RawPrediction::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| MalformedResponseError::Unparsable(text.clone()))?,
        };

        if !value.is_finite() {
            return Err(MalformedResponseError::NotFinite);
        }
        if value < 0.0 {
            return Err(MalformedResponseError::Negative(value));
        }
        // u64::MAX as f64 is 2^64, one past the largest u64.
        if value.round() >= u64::MAX as f64 {
            return Err(MalformedResponseError::OutOfRange(value));
        }
        Ok(value)
    }
}

/// Extracts the calorie estimate from a raw inference response.
///
/// Values are rounded half away from zero; since negatives are rejected this
/// is round-half-up (`250.5` becomes `251`).
pub fn normalize(raw: &Value) -> Result<u64, MalformedResponseError> {
    let fields = raw
        .as_object()
        .ok_or_else(|| MalformedResponseError::UnexpectedType(type_name(raw).to_string()))?;

    let prediction = match fields.get("prediction") {
        None | Some(Value::Null) => return Err(MalformedResponseError::MissingPrediction),
        Some(value) => RawPrediction::deserialize(value)
            .map_err(|_| MalformedResponseError::UnexpectedType(type_name(value).to_string()))?,
    };

    Ok(round_calories(prediction.coerce()?))
}

pub fn round_calories(value: f64) -> u64 {
    value.round() as u64
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use shared::{Gender, MeasurementInput};
use std::str::FromStr;

use super::error::ValidationError;

/// How strictly the `gender` field is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenderPolicy {
    /// `"male"` maps to male and every other string to female, matching the
    /// inference service's historical clients.
    #[default]
    Lenient,
    /// Only `"male"` and `"female"` are accepted.
    Strict,
}

impl FromStr for GenderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(GenderPolicy::Lenient),
            "strict" => Ok(GenderPolicy::Strict),
            other => Err(format!("unknown gender policy: {}", other)),
        }
    }
}

/// Feature vector in the shape the inference service expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    #[serde(rename = "Gender", serialize_with = "serialize_gender_code")]
    pub gender: Gender,
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "Height")]
    pub height: f64,
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Duration")]
    pub duration: f64,
    #[serde(rename = "Heart_Rate")]
    pub heart_rate: f64,
    #[serde(rename = "Body_Temp")]
    pub body_temp: f64,
}

fn serialize_gender_code<S>(gender: &Gender, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(gender.code())
}

impl From<MeasurementInput> for InferenceRequest {
    fn from(input: MeasurementInput) -> Self {
        Self {
            gender: input.gender,
            age: input.age,
            height: input.height,
            weight: input.weight,
            duration: input.duration,
            heart_rate: input.heart_rate,
            body_temp: input.body_temp,
        }
    }
}

pub fn normalize(body: &Value, policy: GenderPolicy) -> Result<InferenceRequest, ValidationError> {
    parse_measurements(body, policy).map(InferenceRequest::from)
}

pub fn parse_measurements(
    body: &Value,
    policy: GenderPolicy,
) -> Result<MeasurementInput, ValidationError> {
    let fields = body.as_object().ok_or(ValidationError::NotAnObject)?;

    Ok(MeasurementInput {
        gender: gender_field(fields, policy)?,
        age: number_field(fields, "age")?,
        height: number_field(fields, "height")?,
        weight: number_field(fields, "weight")?,
        duration: number_field(fields, "duration")?,
        heart_rate: number_field(fields, "heart_rate")?,
        body_temp: number_field(fields, "body_temp")?,
    })
}

fn required<'a>(fields: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(name)),
        Some(value) => Ok(value),
    }
}

// serde_json numbers are always finite.
fn number_field(fields: &Map<String, Value>, name: &'static str) -> Result<f64, ValidationError> {
    required(fields, name)?
        .as_f64()
        .ok_or(ValidationError::NotANumber(name))
}

fn gender_field(fields: &Map<String, Value>, policy: GenderPolicy) -> Result<Gender, ValidationError> {
    let raw = required(fields, "gender")?
        .as_str()
        .ok_or(ValidationError::NotAString)?;

    match policy {
        GenderPolicy::Strict => {
            Gender::from_str(raw).map_err(|_| ValidationError::UnknownGender(raw.to_string()))
        }
        GenderPolicy::Lenient => {
            if raw == "male" {
                Ok(Gender::Male)
            } else {
                if raw != "female" {
                    log::warn!("Unrecognised gender {:?} encoded as female", raw);
                }
                Ok(Gender::Female)
            }
        }
    }
}

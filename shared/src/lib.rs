use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Message returned to clients for every failed prediction.
pub const PREDICTION_FAILED: &str = "Failed to get prediction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Integer code understood by the inference service.
    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 0,
        }
    }
}

/// Measurements submitted by the calorie form.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementInput {
    pub gender: Gender,
    pub age: f64,
    /// Centimetres.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    /// Minutes.
    pub duration: f64,
    /// Beats per minute.
    pub heart_rate: f64,
    /// Degrees Celsius.
    pub body_temp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub calories: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn prediction_failed() -> Self {
        Self {
            error: PREDICTION_FAILED.to_string(),
        }
    }
}

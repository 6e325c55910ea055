use serde_json::Value;
use shared::PredictionResult;
use std::fmt;

use super::error::{PredictionError, ValidationError};
use super::gateway::InferenceClient;
use super::input::{self, GenderPolicy};
use super::response;

/// Where a request is in the pipeline; used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Forwarding,
    Parsing,
    Completed,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Forwarding => "forwarding",
            Stage::Parsing => "parsing",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct PredictionService {
    client: InferenceClient,
    gender_policy: GenderPolicy,
}

impl PredictionService {
    pub fn new(client: InferenceClient, gender_policy: GenderPolicy) -> Self {
        Self {
            client,
            gender_policy,
        }
    }

    /// Runs one request body through normalization, the inference call and
    /// response parsing. Validation failures never reach the network.
    pub async fn predict(&self, request_id: &str, body: &[u8]) -> Result<PredictionResult, PredictionError> {
        log::debug!("[{}] {}", request_id, Stage::Received);
        let raw: Value = serde_json::from_slice(body).map_err(ValidationError::MalformedBody)?;
        let request = input::normalize(&raw, self.gender_policy)?;

        log::debug!(
            "[{}] {} to {}",
            request_id,
            Stage::Forwarding,
            self.client.endpoint()
        );
        let raw_response = self.client.forward(&request).await?;

        log::debug!("[{}] {}", request_id, Stage::Parsing);
        let calories = response::normalize(&raw_response)?;

        log::debug!("[{}] {}: {} kcal", request_id, Stage::Completed, calories);
        Ok(PredictionResult { calories })
    }
}

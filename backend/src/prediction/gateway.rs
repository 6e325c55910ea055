use reqwest::Client as HttpClient;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use super::error::GatewayError;
use super::input::InferenceRequest;
use crate::config::InferenceConfig;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Outbound client for the external inference service.
#[derive(Clone)]
pub struct InferenceClient {
    http_client: HttpClient,
    endpoint: Url,
}

impl InferenceClient {
    pub fn new(config: &InferenceConfig) -> Result<Self, GatewayError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            http_client,
            endpoint: config.url.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one prediction request and returns the decoded JSON body untouched.
    /// There is no retry: the first failure is returned to the caller.
    pub async fn forward(&self, request: &InferenceRequest) -> Result<Value, GatewayError> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status,
                body: truncate(&error_text),
            });
        }

        let body: Value = response.json().await?;
        Ok(body)
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

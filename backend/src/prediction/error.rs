use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Request body exceeds {0} bytes")]
    BodyTooLarge(usize),
    #[error("Failed to read request body: {0}")]
    Payload(#[from] actix_web::error::PayloadError),
    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field {0} must be a number")]
    NotANumber(&'static str),
    #[error("Field gender must be a string")]
    NotAString,
    #[error("Unrecognised gender: {0:?}")]
    UnknownGender(String),
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Inference service unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
    #[error("Inference service timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("Inference service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Inference service returned a non-JSON body: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(err)
        } else if err.is_connect() {
            GatewayError::Unreachable(err)
        } else if err.is_decode() {
            GatewayError::Decode(err)
        } else {
            GatewayError::Transport(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum MalformedResponseError {
    #[error("Response has no prediction field")]
    MissingPrediction,
    #[error("Prediction has an unexpected type: {0}")]
    UnexpectedType(String),
    #[error("Prediction text is not a number: {0:?}")]
    Unparsable(String),
    #[error("Prediction is not finite")]
    NotFinite,
    #[error("Prediction is negative: {0}")]
    Negative(f64),
    #[error("Prediction is too large: {0}")]
    OutOfRange(f64),
}

/// Every way a single prediction request can fail.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Gateway failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("Malformed inference response: {0}")]
    MalformedResponse(#[from] MalformedResponseError),
}

impl PredictionError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::Validation(_) => "validation",
            PredictionError::Gateway(_) => "gateway",
            PredictionError::MalformedResponse(_) => "malformed_response",
        }
    }
}

use actix_files::Files;
use actix_web::{HttpResponse, web};
use futures::StreamExt;
use log::{error, info};
use serde_json::json;
use shared::ErrorResponse;
use std::path::PathBuf;
use uuid::Uuid;

use crate::prediction::error::{PredictionError, ValidationError};
use crate::prediction::service::{PredictionService, Stage};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: Option<PathBuf>) {
    cfg.service(web::resource("/api/predict-calories").route(web::post().to(predict_calories)))
        .service(web::resource("/api/health").route(web::get().to(health)));

    // Must stay last: it matches every path.
    if let Some(dir) = static_dir {
        cfg.service(Files::new("/", dir).index_file("index.html"));
    }
}

// Read by hand so an oversized body fails like any other bad input.
async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut, ValidationError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(ValidationError::BodyTooLarge(MAX_BODY_BYTES));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

async fn predict_calories(service: web::Data<PredictionService>, payload: web::Payload) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();

    let outcome = match read_body(payload).await {
        Ok(body) => service.predict(&request_id, &body).await,
        Err(e) => Err(PredictionError::from(e)),
    };

    match outcome {
        Ok(result) => {
            info!("[{}] Predicted {} kcal", request_id, result.calories);
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            error!("[{}] {} ({}): {}", request_id, Stage::Failed, e.kind(), e);
            HttpResponse::InternalServerError().json(ErrorResponse::prediction_failed())
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

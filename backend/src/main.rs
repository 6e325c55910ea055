mod config;
mod prediction;
mod routes;
#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::AppConfig;
use prediction::gateway::InferenceClient;
use prediction::service::PredictionService;
use routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::load().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let client = InferenceClient::new(&config.inference).map_err(|e| {
        log::error!("Failed to create inference client: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let service = PredictionService::new(client, config.gender_policy);

    log::info!(
        "Forwarding predictions to {} (timeout {:?})",
        config.inference.url,
        config.inference.timeout
    );
    log::info!("Gender policy: {:?}", config.gender_policy);
    match &config.static_dir {
        Some(dir) => log::info!("Serving frontend from {}", dir.display()),
        None => log::info!("No STATIC_DIR set; serving the API only"),
    }

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    let static_dir = config.static_dir.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(service.clone()))
            .configure(|cfg| configure_routes(cfg, static_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}

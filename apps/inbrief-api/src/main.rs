//! # InBrief API Server
//!
//! Company news backend: staff publish posts with images, the mobile app
//! reads the public feed.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod multipart;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Starting InBrief API server"
    );

    let state = AppState::new(&config).await?;
    let login_limiter = state.login_limiter.clone();
    let trust_forwarded_for = config.trust_forwarded_for;
    if trust_forwarded_for {
        tracing::info!("Login rate limit keyed on forwarded client address");
    }

    HttpServer::new(move || {
        let login_limiter = login_limiter.clone();
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| {
                handlers::configure_routes(cfg, login_limiter, trust_forwarded_for)
            })
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

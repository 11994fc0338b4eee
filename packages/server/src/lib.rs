#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the citywatch dashboard.
//!
//! Serves the REST API the map frontend polls every refresh cycle. Each
//! request triggers a fresh fan-out through the aggregation facade — the
//! server holds no snapshot state between requests, so a slow upstream
//! can never regress a newer response server-side.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use citywatch_ai::providers::{LlmProvider, create_provider_from_env};

/// Transport-level timeout for all upstream feed fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state.
pub struct AppState {
    /// HTTP client shared by all feed adapters.
    pub client: reqwest::Client,
    /// AI provider for hotspot analysis. `None` means every analysis
    /// runs the local clustering heuristic.
    pub provider: Option<Arc<dyn LlmProvider>>,
}

/// Registers all API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/incidents", web::get().to(handlers::incidents))
        .route("/cameras", web::get().to(handlers::cameras))
        .route("/news", web::get().to(handlers::news))
        .route("/radio-streams", web::get().to(handlers::radio_streams))
        .route("/alerts", web::get().to(handlers::alerts))
        .route("/snapshot", web::get().to(handlers::snapshot))
        .route(
            "/analyze-hotspots",
            web::post().to(handlers::analyze_hotspots),
        );
}

/// Starts the citywatch API server.
///
/// Builds the shared HTTP client, resolves the AI provider from the
/// environment (missing credentials are not fatal — analysis degrades to
/// the local heuristic), and starts the Actix-Web HTTP server. The
/// caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the shared HTTP client cannot be constructed.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    let provider = match create_provider_from_env() {
        Ok(provider) => Some(Arc::from(provider)),
        Err(e) => {
            log::info!("AI provider not configured ({e}); analysis will use the local heuristic");
            None
        }
    };

    let state = web::Data::new(AppState { client, provider });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

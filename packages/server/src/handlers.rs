//! HTTP handler functions for the citywatch API.

use actix_web::{HttpResponse, web};
use citywatch_aggregator as aggregator;
use citywatch_ai::analyze::analyze_hotspots as run_analysis;
use citywatch_server_models::{AnalyzeRequest, ApiHealth, CityQueryParams};
use citywatch_source::registry;

use crate::AppState;

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /incidents?city=<id>`
///
/// Crime + 311 incidents for the city, merged and sorted by priority.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<CityQueryParams>,
) -> HttpResponse {
    let city = registry::resolve_city(params.city.as_deref());
    let records = aggregator::fetch_incidents(&state.client, city).await;
    HttpResponse::Ok().json(records)
}

/// `GET /cameras?city=<id>`
///
/// The city's camera directory, sorted by viewers.
pub async fn cameras(
    state: web::Data<AppState>,
    params: web::Query<CityQueryParams>,
) -> HttpResponse {
    let city = registry::resolve_city(params.city.as_deref());
    let records = aggregator::fetch_cameras(&state.client, city).await;
    HttpResponse::Ok().json(records)
}

/// `GET /news`
///
/// The global news feed, newest first.
pub async fn news(state: web::Data<AppState>) -> HttpResponse {
    let articles = aggregator::fetch_news(&state.client).await;
    HttpResponse::Ok().json(articles)
}

/// `GET /radio-streams?city=<id>`
///
/// The city's static radio-stream list.
pub async fn radio_streams(params: web::Query<CityQueryParams>) -> HttpResponse {
    let city = registry::resolve_city(params.city.as_deref());
    HttpResponse::Ok().json(aggregator::fetch_radio_streams(city))
}

/// `GET /alerts?city=<id>`
///
/// The merged alert feed: high-priority incidents plus negative news,
/// newest first, with an explicit `kind` discriminant per entry.
pub async fn alerts(
    state: web::Data<AppState>,
    params: web::Query<CityQueryParams>,
) -> HttpResponse {
    let city = registry::resolve_city(params.city.as_deref());
    let (incidents, news) = futures::join!(
        aggregator::fetch_incidents(&state.client, city),
        aggregator::fetch_news(&state.client),
    );
    HttpResponse::Ok().json(aggregator::build_alerts(&incidents, &news))
}

/// `GET /snapshot?city=<id>`
///
/// One complete refresh cycle in a single poll: incidents, cameras,
/// news, and alerts assembled into an immutable snapshot value.
pub async fn snapshot(
    state: web::Data<AppState>,
    params: web::Query<CityQueryParams>,
) -> HttpResponse {
    let city = registry::resolve_city(params.city.as_deref());
    let snapshot = aggregator::fetch_city_snapshot(&state.client, city).await;
    HttpResponse::Ok().json(snapshot)
}

/// `POST /analyze-hotspots`
///
/// Runs one analysis pass over the submitted records. The body is always
/// an `AnalysisResult`; when the local heuristic ran instead of the AI
/// provider, the `x-analysis-degraded` response header carries the
/// reason.
pub async fn analyze_hotspots(
    state: web::Data<AppState>,
    body: web::Json<AnalyzeRequest>,
) -> HttpResponse {
    let outcome = run_analysis(
        state.provider.as_deref(),
        &body.incidents,
        &body.cameras,
        &body.news,
    )
    .await;

    match outcome.degraded_reason() {
        Some(reason) => HttpResponse::Ok()
            .insert_header(("x-analysis-degraded", reason))
            .json(outcome.result()),
        None => HttpResponse::Ok().json(outcome.result()),
    }
}

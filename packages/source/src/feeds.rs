//! Feed-level fetch entry points.
//!
//! One function per record kind: dispatch on the feed's [`FetcherConfig`],
//! fetch the raw slice, and normalize it. These are the adapter
//! boundaries — callers absorb the returned [`SourceError`] into an empty
//! list (the aggregation facade never propagates feed failures).

use citywatch_source_models::{CameraRecord, IncidentRecord, NewsArticle, RadioStream};
use serde_json::Value;

use crate::arcgis::{ArcGisConfig, fetch_arcgis};
use crate::json_list::{JsonListConfig, fetch_json_list};
use crate::normalize::{normalize_article, normalize_camera, normalize_incident};
use crate::socrata::{SocrataConfig, fetch_socrata};
use crate::source_def::{
    CameraFeedDefinition, CityDefinition, FetcherConfig, IncidentFeedDefinition,
    NewsFeedDefinition,
};
use crate::SourceError;

/// Fetches one raw record slice for any fetcher kind.
async fn fetch_raw(
    client: &reqwest::Client,
    fetcher: &FetcherConfig,
    label: &str,
    query: &[(String, String)],
) -> Result<Vec<Value>, SourceError> {
    match fetcher {
        FetcherConfig::Socrata {
            api_url,
            date_column,
            limit,
        } => {
            fetch_socrata(
                client,
                &SocrataConfig {
                    api_url,
                    date_column,
                    limit: *limit,
                    label,
                },
            )
            .await
        }
        FetcherConfig::Arcgis {
            query_url,
            page_size,
            where_clause,
        } => {
            fetch_arcgis(
                client,
                &ArcGisConfig {
                    query_url,
                    page_size: *page_size,
                    where_clause: where_clause.as_deref(),
                    label,
                },
            )
            .await
        }
        FetcherConfig::JsonList {
            api_url,
            records_path,
        } => {
            fetch_json_list(
                client,
                &JsonListConfig {
                    api_url,
                    records_path: records_path.as_deref(),
                    query,
                    label,
                },
            )
            .await
        }
    }
}

/// Fetches and normalizes one incident feed (crime or 311).
///
/// # Errors
///
/// Returns [`SourceError`] if the fetch fails; rows that fail to
/// normalize are dropped silently.
pub async fn fetch_incident_feed(
    client: &reqwest::Client,
    feed: &IncidentFeedDefinition,
) -> Result<Vec<IncidentRecord>, SourceError> {
    let raw = fetch_raw(client, &feed.fetcher, &feed.label, &[]).await?;
    let incidents: Vec<IncidentRecord> = raw
        .iter()
        .filter_map(|record| normalize_incident(record, feed))
        .collect();
    log::info!(
        "{}: normalized {} of {} raw records",
        feed.label,
        incidents.len(),
        raw.len()
    );
    Ok(incidents)
}

/// Fetches and normalizes one camera directory feed.
///
/// # Errors
///
/// Returns [`SourceError`] if the fetch fails.
pub async fn fetch_camera_feed(
    client: &reqwest::Client,
    feed: &CameraFeedDefinition,
) -> Result<Vec<CameraRecord>, SourceError> {
    let raw = fetch_raw(client, &feed.fetcher, &feed.label, &[]).await?;
    let cameras: Vec<CameraRecord> = raw
        .iter()
        .filter_map(|record| normalize_camera(record, feed))
        .collect();
    log::info!(
        "{}: normalized {} of {} raw records",
        feed.label,
        cameras.len(),
        raw.len()
    );
    Ok(cameras)
}

/// Fetches and normalizes the news aggregator feed.
///
/// When the config names an API-key environment variable and it is set,
/// the key is appended as a query parameter; otherwise the request goes
/// out bare (and the provider decides whether to serve it).
///
/// # Errors
///
/// Returns [`SourceError`] if the fetch fails.
pub async fn fetch_news_feed(
    client: &reqwest::Client,
    feed: &NewsFeedDefinition,
) -> Result<Vec<NewsArticle>, SourceError> {
    let mut query: Vec<(String, String)> = Vec::new();
    if let (Some(env_name), Some(param)) = (&feed.api_key_env, &feed.api_key_param)
        && let Ok(key) = std::env::var(env_name)
    {
        query.push((param.clone(), key));
    }

    let raw = fetch_raw(client, &feed.fetcher, &feed.label, &query).await?;
    let articles: Vec<NewsArticle> = raw
        .iter()
        .filter_map(|record| normalize_article(record, feed))
        .collect();
    log::info!(
        "{}: normalized {} of {} raw records",
        feed.label,
        articles.len(),
        raw.len()
    );
    Ok(articles)
}

/// Returns the static radio-stream list for a city.
#[must_use]
pub fn radio_streams(city: &CityDefinition) -> Vec<RadioStream> {
    city.radio
        .iter()
        .map(|entry| RadioStream {
            id: entry.id.clone(),
            name: entry.name.clone(),
            url: entry.url.clone(),
            genre: entry.genre.clone(),
            region: entry.region.clone(),
        })
        .collect()
}

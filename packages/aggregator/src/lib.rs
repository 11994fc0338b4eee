#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fan-out aggregation facade.
//!
//! For a given city, concurrently queries all applicable feed adapters
//! (join-all semantics), absorbs individual feed failures into empty
//! results, and merges the survivors into a deterministically sorted,
//! immutable-per-cycle [`CitySnapshot`]. Nothing here retries and nothing
//! propagates a feed error to the caller — a data-source outage degrades
//! the snapshot, never the request.

use chrono::{DateTime, Utc};
use citywatch_incident_models::Sentiment;
use citywatch_source::SourceError;
use citywatch_source::feeds::{
    fetch_camera_feed, fetch_incident_feed, fetch_news_feed, radio_streams,
};
use citywatch_source::registry;
use citywatch_source::source_def::CityDefinition;
use citywatch_source_models::{
    AlertItem, CameraRecord, IncidentRecord, NewsArticle, RadioStream,
};
use futures::future::join_all;
use serde::Serialize;

/// Incidents at or above this priority enter the alert feed.
const ALERT_PRIORITY_FLOOR: u8 = 75;

/// Upper bound on the merged alert feed.
const MAX_ALERTS: usize = 50;

/// One city's aggregated view for a single fetch-render cycle.
///
/// Owned and immutable once built — the fetch stage hands it to the
/// render stage whole, and the next cycle replaces it wholesale.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySnapshot {
    /// City code this snapshot covers.
    pub city: String,
    /// Crime + 311 incidents, priority descending.
    pub incidents: Vec<IncidentRecord>,
    /// Cameras, viewers descending.
    pub cameras: Vec<CameraRecord>,
    /// News articles, newest first.
    pub news: Vec<NewsArticle>,
    /// Merged alert feed (high-priority incidents + negative news).
    pub alerts: Vec<AlertItem>,
    /// When this snapshot was assembled.
    pub fetched_at: DateTime<Utc>,
}

/// Absorbs one feed result: failures are logged and contribute nothing.
fn absorb<T>(feed_id: &str, result: Result<Vec<T>, SourceError>) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(e) => {
            log::warn!("{feed_id}: feed failed, contributing no records: {e}");
            Vec::new()
        }
    }
}

/// Merges per-feed incident results, absorbing failures, and sorts the
/// survivors priority-descending (ties: newest first, then id — the
/// output order is fully deterministic).
#[must_use]
pub fn merge_incidents(
    results: Vec<(String, Result<Vec<IncidentRecord>, SourceError>)>,
) -> Vec<IncidentRecord> {
    let mut merged: Vec<IncidentRecord> = results
        .into_iter()
        .flat_map(|(feed_id, result)| absorb(&feed_id, result))
        .collect();

    merged.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.occurred_at.cmp(&a.occurred_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    merged
}

/// Merges per-feed camera results, absorbing failures, and sorts the
/// survivors viewers-descending (ties: id).
#[must_use]
pub fn merge_cameras(
    results: Vec<(String, Result<Vec<CameraRecord>, SourceError>)>,
) -> Vec<CameraRecord> {
    let mut merged: Vec<CameraRecord> = results
        .into_iter()
        .flat_map(|(feed_id, result)| absorb(&feed_id, result))
        .collect();

    merged.sort_by(|a, b| b.viewers.cmp(&a.viewers).then_with(|| a.id.cmp(&b.id)));
    merged
}

/// Builds the merged alert feed: high-priority incidents plus
/// negative-sentiment news, newest first, bounded.
///
/// The discriminant is resolved here, once — consumers never re-infer
/// record kinds from which optional fields are present.
#[must_use]
pub fn build_alerts(incidents: &[IncidentRecord], news: &[NewsArticle]) -> Vec<AlertItem> {
    let mut alerts: Vec<AlertItem> = incidents
        .iter()
        .filter(|incident| incident.priority >= ALERT_PRIORITY_FLOOR)
        .cloned()
        .map(AlertItem::Incident)
        .chain(
            news.iter()
                .filter(|article| article.sentiment == Some(Sentiment::Negative))
                .cloned()
                .map(AlertItem::News),
        )
        .collect();

    alerts.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    alerts.truncate(MAX_ALERTS);
    alerts
}

/// Fetches and merges all incident feeds (crime + 311) for a city.
pub async fn fetch_incidents(
    client: &reqwest::Client,
    city: &CityDefinition,
) -> Vec<IncidentRecord> {
    let mut feeds = vec![&city.crime];
    if let Some(civic) = &city.civic {
        feeds.push(civic);
    }

    let results = join_all(feeds.into_iter().map(|feed| async move {
        (feed.id.clone(), fetch_incident_feed(client, feed).await)
    }))
    .await;

    merge_incidents(results)
}

/// Fetches and merges the camera directory for a city. Cities without a
/// configured directory yield an empty list.
pub async fn fetch_cameras(
    client: &reqwest::Client,
    city: &CityDefinition,
) -> Vec<CameraRecord> {
    let Some(feed) = &city.cameras else {
        return Vec::new();
    };
    let result = fetch_camera_feed(client, feed).await;
    merge_cameras(vec![(feed.id.clone(), result)])
}

/// Fetches the global news feed. Failures degrade to an empty list.
pub async fn fetch_news(client: &reqwest::Client) -> Vec<NewsArticle> {
    let feed = registry::news_feed();
    let mut articles = absorb(&feed.id, fetch_news_feed(client, feed).await);
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    articles
}

/// Returns the static radio-stream list for a city.
#[must_use]
pub fn fetch_radio_streams(city: &CityDefinition) -> Vec<RadioStream> {
    radio_streams(city)
}

/// Assembles a complete per-cycle snapshot for a city.
///
/// All feeds are fetched concurrently; the snapshot is built once every
/// fetch resolves (individually failure-tolerant).
pub async fn fetch_city_snapshot(
    client: &reqwest::Client,
    city: &CityDefinition,
) -> CitySnapshot {
    let (incidents, cameras, news) = futures::join!(
        fetch_incidents(client, city),
        fetch_cameras(client, city),
        fetch_news(client),
    );

    let alerts = build_alerts(&incidents, &news);

    log::info!(
        "{}: snapshot assembled — {} incidents, {} cameras, {} articles, {} alerts",
        city.id,
        incidents.len(),
        cameras.len(),
        news.len(),
        alerts.len(),
    );

    CitySnapshot {
        city: city.id.clone(),
        incidents,
        cameras,
        news,
        alerts,
        fetched_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use citywatch_incident_models::{CameraStatus, IncidentStatus};

    fn incident(id: &str, priority: u8, hour: u32) -> IncidentRecord {
        IncidentRecord {
            id: id.to_string(),
            title: "THEFT".to_string(),
            address: None,
            latitude: 41.9,
            longitude: -87.6,
            occurred_at: Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap(),
            source: "test_crime".to_string(),
            category: "THEFT".to_string(),
            priority,
            status: IncidentStatus::Unknown,
            description: None,
        }
    }

    fn article(title: &str, sentiment: Sentiment, hour: u32) -> NewsArticle {
        NewsArticle {
            id: None,
            title: title.to_string(),
            source: "Example Tribune".to_string(),
            published_at: Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap(),
            sentiment: Some(sentiment),
            category: None,
            location: None,
        }
    }

    fn camera(id: &str, viewers: u32) -> CameraRecord {
        CameraRecord {
            id: id.to_string(),
            name: format!("Camera {id}"),
            url: String::new(),
            stream_url: None,
            location: "Test & Main".to_string(),
            status: CameraStatus::Unknown,
            latitude: None,
            longitude: None,
            viewers,
            source: None,
        }
    }

    fn failure() -> SourceError {
        SourceError::Normalization {
            message: "upstream returned HTML".to_string(),
        }
    }

    #[test]
    fn failing_feed_is_excluded_but_others_survive() {
        let results = vec![
            (
                "crime".to_string(),
                Ok(vec![incident("a", 80, 9), incident("b", 60, 10)]),
            ),
            ("civic".to_string(), Err(failure())),
        ];
        let merged = merge_incidents(results);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "a");
        assert_eq!(merged[1].id, "b");
    }

    #[test]
    fn incidents_sort_by_priority_then_recency_then_id() {
        let results = vec![(
            "crime".to_string(),
            Ok(vec![
                incident("late-low", 40, 12),
                incident("early-high", 90, 8),
                incident("b-tie", 70, 10),
                incident("a-tie", 70, 10),
                incident("newer-tie", 70, 11),
            ]),
        )];
        let merged = merge_incidents(results);
        let ids: Vec<&str> = merged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["early-high", "newer-tie", "a-tie", "b-tie", "late-low"]
        );
    }

    #[test]
    fn all_feeds_failing_yields_empty_not_error() {
        let results = vec![
            ("crime".to_string(), Err(failure())),
            ("civic".to_string(), Err(failure())),
        ];
        assert!(merge_incidents(results).is_empty());
    }

    #[test]
    fn cameras_sort_by_viewers_descending() {
        let results = vec![(
            "cams".to_string(),
            Ok(vec![camera("a", 10), camera("b", 300), camera("c", 120)]),
        )];
        let merged = merge_cameras(results);
        let ids: Vec<&str> = merged.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn alert_feed_filters_and_orders() {
        let incidents = vec![
            incident("high", 90, 9),
            incident("floor", 75, 11),
            incident("below", 74, 12),
        ];
        let news = vec![
            article("Fire downtown", Sentiment::Negative, 10),
            article("Park reopens", Sentiment::Positive, 13),
        ];
        let alerts = build_alerts(&incidents, &news);

        // "below" (priority 74) and the positive article are excluded;
        // the rest are newest-first.
        assert_eq!(alerts.len(), 3);
        assert!(matches!(&alerts[0], AlertItem::Incident(i) if i.id == "floor"));
        assert!(matches!(&alerts[1], AlertItem::News(n) if n.title == "Fire downtown"));
        assert!(matches!(&alerts[2], AlertItem::Incident(i) if i.id == "high"));
    }

    #[test]
    fn alert_feed_is_bounded() {
        let incidents: Vec<IncidentRecord> = (0..80u32)
            .map(|i| incident(&format!("i{i}"), 90, i % 24))
            .collect();
        let alerts = build_alerts(&incidents, &[]);
        assert_eq!(alerts.len(), MAX_ALERTS);
    }
}

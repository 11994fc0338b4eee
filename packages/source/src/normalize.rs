//! Field-mapping normalization.
//!
//! Applies a feed's candidate-field mapping to raw JSON records,
//! producing canonical [`IncidentRecord`] / [`CameraRecord`] /
//! [`NewsArticle`] values. Records that cannot be normalized (missing id,
//! missing coordinates on incident feeds) are dropped, never errors —
//! one bad row must not poison a feed.

use chrono::{DateTime, NaiveDateTime, Utc};
use citywatch_incident_models::{CameraStatus, IncidentStatus};
use citywatch_source_models::{CameraRecord, IncidentRecord, NewsArticle};
use serde_json::Value;

use crate::priority::score_incident;
use crate::sentiment;
use crate::source_def::{CameraFeedDefinition, IncidentFeedDefinition, NewsFeedDefinition};

/// Simulated viewer counts fall in `[VIEWER_MIN, VIEWER_MIN + VIEWER_SPAN)`.
const VIEWER_MIN: u32 = 25;
const VIEWER_SPAN: u32 = 475;

/// Follows a dotted path into a JSON record (`"source.name"`).
fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |value, key| value.get(key))
}

/// Returns the first candidate field present as a non-empty string.
/// Numeric values are stringified.
fn first_string(record: &Value, candidates: &[String]) -> Option<String> {
    for candidate in candidates {
        match lookup(record, candidate) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

/// Returns the first candidate field parseable as a float. Providers
/// serve coordinates as both numbers and numeric strings.
fn first_f64(record: &Value, candidates: &[String]) -> Option<f64> {
    for candidate in candidates {
        match lookup(record, candidate) {
            Some(Value::Number(n)) => return n.as_f64(),
            Some(Value::String(s)) => {
                if let Ok(parsed) = s.parse::<f64>() {
                    return Some(parsed);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses a coordinate pair. Zero or missing coordinates are rejected —
/// several providers null out redacted locations as `0.0`.
fn first_coordinates(
    record: &Value,
    lat_candidates: &[String],
    lng_candidates: &[String],
) -> Option<(f64, f64)> {
    let latitude = first_f64(record, lat_candidates)?;
    let longitude = first_f64(record, lng_candidates)?;
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    Some((latitude, longitude))
}

/// Parses a provider datetime: RFC 3339, Socrata floating ISO 8601 (with
/// or without fractional seconds), or `ArcGIS` epoch milliseconds.
fn parse_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(naive.and_utc());
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                return Some(naive.and_utc());
            }
            None
        }
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

/// Returns the first candidate field parseable as a datetime.
fn first_datetime(record: &Value, candidates: &[String]) -> Option<DateTime<Utc>> {
    candidates
        .iter()
        .filter_map(|candidate| lookup(record, candidate))
        .find_map(parse_datetime)
}

/// Deterministic FNV-1a hash of a camera id, used to simulate the
/// directory's popularity metric. Stable across runs so the same camera
/// keeps the same viewer count between refresh cycles.
fn simulate_viewers(id: &str) -> u32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    let mut hash = FNV_OFFSET;
    for byte in id.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    VIEWER_MIN + hash % VIEWER_SPAN
}

/// Normalizes one raw record from an incident feed.
///
/// Returns `None` when the record lacks an id or valid coordinates —
/// such records cannot be placed on the map and are dropped.
#[must_use]
pub fn normalize_incident(record: &Value, feed: &IncidentFeedDefinition) -> Option<IncidentRecord> {
    let id = first_string(record, &feed.fields.id)?;
    let (latitude, longitude) =
        first_coordinates(record, &feed.fields.latitude, &feed.fields.longitude)?;

    let category = first_string(record, &feed.fields.category).unwrap_or_default();
    let description = first_string(record, &feed.fields.description);
    let address = first_string(record, &feed.fields.address);

    let status = first_string(record, &feed.fields.status)
        .map_or(IncidentStatus::Unknown, |s| IncidentStatus::from_text(&s));

    let occurred_at =
        first_datetime(record, &feed.fields.occurred_at).unwrap_or_else(Utc::now);

    let priority = score_incident(
        &category,
        description.as_deref(),
        status,
        occurred_at,
        feed.baseline_priority,
    );

    let title = if category.is_empty() {
        feed.label.clone()
    } else {
        category.clone()
    };

    Some(IncidentRecord {
        id,
        title,
        address,
        latitude,
        longitude,
        occurred_at,
        source: feed.id.clone(),
        category,
        priority,
        status,
        description,
    })
}

/// Normalizes one raw record from a camera directory.
///
/// Cameras without coordinates are kept (they still appear in list
/// panels) — only records without an id are dropped.
#[must_use]
pub fn normalize_camera(record: &Value, feed: &CameraFeedDefinition) -> Option<CameraRecord> {
    let id = first_string(record, &feed.fields.id)?;
    let name = first_string(record, &feed.fields.name).unwrap_or_else(|| format!("Camera {id}"));

    let stream_url = first_string(record, &feed.fields.stream_url);
    let url = first_string(record, &feed.fields.url)
        .or_else(|| stream_url.clone())
        .or_else(|| feed.directory_url.clone())
        .unwrap_or_default();

    let location = first_string(record, &feed.fields.location).unwrap_or_else(|| name.clone());

    let status = first_string(record, &feed.fields.status)
        .map_or(CameraStatus::Unknown, |s| CameraStatus::from_text(&s));

    let coordinates =
        first_coordinates(record, &feed.fields.latitude, &feed.fields.longitude);

    let viewers = first_f64(record, &feed.fields.viewers).map_or_else(
        || simulate_viewers(&id),
        |v| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let v = v.max(0.0) as u32;
            v
        },
    );

    Some(CameraRecord {
        id,
        name,
        url,
        stream_url,
        location,
        status,
        latitude: coordinates.map(|(lat, _)| lat),
        longitude: coordinates.map(|(_, lng)| lng),
        viewers,
        source: Some(feed.id.clone()),
    })
}

/// Normalizes one raw article from the news aggregator, attaching the
/// keyword-derived sentiment label.
#[must_use]
pub fn normalize_article(record: &Value, feed: &NewsFeedDefinition) -> Option<NewsArticle> {
    let title = first_string(record, &feed.fields.title)?;
    let source =
        first_string(record, &feed.fields.source).unwrap_or_else(|| feed.label.clone());
    let published_at =
        first_datetime(record, &feed.fields.published_at).unwrap_or_else(Utc::now);

    let mut sentiment_text = title.clone();
    if let Some(extra) = first_string(record, &feed.fields.sentiment_text) {
        sentiment_text.push(' ');
        sentiment_text.push_str(&extra);
    }

    Some(NewsArticle {
        id: first_string(record, &feed.fields.id),
        title,
        source,
        published_at,
        sentiment: Some(sentiment::classify(&sentiment_text)),
        category: first_string(record, &feed.fields.category),
        location: first_string(record, &feed.fields.location),
    })
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical normalized record shapes for all data feeds.
//!
//! Every data provider (crime API, 311 API, CCTV directory, news
//! aggregator, radio-stream list) produces records in these shapes after
//! parsing and field mapping. Records live for exactly one fetch-render
//! cycle; there is no update-in-place and no cross-cycle identity.

use chrono::{DateTime, Utc};
use citywatch_incident_models::{CameraStatus, IncidentStatus, Sentiment};
use serde::{Deserialize, Serialize};

/// A crime or 311 incident normalized to the canonical schema.
///
/// Adapters drop records without valid coordinates before normalization,
/// so `latitude`/`longitude` are always present here — everything in this
/// type is placeable on the map and eligible for clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Original incident ID from the data source.
    pub id: String,
    /// Short human-readable title (usually the source category string).
    pub title: String,
    /// Block-level address, when the source provides one.
    pub address: Option<String>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// When the incident occurred or was reported.
    pub occurred_at: DateTime<Utc>,
    /// Feed identifier this record came from (e.g., `"chicago_crime"`).
    pub source: String,
    /// Raw source category string (e.g., `"HOMICIDE"`, `"Pothole in Street"`).
    pub category: String,
    /// Priority score in [0, 100], assigned by the priority scorer.
    pub priority: u8,
    /// Case/resolution status.
    pub status: IncidentStatus,
    /// Longer free-text description, when available.
    #[serde(default)]
    pub description: Option<String>,
}

/// A CCTV camera from a municipal camera directory.
///
/// Coordinates are optional — cameras without them are still listed but
/// excluded from map placement and hotspot clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraRecord {
    /// Directory identifier for the camera.
    pub id: String,
    /// Human-readable camera name.
    pub name: String,
    /// Directory or detail page URL.
    pub url: String,
    /// Direct stream URL, when the directory publishes one.
    #[serde(default)]
    pub stream_url: Option<String>,
    /// Textual location description (intersection, landmark).
    pub location: String,
    /// Operational status.
    pub status: CameraStatus,
    /// Latitude (WGS84), if known.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude (WGS84), if known.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Simulated popularity metric — deterministic per camera id, not a
    /// measured value.
    pub viewers: u32,
    /// Feed identifier this record came from.
    #[serde(default)]
    pub source: Option<String>,
}

/// A news article from the aggregator feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    /// Aggregator identifier (often the article URL).
    #[serde(default)]
    pub id: Option<String>,
    /// Headline.
    pub title: String,
    /// Publisher name.
    pub source: String,
    /// Publication time.
    pub published_at: DateTime<Utc>,
    /// Keyword-derived sentiment label.
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    /// Aggregator category, when provided.
    #[serde(default)]
    pub category: Option<String>,
    /// Location string extracted by the aggregator, when provided.
    #[serde(default)]
    pub location: Option<String>,
}

/// A radio stream descriptor from the static per-city list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioStream {
    /// Stable stream identifier.
    pub id: String,
    /// Human-readable stream name.
    pub name: String,
    /// Stream URL.
    pub url: String,
    /// Genre label (e.g., `"public-safety"`, `"news"`).
    #[serde(default)]
    pub genre: Option<String>,
    /// Coverage region description.
    #[serde(default)]
    pub region: Option<String>,
}

/// One entry in the merged alert feed.
///
/// The discriminant is resolved once at ingestion — consumers switch on
/// `kind` instead of probing which optional fields happen to be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AlertItem {
    /// A high-priority incident record.
    #[serde(rename = "incident")]
    Incident(IncidentRecord),
    /// A negative-sentiment news article.
    #[serde(rename = "news")]
    News(NewsArticle),
}

impl AlertItem {
    /// The timestamp used to order the merged alert feed.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Incident(incident) => incident.occurred_at,
            Self::News(article) => article.published_at,
        }
    }
}

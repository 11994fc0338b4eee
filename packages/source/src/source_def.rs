//! Config-driven data feed definitions.
//!
//! A [`CityDefinition`] captures everything unique about one city's feeds
//! in a serializable config struct. A single generic implementation
//! handles all cities, eliminating per-city boilerplate. Configs are
//! embedded as TOML at compile time by [`crate::registry`].

use serde::Deserialize;

use crate::SourceError;

/// Default baseline priority for incident feeds that don't override it.
const fn default_baseline_priority() -> u8 {
    50
}

/// A complete city configuration: incident feeds, camera directory, and
/// the static radio-stream list.
#[derive(Debug, Deserialize)]
pub struct CityDefinition {
    /// Short city code used in API queries (e.g., `"chicago"`).
    pub id: String,
    /// Human-readable city name.
    pub name: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Whether unknown city codes fall back to this city.
    #[serde(default)]
    pub default: bool,
    /// Municipal crime feed.
    pub crime: IncidentFeedDefinition,
    /// 311 civic service request feed, if the city publishes one.
    pub civic: Option<IncidentFeedDefinition>,
    /// CCTV camera directory, if the city publishes one.
    pub cameras: Option<CameraFeedDefinition>,
    /// Static radio-stream descriptors.
    #[serde(default)]
    pub radio: Vec<RadioEntry>,
}

/// One incident-producing feed (crime or 311).
#[derive(Debug, Deserialize)]
pub struct IncidentFeedDefinition {
    /// Unique feed identifier (e.g., `"chicago_crime"`).
    pub id: String,
    /// Label for log messages.
    pub label: String,
    /// Priority assigned when no tier keyword matches. Crime feeds use
    /// the generic baseline of 50; 311 feeds set a lower one.
    #[serde(default = "default_baseline_priority")]
    pub baseline_priority: u8,
    /// How to fetch raw records.
    pub fetcher: FetcherConfig,
    /// Candidate source field names per logical field.
    pub fields: IncidentFieldMapping,
}

/// A CCTV camera directory feed.
#[derive(Debug, Deserialize)]
pub struct CameraFeedDefinition {
    /// Unique feed identifier (e.g., `"nyc_cameras"`).
    pub id: String,
    /// Label for log messages.
    pub label: String,
    /// Fallback detail-page URL when records carry none.
    #[serde(default)]
    pub directory_url: Option<String>,
    /// How to fetch raw records.
    pub fetcher: FetcherConfig,
    /// Candidate source field names per logical field.
    pub fields: CameraFieldMapping,
}

/// The news aggregator feed (global, not per-city).
#[derive(Debug, Deserialize)]
pub struct NewsFeedDefinition {
    /// Unique feed identifier.
    pub id: String,
    /// Label for log messages.
    pub label: String,
    /// Environment variable holding the aggregator API key, if one is
    /// required.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Query parameter name the API key is passed as.
    #[serde(default)]
    pub api_key_param: Option<String>,
    /// How to fetch raw records.
    pub fetcher: FetcherConfig,
    /// Candidate source field names per logical field.
    pub fields: NewsFieldMapping,
}

/// How to fetch raw records from a provider API.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetcherConfig {
    /// Socrata SODA API: one recent slice via `$limit`/`$order`.
    Socrata {
        /// Base Socrata API URL.
        api_url: String,
        /// Date column for ordering.
        date_column: String,
        /// Records to fetch per cycle.
        limit: u64,
    },
    /// `ArcGIS` REST API `FeatureServer`/`MapServer` query endpoint.
    Arcgis {
        /// Query URL.
        query_url: String,
        /// Records to fetch per cycle.
        page_size: u64,
        /// Optional WHERE clause. Defaults to `"1=1"`.
        where_clause: Option<String>,
    },
    /// Plain JSON endpoint returning an array (optionally nested).
    JsonList {
        /// API URL.
        api_url: String,
        /// Dotted path to the record array inside the response body.
        /// `None` when the body is the array itself.
        records_path: Option<String>,
    },
}

/// Candidate source field names for incident normalization.
///
/// For each logical field the first candidate present in the raw record
/// wins. Empty candidate lists mean the source never provides the field.
#[derive(Debug, Deserialize)]
pub struct IncidentFieldMapping {
    /// Incident identifier.
    pub id: Vec<String>,
    /// Category / incident type.
    pub category: Vec<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Vec<String>,
    /// Occurrence timestamp.
    pub occurred_at: Vec<String>,
    /// Latitude.
    pub latitude: Vec<String>,
    /// Longitude.
    pub longitude: Vec<String>,
    /// Block-level address.
    #[serde(default)]
    pub address: Vec<String>,
    /// Case/resolution status.
    #[serde(default)]
    pub status: Vec<String>,
}

/// Candidate source field names for camera normalization.
#[derive(Debug, Deserialize)]
pub struct CameraFieldMapping {
    /// Camera identifier.
    pub id: Vec<String>,
    /// Camera name.
    pub name: Vec<String>,
    /// Detail page URL.
    #[serde(default)]
    pub url: Vec<String>,
    /// Direct stream URL.
    #[serde(default)]
    pub stream_url: Vec<String>,
    /// Textual location.
    #[serde(default)]
    pub location: Vec<String>,
    /// Operational status.
    #[serde(default)]
    pub status: Vec<String>,
    /// Latitude.
    pub latitude: Vec<String>,
    /// Longitude.
    pub longitude: Vec<String>,
    /// Viewer count, when the directory publishes one.
    #[serde(default)]
    pub viewers: Vec<String>,
}

/// Candidate source field names for news normalization.
#[derive(Debug, Deserialize)]
pub struct NewsFieldMapping {
    /// Article identifier (often the URL).
    #[serde(default)]
    pub id: Vec<String>,
    /// Headline.
    pub title: Vec<String>,
    /// Publisher name. Dotted paths (e.g., `"source.name"`) descend into
    /// nested objects.
    pub source: Vec<String>,
    /// Publication timestamp.
    pub published_at: Vec<String>,
    /// Text fields fed to sentiment classification in addition to the
    /// headline.
    #[serde(default)]
    pub sentiment_text: Vec<String>,
    /// Aggregator category.
    #[serde(default)]
    pub category: Vec<String>,
    /// Location string.
    #[serde(default)]
    pub location: Vec<String>,
}

/// A static radio-stream descriptor from a city config.
#[derive(Debug, Clone, Deserialize)]
pub struct RadioEntry {
    /// Stable stream identifier.
    pub id: String,
    /// Human-readable stream name.
    pub name: String,
    /// Stream URL.
    pub url: String,
    /// Genre label.
    #[serde(default)]
    pub genre: Option<String>,
    /// Coverage region description.
    #[serde(default)]
    pub region: Option<String>,
}

/// Parses a city definition from TOML config text.
///
/// # Errors
///
/// Returns [`SourceError::Normalization`] if the TOML is malformed.
pub fn parse_city_toml(text: &str) -> Result<CityDefinition, SourceError> {
    toml::from_str(text).map_err(|e| SourceError::Normalization {
        message: format!("invalid city config: {e}"),
    })
}

/// Parses the news feed definition from TOML config text.
///
/// # Errors
///
/// Returns [`SourceError::Normalization`] if the TOML is malformed.
pub fn parse_news_toml(text: &str) -> Result<NewsFeedDefinition, SourceError> {
    toml::from_str(text).map_err(|e| SourceError::Normalization {
        message: format!("invalid news config: {e}"),
    })
}

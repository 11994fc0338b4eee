#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the citywatch server.
//!
//! These types are serialized to JSON for the REST API. The record shapes
//! themselves live in `citywatch_source_models` and are served as-is;
//! this crate only adds the request envelopes and service metadata types.

use citywatch_source_models::{CameraRecord, IncidentRecord, NewsArticle};
use serde::{Deserialize, Serialize};

/// Query parameters for the city-scoped endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQueryParams {
    /// City short code. Unknown or missing codes resolve to the default
    /// city.
    pub city: Option<String>,
}

/// Request body for the analyze-hotspots endpoint.
///
/// All fields default to empty so partial bodies analyze whatever was
/// sent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Incident records to cluster.
    #[serde(default)]
    pub incidents: Vec<IncidentRecord>,
    /// Camera records to cluster.
    #[serde(default)]
    pub cameras: Vec<CameraRecord>,
    /// News articles (context for the AI path; unused by the local
    /// clusterer).
    #[serde(default)]
    pub news: Vec<NewsArticle>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

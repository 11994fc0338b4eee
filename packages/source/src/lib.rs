#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Config-driven data feed adapters.
//!
//! Each external provider (crime API, 311 API, CCTV directory, news
//! aggregator, radio-stream list) is described by a [`source_def`] config
//! embedded as TOML in [`registry`]. A single generic implementation per
//! fetcher kind handles the HTTP call; [`normalize`] maps the raw records
//! into the canonical shapes via candidate-field mappings; [`priority`]
//! assigns incident scores at ingestion.
//!
//! Adapters never throw past their boundary by contract — callers absorb
//! [`SourceError`] into an empty result and log it.

pub mod arcgis;
pub mod feeds;
pub mod json_list;
pub mod normalize;
pub mod priority;
pub mod registry;
pub mod sentiment;
pub mod socrata;
pub mod source_def;

/// Errors that can occur during data feed operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data normalization error.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },
}

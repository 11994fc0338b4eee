#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hotspot analysis result types.
//!
//! Output shapes for one clustering pass over a city snapshot. These are
//! derived, ephemeral values — recomputed every cycle and never persisted.
//! The external AI analysis call must produce the same [`AnalysisResult`]
//! shape, so these types double as its JSON contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coarse threat label derived from mean hotspot intensity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThreatLevel {
    /// Mean intensity at or below 40 (or no hotspots at all)
    Low,
    /// Mean intensity above 40
    Medium,
    /// Mean intensity above 70
    High,
}

impl ThreatLevel {
    /// Derives the threat level from a mean hotspot intensity.
    #[must_use]
    pub fn from_mean_intensity(mean: f64) -> Self {
        if mean > 70.0 {
            Self::High
        } else if mean > 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// A derived geographic cluster summarizing incident/camera density and
/// weighted intensity within one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Grid cell center latitude (one decimal place).
    pub latitude: f64,
    /// Grid cell center longitude (one decimal place).
    pub longitude: f64,
    /// Weighted intensity in [0, 100].
    pub intensity: f64,
    /// Human-readable summary of the cell's contents.
    pub description: String,
    /// Incidents contributing to this cell.
    #[serde(default)]
    pub incident_count: u32,
    /// High-viewership cameras contributing to this cell.
    #[serde(default)]
    pub camera_count: u32,
    /// Title of the highest-priority incident in the cell, if any.
    #[serde(default)]
    pub top_incident: Option<String>,
}

/// A co-occurrence of incidents and camera coverage within one hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    /// Hotspot cell center latitude.
    pub latitude: f64,
    /// Hotspot cell center longitude.
    pub longitude: f64,
    /// Description of the co-occurrence.
    pub description: String,
    /// Incidents in the cell.
    #[serde(default)]
    pub incident_count: u32,
    /// Cameras covering the cell.
    #[serde(default)]
    pub camera_count: u32,
}

/// Output of one clustering pass (local heuristic or external AI call).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Ranked, size-bounded hotspot list (intensity descending).
    pub hotspots: Vec<Hotspot>,
    /// Incident/camera co-occurrences for the top hotspots.
    pub correlations: Vec<Correlation>,
    /// Coarse threat label derived from mean hotspot intensity.
    pub threat_level: ThreatLevel,
    /// One-line summary of the pass.
    pub summary: String,
    /// When this analysis was computed.
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_level_thresholds() {
        assert_eq!(ThreatLevel::from_mean_intensity(0.0), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_mean_intensity(40.0), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_mean_intensity(40.1), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_mean_intensity(70.0), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_mean_intensity(70.1), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_mean_intensity(100.0), ThreatLevel::High);
    }

    #[test]
    fn threat_level_serializes_lowercase() {
        let json = serde_json::to_string(&ThreatLevel::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: ThreatLevel = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(back, ThreatLevel::High);
    }

    #[test]
    fn analysis_result_uses_camel_case_wire_fields() {
        let result = AnalysisResult {
            hotspots: Vec::new(),
            correlations: Vec::new(),
            threat_level: ThreatLevel::Low,
            summary: "Identified 0 potential hotspots".to_string(),
            analyzed_at: Utc::now(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("threatLevel").is_some());
        assert!(json.get("analyzedAt").is_some());
        assert!(json.get("threat_level").is_none());
    }
}

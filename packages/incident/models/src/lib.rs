#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident classification taxonomy and priority tier definitions.
//!
//! This crate defines the shared classification types used across the
//! citywatch system. All data sources normalize their source-specific
//! category and status strings into these shared types.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Priority tier for an incident, derived from keyword classification of
/// its category and description text.
///
/// Each tier maps to a fixed override score on the 0-100 priority scale.
/// Classification is first-matching-tier-wins: critical terms are checked
/// before high terms, high before medium, and anything unmatched falls
/// through to the feed's baseline.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityTier {
    /// Life-threatening or in-progress violent events
    Critical,
    /// Serious offenses and active hazards
    High,
    /// Quality-of-life and property offenses
    Medium,
    /// No tier keyword matched; feed baseline applies
    Baseline,
}

impl PriorityTier {
    /// Returns the override priority score for this tier, or `None` for
    /// [`PriorityTier::Baseline`] (the feed's own baseline applies).
    #[must_use]
    pub const fn score(self) -> Option<u8> {
        match self {
            Self::Critical => Some(95),
            Self::High => Some(75),
            Self::Medium => Some(60),
            Self::Baseline => None,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Critical, Self::High, Self::Medium, Self::Baseline]
    }
}

/// Case/resolution status of an incident record.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    /// Case open or response in progress
    Open,
    /// Case closed or request completed
    Closed,
    /// Source did not report a status
    Unknown,
}

impl IncidentStatus {
    /// Classifies a raw source status string.
    ///
    /// Matching is case-insensitive substring containment; sources use
    /// wordings like `"Open"`, `"OPEN - IN PROGRESS"`, `"Closed - Dup"`.
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("closed")
            || lower.contains("complete")
            || lower.contains("resolved")
        {
            Self::Closed
        } else if lower.contains("open")
            || lower.contains("active")
            || lower.contains("in progress")
            || lower.contains("pending")
        {
            Self::Open
        } else {
            Self::Unknown
        }
    }
}

/// Operational status of a CCTV camera.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CameraStatus {
    /// Camera reported as streaming
    Online,
    /// Camera reported as down or out of service
    Offline,
    /// Directory did not report a status
    Unknown,
}

impl CameraStatus {
    /// Classifies a raw directory status string (case-insensitive).
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("offline")
            || lower.contains("down")
            || lower.contains("out of service")
            || lower.contains("disabled")
        {
            Self::Offline
        } else if lower.contains("online")
            || lower.contains("active")
            || lower.contains("in service")
            || lower.contains("enabled")
        {
            Self::Online
        } else {
            Self::Unknown
        }
    }
}

/// Sentiment label for a news article, derived by keyword counting at
/// ingestion. Not a model output.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    /// More positive than negative keywords
    Positive,
    /// Balanced or no keywords matched
    Neutral,
    /// More negative than positive keywords
    Negative,
}

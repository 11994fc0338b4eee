#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! LLM-backed hotspot analysis with local fallback.
//!
//! Supports Anthropic Claude and `OpenAI` via a common provider trait,
//! selected from environment variables. The analysis call asks the model
//! for a strict JSON document conforming to
//! [`citywatch_analytics_models::AnalysisResult`]; whenever the provider
//! is unavailable, errors, or returns unparseable output, the
//! deterministic local clusterer runs instead — unconditionally and
//! silently (log-only). Callers receive an [`AnalysisOutcome`] so the
//! primary/fallback distinction is never lost.

pub mod analyze;
pub mod providers;

use citywatch_analytics_models::AnalysisResult;
use thiserror::Error;

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to the LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },

    /// The model's response did not contain a usable analysis document.
    #[error("Unparseable model output: {message}")]
    Unparseable {
        /// Description.
        message: String,
    },
}

/// The result of one analysis pass, tagged by which engine produced it.
///
/// The silent AI-to-local fallback chain loses no information here:
/// callers can log, expose, or count degraded runs without changing the
/// [`AnalysisResult`] payload shape.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// The external AI call succeeded and conformed to the contract.
    Primary(AnalysisResult),
    /// The local clusterer ran instead.
    Degraded {
        /// The local clusterer's result.
        result: AnalysisResult,
        /// Why the AI path was not used.
        reason: String,
    },
}

impl AnalysisOutcome {
    /// The analysis payload, regardless of engine.
    #[must_use]
    pub const fn result(&self) -> &AnalysisResult {
        match self {
            Self::Primary(result) | Self::Degraded { result, .. } => result,
        }
    }

    /// Consumes the outcome, returning the analysis payload.
    #[must_use]
    pub fn into_result(self) -> AnalysisResult {
        match self {
            Self::Primary(result) | Self::Degraded { result, .. } => result,
        }
    }

    /// Whether the local fallback produced this result.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The degradation reason, if the fallback ran.
    #[must_use]
    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            Self::Primary(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }
}

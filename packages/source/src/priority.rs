//! Incident priority scoring.
//!
//! Maps an incident's free-text category/description onto a 0-100 score
//! via tiered keyword tables, with small bonuses for open status and
//! recency. Matching is case-insensitive substring containment and
//! first-matching-tier wins (critical > high > medium, else baseline).
//! No ML, no configuration beyond the static tables below.

use chrono::{DateTime, Duration, Utc};
use citywatch_incident_models::{IncidentStatus, PriorityTier};

/// Terms that classify an incident as critical.
const CRITICAL_TERMS: &[&str] = &[
    "homicide",
    "murder",
    "shooting",
    "shots fired",
    "armed",
    "gun",
    "hostage",
    "kidnap",
    "abduction",
    "explosion",
    "bomb",
    "stabbing",
    "officer down",
    "carjacking",
];

/// Terms that classify an incident as high priority.
const HIGH_TERMS: &[&str] = &[
    "robbery",
    "assault",
    "battery",
    "burglary",
    "weapon",
    "firearm",
    "arson",
    "fire",
    "pursuit",
    "overdose",
    "domestic violence",
    "sexual",
];

/// Terms that classify an incident as medium priority.
const MEDIUM_TERMS: &[&str] = &[
    "theft",
    "larceny",
    "stolen",
    "vandalism",
    "graffiti",
    "criminal damage",
    "trespass",
    "narcotics",
    "drug",
    "dui",
    "prowler",
    "suspicious",
    "harassment",
];

/// Bonus applied when the incident's case is still open.
const OPEN_STATUS_BONUS: u16 = 5;

/// Bonus applied when the incident occurred within the last hour.
const RECENCY_BONUS: u16 = 5;

/// Returns `true` if `haystack` contains any of the needles.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Classifies free text into a priority tier.
///
/// Case-insensitive, first-matching-tier wins. Returns
/// [`PriorityTier::Baseline`] when no keyword matches.
#[must_use]
pub fn classify_tier(text: &str) -> PriorityTier {
    let lower = text.to_lowercase();

    if contains_any(&lower, CRITICAL_TERMS) {
        return PriorityTier::Critical;
    }
    if contains_any(&lower, HIGH_TERMS) {
        return PriorityTier::High;
    }
    if contains_any(&lower, MEDIUM_TERMS) {
        return PriorityTier::Medium;
    }
    PriorityTier::Baseline
}

/// Scores an incident on the 0-100 priority scale.
///
/// Starts from the tier override score (or the feed's baseline when no
/// tier keyword matches), adds the open-status and recency bonuses, and
/// clamps to 100. Missing text fields are treated as empty strings; this
/// function never fails.
#[must_use]
pub fn score_incident(
    category: &str,
    description: Option<&str>,
    status: IncidentStatus,
    occurred_at: DateTime<Utc>,
    baseline: u8,
) -> u8 {
    let text = format!("{category} {}", description.unwrap_or_default());
    let tier = classify_tier(&text);

    let mut score = u16::from(tier.score().unwrap_or(baseline));

    if status == IncidentStatus::Open {
        score += OPEN_STATUS_BONUS;
    }
    if Utc::now().signed_duration_since(occurred_at) < Duration::hours(1) {
        score += RECENCY_BONUS;
    }

    u8::try_from(score.min(100)).unwrap_or(100)
}

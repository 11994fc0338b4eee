//! The hotspot analysis call.
//!
//! Builds a compact JSON digest of the current snapshot, asks the model
//! for an [`AnalysisResult`]-shaped JSON document, and validates the
//! reply. Every failure path — missing provider, transport error,
//! unparseable output — runs the local clusterer instead and tags the
//! outcome as degraded.

use chrono::Utc;
use citywatch_analytics_models::{AnalysisResult, Correlation, Hotspot, ThreatLevel};
use citywatch_source_models::{CameraRecord, IncidentRecord, NewsArticle};
use serde::Deserialize;
use serde_json::json;

use crate::providers::LlmProvider;
use crate::{AiError, AnalysisOutcome};

/// Upper bound on incidents included in the model prompt.
const PROMPT_INCIDENT_CAP: usize = 50;

/// Upper bound on cameras included in the model prompt.
const PROMPT_CAMERA_CAP: usize = 50;

/// Upper bound on headlines included in the model prompt.
const PROMPT_HEADLINE_CAP: usize = 20;

/// System prompt for the analysis call.
const SYSTEM_PROMPT: &str = "\
You are a public-safety analyst for a city situational-awareness \
dashboard. Given incident records, camera locations, and news headlines, \
identify geographic hotspots where activity concentrates.

Respond with ONLY a JSON object, no prose and no code fences, matching \
exactly this shape:
{
  \"hotspots\": [{\"latitude\": 41.9, \"longitude\": -87.6, \
\"intensity\": 62.5, \"description\": \"...\", \"incidentCount\": 3, \
\"cameraCount\": 1, \"topIncident\": \"...\"}],
  \"correlations\": [{\"latitude\": 41.9, \"longitude\": -87.6, \
\"description\": \"...\", \"incidentCount\": 3, \"cameraCount\": 1}],
  \"threatLevel\": \"low\" | \"medium\" | \"high\",
  \"summary\": \"one sentence\"
}

Intensity values must be between 0 and 100. Return at most 15 hotspots, \
highest intensity first.";

/// The model's reply shape — [`AnalysisResult`] minus `analyzedAt`,
/// which is stamped locally.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelAnalysis {
    #[serde(default)]
    hotspots: Vec<Hotspot>,
    #[serde(default)]
    correlations: Vec<Correlation>,
    threat_level: ThreatLevel,
    #[serde(default)]
    summary: String,
}

/// Runs one analysis pass, preferring the AI provider when available.
///
/// The fallback to the local clusterer is unconditional and silent
/// (log-only): callers always get a usable [`AnalysisOutcome`].
pub async fn analyze_hotspots(
    provider: Option<&dyn LlmProvider>,
    incidents: &[IncidentRecord],
    cameras: &[CameraRecord],
    news: &[NewsArticle],
) -> AnalysisOutcome {
    let Some(provider) = provider else {
        return degraded(incidents, cameras, "no AI provider configured");
    };

    match run_model_analysis(provider, incidents, cameras, news).await {
        Ok(result) => AnalysisOutcome::Primary(result),
        Err(e) => degraded(incidents, cameras, &e.to_string()),
    }
}

/// Runs the local clusterer and tags the outcome.
fn degraded(
    incidents: &[IncidentRecord],
    cameras: &[CameraRecord],
    reason: &str,
) -> AnalysisOutcome {
    log::warn!("AI analysis unavailable ({reason}); using local clustering heuristic");
    AnalysisOutcome::Degraded {
        result: citywatch_analytics::analyze(incidents, cameras),
        reason: reason.to_string(),
    }
}

/// Calls the provider and validates its reply against the contract.
async fn run_model_analysis(
    provider: &dyn LlmProvider,
    incidents: &[IncidentRecord],
    cameras: &[CameraRecord],
    news: &[NewsArticle],
) -> Result<AnalysisResult, AiError> {
    let prompt = build_user_prompt(incidents, cameras, news);
    let reply = provider.complete(SYSTEM_PROMPT, &prompt).await?;
    parse_model_reply(&reply)
}

/// Builds the compact JSON digest handed to the model.
fn build_user_prompt(
    incidents: &[IncidentRecord],
    cameras: &[CameraRecord],
    news: &[NewsArticle],
) -> String {
    let incident_digest: Vec<serde_json::Value> = incidents
        .iter()
        .take(PROMPT_INCIDENT_CAP)
        .map(|i| {
            json!({
                "title": i.title,
                "priority": i.priority,
                "latitude": i.latitude,
                "longitude": i.longitude,
                "status": i.status,
            })
        })
        .collect();

    let camera_digest: Vec<serde_json::Value> = cameras
        .iter()
        .filter(|c| c.latitude.is_some() && c.longitude.is_some())
        .take(PROMPT_CAMERA_CAP)
        .map(|c| {
            json!({
                "name": c.name,
                "viewers": c.viewers,
                "latitude": c.latitude,
                "longitude": c.longitude,
            })
        })
        .collect();

    let headline_digest: Vec<&str> = news
        .iter()
        .take(PROMPT_HEADLINE_CAP)
        .map(|a| a.title.as_str())
        .collect();

    json!({
        "incidents": incident_digest,
        "cameras": camera_digest,
        "headlines": headline_digest,
    })
    .to_string()
}

/// Extracts and validates the analysis JSON from the model's reply.
fn parse_model_reply(reply: &str) -> Result<AnalysisResult, AiError> {
    let document = extract_json(reply).ok_or_else(|| AiError::Unparseable {
        message: "no JSON object found in model reply".to_string(),
    })?;

    let parsed: ModelAnalysis =
        serde_json::from_str(document).map_err(|e| AiError::Unparseable {
            message: format!("model reply did not match analysis shape: {e}"),
        })?;

    let mut hotspots = parsed.hotspots;
    for hotspot in &mut hotspots {
        hotspot.intensity = hotspot.intensity.clamp(0.0, 100.0);
    }
    hotspots.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));

    let summary = if parsed.summary.is_empty() {
        format!("Identified {} potential hotspots", hotspots.len())
    } else {
        parsed.summary
    };

    Ok(AnalysisResult {
        hotspots,
        correlations: parsed.correlations,
        threat_level: parsed.threat_level,
        summary,
        analyzed_at: Utc::now(),
    })
}

/// Finds the outermost JSON object in a reply, tolerating markdown code
/// fences and surrounding prose.
fn extract_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use citywatch_incident_models::IncidentStatus;

    struct CannedProvider(String);

    #[async_trait::async_trait]
    impl LlmProvider for CannedProvider {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, AiError> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl LlmProvider for FailingProvider {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, AiError> {
            Err(AiError::Provider {
                message: "upstream 529".to_string(),
            })
        }
    }

    fn incident(latitude: f64, longitude: f64, priority: u8) -> IncidentRecord {
        IncidentRecord {
            id: format!("i-{latitude}-{longitude}"),
            title: "SHOOTING".to_string(),
            address: None,
            latitude,
            longitude,
            occurred_at: Utc::now(),
            source: "test_crime".to_string(),
            category: "SHOOTING".to_string(),
            priority,
            status: IncidentStatus::Unknown,
            description: None,
        }
    }

    #[tokio::test]
    async fn no_provider_degrades_to_local_result() {
        let incidents = vec![incident(41.87, -87.63, 95)];
        let outcome = analyze_hotspots(None, &incidents, &[], &[]).await;

        assert!(outcome.is_degraded());
        assert!(
            outcome
                .degraded_reason()
                .unwrap()
                .contains("no AI provider")
        );

        let local = citywatch_analytics::analyze(&incidents, &[]);
        assert_eq!(outcome.result().hotspots, local.hotspots);
        assert_eq!(outcome.result().threat_level, local.threat_level);
    }

    #[tokio::test]
    async fn provider_error_degrades_to_local_result() {
        let incidents = vec![incident(41.87, -87.63, 95)];
        let outcome =
            analyze_hotspots(Some(&FailingProvider), &incidents, &[], &[]).await;

        assert!(outcome.is_degraded());
        assert!(outcome.degraded_reason().unwrap().contains("529"));
        assert_eq!(outcome.result().hotspots.len(), 1);
    }

    #[tokio::test]
    async fn garbage_reply_degrades_to_local_result() {
        let provider = CannedProvider("I cannot help with that.".to_string());
        let incidents = vec![incident(41.87, -87.63, 95)];
        let outcome = analyze_hotspots(Some(&provider), &incidents, &[], &[]).await;

        assert!(outcome.is_degraded());
        let local = citywatch_analytics::analyze(&incidents, &[]);
        assert_eq!(outcome.result().hotspots, local.hotspots);
    }

    #[tokio::test]
    async fn conforming_reply_is_primary_with_clamped_intensity() {
        let provider = CannedProvider(
            r#"```json
{
  "hotspots": [
    {"latitude": 41.9, "longitude": -87.6, "intensity": 150.0,
     "description": "downtown cluster", "incidentCount": 3,
     "cameraCount": 1, "topIncident": "SHOOTING"},
    {"latitude": 41.8, "longitude": -87.7, "intensity": 55.0,
     "description": "west side cluster"}
  ],
  "correlations": [],
  "threatLevel": "high",
  "summary": "Two clusters concentrated downtown"
}
```"#
                .to_string(),
        );
        let outcome = analyze_hotspots(Some(&provider), &[], &[], &[]).await;

        assert!(!outcome.is_degraded());
        let result = outcome.result();
        assert_eq!(result.threat_level, ThreatLevel::High);
        assert_eq!(result.hotspots.len(), 2);
        assert!((result.hotspots[0].intensity - 100.0).abs() < 1e-9);
        assert_eq!(result.hotspots[1].camera_count, 0);
        assert_eq!(result.summary, "Two clusters concentrated downtown");
    }

    #[test]
    fn extract_json_tolerates_fences_and_prose() {
        assert_eq!(
            extract_json("Here you go:\n```json\n{\"a\": 1}\n```\nDone."),
            Some("{\"a\": 1}")
        );
        assert_eq!(extract_json("{\"a\": 1}"), Some("{\"a\": 1}"));
        assert!(extract_json("no json here").is_none());
    }

    #[test]
    fn missing_threat_level_is_unparseable() {
        let err = parse_model_reply("{\"hotspots\": []}").unwrap_err();
        assert!(matches!(err, AiError::Unparseable { .. }));
    }
}

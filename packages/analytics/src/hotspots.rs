//! Grid-cell hotspot clustering.
//!
//! Buckets incidents and high-viewership cameras into ~11 km grid cells
//! (lat/lng rounded to one decimal place), scores each cell, and ranks
//! the cells into a bounded hotspot list with a derived threat level.

use std::collections::BTreeMap;

use chrono::Utc;
use citywatch_analytics_models::{AnalysisResult, Correlation, Hotspot, ThreatLevel};
use citywatch_source_models::{CameraRecord, IncidentRecord};

/// Cells below this intensity are discarded.
const INTENSITY_FLOOR: f64 = 25.0;

/// Maximum number of hotspots returned per pass.
const MAX_HOTSPOTS: usize = 15;

/// Correlations are emitted for at most this many top hotspots.
const MAX_CORRELATIONS: usize = 5;

/// Cameras must exceed this viewer count to contribute signal.
const CAMERA_VIEWER_FLOOR: u32 = 50;

/// Per-cell accumulator for one clustering pass.
#[derive(Debug, Default)]
struct Cell {
    incident_count: u32,
    camera_count: u32,
    weighted_sum: f64,
    /// Highest-priority incident seen in this cell: (priority, title).
    top_incident: Option<(u8, String)>,
}

/// Snaps a coordinate pair to its grid cell key.
///
/// One decimal place of latitude is ~11 km, which is coarse enough that
/// a city block's worth of records lands in a single cell.
fn grid_key(latitude: f64, longitude: f64) -> (i32, i32) {
    #[allow(clippy::cast_possible_truncation)]
    let key = (
        (latitude * 10.0).round() as i32,
        (longitude * 10.0).round() as i32,
    );
    key
}

/// The cell center coordinate for a grid key component.
fn cell_center(component: i32) -> f64 {
    f64::from(component) / 10.0
}

/// Runs one clustering pass over a snapshot's incidents and cameras.
///
/// The output is a pure function of the input set: cells are accumulated
/// in key order and ranked with a stable sort, so identical inputs yield
/// an identical ordered hotspot list.
#[must_use]
pub fn analyze(incidents: &[IncidentRecord], cameras: &[CameraRecord]) -> AnalysisResult {
    let mut cells: BTreeMap<(i32, i32), Cell> = BTreeMap::new();

    for incident in incidents {
        let cell = cells
            .entry(grid_key(incident.latitude, incident.longitude))
            .or_default();
        cell.incident_count += 1;
        cell.weighted_sum += f64::from(incident.priority);

        let replace = cell
            .top_incident
            .as_ref()
            .is_none_or(|(priority, _)| incident.priority > *priority);
        if replace {
            cell.top_incident = Some((incident.priority, incident.title.clone()));
        }
    }

    for camera in cameras {
        if camera.viewers <= CAMERA_VIEWER_FLOOR {
            continue;
        }
        let (Some(latitude), Some(longitude)) = (camera.latitude, camera.longitude) else {
            continue;
        };
        let cell = cells.entry(grid_key(latitude, longitude)).or_default();
        cell.camera_count += 1;
        cell.weighted_sum += f64::from(camera.viewers);
    }

    let total_cells = cells.len();

    let mut hotspots: Vec<Hotspot> = cells
        .into_iter()
        .filter_map(|((lat_key, lng_key), cell)| {
            let members = cell.incident_count + cell.camera_count;
            let intensity = (cell.weighted_sum / f64::from(members + 1)).min(100.0);
            if intensity < INTENSITY_FLOOR {
                return None;
            }

            let latitude = cell_center(lat_key);
            let longitude = cell_center(lng_key);
            Some(Hotspot {
                latitude,
                longitude,
                intensity,
                description: format!(
                    "{} incidents and {} high-traffic cameras near ({latitude:.1}, {longitude:.1})",
                    cell.incident_count, cell.camera_count,
                ),
                incident_count: cell.incident_count,
                camera_count: cell.camera_count,
                top_incident: cell.top_incident.map(|(_, title)| title),
            })
        })
        .collect();

    // Stable sort over key-ordered cells keeps tie order deterministic.
    hotspots.sort_by(|a, b| b.intensity.total_cmp(&a.intensity));
    hotspots.truncate(MAX_HOTSPOTS);

    let correlations: Vec<Correlation> = hotspots
        .iter()
        .filter(|h| h.incident_count > 0 && h.camera_count > 0)
        .take(MAX_CORRELATIONS)
        .map(|h| Correlation {
            latitude: h.latitude,
            longitude: h.longitude,
            description: format!(
                "{} incidents within coverage of {} active camera feeds near \
                 ({:.1}, {:.1})",
                h.incident_count, h.camera_count, h.latitude, h.longitude,
            ),
            incident_count: h.incident_count,
            camera_count: h.camera_count,
        })
        .collect();

    let mean_intensity = if hotspots.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let count = hotspots.len() as f64;
        hotspots.iter().map(|h| h.intensity).sum::<f64>() / count
    };
    let threat_level = ThreatLevel::from_mean_intensity(mean_intensity);

    let summary = format!(
        "Identified {} potential hotspots across {} active grid cells; \
         overall threat level {}",
        hotspots.len(),
        total_cells,
        threat_level,
    );

    log::debug!(
        "Clustering pass: {} incidents + {} cameras -> {} hotspots, threat {}",
        incidents.len(),
        cameras.len(),
        hotspots.len(),
        threat_level,
    );

    AnalysisResult {
        hotspots,
        correlations,
        threat_level,
        summary,
        analyzed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citywatch_incident_models::{CameraStatus, IncidentStatus};

    fn incident(latitude: f64, longitude: f64, priority: u8, title: &str) -> IncidentRecord {
        IncidentRecord {
            id: format!("{title}-{latitude}-{longitude}"),
            title: title.to_string(),
            address: None,
            latitude,
            longitude,
            occurred_at: Utc::now(),
            source: "test_crime".to_string(),
            category: title.to_string(),
            priority,
            status: IncidentStatus::Unknown,
            description: None,
        }
    }

    fn camera(latitude: Option<f64>, longitude: Option<f64>, viewers: u32) -> CameraRecord {
        CameraRecord {
            id: format!("cam-{viewers}"),
            name: "Test Camera".to_string(),
            url: "https://example.com/cam".to_string(),
            stream_url: None,
            location: "Test & Main".to_string(),
            status: CameraStatus::Online,
            latitude,
            longitude,
            viewers,
            source: None,
        }
    }

    #[test]
    fn empty_inputs_yield_low_threat_and_zero_hotspots() {
        let result = analyze(&[], &[]);
        assert!(result.hotspots.is_empty());
        assert!(result.correlations.is_empty());
        assert_eq!(result.threat_level, ThreatLevel::Low);
        assert!(
            result.summary.contains("0 potential hotspots"),
            "summary was: {}",
            result.summary
        );
    }

    #[test]
    fn single_incident_forms_expected_cell() {
        let result = analyze(&[incident(41.87, -87.63, 95, "HOMICIDE")], &[]);

        assert_eq!(result.hotspots.len(), 1);
        let hotspot = &result.hotspots[0];
        assert!((hotspot.latitude - 41.9).abs() < 1e-9);
        assert!((hotspot.longitude - -87.6).abs() < 1e-9);
        assert_eq!(hotspot.incident_count, 1);
        assert_eq!(hotspot.camera_count, 0);
        assert!((hotspot.intensity - 47.5).abs() < 1e-9);
        assert_eq!(hotspot.top_incident.as_deref(), Some("HOMICIDE"));
        // No camera in the cell, so no correlation.
        assert!(result.correlations.is_empty());
    }

    #[test]
    fn intensity_is_clamped_to_100() {
        let cams = vec![camera(Some(41.9), Some(-87.6), 10_000)];
        let result = analyze(&[], &cams);
        assert_eq!(result.hotspots.len(), 1);
        assert!((result.hotspots[0].intensity - 100.0).abs() < 1e-9);
    }

    #[test]
    fn low_intensity_cells_are_discarded() {
        // 40 / (1 + 1) = 20, below the floor of 25.
        let result = analyze(&[incident(41.87, -87.63, 40, "THEFT")], &[]);
        assert!(result.hotspots.is_empty());
        assert_eq!(result.threat_level, ThreatLevel::Low);
    }

    #[test]
    fn low_viewer_cameras_contribute_nothing() {
        let incidents = vec![incident(41.87, -87.63, 95, "SHOOTING")];
        let cams = vec![camera(Some(41.87), Some(-87.63), 50)];
        let result = analyze(&incidents, &cams);

        // viewers == 50 is not > 50, so the cell looks identical to the
        // incident-only case.
        assert_eq!(result.hotspots.len(), 1);
        assert_eq!(result.hotspots[0].camera_count, 0);
        assert!((result.hotspots[0].intensity - 47.5).abs() < 1e-9);
    }

    #[test]
    fn cameras_without_coordinates_are_excluded() {
        let cams = vec![camera(None, Some(-87.6), 400), camera(None, None, 400)];
        let result = analyze(&[], &cams);
        assert!(result.hotspots.is_empty());
    }

    #[test]
    fn co_occurrence_emits_a_correlation() {
        let incidents = vec![
            incident(41.87, -87.63, 95, "SHOOTING"),
            incident(41.88, -87.64, 95, "ROBBERY"),
        ];
        let cams = vec![camera(Some(41.87), Some(-87.63), 120)];
        let result = analyze(&incidents, &cams);

        assert_eq!(result.hotspots.len(), 1);
        assert_eq!(result.correlations.len(), 1);
        let correlation = &result.correlations[0];
        assert_eq!(correlation.incident_count, 2);
        assert_eq!(correlation.camera_count, 1);
    }

    #[test]
    fn clustering_is_idempotent() {
        let incidents: Vec<IncidentRecord> = (0..40u8)
            .map(|i| {
                incident(
                    41.0 + f64::from(i) * 0.07,
                    -87.0 - f64::from(i) * 0.05,
                    60 + i,
                    "ASSAULT",
                )
            })
            .collect();
        let cams: Vec<CameraRecord> = (0..10u32)
            .map(|i| camera(Some(41.0 + f64::from(i) * 0.3), Some(-87.5), 80 + i * 13))
            .collect();

        let first = analyze(&incidents, &cams);
        let second = analyze(&incidents, &cams);
        assert_eq!(first.hotspots, second.hotspots);
        assert_eq!(first.correlations, second.correlations);
        assert_eq!(first.threat_level, second.threat_level);
        assert_eq!(first.summary, second.summary);
    }

    #[test]
    fn hotspot_list_is_bounded_and_sorted() {
        // 30 distinct cells, each a lone high-priority incident.
        let incidents: Vec<IncidentRecord> = (0..30u8)
            .map(|i| incident(30.0 + f64::from(i), -90.0, 95, "SHOOTING"))
            .collect();
        let result = analyze(&incidents, &[]);

        assert_eq!(result.hotspots.len(), MAX_HOTSPOTS);
        for pair in result.hotspots.windows(2) {
            assert!(pair[0].intensity >= pair[1].intensity);
        }
    }

    #[test]
    fn dense_violent_cells_escalate_threat() {
        // Three priority-95 incidents in one cell: 285 / 4 = 71.25 > 70.
        let incidents = vec![
            incident(41.87, -87.63, 95, "HOMICIDE"),
            incident(41.88, -87.64, 95, "SHOOTING"),
            incident(41.86, -87.62, 95, "ARMED ROBBERY"),
        ];
        let result = analyze(&incidents, &[]);
        assert_eq!(result.threat_level, ThreatLevel::High);

        // A single such incident only reaches 47.5: medium band.
        let result = analyze(&incidents[..1], &[]);
        assert_eq!(result.threat_level, ThreatLevel::Medium);
    }
}

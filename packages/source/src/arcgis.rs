//! Shared `ArcGIS` REST API fetcher.
//!
//! Fetches one slice from an `ArcGIS` `FeatureServer` or `MapServer`
//! query endpoint. Feature attributes are flattened, with geometry x/y
//! merged in so that directories without explicit lat/lng attribute
//! fields can reference the geometry coordinates directly.

use serde_json::Value;

use crate::SourceError;

/// Configuration for an `ArcGIS` fetch operation.
pub struct ArcGisConfig<'a> {
    /// Query URL (`.../FeatureServer/0/query`).
    pub query_url: &'a str,
    /// Max records per request (often 1000 or 2000).
    pub page_size: u64,
    /// Optional `where` clause. Defaults to `"1=1"` if `None`.
    pub where_clause: Option<&'a str>,
    /// Label for log messages.
    pub label: &'a str,
}

/// Fetches features from an `ArcGIS` REST endpoint and flattens them to
/// attribute records.
///
/// # Errors
///
/// Returns [`SourceError`] if the HTTP request fails, the server returns
/// a non-2xx status, or the body is not JSON.
pub async fn fetch_arcgis(
    client: &reqwest::Client,
    config: &ArcGisConfig<'_>,
) -> Result<Vec<Value>, SourceError> {
    let where_clause = config.where_clause.unwrap_or("1=1");
    let url = format!(
        "{}?where={where_clause}&outFields=*&f=json&outSR=4326&resultRecordCount={}",
        config.query_url, config.page_size,
    );

    log::info!("Fetching {}: limit={}", config.label, config.page_size);
    let response = client.get(&url).send().await?.error_for_status()?;
    let body: Value = response.json().await?;

    let features = body
        .get("features")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    // ArcGIS wraps attributes in { "attributes": {...}, "geometry": {...} }.
    // Flatten to just the attributes, merging geometry x/y.
    let mut records = Vec::with_capacity(features.len());
    for feature in features {
        let Some(attrs) = feature.get("attributes").cloned() else {
            continue;
        };
        let mut record = attrs;
        if let Some(geom) = feature.get("geometry")
            && let Some(obj) = record.as_object_mut()
        {
            if let Some(x) = geom.get("x") {
                obj.insert("_geometry_x".to_string(), x.clone());
            }
            if let Some(y) = geom.get("y") {
                obj.insert("_geometry_y".to_string(), y.clone());
            }
        }
        records.push(record);
    }

    log::info!("{}: {} records fetched", config.label, records.len());
    Ok(records)
}

//! Generic JSON array fetcher.
//!
//! Handles providers that expose a plain JSON endpoint returning an array
//! of records, either as the top-level body or nested under a dotted path
//! (e.g., the news aggregator's `"articles"`). Used by camera directories
//! and the news feed.

use serde_json::Value;

use crate::SourceError;

/// Configuration for a JSON-list fetch operation.
pub struct JsonListConfig<'a> {
    /// API URL.
    pub api_url: &'a str,
    /// Dotted path to the record array inside the response body. `None`
    /// when the body is the array itself.
    pub records_path: Option<&'a str>,
    /// Extra query parameters (e.g., an API key).
    pub query: &'a [(String, String)],
    /// Label for log messages.
    pub label: &'a str,
}

/// Fetches a JSON record array from a plain endpoint.
///
/// # Errors
///
/// Returns [`SourceError`] if the HTTP request fails, the server returns
/// a non-2xx status, the body is not JSON, or no array is found at the
/// configured path.
pub async fn fetch_json_list(
    client: &reqwest::Client,
    config: &JsonListConfig<'_>,
) -> Result<Vec<Value>, SourceError> {
    log::info!("Fetching {}", config.label);
    let response = client
        .get(config.api_url)
        .query(config.query)
        .send()
        .await?
        .error_for_status()?;
    let body: Value = response.json().await?;

    let records = descend(&body, config.records_path)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| SourceError::Normalization {
            message: format!(
                "{}: no record array at path {:?}",
                config.label, config.records_path
            ),
        })?;

    log::info!("{}: {} records fetched", config.label, records.len());
    Ok(records)
}

/// Follows a dotted path into a JSON value. `None` path returns the value
/// itself.
fn descend<'a>(body: &'a Value, path: Option<&str>) -> Option<&'a Value> {
    match path {
        None => Some(body),
        Some(path) => path.split('.').try_fold(body, |value, key| value.get(key)),
    }
}

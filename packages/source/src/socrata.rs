//! Shared Socrata SODA API fetcher.
//!
//! Fetches one recent slice from any Socrata dataset using the `$limit`
//! and `$order` query parameters. The dashboard refetches wholesale every
//! cycle, so there is no pagination and no incremental `$where` filter —
//! the newest `limit` rows are always enough.

use serde_json::Value;

use crate::SourceError;

/// Configuration for a Socrata fetch operation.
pub struct SocrataConfig<'a> {
    /// Base API URL (e.g., `"https://data.cityofchicago.org/resource/ijzp-q8t2.json"`).
    pub api_url: &'a str,
    /// The date column name for ordering (e.g., `"date"`, `"created_date"`).
    pub date_column: &'a str,
    /// Number of records to fetch.
    pub limit: u64,
    /// Label for log messages (e.g., `"Chicago PD incidents"`).
    pub label: &'a str,
}

/// Fetches the newest records from a Socrata dataset.
///
/// # Errors
///
/// Returns [`SourceError`] if the HTTP request fails, the server returns
/// a non-2xx status, or the body is not a JSON array.
pub async fn fetch_socrata(
    client: &reqwest::Client,
    config: &SocrataConfig<'_>,
) -> Result<Vec<Value>, SourceError> {
    let url = format!(
        "{}?$limit={}&$order={} DESC",
        config.api_url, config.limit, config.date_column
    );

    log::info!("Fetching {}: limit={}", config.label, config.limit);
    let response = client.get(&url).send().await?.error_for_status()?;
    let records: Vec<Value> = response.json().await?;

    log::info!("{}: {} records fetched", config.label, records.len());
    Ok(records)
}

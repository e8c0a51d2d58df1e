//! METAR retrieval and decoding

use crate::{MetarError, MetarResult};
use notam_core::MetarSnapshot;
use serde_json::Value;

/// Request the JSON observations for one station.
///
/// A non-success status, an empty body (the API answers 204 when it has
/// nothing) and a malformed body are all errors.
pub async fn fetch_observations(
    client: &reqwest::Client,
    base_url: &str,
    station: &str,
) -> MetarResult<Value> {
    tracing::debug!("Requesting METAR for {}", station);

    let response = client
        .get(base_url)
        .query(&[("ids", station), ("format", "json")])
        .send()
        .await?
        .error_for_status()?;

    let body = response.bytes().await?;
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(MetarError::NoData(station.to_string()));
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Decode the first (latest) observation of a response payload
pub fn latest_observation(payload: &Value, station: &str) -> MetarResult<MetarSnapshot> {
    let first = payload
        .as_array()
        .and_then(|observations| observations.first())
        .ok_or_else(|| MetarError::NoData(station.to_string()))?;

    Ok(serde_json::from_value(first.clone())?)
}

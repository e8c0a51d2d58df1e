//! METAR Source - Latest observations from the aviationweather.gov data API
//!
//! This crate provides the live weather snapshot source the NOTAM auditor
//! checks advisories against, plus optional persistence of the raw API
//! responses for debugging.

pub mod dump;
pub mod fetch;
pub mod station;

use async_trait::async_trait;
use notam_core::{MetarSnapshot, WeatherSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub use station::station_id;

pub const DEFAULT_API_URL: &str = "https://aviationweather.gov/api/data/metar";

#[derive(Error, Debug)]
pub enum MetarError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No METAR data for {0}")]
    NoData(String),

    #[error("Invalid station id: {0:?}")]
    InvalidStation(String),
}

pub type MetarResult<T> = Result<T, MetarError>;

/// Configuration for the METAR client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetarConfig {
    /// Data API endpoint
    pub base_url: String,

    /// Region letter prefixed to 3-letter airport ids
    pub region_prefix: String,

    /// User agent string
    pub user_agent: String,

    /// Request timeout (seconds)
    pub timeout_secs: u64,

    /// Write every raw response to `<dir>/<station>.json`
    pub dump_dir: Option<PathBuf>,
}

impl Default for MetarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            region_prefix: "K".to_string(),
            user_agent: format!("notam-audit/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            dump_dir: None,
        }
    }
}

/// Weather source backed by the METAR data API
pub struct MetarClient {
    config: MetarConfig,
    client: reqwest::Client,
}

impl MetarClient {
    pub fn new(config: MetarConfig) -> MetarResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Latest observation for an ICAO station id
    pub async fn fetch_latest(&self, station: &str) -> MetarResult<MetarSnapshot> {
        let payload = fetch::fetch_observations(&self.client, &self.config.base_url, station).await?;

        if let Some(dir) = &self.config.dump_dir {
            if let Err(e) = dump::save_payload(dir, station, &payload).await {
                tracing::warn!("Failed to save METAR JSON for {}: {}", station, e);
            }
        }

        fetch::latest_observation(&payload, station)
    }
}

#[async_trait]
impl WeatherSource for MetarClient {
    fn name(&self) -> &str {
        &self.config.base_url
    }

    async fn latest(&self, airport_id: &str) -> Option<MetarSnapshot> {
        let station = match station_id(airport_id, &self.config.region_prefix) {
            Ok(station) => station,
            Err(e) => {
                tracing::warn!("Skipping METAR lookup: {}", e);
                return None;
            }
        };

        match self.fetch_latest(&station).await {
            Ok(snapshot) => {
                tracing::debug!(
                    "METAR for {}: {}",
                    station,
                    snapshot.raw_ob.as_deref().unwrap_or("(no raw text)")
                );
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!("Error fetching METAR for {}: {}", station, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and return the endpoint URL
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/api/data/metar", addr)
    }

    fn client_for(base_url: String) -> MetarClient {
        MetarClient::new(MetarConfig {
            base_url,
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = MetarConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.region_prefix, "K");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.dump_dir.is_none());
        assert!(config.user_agent.starts_with("notam-audit/"));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: MetarConfig =
            serde_json::from_str(r#"{"region_prefix":"P","timeout_secs":5}"#).unwrap();
        assert_eq!(config.region_prefix, "P");
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.base_url.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_unavailable() {
        let config = MetarConfig {
            base_url: "http://127.0.0.1:9/api/data/metar".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let client = MetarClient::new(config).unwrap();
        assert!(client.latest("ABQ").await.is_none());
    }

    #[tokio::test]
    async fn test_blank_airport_is_unavailable() {
        let client = MetarClient::new(MetarConfig::default()).unwrap();
        assert!(client.latest("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let url = serve_once("500 Internal Server Error", r#"{"error":"upstream"}"#).await;
        assert!(client_for(url).latest("ABQ").await.is_none());
    }

    #[tokio::test]
    async fn test_no_content_is_unavailable() {
        let url = serve_once("204 No Content", "").await;
        assert!(client_for(url).latest("ABQ").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_unavailable() {
        let url = serve_once("200 OK", "not json").await;
        assert!(client_for(url).latest("ABQ").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_array_is_unavailable() {
        let url = serve_once("200 OK", "[]").await;
        assert!(client_for(url).latest("ABQ").await.is_none());
    }

    #[tokio::test]
    async fn test_success_dumps_raw_response() {
        let tmp = tempfile::tempdir().unwrap();
        let url = serve_once(
            "200 OK",
            r#"[{"icaoId":"KABQ","wspd":14,"rawOb":"METAR KABQ 151852Z 25014KT"}]"#,
        )
        .await;
        let client = MetarClient::new(MetarConfig {
            base_url: url,
            timeout_secs: 5,
            dump_dir: Some(tmp.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        let snapshot = client.latest("ABQ").await.unwrap();
        assert_eq!(snapshot.station(), "KABQ");

        let dumped = std::fs::read_to_string(tmp.path().join("KABQ.json")).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&dumped).unwrap();
        assert_eq!(payload[0]["wspd"], 14);
    }
}

//! Raw response persistence for debugging

use crate::MetarResult;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Write `payload` pretty-printed to `<dir>/<station>.json`, creating `dir`
/// if needed. An existing file for the station is overwritten.
pub async fn save_payload(dir: &Path, station: &str, payload: &Value) -> MetarResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(format!("{}.json", station));
    let json = serde_json::to_string_pretty(payload)?;
    tokio::fs::write(&path, json).await?;

    tracing::debug!("METAR JSON saved to {}", path.display());
    Ok(path)
}

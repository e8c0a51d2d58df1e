//! Airport id to ICAO station id mapping

use crate::{MetarError, MetarResult};

/// Build the 4-letter station id the API expects.
///
/// NOTAM exports carry 3-letter domestic ids (`ABQ`), which get the region
/// letter prepended (`KABQ`). Ids that are already 4 characters pass
/// through. Input is trimmed and upper-cased.
pub fn station_id(airport_id: &str, region_prefix: &str) -> MetarResult<String> {
    let id = airport_id.trim().to_ascii_uppercase();

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MetarError::InvalidStation(airport_id.to_string()));
    }

    if id.len() == 3 {
        Ok(format!("{}{}", region_prefix.trim().to_ascii_uppercase(), id))
    } else {
        Ok(id)
    }
}

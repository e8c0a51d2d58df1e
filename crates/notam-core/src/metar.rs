//! Weather snapshot model
//!
//! Mirrors the subset of the METAR JSON observation that the classification
//! rules inspect. Every attribute is optional: a key missing from the
//! payload and a key set to `null` both land as `None`. Any other value
//! counts as present whatever its JSON type, so one odd field never drops
//! the whole observation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Latest observation for one station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetarSnapshot {
    #[serde(default, deserialize_with = "lenient_text")]
    pub icao_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub report_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub raw_ob: Option<String>,

    /// Wind direction
    pub wdir: Option<WindDirection>,
    /// Wind speed (knots)
    pub wspd: Option<Reading>,
    /// Wind gust (knots)
    pub wgst: Option<Reading>,

    #[serde(default, deserialize_with = "lenient_layers")]
    pub clouds: Option<Vec<CloudLayer>>,

    /// Temperature (C)
    pub temp: Option<Reading>,
    /// Dew point (C)
    pub dewp: Option<Reading>,
    /// Visibility (statute miles)
    pub visib: Option<Visibility>,
    /// Present weather group, e.g. `-RA BR`
    #[serde(default, deserialize_with = "lenient_text")]
    pub wx_string: Option<String>,

    /// Altimeter setting (hPa)
    pub altim: Option<Reading>,
    /// Precipitation (inches)
    pub precip: Option<Reading>,
}

impl MetarSnapshot {
    /// Cloud layers, treating a missing or null list as empty
    pub fn cloud_layers(&self) -> &[CloudLayer] {
        self.clouds.as_deref().unwrap_or(&[])
    }

    /// Whether the named field holds a value
    pub fn has_field(&self, field: SnapshotField) -> bool {
        match field {
            SnapshotField::WindDirection => self.wdir.is_some(),
            SnapshotField::WindSpeed => self.wspd.is_some(),
            SnapshotField::WindGust => self.wgst.is_some(),
            SnapshotField::CloudLayers => !self.cloud_layers().is_empty(),
            SnapshotField::Temperature => self.temp.is_some(),
            SnapshotField::DewPoint => self.dewp.is_some(),
            SnapshotField::Visibility => self.visib.is_some(),
            SnapshotField::PresentWeather => self.wx_string.is_some(),
            SnapshotField::Altimeter => self.altim.is_some(),
            SnapshotField::Precipitation => self.precip.is_some(),
        }
    }

    /// Station label for log lines
    pub fn station(&self) -> &str {
        self.icao_id.as_deref().unwrap_or("unknown")
    }
}

/// A reported measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Reading {
    /// Numeric value, parsing text readings such as `"12"`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reading::Number(n) => Some(*n),
            Reading::Text(s) => s.trim().parse().ok(),
            Reading::Other(_) => None,
        }
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Number(value)
    }
}

/// Reported wind direction: degrees true, or `VRB`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindDirection {
    Degrees(f64),
    Variable(String),
    Other(Value),
}

/// Reported visibility: a number, or text such as `10+`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Visibility {
    Miles(f64),
    Reported(String),
    Other(Value),
}

/// One sky-cover layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudLayer {
    #[serde(default, deserialize_with = "lenient_text")]
    pub cover: Option<String>,
    /// Layer base (feet AGL)
    pub base: Option<Reading>,
}

impl CloudLayer {
    pub fn new(cover: &str, base: Option<u32>) -> Self {
        Self {
            cover: Some(cover.to_string()),
            base: base.map(|b| Reading::Number(f64::from(b))),
        }
    }
}

/// Text field that accepts any non-null JSON value
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Cloud list where a malformed layer still counts as a layer
fn lenient_layers<'de, D>(deserializer: D) -> Result<Option<Vec<CloudLayer>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        // A bare value in place of the list still reports sky cover
        Some(_) => Some(vec![CloudLayer::default()]),
    })
}

/// Snapshot attributes that rules can inspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotField {
    WindDirection,
    WindSpeed,
    WindGust,
    CloudLayers,
    Temperature,
    DewPoint,
    Visibility,
    PresentWeather,
    Altimeter,
    Precipitation,
}

impl SnapshotField {
    /// Key name used by the METAR JSON API
    pub fn api_name(&self) -> &'static str {
        match self {
            SnapshotField::WindDirection => "wdir",
            SnapshotField::WindSpeed => "wspd",
            SnapshotField::WindGust => "wgst",
            SnapshotField::CloudLayers => "clouds",
            SnapshotField::Temperature => "temp",
            SnapshotField::DewPoint => "dewp",
            SnapshotField::Visibility => "visib",
            SnapshotField::PresentWeather => "wxString",
            SnapshotField::Altimeter => "altim",
            SnapshotField::Precipitation => "precip",
        }
    }
}

impl std::fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_name())
    }
}

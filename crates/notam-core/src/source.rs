//! Weather snapshot sources

use crate::metar::MetarSnapshot;
use async_trait::async_trait;
use std::collections::HashMap;

/// Provides the latest observation for an airport.
///
/// Implementations never fail outright: any transport or decoding problem is
/// reported as `None`, which the rules read as "no data".
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Latest snapshot for `airport_id`, or `None` when unavailable
    async fn latest(&self, airport_id: &str) -> Option<MetarSnapshot>;
}

#[async_trait]
impl<S: WeatherSource + ?Sized> WeatherSource for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn latest(&self, airport_id: &str) -> Option<MetarSnapshot> {
        (**self).latest(airport_id).await
    }
}

/// Fixed per-airport snapshots, for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshots: HashMap<String, MetarSnapshot>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, airport_id: &str, snapshot: MetarSnapshot) -> Self {
        self.snapshots.insert(airport_id.to_string(), snapshot);
        self
    }
}

#[async_trait]
impl WeatherSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn latest(&self, airport_id: &str) -> Option<MetarSnapshot> {
        self.snapshots.get(airport_id).cloned()
    }
}

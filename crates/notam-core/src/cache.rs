//! Per-airport snapshot memoization for a single run

use crate::metar::MetarSnapshot;
use crate::source::WeatherSource;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// Wraps a source so each airport is fetched at most once.
///
/// Concurrent lookups for the same airport wait on one shared fetch. An
/// unavailable result is cached too.
pub struct CachedSource<S> {
    inner: S,
    entries: Mutex<HashMap<String, Arc<OnceCell<Option<MetarSnapshot>>>>>,
}

impl<S: WeatherSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct airports looked up so far
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, airport_id: &str) -> Arc<OnceCell<Option<MetarSnapshot>>> {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .entry(airport_id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}

#[async_trait]
impl<S: WeatherSource> WeatherSource for CachedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn latest(&self, airport_id: &str) -> Option<MetarSnapshot> {
        let cell = self.cell(airport_id);
        cell.get_or_init(|| async {
            tracing::debug!("Cache miss for {}", airport_id);
            self.inner.latest(airport_id).await
        })
        .await
        .clone()
    }
}

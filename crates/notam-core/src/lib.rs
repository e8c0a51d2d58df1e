//! NOTAM Audit Core Engine
//!
//! This crate cross-checks NOTAM advisories that claim a weather-reporting
//! outage against live METAR observations, and reports the advisories whose
//! claim is contradicted by the data.

pub mod cache;
pub mod classify;
pub mod metar;
pub mod notam;
pub mod report;
pub mod source;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub use cache::CachedSource;
pub use classify::{Category, Classification, ClassificationEngine, Verdict};
pub use metar::{CloudLayer, MetarSnapshot, Reading, SnapshotField};
pub use notam::NotamRecord;
pub use source::{StaticSource, WeatherSource};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Batch audit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Maximum weather lookups in flight; 1 keeps the run strictly sequential
    pub concurrency: usize,
    /// Fetch each airport once per run instead of once per record
    pub cache_per_airport: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            cache_per_airport: false,
        }
    }
}

impl AuditConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.concurrency == 0 {
            return Err(CoreError::Config("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Classification of one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub position: usize,
    pub airport_id: String,
    pub classification: Classification,
}

impl RecordOutcome {
    pub fn verdict(&self) -> Verdict {
        self.classification.verdict
    }
}

/// Result of one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub id: Uuid,
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// One entry per input record, in input order
    pub outcomes: Vec<RecordOutcome>,
}

impl AuditResult {
    /// Positions of contradicted records, ascending
    pub fn contradicted_positions(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.verdict().is_contradicted())
            .map(|outcome| outcome.position)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn contradicted_count(&self) -> usize {
        self.contradicted_positions().len()
    }

    pub fn contradicted(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.verdict().is_contradicted())
    }
}

/// Batch orchestrator
pub struct Auditor {
    config: AuditConfig,
    engine: ClassificationEngine,
    source: Arc<dyn WeatherSource>,
}

impl Auditor {
    /// Create an auditor with default configuration
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self {
            config: AuditConfig::default(),
            engine: ClassificationEngine::new(),
            source,
        }
    }

    /// Create an auditor with custom configuration
    pub fn with_config(config: AuditConfig, source: Arc<dyn WeatherSource>) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine: ClassificationEngine::new(),
            source,
        })
    }

    /// Classify every record and collect the outcomes.
    ///
    /// Fetch failures never abort the run; they reach the rules as missing
    /// data. Outcomes keep input order whatever the concurrency.
    pub async fn run(&self, records: &[NotamRecord]) -> AuditResult {
        if self.config.cache_per_airport {
            let cached = CachedSource::new(Arc::clone(&self.source));
            let result = self.run_with(records, &cached).await;
            tracing::debug!("Fetched {} distinct airports", cached.len());
            result
        } else {
            self.run_with(records, self.source.as_ref()).await
        }
    }

    async fn run_with<S>(&self, records: &[NotamRecord], source: &S) -> AuditResult
    where
        S: WeatherSource + ?Sized,
    {
        let id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(
            "Audit {} started: {} records via {}",
            id,
            records.len(),
            source.name()
        );

        let engine = &self.engine;
        let outcomes: Vec<RecordOutcome> = stream::iter(records)
            .map(|record| async move {
                let classification = engine
                    .classify_with(&record.text, source, &record.airport_id)
                    .await;
                if classification.is_contradicted() {
                    tracing::info!(
                        "Row {} ({}) flagged: {}",
                        record.position,
                        record.airport_id,
                        classification.explanation
                    );
                } else {
                    tracing::debug!(
                        "Row {} ({}) {}: {}",
                        record.position,
                        record.airport_id,
                        classification.verdict,
                        classification.explanation
                    );
                }
                RecordOutcome {
                    position: record.position,
                    airport_id: record.airport_id.clone(),
                    classification,
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        AuditResult {
            id,
            source: source.name().to_string(),
            started_at,
            completed_at: Utc::now(),
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::metar::WindDirection;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn records() -> Vec<NotamRecord> {
        vec![
            NotamRecord::new(0, "ABQ", "WIND U/S"),
            NotamRecord::new(1, "SAF", "CEILING UNREL"),
            NotamRecord::new(2, "ROW", "SVC AUTOMATED WX BCST SYSTEM U/S"),
            NotamRecord::new(3, "LRU", "WIND GUST U/S"),
            NotamRecord::new(4, "ABQ", "RWY 08/26 CLSD"),
            NotamRecord::new(5, "SAF", "ALTIMETER SETTING UNREL"),
        ]
    }

    fn source() -> StaticSource {
        StaticSource::new()
            .with(
                "SAF",
                MetarSnapshot {
                    clouds: Some(vec![CloudLayer::new("OVC", Some(1000))]),
                    ..Default::default()
                },
            )
            .with("ROW", MetarSnapshot::default())
            .with(
                "LRU",
                MetarSnapshot {
                    wdir: Some(WindDirection::Degrees(270.0)),
                    wgst: None,
                    ..Default::default()
                },
            )
    }

    struct CountingSource {
        inner: StaticSource,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn latest(&self, airport_id: &str) -> Option<MetarSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.latest(airport_id).await
        }
    }

    #[tokio::test]
    async fn test_end_to_end_scenarios() {
        let auditor = Auditor::new(Arc::new(source()));
        let result = auditor.run(&records()).await;

        let verdicts: Vec<_> = result.outcomes.iter().map(|o| o.verdict()).collect();
        assert_eq!(
            verdicts,
            vec![
                Verdict::NotContradicted, // A: ABQ unavailable
                Verdict::Contradicted,    // B: overcast at SAF
                Verdict::Contradicted,    // C: ROW reports at all
                Verdict::NotContradicted, // D: gust null, direction ignored
                Verdict::NotApplicable,
                Verdict::NotContradicted,
            ]
        );
        assert_eq!(result.contradicted_positions(), vec![1, 2]);
        assert_eq!(result.contradicted_count(), 2);
        assert_eq!(result.source, "static");
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let auditor = Auditor::new(Arc::new(source()));
        let first = auditor.run(&records()).await;
        let second = auditor.run(&records()).await;
        assert_eq!(first.contradicted_positions(), second.contradicted_positions());
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_fetch_per_applicable_record() {
        let counting = Arc::new(CountingSource {
            inner: source(),
            calls: AtomicUsize::new(0),
        });
        let auditor = Auditor::new(counting.clone());
        auditor.run(&records()).await;
        // Every record but the runway closure; SAF is fetched twice
        assert_eq!(counting.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_cache_fetches_each_airport_once() {
        let counting = Arc::new(CountingSource {
            inner: source(),
            calls: AtomicUsize::new(0),
        });
        let config = AuditConfig {
            cache_per_airport: true,
            ..Default::default()
        };
        let auditor = Auditor::with_config(config, counting.clone()).unwrap();
        let result = auditor.run(&records()).await;
        assert_eq!(counting.calls.load(Ordering::SeqCst), 4);
        assert_eq!(result.contradicted_positions(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_concurrency_keeps_positions_stable() {
        let sequential = Auditor::new(Arc::new(source())).run(&records()).await;
        let config = AuditConfig {
            concurrency: 4,
            ..Default::default()
        };
        let concurrent = Auditor::with_config(config, Arc::new(source()))
            .unwrap()
            .run(&records())
            .await;

        let positions: Vec<_> = concurrent.outcomes.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(
            sequential.contradicted_positions(),
            concurrent.contradicted_positions()
        );
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = AuditConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(Auditor::with_config(config, Arc::new(StaticSource::new())).is_err());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let result = Auditor::new(Arc::new(StaticSource::new())).run(&[]).await;
        assert!(result.outcomes.is_empty());
        assert_eq!(result.contradicted_count(), 0);
    }
}

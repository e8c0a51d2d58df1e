//! Classification engine

use super::{Category, Classification, Evidence, Verdict};
use crate::metar::MetarSnapshot;
use crate::source::WeatherSource;

/// Maps advisory text plus a weather snapshot to a verdict
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationEngine;

impl ClassificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classify `text`, calling `fetch` only if a trigger matches
    pub fn classify<F>(&self, text: &str, fetch: F) -> Verdict
    where
        F: FnOnce() -> Option<MetarSnapshot>,
    {
        self.explain(text, fetch).verdict
    }

    /// Same as [`classify`](Self::classify) but keeps the supporting detail
    pub fn explain<F>(&self, text: &str, fetch: F) -> Classification
    where
        F: FnOnce() -> Option<MetarSnapshot>,
    {
        match Category::detect(text) {
            Some(category) => self.evaluate(category, text, fetch().as_ref()),
            None => Classification::not_applicable(),
        }
    }

    /// Classify against a weather source for `airport_id`.
    ///
    /// The source is queried at most once, and not at all when the text
    /// matches no trigger.
    pub async fn classify_with<S>(&self, text: &str, source: &S, airport_id: &str) -> Classification
    where
        S: WeatherSource + ?Sized,
    {
        match Category::detect(text) {
            Some(category) => {
                let snapshot = source.latest(airport_id).await;
                self.evaluate(category, text, snapshot.as_ref())
            }
            None => Classification::not_applicable(),
        }
    }

    /// Apply the rule for `category` to an already-fetched snapshot
    pub fn evaluate(
        &self,
        category: Category,
        text: &str,
        snapshot: Option<&MetarSnapshot>,
    ) -> Classification {
        let Some(snapshot) = snapshot else {
            return Classification {
                category: Some(category),
                verdict: Verdict::NotContradicted,
                snapshot_available: false,
                observed: Vec::new(),
                explanation: format!("{} outage accepted: no METAR data available", category),
            };
        };

        let (verdict, observed) = match category.evidence(text) {
            Evidence::SnapshotPresent => (Verdict::Contradicted, Vec::new()),
            Evidence::AnyOf(fields) => {
                let observed: Vec<_> = fields
                    .iter()
                    .copied()
                    .filter(|field| snapshot.has_field(*field))
                    .collect();
                let verdict = if observed.is_empty() {
                    Verdict::NotContradicted
                } else {
                    Verdict::Contradicted
                };
                (verdict, observed)
            }
        };

        let explanation = match (verdict, observed.is_empty()) {
            (Verdict::Contradicted, true) => {
                format!("{} reported a METAR while the system is claimed out", snapshot.station())
            }
            (Verdict::Contradicted, false) => format!(
                "{} reports {} despite {} outage",
                snapshot.station(),
                observed
                    .iter()
                    .map(|f| f.api_name())
                    .collect::<Vec<_>>()
                    .join(", "),
                category
            ),
            _ => format!("{} outage confirmed: inspected fields are empty", category),
        };

        Classification {
            category: Some(category),
            verdict,
            snapshot_available: true,
            observed,
            explanation,
        }
    }
}

//! NOTAM contradiction classification

pub mod engine;
pub mod taxonomy;

pub use engine::ClassificationEngine;
pub use taxonomy::{Category, Evidence, Rule, RULES};

use crate::metar::SnapshotField;
use serde::{Deserialize, Serialize};

/// Outcome for one advisory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Live data reports what the advisory says is unavailable
    Contradicted,
    /// Live data is consistent with the outage, or missing
    NotContradicted,
    /// No trigger matched the advisory text
    NotApplicable,
}

impl Verdict {
    pub fn is_contradicted(&self) -> bool {
        matches!(self, Verdict::Contradicted)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Contradicted => write!(f, "CONTRADICTED"),
            Verdict::NotContradicted => write!(f, "NOT_CONTRADICTED"),
            Verdict::NotApplicable => write!(f, "NOT_APPLICABLE"),
        }
    }
}

/// Verdict plus what led to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Option<Category>,
    pub verdict: Verdict,
    /// Whether a snapshot was available when the rule ran
    pub snapshot_available: bool,
    /// Inspected fields that held a value
    pub observed: Vec<SnapshotField>,
    pub explanation: String,
}

impl Classification {
    pub fn not_applicable() -> Self {
        Self {
            category: None,
            verdict: Verdict::NotApplicable,
            snapshot_available: false,
            observed: Vec::new(),
            explanation: "No advisory trigger matched".to_string(),
        }
    }

    pub fn is_contradicted(&self) -> bool {
        self.verdict.is_contradicted()
    }
}

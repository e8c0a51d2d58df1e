//! Human-readable run summary

use crate::{AuditResult, NotamRecord};
use std::fmt::Write;

/// The one-line summary printed at the end of a run
pub fn summary_line(result: &AuditResult) -> String {
    format!("Total flagged NOTAMs: {}", result.contradicted_count())
}

/// Flagged rows with the advisory text and the reason, one per line
pub fn flagged_listing(result: &AuditResult, records: &[NotamRecord]) -> String {
    let mut output = String::new();

    for outcome in result.contradicted() {
        let text = records
            .iter()
            .find(|record| record.position == outcome.position)
            .map(|record| record.text.as_str())
            .unwrap_or("");
        let _ = writeln!(
            output,
            "  row {:>4}  {:<5} {}\n             {}",
            outcome.position, outcome.airport_id, text, outcome.classification.explanation
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Auditor, MetarSnapshot, StaticSource};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_summary_and_listing() {
        let records = vec![
            NotamRecord::new(0, "ABQ", "SVC AUTOMATED WX BCST SYSTEM U/S"),
            NotamRecord::new(1, "SAF", "WIND U/S"),
        ];
        let source = StaticSource::new().with("ABQ", MetarSnapshot::default());
        let result = Auditor::new(Arc::new(source)).run(&records).await;

        assert_eq!(summary_line(&result), "Total flagged NOTAMs: 1");
        let listing = flagged_listing(&result, &records);
        assert!(listing.contains("SYSTEM U/S"));
        assert!(!listing.contains("WIND U/S"));
    }
}

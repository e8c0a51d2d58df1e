//! NOTAM records as read from an export sheet

use serde::{Deserialize, Serialize};

/// One advisory line tied to an airport and a validity window.
///
/// `position` is the 0-based index of the record in input order. It is the
/// coordinate space handed to the highlight writer, so it must never be
/// renumbered after the record is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotamRecord {
    pub position: usize,
    pub airport_id: String,
    pub effective: String,
    pub expiration: String,
    pub text: String,
}

impl NotamRecord {
    pub fn new(position: usize, airport_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            position,
            airport_id: airport_id.into(),
            effective: String::new(),
            expiration: String::new(),
            text: text.into(),
        }
    }

    /// Attach the effective/expiration pair
    pub fn with_validity(mut self, effective: impl Into<String>, expiration: impl Into<String>) -> Self {
        self.effective = effective.into();
        self.expiration = expiration.into();
        self
    }

    /// True when the row carries no advisory text at all
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = NotamRecord::new(3, "ABQ", "WIND U/S").with_validity("2410011200", "2410311200");
        assert_eq!(record.position, 3);
        assert_eq!(record.effective, "2410011200");
        assert_eq!(record.expiration, "2410311200");
        assert!(!record.is_blank());
    }

    #[test]
    fn test_blank_record() {
        assert!(NotamRecord::new(0, "ABQ", "   ").is_blank());
    }
}

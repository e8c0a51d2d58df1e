//! Advisory categories and the ordered trigger table

use crate::metar::SnapshotField;
use serde::{Deserialize, Serialize};

/// Outage categories an advisory can claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Whole automated reporting system out of service
    SystemOutage,
    /// Wind sensor (or just gust reporting) out of service
    Wind,
    /// Ceiling reports unreliable
    Ceiling,
    /// Present weather reports unreliable
    PresentWeather,
    /// Altimeter setting unreliable
    Altimeter,
    /// Precipitation sensor out of service
    Precipitation,
    /// Visibility sensor out of service
    Visibility,
}

/// What a category looks for in the live snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evidence {
    /// Any snapshot at all contradicts the advisory
    SnapshotPresent,
    /// A value in any of these fields contradicts the advisory
    AnyOf(&'static [SnapshotField]),
}

const WIND_FIELDS: &[SnapshotField] = &[
    SnapshotField::WindDirection,
    SnapshotField::WindSpeed,
    SnapshotField::WindGust,
];
const GUST_FIELDS: &[SnapshotField] = &[SnapshotField::WindGust];
const CEILING_FIELDS: &[SnapshotField] = &[SnapshotField::CloudLayers];
const PRESENT_WX_FIELDS: &[SnapshotField] = &[
    SnapshotField::Temperature,
    SnapshotField::DewPoint,
    SnapshotField::Visibility,
    SnapshotField::PresentWeather,
];
const ALTIMETER_FIELDS: &[SnapshotField] = &[SnapshotField::Altimeter];
const PRECIPITATION_FIELDS: &[SnapshotField] = &[SnapshotField::Precipitation];
const VISIBILITY_FIELDS: &[SnapshotField] = &[SnapshotField::Visibility];

/// Narrows a wind advisory to gust reporting only
pub const GUST_QUALIFIER: &str = "GUST";

/// One row of the trigger table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub triggers: &'static [&'static str],
}

impl Rule {
    /// Case-sensitive substring match against any trigger
    pub fn matches(&self, text: &str) -> bool {
        self.triggers.iter().any(|trigger| text.contains(trigger))
    }
}

/// Trigger table in priority order. The first matching rule wins.
pub const RULES: &[Rule] = &[
    Rule {
        category: Category::SystemOutage,
        triggers: &["SYSTEM U/S", "SYSTEM NOT AVBL"],
    },
    Rule {
        category: Category::Wind,
        triggers: &["WIND"],
    },
    Rule {
        category: Category::Ceiling,
        triggers: &["CEILING"],
    },
    Rule {
        category: Category::PresentWeather,
        triggers: &["PRESENT WX"],
    },
    Rule {
        category: Category::Altimeter,
        triggers: &["ALTIMETER SETTING"],
    },
    Rule {
        category: Category::Precipitation,
        triggers: &["PRECIPITATION"],
    },
    // Bare substring: also hits words such as "VISUAL" or "ADVISORY"
    Rule {
        category: Category::Visibility,
        triggers: &["VIS"],
    },
];

impl Category {
    /// Category of the first rule whose trigger appears in `text`
    pub fn detect(text: &str) -> Option<Category> {
        RULES
            .iter()
            .find(|rule| rule.matches(text))
            .map(|rule| rule.category)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::SystemOutage => "System Outage",
            Category::Wind => "Wind",
            Category::Ceiling => "Ceiling",
            Category::PresentWeather => "Present Weather",
            Category::Altimeter => "Altimeter Setting",
            Category::Precipitation => "Precipitation",
            Category::Visibility => "Visibility",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::SystemOutage => "Automated weather reporting system out of service",
            Category::Wind => "Wind direction/speed/gust reporting out of service",
            Category::Ceiling => "Cloud ceiling reports unreliable",
            Category::PresentWeather => "Present weather reports unreliable",
            Category::Altimeter => "Altimeter setting unreliable",
            Category::Precipitation => "Precipitation reporting out of service",
            Category::Visibility => "Visibility reporting out of service",
        }
    }

    /// Evidence that contradicts this category for the given advisory text.
    ///
    /// Only the wind category depends on the text: a gust advisory claims
    /// nothing about direction or speed.
    pub fn evidence(&self, text: &str) -> Evidence {
        match self {
            Category::SystemOutage => Evidence::SnapshotPresent,
            Category::Wind if text.contains(GUST_QUALIFIER) => Evidence::AnyOf(GUST_FIELDS),
            Category::Wind => Evidence::AnyOf(WIND_FIELDS),
            Category::Ceiling => Evidence::AnyOf(CEILING_FIELDS),
            Category::PresentWeather => Evidence::AnyOf(PRESENT_WX_FIELDS),
            Category::Altimeter => Evidence::AnyOf(ALTIMETER_FIELDS),
            Category::Precipitation => Evidence::AnyOf(PRECIPITATION_FIELDS),
            Category::Visibility => Evidence::AnyOf(VISIBILITY_FIELDS),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

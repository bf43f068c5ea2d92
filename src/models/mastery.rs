//! Discrete mastery tiers and the interval table that drives them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Proficiency bucket of a card, stored as a percentage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i64", from = "i64")]
pub enum MasteryTier {
    #[default]
    New,
    Quarter,
    Half,
    ThreeQuarters,
    Mastered,
}

impl MasteryTier {
    pub const ALL: [MasteryTier; 5] = [
        MasteryTier::New,
        MasteryTier::Quarter,
        MasteryTier::Half,
        MasteryTier::ThreeQuarters,
        MasteryTier::Mastered,
    ];

    /// Maps a stored percentage onto a tier. Anything outside the closed set
    /// comes from a corrupted record and is normalized to `New`.
    pub fn from_percent(percent: i64) -> Self {
        match percent {
            0 => Self::New,
            25 => Self::Quarter,
            50 => Self::Half,
            75 => Self::ThreeQuarters,
            100 => Self::Mastered,
            other => {
                tracing::warn!(percent = other, "unrecognized mastery tier, resetting to 0");
                Self::New
            }
        }
    }

    pub fn as_percent(self) -> i64 {
        match self {
            Self::New => 0,
            Self::Quarter => 25,
            Self::Half => 50,
            Self::ThreeQuarters => 75,
            Self::Mastered => 100,
        }
    }

    /// Tier reached after an "easy" answer. `Mastered` is a fixed point.
    pub fn next(self) -> Self {
        match self {
            Self::New => Self::Quarter,
            Self::Quarter => Self::Half,
            Self::Half => Self::ThreeQuarters,
            Self::ThreeQuarters | Self::Mastered => Self::Mastered,
        }
    }

    /// Days added to `now` when advancing out of this tier.
    pub fn interval_days(self) -> u64 {
        match self {
            Self::New => 2,
            Self::Quarter => 4,
            Self::Half => 7,
            Self::ThreeQuarters | Self::Mastered => 14,
        }
    }

    pub fn is_mastered(self) -> bool {
        self == Self::Mastered
    }
}

impl From<MasteryTier> for i64 {
    fn from(tier: MasteryTier) -> Self {
        tier.as_percent()
    }
}

impl From<i64> for MasteryTier {
    fn from(percent: i64) -> Self {
        Self::from_percent(percent)
    }
}

impl fmt::Display for MasteryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}%", self.as_percent()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_progression() {
        let steps: Vec<(i64, u64)> = MasteryTier::ALL
            .iter()
            .map(|t| (t.next().as_percent(), t.interval_days()))
            .collect();

        assert_eq!(steps, vec![(25, 2), (50, 4), (75, 7), (100, 14), (100, 14)]);
    }

    #[test]
    fn test_unknown_percent_normalizes_to_new() {
        assert_eq!(MasteryTier::from_percent(30), MasteryTier::New);
        assert_eq!(MasteryTier::from_percent(-25), MasteryTier::New);
        assert_eq!(MasteryTier::from_percent(125), MasteryTier::New);
    }

    #[test]
    fn test_percent_mapping_is_exact() {
        for tier in MasteryTier::ALL {
            assert_eq!(MasteryTier::from_percent(tier.as_percent()), tier);
        }
    }

    #[test]
    fn test_serde_as_percent() {
        let json = serde_json::to_string(&MasteryTier::Half).unwrap();
        assert_eq!(json, "50");

        let tier: MasteryTier = serde_json::from_str("75").unwrap();
        assert_eq!(tier, MasteryTier::ThreeQuarters);

        let corrupted: MasteryTier = serde_json::from_str("42").unwrap();
        assert_eq!(corrupted, MasteryTier::New);
    }

    #[test]
    fn test_display() {
        assert_eq!(MasteryTier::Quarter.to_string(), "25%");
    }
}

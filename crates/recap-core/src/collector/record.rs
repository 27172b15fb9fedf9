use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archive::{Button, RawPatternRecord};

/// Identity of a chart: song, button mode and pattern
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternKey {
    pub title: u32,
    pub button: Button,
    pub pattern: String,
}

impl PatternKey {
    pub fn new(title: u32, button: Button, pattern: impl Into<String>) -> Self {
        Self {
            title,
            button,
            pattern: pattern.into(),
        }
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.title, self.button.number(), self.pattern)
    }
}

/// Best known in-range observation of one pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub title: u32,
    pub name: String,
    pub dlc: String,
    pub dlc_code: String,
    pub button: Button,
    pub pattern: String,
    /// Accuracy rate in percent
    pub score: f64,
    /// 1 if the pattern was cleared without a break
    pub max_combo: u8,
    pub djpower: f64,
    /// Tier point contribution
    pub rating: f64,
    pub updated_at: DateTime<Utc>,
}

impl CanonicalRecord {
    /// Build from a raw pattern whose score and timestamp were already validated
    pub fn from_raw(
        raw: &RawPatternRecord,
        button: Button,
        score: f64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: raw.title,
            name: raw.name.clone(),
            dlc: raw.dlc.clone(),
            dlc_code: raw.dlc_code.clone(),
            button,
            pattern: raw.pattern.clone(),
            score,
            max_combo: raw.max_combo.unwrap_or(0),
            djpower: raw.djpower,
            rating: raw.rating,
            updated_at,
        }
    }

    pub fn key(&self) -> PatternKey {
        PatternKey::new(self.title, self.button, self.pattern.clone())
    }

    pub fn is_max_combo(&self) -> bool {
        self.max_combo == 1
    }

    pub fn is_perfect(&self) -> bool {
        self.score == 100.0
    }

    /// Total order over observations of the same pattern.
    ///
    /// Later `updated_at` wins; equal timestamps fall back to the record
    /// contents so the choice never depends on arrival order.
    pub fn precedence(&self, other: &Self) -> Ordering {
        self.updated_at
            .cmp(&other.updated_at)
            .then_with(|| self.score.total_cmp(&other.score))
            .then_with(|| self.max_combo.cmp(&other.max_combo))
            .then_with(|| self.djpower.total_cmp(&other.djpower))
            .then_with(|| self.rating.total_cmp(&other.rating))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.dlc.cmp(&other.dlc))
            .then_with(|| self.dlc_code.cmp(&other.dlc_code))
    }
}

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{CanonicalRecord, DateRange, PatternKey, parse_timestamp};
use crate::archive::{BoardResponse, Button, RawPatternRecord};

/// Folds board responses into one canonical record per pattern
#[derive(Debug, Clone)]
pub struct RecordCollector {
    range: DateRange,
    records: HashMap<PatternKey, CanonicalRecord>,
    pattern_keys: HashSet<PatternKey>,
    cleared_pattern_keys: HashSet<PatternKey>,
}

/// Outcome of folding a single raw pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// No score, no timestamp, or unparseable values
    Unplayed,
    /// Played outside the date range
    OutOfRange,
    /// Qualified and became the canonical record
    Stored,
    /// Qualified but an existing record takes precedence
    Superseded,
}

impl RecordCollector {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            records: HashMap::new(),
            pattern_keys: HashSet::new(),
            cleared_pattern_keys: HashSet::new(),
        }
    }

    /// Fold every pattern of a board response.
    ///
    /// The button comes from the response; `requested` is used when the
    /// response does not name a known button.
    pub fn collect_board(&mut self, board: &BoardResponse, requested: Button) {
        let button = board.reported_button().unwrap_or(requested);
        for raw in board.patterns() {
            self.collect_pattern(button, raw);
        }
    }

    /// Fold one raw pattern observation
    pub fn collect_pattern(&mut self, button: Button, raw: &RawPatternRecord) -> CollectOutcome {
        let key = PatternKey::new(raw.title, button, raw.pattern.clone());
        self.pattern_keys.insert(key.clone());

        let Some((score, updated_at)) = qualifying_values(raw) else {
            return CollectOutcome::Unplayed;
        };
        if !self.range.contains(updated_at) {
            return CollectOutcome::OutOfRange;
        }

        self.cleared_pattern_keys.insert(key.clone());

        let candidate = CanonicalRecord::from_raw(raw, button, score, updated_at);
        match self.records.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
                CollectOutcome::Stored
            }
            Entry::Occupied(mut slot) => {
                if candidate.precedence(slot.get()) == Ordering::Greater {
                    trace!("Replacing record {}", slot.key());
                    slot.insert(candidate);
                    CollectOutcome::Stored
                } else {
                    CollectOutcome::Superseded
                }
            }
        }
    }

    pub fn get(&self, key: &PatternKey) -> Option<&CanonicalRecord> {
        self.records.get(key)
    }

    /// Canonical records ordered by pattern key
    pub fn into_records(self) -> Vec<CanonicalRecord> {
        let mut records: Vec<_> = self.records.into_values().collect();
        records.sort_by(|a, b| {
            (a.title, a.button, &a.pattern).cmp(&(b.title, b.button, &b.pattern))
        });
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every pattern seen, played or not
    pub fn pattern_keys(&self) -> &HashSet<PatternKey> {
        &self.pattern_keys
    }

    /// Patterns with at least one in-range play
    pub fn cleared_pattern_keys(&self) -> &HashSet<PatternKey> {
        &self.cleared_pattern_keys
    }

    pub fn total_patterns(&self) -> usize {
        self.pattern_keys.len()
    }

    pub fn total_cleared_patterns(&self) -> usize {
        self.cleared_pattern_keys.len()
    }
}

/// Score and timestamp of a played pattern, or `None` if it does not count
fn qualifying_values(raw: &RawPatternRecord) -> Option<(f64, chrono::DateTime<chrono::Utc>)> {
    let score_text = raw.score.as_deref()?.trim();
    let updated_at = parse_timestamp(raw.updated_at.as_deref()?)?;
    let score = parse_score(score_text)?;
    Some((score, updated_at))
}

/// Parse the longest numeric prefix of a score ("95.0%" reads as 95)
fn parse_score(text: &str) -> Option<f64> {
    text.char_indices()
        .map(|(i, ch)| i + ch.len_utf8())
        .rev()
        .find_map(|end| text[..end].parse::<f64>().ok())
        .filter(|score| score.is_finite())
}

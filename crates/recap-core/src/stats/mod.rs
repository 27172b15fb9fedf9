//! Aggregate statistics over canonical records.

mod dlc;

pub use dlc::{dlc_full_name, resolve_dlc_full_name, resolve_dlc_short_name};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archive::Button;
use crate::collector::CanonicalRecord;

/// DLC pack with the highest tier point sum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DlcSummary {
    pub name: String,
    pub count: usize,
    pub tier_point_sum: f64,
}

/// Highest djpower record of one button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDjpowerRecord {
    pub button: Button,
    pub title: u32,
    pub name: String,
    pub pattern: String,
    /// Short pack label (code when known)
    pub dlc: String,
    pub djpower: f64,
    pub score: f64,
    pub updated_at: DateTime<Utc>,
}

impl TopDjpowerRecord {
    fn from_record(record: &CanonicalRecord) -> Self {
        Self {
            button: record.button,
            title: record.title,
            name: record.name.clone(),
            pattern: record.pattern.clone(),
            dlc: resolve_dlc_short_name(&record.dlc, &record.dlc_code)
                .unwrap_or_else(|| record.dlc.clone()),
            djpower: record.djpower,
            score: record.score,
            updated_at: record.updated_at,
        }
    }
}

/// Statistics shown on the recap report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapStats {
    pub total_records: usize,
    /// Mean accuracy rate
    pub average_rate: f64,
    /// Best accuracy rate
    pub max_rate: f64,
    pub max_combo_count: usize,
    /// Records with a 100% rate
    pub perfect_count: usize,
    pub top_tier_point_dlc: Option<DlcSummary>,
    pub button_counts: BTreeMap<Button, usize>,
    /// Share of records per button, in percent
    pub button_ratios: BTreeMap<Button, f64>,
    pub top_djpower_by_button: BTreeMap<Button, Option<TopDjpowerRecord>>,
}

impl RecapStats {
    /// Stats for an empty record set
    pub fn empty(buttons: &[Button]) -> Self {
        Self {
            total_records: 0,
            average_rate: 0.0,
            max_rate: 0.0,
            max_combo_count: 0,
            perfect_count: 0,
            top_tier_point_dlc: None,
            button_counts: buttons.iter().map(|&b| (b, 0)).collect(),
            button_ratios: buttons.iter().map(|&b| (b, 0.0)).collect(),
            top_djpower_by_button: buttons.iter().map(|&b| (b, None)).collect(),
        }
    }

    pub fn button_count(&self, button: Button) -> usize {
        self.button_counts.get(&button).copied().unwrap_or(0)
    }

    pub fn button_ratio(&self, button: Button) -> f64 {
        self.button_ratios.get(&button).copied().unwrap_or(0.0)
    }

    pub fn top_djpower(&self, button: Button) -> Option<&TopDjpowerRecord> {
        self.top_djpower_by_button
            .get(&button)
            .and_then(|top| top.as_ref())
    }
}

/// Running totals of one DLC pack
#[derive(Debug, Clone)]
struct DlcAggregate {
    count: usize,
    tier_point_sum: f64,
    latest_at: DateTime<Utc>,
}

/// Reduce canonical records into recap statistics
pub fn derive_recap_stats(records: &[CanonicalRecord], buttons: &[Button]) -> RecapStats {
    let mut stats = RecapStats::empty(buttons);

    let mut score_sum = 0.0;
    let mut dlc_aggregates: BTreeMap<String, DlcAggregate> = BTreeMap::new();

    for record in records {
        score_sum += record.score;
        if record.score > stats.max_rate {
            stats.max_rate = record.score;
        }
        if record.is_max_combo() {
            stats.max_combo_count += 1;
        }
        if record.is_perfect() {
            stats.perfect_count += 1;
        }

        *stats.button_counts.entry(record.button).or_insert(0) += 1;

        if let Some(name) = resolve_dlc_full_name(&record.dlc, &record.dlc_code) {
            dlc_aggregates
                .entry(name)
                .and_modify(|agg| {
                    agg.count += 1;
                    agg.tier_point_sum += record.rating;
                    if record.updated_at > agg.latest_at {
                        agg.latest_at = record.updated_at;
                    }
                })
                .or_insert(DlcAggregate {
                    count: 1,
                    tier_point_sum: record.rating,
                    latest_at: record.updated_at,
                });
        }

        let top = stats.top_djpower_by_button.entry(record.button).or_insert(None);
        let replace = match top {
            None => true,
            Some(current) => {
                record.djpower > current.djpower
                    || (record.djpower == current.djpower && record.updated_at > current.updated_at)
            }
        };
        if replace {
            *top = Some(TopDjpowerRecord::from_record(record));
        }
    }

    let total = records.len();
    stats.total_records = total;
    if total > 0 {
        stats.average_rate = score_sum / total as f64;
        for &button in buttons {
            let count = stats.button_count(button);
            stats
                .button_ratios
                .insert(button, count as f64 / total as f64 * 100.0);
        }
    }

    stats.top_tier_point_dlc = dlc_aggregates
        .iter()
        .max_by(|(a_name, a), (b_name, b)| compare_dlc(a_name, a, b_name, b))
        .map(|(name, agg)| DlcSummary {
            name: name.clone(),
            count: agg.count,
            tier_point_sum: agg.tier_point_sum,
        });

    stats
}

/// Ranking of packs: tier point sum, then count, then most recent play,
/// then the lexicographically smaller name ranks higher.
fn compare_dlc(a_name: &str, a: &DlcAggregate, b_name: &str, b: &DlcAggregate) -> Ordering {
    a.tier_point_sum
        .total_cmp(&b.tier_point_sum)
        .then_with(|| a.count.cmp(&b.count))
        .then_with(|| a.latest_at.cmp(&b.latest_at))
        .then_with(|| b_name.cmp(a_name))
}

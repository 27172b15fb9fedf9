//! Achievement badges derived from recap statistics.
//!
//! Each category contributes at most one badge (the highest level it
//! reaches). Badges are returned in category order:
//!
//! 1. Perfect accuracy
//! 2. Perfect plays
//! 3. Max combo
//! 4. Favorite button
//! 5. Record count
//! 6. Tier rank
//! 7. Button collector

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::archive::{Button, TierResponse};
use crate::format::{format_count, format_percent, format_score};
use crate::stats::RecapStats;

/// Badge shown on the recap report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    /// What the player achieved, with their numbers
    pub condition: String,
}

impl Achievement {
    fn new(id: impl Into<String>, title: &str, description: &str, condition: String) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            description: description.to_string(),
            condition,
        }
    }
}

/// Threshold ladders, highest first: (minimum, id, title, description)
const COMBO_LADDER: [(usize, &str, &str, &str); 3] = [
    (500, "combo-master", "What's a BREAK?", "500+ max combo clears"),
    (200, "combo-focus", "Unbroken Focus", "200+ max combo clears"),
    (50, "stable-player", "Steady Player", "50+ max combo clears"),
];

const RECORD_LADDER: [(usize, &str, &str, &str); 3] = [
    (2000, "record-effort", "Crystal of Effort", "2,000+ records registered"),
    (500, "record-diligent", "Diligent Player", "500+ records registered"),
    (100, "record-beginner", "Precious Newcomer", "100+ records registered"),
];

const PERFECTIONIST_MIN: usize = 100;

/// Evaluate every badge category against the stats and tiers
pub fn evaluate_achievements(
    stats: &RecapStats,
    tiers: &BTreeMap<Button, Option<TierResponse>>,
) -> Vec<Achievement> {
    [
        perfect_accuracy(stats),
        perfect_plays(stats),
        max_combo(stats),
        favorite_button(stats),
        record_count(stats),
        tier_rank(tiers),
        button_collector(stats),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn perfect_accuracy(stats: &RecapStats) -> Option<Achievement> {
    (stats.max_rate == 100.0).then(|| {
        Achievement::new(
            "perfect-accuracy",
            "99% Accuracy, 1% Luck",
            "Reached 100% accuracy",
            format!("Best rate {}%", format_score(stats.max_rate)),
        )
    })
}

fn perfect_plays(stats: &RecapStats) -> Option<Achievement> {
    let condition = format!("{} perfect plays", format_count(stats.perfect_count));
    if stats.perfect_count >= PERFECTIONIST_MIN {
        Some(Achievement::new(
            "perfectionist",
            "Perfectionist",
            "100+ perfect plays",
            condition,
        ))
    } else if stats.perfect_count == 1 {
        Some(Achievement::new(
            "first-perfect",
            "The Thrill of a First Perfect",
            "First perfect play",
            condition,
        ))
    } else {
        None
    }
}

fn ladder(
    value: usize,
    rungs: &[(usize, &str, &str, &str)],
    condition: impl Fn() -> String,
) -> Option<Achievement> {
    rungs
        .iter()
        .find(|(min, ..)| value >= *min)
        .map(|(_, id, title, description)| Achievement::new(*id, title, description, condition()))
}

fn max_combo(stats: &RecapStats) -> Option<Achievement> {
    ladder(stats.max_combo_count, &COMBO_LADDER, || {
        format!("{} max combo clears", format_count(stats.max_combo_count))
    })
}

fn record_count(stats: &RecapStats) -> Option<Achievement> {
    ladder(stats.total_records, &RECORD_LADDER, || {
        format!("{} records", format_count(stats.total_records))
    })
}

fn favorite_button(stats: &RecapStats) -> Option<Achievement> {
    let mut best = Button::ALL[0];
    for button in Button::ALL {
        if stats.button_ratio(button) > stats.button_ratio(best) {
            best = button;
        }
    }

    let ratio = stats.button_ratio(best);
    if ratio <= 0.0 {
        return None;
    }

    let title = match best {
        Button::B4 => "4 Buttons Are the Truth",
        Button::B5 => "Can't Resist 5B Variable",
        Button::B6 => "6 Buttons for Me",
        Button::B8 => "The Dreaming 8B Octopus",
    };

    Some(Achievement::new(
        format!("button-{}", best.number()),
        title,
        &format!("Most played button: {}", best),
        format!("{} share {}%", best, format_percent(ratio)),
    ))
}

/// Tier ranks that earn a badge, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TierRank {
    GrandMaster,
    Master,
    Diamond,
    Platinum,
}

impl TierRank {
    const LADDER: [TierRank; 4] = [
        TierRank::GrandMaster,
        TierRank::Master,
        TierRank::Diamond,
        TierRank::Platinum,
    ];

    /// Check a lower-cased tier name
    fn matches(&self, name: &str) -> bool {
        match self {
            Self::GrandMaster => name.contains("grand master"),
            Self::Master => name.contains("master") && !name.contains("grand"),
            Self::Diamond => name.contains("diamond"),
            Self::Platinum => name.contains("platinum"),
        }
    }

    fn achievement(&self) -> Achievement {
        let (id, title, description, condition) = match self {
            Self::GrandMaster => (
                "tier-grandmaster",
                "Standing at the Summit",
                "Reached Grand Master tier",
                "Grand Master",
            ),
            Self::Master => (
                "tier-master",
                "Master's Realm",
                "Reached Master tier",
                "Master",
            ),
            Self::Diamond => (
                "tier-diamond",
                "Shining Skill",
                "Reached Diamond tier",
                "Diamond",
            ),
            Self::Platinum => (
                "tier-platinum",
                "Mark of the Upper Ranks",
                "Reached Platinum tier",
                "Platinum",
            ),
        };
        Achievement::new(id, title, description, condition.to_string())
    }
}

fn tier_rank(tiers: &BTreeMap<Button, Option<TierResponse>>) -> Option<Achievement> {
    let names: Vec<String> = Button::ALL
        .iter()
        .map(|button| {
            tiers
                .get(button)
                .and_then(|tier| tier.as_ref())
                .map(|tier| tier.tier.name.to_lowercase())
                .unwrap_or_default()
        })
        .collect();

    TierRank::LADDER
        .iter()
        .find(|rank| names.iter().any(|name| rank.matches(name)))
        .map(TierRank::achievement)
}

fn button_collector(stats: &RecapStats) -> Option<Achievement> {
    Button::ALL
        .iter()
        .all(|&button| stats.button_count(button) > 0)
        .then(|| {
            Achievement::new(
                "button-collector",
                "Button Collector",
                "Played all four button modes",
                "Records on 4B, 5B, 6B and 8B".to_string(),
            )
        })
}

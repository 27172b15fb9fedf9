//! Recap report assembly.
//!
//! [`Recap`] drives one aggregation request:
//!
//! 1. Fetch every (button, board) listing through the bounded pool, folding
//!    each response into a [`RecordCollector`] as it completes
//! 2. Fetch the tier summary of every button
//! 3. Derive statistics and achievements
//! 4. Package everything into a [`RecapResult`]
//!
//! ## Example
//!
//! ```ignore
//! use recap_core::{DateRange, Recap, RecapConfig};
//!
//! let recap = Recap::new(&RecapConfig::default())?;
//! if recap.check_nickname_exists("player").await {
//!     let range = DateRange::kst_year(2025).unwrap();
//!     let result = recap.fetch_recap("player", range).await?;
//!     println!("{} records", result.stats.total_records);
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::achievement::{Achievement, evaluate_achievements};
use crate::archive::{Button, TierResponse, board_combinations};
use crate::collector::{DateRange, RecordCollector};
use crate::config::RecapConfig;
use crate::error::{Error, Result};
use crate::network::{ArchiveApi, ArchiveSource};
use crate::pool::BoundedPool;
use crate::stats::{RecapStats, derive_recap_stats};

/// Complete recap report for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapResult {
    pub nickname: String,
    #[serde(rename = "rangeStartISO")]
    pub range_start_iso: String,
    #[serde(rename = "rangeEndISO")]
    pub range_end_iso: Option<String>,
    pub stats: RecapStats,
    /// Tier summary per button; `None` when the player has no tier there
    pub tiers: BTreeMap<Button, Option<TierResponse>>,
    /// Patterns listed on the boards
    pub total_patterns: usize,
    /// Patterns played within the range
    pub total_cleared_patterns: usize,
    pub achievements: Vec<Achievement>,
}

/// Recap aggregation engine
pub struct Recap<S = ArchiveApi> {
    source: S,
    pool: BoundedPool,
}

impl Recap<ArchiveApi> {
    /// Create an engine backed by the live archive API
    pub fn new(config: &RecapConfig) -> Result<Self> {
        Ok(Self::with_source(ArchiveApi::from_config(config)?, config))
    }
}

impl<S: ArchiveSource> Recap<S> {
    /// Create an engine backed by any archive source
    pub fn with_source(source: S, config: &RecapConfig) -> Self {
        Self {
            source,
            pool: BoundedPool::new(config.concurrency),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Check whether a nickname exists before running a full recap
    pub async fn check_nickname_exists(&self, nickname: &str) -> bool {
        self.source.check_nickname_exists(nickname).await
    }

    /// Build the recap of `nickname` for plays in `[range_start, range_end)`
    pub async fn fetch_recap_data(
        &self,
        nickname: &str,
        range_start: DateTime<Utc>,
        range_end: Option<DateTime<Utc>>,
    ) -> Result<RecapResult> {
        self.fetch_recap(nickname, DateRange::new(range_start, range_end))
            .await
    }

    /// Build the recap of `nickname` for plays inside `range`
    pub async fn fetch_recap(&self, nickname: &str, range: DateRange) -> Result<RecapResult> {
        info!(
            "Building recap for {} (concurrency {})",
            nickname,
            self.pool.concurrency()
        );

        let collector = self.collect_boards(nickname, range).await?;
        let total_patterns = collector.total_patterns();
        let total_cleared_patterns = collector.total_cleared_patterns();
        let records = collector.into_records();

        let stats = derive_recap_stats(&records, &Button::ALL);
        let tiers = self.fetch_tiers(nickname).await?;
        let achievements = evaluate_achievements(&stats, &tiers);

        info!(
            "Recap for {}: {} records, {}/{} patterns cleared, {} achievements",
            nickname,
            stats.total_records,
            total_cleared_patterns,
            total_patterns,
            achievements.len()
        );

        Ok(RecapResult {
            nickname: nickname.to_string(),
            range_start_iso: to_iso(range.start),
            range_end_iso: range.end.map(to_iso),
            stats,
            tiers,
            total_patterns,
            total_cleared_patterns,
            achievements,
        })
    }

    /// Fetch every board and fold it into a collector.
    ///
    /// Boards the archive does not offer for a button contribute nothing;
    /// any other failure aborts the whole collection.
    async fn collect_boards(&self, nickname: &str, range: DateRange) -> Result<RecordCollector> {
        let mut collector = RecordCollector::new(range);
        let mut skipped = 0usize;

        self.pool
            .for_each_completed(
                board_combinations(),
                |(button, board)| async move {
                    match self.source.fetch_board(nickname, button, board).await {
                        Ok(response) => Ok(Some((button, response))),
                        Err(Error::InvalidBoard { button, board }) => {
                            debug!("Skipping board {} {}: not offered", button, board);
                            Ok(None)
                        }
                        Err(e) => Err(e),
                    }
                },
                |fetched| match fetched {
                    Some((button, response)) => collector.collect_board(&response, button),
                    None => skipped += 1,
                },
            )
            .await?;

        debug!(
            "Collected {} records from boards ({} skipped)",
            collector.len(),
            skipped
        );
        Ok(collector)
    }

    async fn fetch_tiers(&self, nickname: &str) -> Result<BTreeMap<Button, Option<TierResponse>>> {
        let responses = try_join_all(
            Button::ALL
                .iter()
                .map(|&button| self.source.fetch_tier(nickname, button)),
        )
        .await?;

        Ok(Button::ALL.into_iter().zip(responses).collect())
    }
}

fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveTier, Board, BoardFloor, BoardResponse, RawPatternRecord};
    use crate::collector::parse_timestamp;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Reply {
        Board(BoardResponse),
        InvalidBoard,
        NotFound,
        Unavailable,
    }

    enum TierReply {
        Tier(TierResponse),
        NoTier,
        NotFound,
        Unavailable,
    }

    /// In-memory archive; boards without a reply are empty
    #[derive(Default)]
    struct FakeArchive {
        boards: HashMap<(Button, Board), Reply>,
        tiers: HashMap<Button, TierReply>,
        board_calls: AtomicUsize,
    }

    impl FakeArchive {
        fn with_board(mut self, button: Button, board: Board, reply: Reply) -> Self {
            self.boards.insert((button, board), reply);
            self
        }

        fn with_tier(mut self, button: Button, reply: TierReply) -> Self {
            self.tiers.insert(button, reply);
            self
        }
    }

    fn unavailable() -> Error {
        Error::HttpStatus {
            status: 503,
            body: "Service Unavailable".to_string(),
        }
    }

    impl ArchiveSource for FakeArchive {
        async fn fetch_board(
            &self,
            nickname: &str,
            button: Button,
            board: Board,
        ) -> Result<BoardResponse> {
            self.board_calls.fetch_add(1, Ordering::SeqCst);
            match self.boards.get(&(button, board)) {
                Some(Reply::Board(response)) => Ok(response.clone()),
                Some(Reply::InvalidBoard) => Err(Error::InvalidBoard { button, board }),
                Some(Reply::NotFound) => Err(Error::NotFound {
                    nickname: nickname.to_string(),
                }),
                Some(Reply::Unavailable) => Err(unavailable()),
                None => Ok(BoardResponse {
                    success: true,
                    button: Some(button.number().to_string()),
                    board: Some(board.short_name().to_string()),
                    ..Default::default()
                }),
            }
        }

        async fn fetch_tier(&self, nickname: &str, button: Button) -> Result<Option<TierResponse>> {
            match self.tiers.get(&button) {
                Some(TierReply::Tier(tier)) => Ok(Some(tier.clone())),
                Some(TierReply::NoTier) | None => Ok(None),
                Some(TierReply::NotFound) => Err(Error::NotFound {
                    nickname: nickname.to_string(),
                }),
                Some(TierReply::Unavailable) => Err(unavailable()),
            }
        }
    }

    fn pattern(title: u32, pattern: &str, score: &str, updated_at: &str) -> RawPatternRecord {
        RawPatternRecord {
            title,
            name: format!("Song {}", title),
            composer: "Composer".to_string(),
            pattern: pattern.to_string(),
            score: Some(score.to_string()),
            max_combo: Some(1),
            djpower: 150.0,
            rating: 150.0,
            updated_at: Some(updated_at.to_string()),
            dlc: "Respect".to_string(),
            dlc_code: "R".to_string(),
        }
    }

    fn board_reply(button: Button, patterns: Vec<RawPatternRecord>) -> Reply {
        Reply::Board(BoardResponse {
            success: true,
            board: Some("10".to_string()),
            button: Some(button.number().to_string()),
            total_count: patterns.len() as u32,
            floors: vec![BoardFloor {
                floor_number: 10.0,
                patterns,
            }],
        })
    }

    fn recap(source: FakeArchive) -> Recap<FakeArchive> {
        Recap::with_source(source, &RecapConfig::default())
    }

    fn range_2025() -> DateRange {
        DateRange::kst_year(2025).unwrap()
    }

    #[tokio::test]
    async fn test_same_song_on_two_buttons() {
        let source = FakeArchive::default()
            .with_board(
                Button::B4,
                Board::Level10,
                board_reply(
                    Button::B4,
                    vec![pattern(100, "NM", "95", "2025-03-01T00:00:00Z")],
                ),
            )
            .with_board(
                Button::B6,
                Board::Level10,
                board_reply(
                    Button::B6,
                    vec![pattern(100, "NM", "95", "2025-06-01T00:00:00Z")],
                ),
            );

        let result = recap(source).fetch_recap("player", range_2025()).await.unwrap();

        assert_eq!(result.stats.total_records, 2);
        assert_eq!(result.stats.button_count(Button::B4), 1);
        assert_eq!(result.stats.button_count(Button::B5), 0);
        assert_eq!(result.stats.button_count(Button::B6), 1);
        assert_eq!(result.stats.button_count(Button::B8), 0);
        assert_eq!(result.total_patterns, 2);
        assert_eq!(result.total_cleared_patterns, 2);
    }

    #[tokio::test]
    async fn test_duplicate_reports_keep_newest() {
        let source = FakeArchive::default()
            .with_board(
                Button::B5,
                Board::Level3,
                board_reply(
                    Button::B5,
                    vec![pattern(7, "HD", "80", "2025-01-01T00:00:00Z")],
                ),
            )
            .with_board(
                Button::B5,
                Board::Level4,
                board_reply(
                    Button::B5,
                    vec![pattern(7, "HD", "95", "2025-02-01T00:00:00Z")],
                ),
            );

        let result = recap(source).fetch_recap("player", range_2025()).await.unwrap();

        assert_eq!(result.stats.total_records, 1);
        assert_eq!(result.stats.max_rate, 95.0);
        assert_eq!(result.total_patterns, 1);
    }

    #[tokio::test]
    async fn test_invalid_board_is_skipped() {
        let source = FakeArchive::default()
            .with_board(Button::B8, Board::Sc15, Reply::InvalidBoard)
            .with_board(
                Button::B8,
                Board::Sc10,
                board_reply(
                    Button::B8,
                    vec![pattern(9, "SC", "99.5", "2025-07-01T00:00:00Z")],
                ),
            );

        let engine = recap(source);
        let result = engine.fetch_recap("player", range_2025()).await.unwrap();

        assert_eq!(result.stats.total_records, 1);
        assert_eq!(engine.source().board_calls.load(Ordering::SeqCst), 64);
    }

    #[tokio::test]
    async fn test_not_found_aborts() {
        let source = FakeArchive::default().with_board(Button::B6, Board::Mx, Reply::NotFound);

        let err = recap(source)
            .fetch_recap("ghost", range_2025())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let source = FakeArchive::default().with_board(Button::B4, Board::Level1, Reply::Unavailable);

        let err = recap(source)
            .fetch_recap("player", range_2025())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_tiers_and_result_fields() {
        let diamond = TierResponse {
            success: true,
            tier_point: 7000.0,
            tier: ArchiveTier {
                rating: 7000.0,
                name: "Diamond III".to_string(),
                code: "DM3".to_string(),
            },
            ..Default::default()
        };
        let source = FakeArchive::default()
            .with_tier(Button::B4, TierReply::Tier(diamond.clone()))
            .with_tier(Button::B5, TierReply::NoTier);

        let result = recap(source)
            .fetch_recap_data(
                "player",
                parse_timestamp("2025-01-01T00:00:00+09:00").unwrap(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(result.nickname, "player");
        assert_eq!(result.range_start_iso, "2024-12-31T15:00:00.000Z");
        assert_eq!(result.range_end_iso, None);
        assert_eq!(result.tiers.len(), 4);
        assert_eq!(result.tiers[&Button::B4], Some(diamond));
        assert_eq!(result.tiers[&Button::B5], None);
        assert_eq!(result.stats, RecapStats::empty(&Button::ALL));

        let ids: Vec<_> = result.achievements.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["tier-diamond"]);
    }

    #[tokio::test]
    async fn test_tier_not_found_aborts() {
        let source = FakeArchive::default().with_tier(Button::B8, TierReply::NotFound);
        let err = recap(source)
            .fetch_recap("ghost", range_2025())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_check_nickname_exists() {
        let missing = FakeArchive::default().with_tier(Button::B4, TierReply::NotFound);
        assert!(!recap(missing).check_nickname_exists("ghost").await);

        let no_tier = FakeArchive::default().with_tier(Button::B4, TierReply::NoTier);
        assert!(recap(no_tier).check_nickname_exists("newbie").await);
    }

    #[tokio::test]
    async fn test_check_nickname_fails_open_on_transport_error() {
        // Known bias: an unreachable API reports the nickname as existing
        let flaky = FakeArchive::default().with_tier(Button::B4, TierReply::Unavailable);
        assert!(recap(flaky).check_nickname_exists("anyone").await);
    }

    #[tokio::test]
    async fn test_result_serializes_like_the_web_report() {
        let result = recap(FakeArchive::default())
            .fetch_recap("player", range_2025())
            .await
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["rangeStartISO"], "2024-12-31T15:00:00.000Z");
        assert_eq!(json["rangeEndISO"], "2025-12-31T15:00:00.000Z");
        assert_eq!(json["stats"]["buttonCounts"]["4"], 0);
        assert!(json["stats"]["topTierPointDlc"].is_null());
        assert!(json["tiers"]["8"].is_null());

        let parsed: RecapResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, result);
    }
}

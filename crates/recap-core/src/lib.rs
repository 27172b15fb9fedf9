//! # recap-core
//!
//! Core library for the V-ARCHIVE yearly recap.
//!
//! This crate provides:
//! - Archive wire types and the button/board catalogue
//! - HTTP access to the archive API with retries
//! - A bounded concurrency pool for the board fan-out
//! - Record collection with date-range filtering and deduplication
//! - Recap statistics and achievement badges
//!
//! [`Recap`] ties these together into a single [`RecapResult`].

pub mod achievement;
pub mod archive;
pub mod collector;
pub mod config;
pub mod error;
pub mod format;
pub mod network;
pub mod pool;
pub mod report;
pub mod stats;

pub use achievement::{Achievement, evaluate_achievements};
pub use archive::{
    ArchiveTier, Board, BoardFloor, BoardResponse, Button, RawPatternRecord, TierResponse,
    TopListEntry, board_combinations,
};
pub use collector::{
    CanonicalRecord, CollectOutcome, DateRange, PatternKey, RecordCollector, kst_midnight,
    parse_timestamp,
};
pub use config::{RecapConfig, RecapConfigBuilder};
pub use error::{Error, Result};
pub use format::{format_count, format_percent, format_score};
pub use network::{ArchiveApi, ArchiveSource, HttpClient};
pub use pool::BoundedPool;
pub use report::{Recap, RecapResult};
pub use stats::{DlcSummary, RecapStats, TopDjpowerRecord, derive_recap_stats};

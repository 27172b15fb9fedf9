//! Record collection and merging.
//!
//! Board responses are folded into a [`RecordCollector`]:
//!
//! - **Pattern keys**: every `(title, button, pattern)` seen, played or not
//! - **Cleared keys**: patterns with at least one scored play inside the range
//! - **Canonical records**: the most recently updated in-range play per pattern
//!
//! Folding is order-independent, so board responses may arrive in any order.

mod range;
mod record;
mod record_collector;

pub use range::{DateRange, kst_midnight, parse_timestamp};
pub use record::{CanonicalRecord, PatternKey};
pub use record_collector::{CollectOutcome, RecordCollector};

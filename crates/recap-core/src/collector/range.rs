use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Offset of Korea Standard Time from UTC, in hours
const KST_OFFSET_HOURS: i64 = 9;

/// Half-open time window `[start, end)`; an absent end is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Everything from `start` on
    pub fn since(start: DateTime<Utc>) -> Self {
        Self::new(start, None)
    }

    /// Calendar year in Korea Standard Time (`[year-01-01, year+1-01-01)` KST)
    pub fn kst_year(year: i32) -> Option<Self> {
        let start = kst_midnight(NaiveDate::from_ymd_opt(year, 1, 1)?)?;
        let end = kst_midnight(NaiveDate::from_ymd_opt(year + 1, 1, 1)?)?;
        Some(Self::new(start, Some(end)))
    }

    /// Check if a timestamp falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if at < self.start {
            return false;
        }
        match self.end {
            Some(end) => at < end,
            None => true,
        }
    }
}

/// Midnight of a KST calendar date, as UTC
pub fn kst_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    let local = date.and_hms_opt(0, 0, 0)?;
    let utc = local - chrono::Duration::hours(KST_OFFSET_HOURS);
    Some(Utc.from_utc_datetime(&utc))
}

/// Parse an archive timestamp.
///
/// Accepts RFC 3339, an offset-less date-time (taken as UTC) or a bare date
/// (UTC midnight). Returns `None` for anything else.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

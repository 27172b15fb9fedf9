//! Run command for building a recap report.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use recap_core::{
    Button, DateRange, Recap, RecapConfig, RecapResult, format_count, format_percent,
    format_score, kst_midnight,
};
use tracing::info;

use super::{LOAD_FAILED, NICKNAME_NOT_FOUND};

/// Year covered when no range is given
pub const RECAP_YEAR: i32 = 2025;

pub struct RunOptions {
    pub nickname: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub json: bool,
    pub output: Option<PathBuf>,
}

pub async fn run(config: &RecapConfig, options: RunOptions) -> Result<ExitCode> {
    let range = resolve_range(options.from.as_deref(), options.to.as_deref())?;
    let recap = Recap::new(config)?;

    if !recap.check_nickname_exists(&options.nickname).await {
        eprintln!("{}", NICKNAME_NOT_FOUND);
        return Ok(ExitCode::FAILURE);
    }

    eprintln!("Loading records for {}...", options.nickname);
    let result = match recap.fetch_recap(&options.nickname, range).await {
        Ok(result) => result,
        Err(e) if e.is_not_found() => {
            eprintln!("{}", NICKNAME_NOT_FOUND);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(anyhow::Error::new(e).context(LOAD_FAILED)),
    };
    info!(
        "Loaded {} records for {}",
        result.stats.total_records, result.nickname
    );

    let content = if options.json {
        serde_json::to_string_pretty(&result).context("Failed to serialize report")?
    } else {
        render_summary(&result)
    };

    match &options.output {
        Some(path) => {
            fs::write(path, &content)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{}", content),
    }

    Ok(ExitCode::SUCCESS)
}

/// Parse a range bound: `YYYY-MM-DD` is midnight KST, anything else RFC 3339
pub fn parse_bound(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return kst_midnight(date).with_context(|| format!("Date out of range: {}", value));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid date '{}', expected RFC 3339 or YYYY-MM-DD", value))
}

/// Build the date range from `--from/--to`.
///
/// Without bounds this is the recap year. A missing `--from` starts at the
/// recap year; a missing `--to` leaves the range open.
pub fn resolve_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    let year = DateRange::kst_year(RECAP_YEAR).context("Recap year out of range")?;
    if from.is_none() && to.is_none() {
        return Ok(year);
    }

    let start = from.map(parse_bound).transpose()?.unwrap_or(year.start);
    let end = to.map(parse_bound).transpose()?;
    if let Some(end) = end
        && end <= start
    {
        bail!("--to must be later than --from");
    }

    Ok(DateRange::new(start, end))
}

/// Render the human-readable report
pub fn render_summary(result: &RecapResult) -> String {
    let stats = &result.stats;
    let mut lines = vec![
        format!("V-ARCHIVE recap for {}", result.nickname),
        format!(
            "Range: {} .. {}",
            result.range_start_iso,
            result.range_end_iso.as_deref().unwrap_or("now")
        ),
        String::new(),
        format!("  Records          {}", format_count(stats.total_records)),
        format!("  Average rate     {}%", format_score(stats.average_rate)),
        format!("  Best rate        {}%", format_score(stats.max_rate)),
        format!("  Max combos       {}", format_count(stats.max_combo_count)),
        format!("  Perfect plays    {}", format_count(stats.perfect_count)),
        format!(
            "  Patterns played  {} / {}",
            format_count(result.total_cleared_patterns),
            format_count(result.total_patterns)
        ),
    ];

    lines.push(match &stats.top_tier_point_dlc {
        Some(dlc) => format!(
            "  Top DLC          {} ({} records, {} TP)",
            dlc.name,
            format_count(dlc.count),
            format_score(dlc.tier_point_sum)
        ),
        None => "  Top DLC          -".to_string(),
    });

    lines.push(String::new());
    lines.push("Buttons".to_string());
    for button in Button::ALL {
        lines.push(format!(
            "  {}  {:>6}  ({}%)",
            button,
            format_count(stats.button_count(button)),
            format_percent(stats.button_ratio(button))
        ));
    }

    lines.push(String::new());
    lines.push("Best djpower".to_string());
    for button in Button::ALL {
        lines.push(match stats.top_djpower(button) {
            Some(top) => format!(
                "  {}  {} [{}] {}  {} ({}%)",
                button,
                top.name,
                top.pattern,
                top.dlc,
                format_score(top.djpower),
                format_score(top.score)
            ),
            None => format!("  {}  -", button),
        });
    }

    lines.push(String::new());
    lines.push("Tiers".to_string());
    for button in Button::ALL {
        let tier = result.tiers.get(&button).and_then(|tier| tier.as_ref());
        lines.push(match tier {
            Some(tier) => format!(
                "  {}  {} ({})",
                button,
                tier.tier.name,
                format_score(tier.tier_point)
            ),
            None => format!("  {}  -", button),
        });
    }

    lines.push(String::new());
    lines.push("Achievements".to_string());
    if result.achievements.is_empty() {
        lines.push("  none yet".to_string());
    }
    for achievement in &result.achievements {
        lines.push(format!(
            "  {}: {} ({})",
            achievement.title, achievement.description, achievement.condition
        ));
    }

    lines.join("\n")
}

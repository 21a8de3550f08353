use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;

/// Current wall clock in epoch milliseconds, the store's native time unit.
pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Resolve an optional date argument to a local `YYYY-MM-DD` day.
pub(crate) fn parse_day(date_str: Option<String>) -> Result<String> {
    let date = match date_str {
        None => Local::now().date_naive(),
        Some(s) => match s.as_str() {
            "today" => Local::now().date_naive(),
            "yesterday" => Local::now().date_naive() - chrono::Duration::days(1),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday"))?,
        },
    };
    Ok(date.format("%Y-%m-%d").to_string())
}

/// Render an epoch-millisecond timestamp as local date and time.
pub(crate) fn format_local(ms: i64) -> String {
    use chrono::TimeZone;
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map_or_else(|| "?".to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

/// "3d 4h" / "5h" / "<1h" until a future timestamp.
pub(crate) fn format_remaining(until_ms: i64, now_ms: i64) -> String {
    let remaining_ms = until_ms.saturating_sub(now_ms);
    let hours = remaining_ms / (60 * 60 * 1000);
    if hours >= 24 {
        let days = hours / 24;
        let rest = hours % 24;
        if rest == 0 {
            format!("{days}d")
        } else {
            format!("{days}d {rest}h")
        }
    } else if hours >= 1 {
        format!("{hours}h")
    } else {
        "<1h".to_string()
    }
}

/// Prep time in whole minutes, rounded up ("8m").
pub(crate) fn format_prep(seconds: u32) -> String {
    let minutes = seconds.div_ceil(60);
    format!("{minutes}m")
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

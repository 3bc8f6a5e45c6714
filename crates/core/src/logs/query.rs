use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::types::LogQuery;

/// Largest page the System Log API returns.
pub const MAX_LOG_LIMIT: u32 = 1000;

/// Errors raised while validating log query options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogQueryError {
    #[error("Invalid duration '{0}': expected a positive number followed by s, m, h, d or w (e.g. 15m)")]
    InvalidDuration(String),

    #[error("--within cannot be combined with --since or --until")]
    ConflictingWindow,

    #[error("--since ({since}) must be before --until ({until})")]
    InvalidRange {
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    },

    #[error("--limit must be between 1 and 1000, got {0}")]
    InvalidLimit(u32),
}

/// Raw log options as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct LogQueryOptions {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub within: Option<String>,
    pub filter: Option<String>,
    pub query: Option<String>,
    pub limit: Option<u32>,
}

/// Parses a relative duration such as `30s`, `15m`, `2h`, `7d` or `1w`.
pub fn parse_within(value: &str) -> Result<Duration, LogQueryError> {
    let invalid = || LogQueryError::InvalidDuration(value.to_string());
    let value = value.trim();

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (amount, unit) = value.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    let duration = match unit {
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        _ => None,
    };
    duration.ok_or_else(invalid)
}

/// Pure function: turn command-line options into a validated query.
///
/// `within` is resolved against `now` into a `since` bound.
pub fn build_log_query(
    options: LogQueryOptions,
    now: DateTime<Utc>,
) -> Result<LogQuery, LogQueryError> {
    let (since, until) = match options.within.as_deref() {
        Some(_) if options.since.is_some() || options.until.is_some() => {
            return Err(LogQueryError::ConflictingWindow);
        }
        Some(within) => {
            let since = now
                .checked_sub_signed(parse_within(within)?)
                .ok_or_else(|| LogQueryError::InvalidDuration(within.to_string()))?;
            (Some(since), None)
        }
        None => (options.since, options.until),
    };

    if let (Some(since), Some(until)) = (since, until) {
        if since >= until {
            return Err(LogQueryError::InvalidRange { since, until });
        }
    }

    if let Some(limit) = options.limit {
        if limit == 0 || limit > MAX_LOG_LIMIT {
            return Err(LogQueryError::InvalidLimit(limit));
        }
    }

    Ok(LogQuery {
        since,
        until,
        filter: options.filter.filter(|f| !f.trim().is_empty()),
        query: options.query.filter(|q| !q.trim().is_empty()),
        limit: options.limit,
    })
}

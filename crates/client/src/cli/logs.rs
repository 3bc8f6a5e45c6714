//! System Log CLI command.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use oktactl_core::logs::LogQueryOptions;

/// Arguments of `logs`.
#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Maximum number of events (1-1000). Without it every page is read.
    #[arg(long, env = "OKTACTL_LIMIT")]
    pub limit: Option<u32>,
    /// Keyword search across event fields.
    #[arg(long, env = "OKTACTL_QUERY")]
    pub query: Option<String>,
    /// SCIM filter expression, e.g. 'eventType eq "user.session.start"'.
    #[arg(long, env = "OKTACTL_FILTER")]
    pub filter: Option<String>,
    /// Lower bound (RFC 3339 timestamp or YYYY-MM-DD).
    #[arg(long, env = "OKTACTL_SINCE", value_parser = parse_timestamp)]
    pub since: Option<DateTime<Utc>>,
    /// Upper bound (RFC 3339 timestamp or YYYY-MM-DD).
    #[arg(long, env = "OKTACTL_UNTIL", value_parser = parse_timestamp)]
    pub until: Option<DateTime<Utc>>,
    /// Relative window ending now, e.g. 15m, 2h, 7d.
    #[arg(long, env = "OKTACTL_WITHIN", conflicts_with_all = ["since", "until"])]
    pub within: Option<String>,
}

impl From<LogsArgs> for LogQueryOptions {
    fn from(args: LogsArgs) -> Self {
        LogQueryOptions {
            since: args.since,
            until: args.until,
            within: args.within,
            filter: args.filter,
            query: args.query,
            limit: args.limit,
        }
    }
}

/// Parse an RFC 3339 timestamp, or a bare date as midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("'{}' is neither an RFC 3339 timestamp nor a YYYY-MM-DD date", value))
}

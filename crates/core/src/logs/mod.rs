//! System Log queries.

mod query;
mod types;

pub use query::{build_log_query, parse_within, LogQueryError, LogQueryOptions, MAX_LOG_LIMIT};
pub use types::{LogEvent, LogQuery, LogService};

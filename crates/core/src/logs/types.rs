use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::ServiceResult;

/// A single System Log event, reduced to the fields the CLI reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub uuid: String,
    pub published: DateTime<Utc>,
    pub event_type: String,
    pub severity: String,
    pub display_message: Option<String>,
    /// Display name of the actor, falling back to its alternate id.
    pub actor: Option<String>,
    pub outcome: Option<String>,
    pub client_ip: Option<String>,
}

/// Validated System Log query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogQuery {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    /// SCIM-style filter expression.
    pub filter: Option<String>,
    /// Free-text keyword search.
    pub query: Option<String>,
    pub limit: Option<u32>,
}

/// Audit log access offered by the identity platform.
#[async_trait]
pub trait LogService: Send + Sync {
    /// Fetches events matching `query`, oldest first.
    async fn list_log_events(&self, query: &LogQuery) -> ServiceResult<Vec<LogEvent>>;
}

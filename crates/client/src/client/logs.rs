//! System Log API operations.

use async_trait::async_trait;
use chrono::SecondsFormat;
use oktactl_core::logs::{LogEvent, LogQuery, LogService};
use oktactl_core::identity::ServiceResult;
use url::Url;

use super::conversions::OktaLogEvent;
use super::OktaClient;
use crate::error::Result;

/// Append the query parameters understood by `/api/v1/logs`.
pub fn apply_log_query(url: &mut Url, query: &LogQuery) {
    let mut pairs = url.query_pairs_mut();
    if let Some(since) = query.since {
        pairs.append_pair("since", &since.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if let Some(until) = query.until {
        pairs.append_pair("until", &until.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if let Some(filter) = &query.filter {
        pairs.append_pair("filter", filter);
    }
    if let Some(keywords) = &query.query {
        pairs.append_pair("q", keywords);
    }
    if let Some(limit) = query.limit {
        pairs.append_pair("limit", &limit.to_string());
    }
    pairs.append_pair("sortOrder", "ASCENDING");
}

impl OktaClient {
    /// Fetch System Log events.
    ///
    /// With a limit only the first page is read; otherwise pages are followed
    /// until the log returns an empty one.
    pub async fn fetch_log_events(&self, query: &LogQuery) -> Result<Vec<LogEvent>> {
        let mut url = self.endpoint(&["api", "v1", "logs"])?;
        apply_log_query(&mut url, query);

        let events: Vec<OktaLogEvent> = if query.limit.is_some() {
            self.get_json(url).await?
        } else {
            self.get_paginated(url).await?
        };
        Ok(events.into_iter().map(LogEvent::from).collect())
    }
}

#[async_trait]
impl LogService for OktaClient {
    async fn list_log_events(&self, query: &LogQuery) -> ServiceResult<Vec<LogEvent>> {
        Ok(self.fetch_log_events(query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn encodes_every_bound() {
        let mut url = Url::parse("https://acme.okta.com/api/v1/logs").unwrap();
        let query = LogQuery {
            since: Some(Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap()),
            until: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            filter: Some(r#"eventType eq "user.session.start""#.to_string()),
            query: Some("ada".to_string()),
            limit: Some(25),
        };

        apply_log_query(&mut url, &query);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("since".to_string(), "2024-05-01T11:00:00.000Z".to_string()),
                ("until".to_string(), "2024-05-01T12:00:00.000Z".to_string()),
                (
                    "filter".to_string(),
                    r#"eventType eq "user.session.start""#.to_string()
                ),
                ("q".to_string(), "ada".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("sortOrder".to_string(), "ASCENDING".to_string()),
            ]
        );
    }

    #[test]
    fn empty_query_only_sorts() {
        let mut url = Url::parse("https://acme.okta.com/api/v1/logs").unwrap();
        apply_log_query(&mut url, &LogQuery::default());
        assert_eq!(url.query(), Some("sortOrder=ASCENDING"));
    }
}

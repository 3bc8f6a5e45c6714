//! Connectivity check.

use super::conversions::OktaUser;
use super::OktaClient;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Round-trip check against the organisation.
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn ping(&self) -> Result<Ping>;
}

/// Result of a successful round trip to the organisation.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ping {
    pub org_url: String,
    pub status: String,
    pub latency_ms: u64,
}

#[async_trait]
impl Connectivity for OktaClient {
    /// Authenticate and read a single user to prove the credentials work.
    async fn ping(&self) -> Result<Ping> {
        let started = Instant::now();
        let mut url = self.endpoint(&["api", "v1", "users"])?;
        url.query_pairs_mut().append_pair("limit", "1");
        let _: Vec<OktaUser> = self.get_json(url).await?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::debug!(latency_ms, "Ping succeeded");
        Ok(Ping {
            org_url: self.org_url().to_string(),
            status: "ok".to_string(),
            latency_ms,
        })
    }
}

//! Group API operations.

use async_trait::async_trait;
use oktactl_core::identity::{Group, GroupService, ServiceResult};
use reqwest::Method;

use super::conversions::OktaGroup;
use super::OktaClient;
use crate::error::Result;

impl OktaClient {
    /// Get group by ID.
    pub async fn fetch_group(&self, id: &str) -> Result<Option<Group>> {
        let url = self.endpoint(&["api", "v1", "groups", id])?;
        let group: Option<OktaGroup> = self.get_optional(url).await?;
        Ok(group.map(Group::from))
    }

    /// List all groups.
    pub async fn fetch_groups(&self) -> Result<Vec<Group>> {
        let url = self.endpoint(&["api", "v1", "groups"])?;
        let groups: Vec<OktaGroup> = self.get_paginated(url).await?;
        Ok(groups.into_iter().map(Group::from).collect())
    }

    /// List the groups of a user.
    pub async fn fetch_user_groups(&self, user_id: &str) -> Result<Vec<Group>> {
        let url = self.endpoint(&["api", "v1", "users", user_id, "groups"])?;
        let groups: Vec<OktaGroup> = self.get_paginated(url).await?;
        Ok(groups.into_iter().map(Group::from).collect())
    }

    fn membership_url(&self, group_id: &str, user_id: &str) -> Result<url::Url> {
        self.endpoint(&["api", "v1", "groups", group_id, "users", user_id])
    }
}

#[async_trait]
impl GroupService for OktaClient {
    async fn get_group(&self, id: &str) -> ServiceResult<Option<Group>> {
        Ok(self.fetch_group(id).await?)
    }

    async fn list_groups(&self) -> ServiceResult<Vec<Group>> {
        Ok(self.fetch_groups().await?)
    }

    async fn list_user_groups(&self, user_id: &str) -> ServiceResult<Vec<Group>> {
        Ok(self.fetch_user_groups(user_id).await?)
    }

    async fn add_user_to_group(&self, user_id: &str, group_id: &str) -> ServiceResult<()> {
        let url = self.membership_url(group_id, user_id)?;
        Ok(self.send_empty(Method::PUT, url).await?)
    }

    async fn remove_user_from_group(&self, group_id: &str, user_id: &str) -> ServiceResult<()> {
        let url = self.membership_url(group_id, user_id)?;
        Ok(self.send_empty(Method::DELETE, url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OktaConfig;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const TEST_KEY: &str = include_str!("testdata/test_key.pem");

    fn group_json(id: &str, name: &str) -> String {
        format!(r#"{{"id":"{}","type":"OKTA_GROUP","profile":{{"name":"{}"}}}}"#, id, name)
    }

    /// Serves the token endpoint and two pages of a user's groups over plain
    /// HTTP, recording every request target.
    async fn serve_user_groups() -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        let next = format!("{}/api/v1/users/u1/groups?after=g1&limit=200", origin);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let mut buffer = vec![0u8; 16 * 1024];
                let mut read = 0;
                let head_end = loop {
                    let n = stream.read(&mut buffer[read..]).await.unwrap();
                    read += n;
                    let text = String::from_utf8_lossy(&buffer[..read]);
                    if let Some(end) = text.find("\r\n\r\n") {
                        break end + 4;
                    }
                    assert!(n > 0, "connection closed before headers");
                };
                let head = String::from_utf8_lossy(&buffer[..head_end]).to_string();
                let content_length = head
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        key.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                while read < head_end + content_length {
                    read += stream.read(&mut buffer[read..]).await.unwrap();
                }

                let target = head.split_whitespace().nth(1).unwrap_or_default().to_string();
                seen.lock().unwrap().push(target.clone());

                let (link, body) = if target.starts_with("/oauth2/v1/token") {
                    (
                        None,
                        r#"{"access_token":"token","token_type":"Bearer","expires_in":3600}"#
                            .to_string(),
                    )
                } else if target.contains("after=g1") {
                    (None, format!("[{}]", group_json("g2", "Admins")))
                } else {
                    (Some(next.clone()), format!("[{}]", group_json("g1", "Everyone")))
                };

                let link = link
                    .map(|l| format!("Link: <{}>; rel=\"next\"\r\n", l))
                    .unwrap_or_default();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
                    body.len(),
                    link,
                    body
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.ok();
            }
        });

        (origin, requests)
    }

    #[tokio::test]
    async fn user_groups_follow_every_page() {
        let (origin, requests) = serve_user_groups().await;
        let client = OktaClient::new(OktaConfig {
            org_url: origin,
            client_id: "0oa1".to_string(),
            private_key_pem: TEST_KEY.to_string(),
            key_id: None,
            scopes: vec!["okta.groups.read".to_string()],
        })
        .unwrap();

        let groups = client.fetch_user_groups("u1").await.unwrap();

        let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g1", "g2"]);
        let requests = requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![
                "/oauth2/v1/token".to_string(),
                "/api/v1/users/u1/groups?limit=200".to_string(),
                "/api/v1/users/u1/groups?after=g1&limit=200".to_string(),
            ]
        );
    }
}

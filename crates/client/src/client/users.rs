//! User API operations.

use async_trait::async_trait;
use oktactl_core::identity::{
    ExpiredPassword, Group, NewUser, ServiceResult, User, UserService,
};
use reqwest::Method;

use super::conversions::{CreateUserRequest, OktaTempPassword, OktaUser};
use super::OktaClient;
use crate::error::{ClientError, Result};

impl OktaClient {
    /// Get user by ID.
    pub async fn fetch_user(&self, id: &str) -> Result<Option<User>> {
        let url = self.endpoint(&["api", "v1", "users", id])?;
        let user: Option<OktaUser> = self.get_optional(url).await?;
        Ok(user.map(User::from))
    }

    /// Create a new user in STAGED status.
    pub async fn create_staged_user(&self, user: &NewUser) -> Result<User> {
        let mut url = self.endpoint(&["api", "v1", "users"])?;
        url.query_pairs_mut().append_pair("activate", "false");
        let created: OktaUser = self
            .post_json(url, &CreateUserRequest::from(user))
            .await?;
        Ok(created.into())
    }

    /// List all users.
    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let url = self.endpoint(&["api", "v1", "users"])?;
        let users: Vec<OktaUser> = self.get_paginated(url).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// List the members of a group.
    pub async fn fetch_group_members(&self, group_id: &str) -> Result<Vec<User>> {
        let url = self.endpoint(&["api", "v1", "groups", group_id, "users"])?;
        let users: Vec<OktaUser> = self.get_paginated(url).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Run a lifecycle transition such as `activate` or `deactivate`.
    async fn lifecycle(&self, id: &str, transition: &str, query: &[(&str, &str)]) -> Result<()> {
        let mut url = self.endpoint(&["api", "v1", "users", id, "lifecycle", transition])?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.send_empty(Method::POST, url).await
    }

    /// Expire the password and obtain a temporary one.
    pub async fn expire_password(&self, id: &str) -> Result<ExpiredPassword> {
        let url = self.endpoint(&[
            "api",
            "v1",
            "users",
            id,
            "lifecycle",
            "expire_password_with_temp_password",
        ])?;
        let body: OktaTempPassword = self.post_json(url, &serde_json::json!({})).await?;

        let user = match body.user {
            Some(user) => user.into(),
            None => self.fetch_user(id).await?.ok_or_else(|| {
                ClientError::InvalidResponse(format!("User [{}] vanished after password expiry", id))
            })?,
        };

        Ok(ExpiredPassword {
            user,
            temporary_password: body.temp_password,
        })
    }
}

#[async_trait]
impl UserService for OktaClient {
    async fn get_user(&self, id: &str) -> ServiceResult<Option<User>> {
        Ok(self.fetch_user(id).await?)
    }

    async fn create_user(&self, user: &NewUser) -> ServiceResult<User> {
        Ok(self.create_staged_user(user).await?)
    }

    async fn delete_user(&self, id: &str) -> ServiceResult<()> {
        let url = self.endpoint(&["api", "v1", "users", id])?;
        Ok(self.send_empty(Method::DELETE, url).await?)
    }

    async fn deactivate_user(&self, id: &str) -> ServiceResult<()> {
        Ok(self.lifecycle(id, "deactivate", &[]).await?)
    }

    async fn activate_user(&self, id: &str, send_email: bool) -> ServiceResult<()> {
        let send_email = if send_email { "true" } else { "false" };
        Ok(self
            .lifecycle(id, "activate", &[("sendEmail", send_email)])
            .await?)
    }

    async fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.fetch_users().await?)
    }

    async fn list_users_in_group(&self, group: &Group) -> ServiceResult<Vec<User>> {
        Ok(self.fetch_group_members(&group.id).await?)
    }

    async fn expire_password_and_get_temporary_password(
        &self,
        id: &str,
    ) -> ServiceResult<ExpiredPassword> {
        Ok(self.expire_password(id).await?)
    }
}

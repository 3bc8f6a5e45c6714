//! In-memory directory for tests.
//!
//! Implements both service traits over plain maps and counts every call so
//! tests can assert which lifecycle operations a pipeline issued.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::ServiceError;
use super::traits::{GroupService, ServiceResult, UserService};
use super::types::{ExpiredPassword, Group, NewUser, User, UserStatus};

/// Number of times each service operation was invoked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub get_user: usize,
    pub create_user: usize,
    pub delete_user: usize,
    pub deactivate_user: usize,
    pub activate_user: usize,
    pub list_users: usize,
    pub list_users_in_group: usize,
    pub expire_password: usize,
    pub get_group: usize,
    pub list_groups: usize,
    pub list_user_groups: usize,
    pub add_user_to_group: usize,
    pub remove_user_from_group: usize,
}

impl CallCounts {
    /// Total number of calls that change directory state.
    pub fn mutations(&self) -> usize {
        self.create_user
            + self.delete_user
            + self.deactivate_user
            + self.activate_user
            + self.expire_password
            + self.add_user_to_group
            + self.remove_user_from_group
    }
}

/// In-memory users, groups and memberships.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<String, User>>,
    groups: RwLock<HashMap<String, Group>>,
    /// (group id, user id) pairs.
    memberships: RwLock<BTreeSet<(String, String)>>,
    calls: Mutex<CallCounts>,
    user_lookup_failure: Option<ServiceError>,
    group_lookup_failure: Option<ServiceError>,
    mutation_failure: Option<ServiceError>,
    vanish_after_mutation: bool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.get_mut().insert(user.id.clone(), user);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.get_mut().insert(group.id.clone(), group);
        self
    }

    pub fn with_member(mut self, group_id: &str, user_id: &str) -> Self {
        self.memberships
            .get_mut()
            .insert((group_id.to_string(), user_id.to_string()));
        self
    }

    /// Makes every `get_user` call fail with `error`.
    pub fn failing_user_lookups(mut self, error: ServiceError) -> Self {
        self.user_lookup_failure = Some(error);
        self
    }

    /// Makes every `get_group` call fail with `error`.
    pub fn failing_group_lookups(mut self, error: ServiceError) -> Self {
        self.group_lookup_failure = Some(error);
        self
    }

    /// Makes every state-changing call fail with `error`.
    pub fn failing_mutations(mut self, error: ServiceError) -> Self {
        self.mutation_failure = Some(error);
        self
    }

    /// Removes a user right after activating or deactivating it.
    pub fn vanishing_after_mutation(mut self) -> Self {
        self.vanish_after_mutation = true;
        self
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot of a stored user, bypassing the counters.
    pub async fn stored_user(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    /// Whether `user_id` is currently a member of `group_id`.
    pub async fn is_member(&self, group_id: &str, user_id: &str) -> bool {
        self.memberships
            .read()
            .await
            .contains(&(group_id.to_string(), user_id.to_string()))
    }

    fn record(&self, count: impl FnOnce(&mut CallCounts)) {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        count(&mut *calls);
    }

    fn check_mutation(&self) -> ServiceResult<()> {
        match &self.mutation_failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn set_status(&self, id: &str, status: UserStatus) -> ServiceResult<()> {
        let mut users = self.users.write().await;
        if self.vanish_after_mutation {
            users.remove(id);
            return Ok(());
        }
        match users.get_mut(id) {
            Some(user) => {
                user.status = status;
                Ok(())
            }
            None => Err(not_found("user", id)),
        }
    }
}

fn not_found(kind: &str, id: &str) -> ServiceError {
    ServiceError::Api {
        status: 404,
        message: format!("Not found: {kind} {id}"),
    }
}

#[async_trait]
impl UserService for InMemoryDirectory {
    async fn get_user(&self, id: &str) -> ServiceResult<Option<User>> {
        self.record(|c| c.get_user += 1);
        if let Some(error) = &self.user_lookup_failure {
            return Err(error.clone());
        }
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn create_user(&self, new_user: &NewUser) -> ServiceResult<User> {
        self.record(|c| c.create_user += 1);
        self.check_mutation()?;

        let mut users = self.users.write().await;
        let user = User::new(
            format!("00u{}", users.len() + 1),
            new_user.email.clone(),
            new_user.email.clone(),
            new_user.first_name.as_deref(),
            new_user.last_name.as_deref(),
            UserStatus::Staged,
        );
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> ServiceResult<()> {
        self.record(|c| c.delete_user += 1);
        self.check_mutation()?;

        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("user", id))
    }

    async fn deactivate_user(&self, id: &str) -> ServiceResult<()> {
        self.record(|c| c.deactivate_user += 1);
        self.check_mutation()?;
        self.set_status(id, UserStatus::Deprovisioned).await
    }

    async fn activate_user(&self, id: &str, _send_email: bool) -> ServiceResult<()> {
        self.record(|c| c.activate_user += 1);
        self.check_mutation()?;
        self.set_status(id, UserStatus::Active).await
    }

    async fn list_users(&self) -> ServiceResult<Vec<User>> {
        self.record(|c| c.list_users += 1);
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }

    async fn list_users_in_group(&self, group: &Group) -> ServiceResult<Vec<User>> {
        self.record(|c| c.list_users_in_group += 1);
        let users = self.users.read().await;
        let memberships = self.memberships.read().await;
        Ok(memberships
            .iter()
            .filter(|(group_id, _)| *group_id == group.id)
            .filter_map(|(_, user_id)| users.get(user_id).cloned())
            .collect())
    }

    async fn expire_password_and_get_temporary_password(
        &self,
        id: &str,
    ) -> ServiceResult<ExpiredPassword> {
        self.record(|c| c.expire_password += 1);
        self.check_mutation()?;

        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or_else(|| not_found("user", id))?;
        user.status = UserStatus::PasswordExpired;
        Ok(ExpiredPassword {
            user: user.clone(),
            temporary_password: format!("temp-{id}"),
        })
    }
}

#[async_trait]
impl GroupService for InMemoryDirectory {
    async fn get_group(&self, id: &str) -> ServiceResult<Option<Group>> {
        self.record(|c| c.get_group += 1);
        if let Some(error) = &self.group_lookup_failure {
            return Err(error.clone());
        }
        Ok(self.groups.read().await.get(id).cloned())
    }

    async fn list_groups(&self) -> ServiceResult<Vec<Group>> {
        self.record(|c| c.list_groups += 1);
        let mut groups: Vec<Group> = self.groups.read().await.values().cloned().collect();
        groups.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(groups)
    }

    async fn list_user_groups(&self, user_id: &str) -> ServiceResult<Vec<Group>> {
        self.record(|c| c.list_user_groups += 1);
        let groups = self.groups.read().await;
        let memberships = self.memberships.read().await;
        Ok(memberships
            .iter()
            .filter(|(_, member)| member == user_id)
            .filter_map(|(group_id, _)| groups.get(group_id).cloned())
            .collect())
    }

    async fn add_user_to_group(&self, user_id: &str, group_id: &str) -> ServiceResult<()> {
        self.record(|c| c.add_user_to_group += 1);
        self.check_mutation()?;
        self.memberships
            .write()
            .await
            .insert((group_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn remove_user_from_group(&self, group_id: &str, user_id: &str) -> ServiceResult<()> {
        self.record(|c| c.remove_user_from_group += 1);
        self.check_mutation()?;
        self.memberships
            .write()
            .await
            .remove(&(group_id.to_string(), user_id.to_string()));
        Ok(())
    }
}

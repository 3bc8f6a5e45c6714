use async_trait::async_trait;

use super::error::ServiceError;
use super::types::{ExpiredPassword, Group, NewUser, User};

/// Result type for identity platform calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// User operations offered by the identity platform.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Gets a user by id. `Ok(None)` when the user does not exist.
    async fn get_user(&self, id: &str) -> ServiceResult<Option<User>>;

    /// Creates a user without activating it.
    async fn create_user(&self, user: &NewUser) -> ServiceResult<User>;

    /// Deletes a deprovisioned user.
    async fn delete_user(&self, id: &str) -> ServiceResult<()>;

    /// Deactivates (deprovisions) a user.
    async fn deactivate_user(&self, id: &str) -> ServiceResult<()>;

    /// Activates a staged or deprovisioned user.
    async fn activate_user(&self, id: &str, send_email: bool) -> ServiceResult<()>;

    /// Lists every user in the organisation.
    async fn list_users(&self) -> ServiceResult<Vec<User>>;

    /// Lists the members of a group.
    async fn list_users_in_group(&self, group: &Group) -> ServiceResult<Vec<User>>;

    /// Expires the user's password and returns a temporary one.
    async fn expire_password_and_get_temporary_password(
        &self,
        id: &str,
    ) -> ServiceResult<ExpiredPassword>;
}

/// Group operations offered by the identity platform.
#[async_trait]
pub trait GroupService: Send + Sync {
    /// Gets a group by id. `Ok(None)` when the group does not exist.
    async fn get_group(&self, id: &str) -> ServiceResult<Option<Group>>;

    /// Lists every group in the organisation.
    async fn list_groups(&self) -> ServiceResult<Vec<Group>>;

    /// Lists the groups a user belongs to.
    async fn list_user_groups(&self, user_id: &str) -> ServiceResult<Vec<Group>>;

    /// Adds a user to a group.
    async fn add_user_to_group(&self, user_id: &str, group_id: &str) -> ServiceResult<()>;

    /// Removes a user from a group.
    async fn remove_user_from_group(&self, group_id: &str, user_id: &str) -> ServiceResult<()>;
}

//! JSON output formatting.

use oktactl_core::identity::{ExpiredPassword, User};
use serde::Serialize;

/// Format a value as pretty-printed JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// A user with the derived `deactivated` flag.
#[derive(Debug, Serialize)]
pub struct UserRecord<'a> {
    #[serde(flatten)]
    pub user: &'a User,
    pub deactivated: bool,
}

impl<'a> From<&'a User> for UserRecord<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            user,
            deactivated: user.is_deactivated(),
        }
    }
}

/// Wrap users for JSON output.
pub fn user_records(users: &[User]) -> Vec<UserRecord<'_>> {
    users.iter().map(UserRecord::from).collect()
}

/// An expired password with its user as a [`UserRecord`].
#[derive(Debug, Serialize)]
pub struct ExpiredPasswordRecord<'a> {
    pub user: UserRecord<'a>,
    pub temporary_password: &'a str,
}

impl<'a> From<&'a ExpiredPassword> for ExpiredPasswordRecord<'a> {
    fn from(expired: &'a ExpiredPassword) -> Self {
        Self {
            user: UserRecord::from(&expired.user),
            temporary_password: &expired.temporary_password,
        }
    }
}
